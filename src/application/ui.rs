use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::ApiBox;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::Notice;
use crate::domain::models::NoticeKind;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;

const FEATURES: [&str; 6] = [
    "Appointment Scheduling",
    "Clinical Consultation Chat",
    "Symptom Image Analysis",
    "Report Understanding",
    "Prescription Generation",
    "Medical Records Search",
];

fn centered(rect: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(rect.width);
    let height = height.min(rect.height);

    return Rect {
        x: rect.x + (rect.width - width) / 2,
        y: rect.y + (rect.height - height) / 3,
        width,
        height,
    };
}

fn render_header<B: Backend>(frame: &mut Frame<B>, rect: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "MediSense-AI",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Enterprise Clinical AI Multi-Agent Assistant",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        rect,
    );
}

fn render_notice<B: Backend>(frame: &mut Frame<B>, rect: Rect, notice: &Option<Notice>) {
    let Some(notice) = notice else {
        return;
    };

    let color = match notice.kind {
        NoticeKind::Info => Color::Yellow,
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };

    frame.render_widget(
        Paragraph::new(notice.text.to_string())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        rect,
    );
}

fn styled_line(line: String) -> Line<'static> {
    for (label, color) in [
        ("Agent:", Color::Cyan),
        ("Response:", Color::Cyan),
        ("Confidence:", Color::Cyan),
        ("Error:", Color::Red),
    ] {
        if let Some(rest) = line.strip_prefix(label) {
            return Line::from(vec![
                Span::styled(
                    label.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(rest.to_string()),
            ]);
        }
    }

    return Line::from(line);
}

fn render_panel<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &mut AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("Response")
        .padding(Padding::new(1, 1, 0, 0));

    let inner = block.inner(rect);
    if inner.width != app_state.last_known_width || inner.height != app_state.last_known_height
    {
        app_state.set_rect(inner);
    }

    let lines = app_state.panel_lines();
    let paragraph = if lines.is_empty() {
        Paragraph::new("Responses from the assistant appear here.")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(lines.into_iter().map(styled_line).collect::<Vec<Line>>())
            .wrap(Wrap { trim: false })
            .scroll((app_state.scroll.position, 0))
    };

    frame.render_widget(paragraph.block(block), rect);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        rect.inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app_state.scroll.scrollbar_state,
    );
}

fn render_features<B: Backend>(frame: &mut Frame<B>, rect: Rect) {
    let lines = FEATURES
        .iter()
        .map(|feature| return Line::from(format!("- {feature}")))
        .collect::<Vec<Line>>();

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Features")
                .padding(Padding::new(1, 1, 0, 0)),
        ),
        rect,
    );
}

fn render<B: Backend>(frame: &mut Frame<B>, app_state: &mut AppState, loading: &Loading) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(frame.size());

    render_header(frame, layout[0]);
    render_notice(frame, layout[1], &app_state.notice);

    if !app_state.is_logged_in() {
        app_state
            .login_form
            .render(frame, centered(layout[2], 60, 10), app_state.loading);
        return;
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Min(1), Constraint::Length(34)])
        .split(layout[2]);
    let chat = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
        .split(body[0]);

    render_panel(frame, chat[0], app_state);
    if app_state.loading {
        loading.render(frame, chat[1]);
    } else {
        frame.render_widget(app_state.query.widget(), chat[1]);
    }
    render_features(frame, body[1]);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let loading = Loading::default();
    let mut events = EventsService::new(rx);

    loop {
        terminal.draw(|frame| {
            render(frame, app_state, &loading);
        })?;

        let event = events.next().await?;
        if app_state.handle_event(event, &tx)? {
            break;
        }
    }

    return Ok(());
}

async fn check_api(api: &ApiBox, app_state: &mut AppState<'_>) {
    if let Err(err) = api.health_check().await {
        tracing::warn!(error = ?err, "Backend health check failed");
        app_state.notice = Some(Notice::error(&format!(
            "Unable to reach the MediSense-AI backend at {}. Requests will fail until it is running.",
            Config::get(ConfigKey::ApiURL)
        )));
    }
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    api: ApiBox,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(&Config::get(ConfigKey::Email));
    check_api(&api, &mut app_state).await;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
