#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::Event;
use crate::domain::models::LoginForm;
use crate::domain::models::LoginOutcome;
use crate::domain::models::Notice;
use crate::domain::models::Session;
use crate::domain::models::SlashCommand;
use crate::domain::models::TextArea;

pub struct AppState<'a> {
    pub session: Session,
    pub login_form: LoginForm,
    pub query: tui_textarea::TextArea<'a>,
    pub reply: Option<ChatReply>,
    pub show_help: bool,
    pub notice: Option<Notice>,
    pub loading: bool,
    pub scroll: Scroll,
    pub last_known_width: u16,
    pub last_known_height: u16,
}

impl<'a> AppState<'a> {
    pub fn new(email: &str) -> AppState<'a> {
        return AppState {
            session: Session::default(),
            login_form: LoginForm::new(email),
            query: TextArea::default(),
            reply: None,
            show_help: false,
            notice: None,
            loading: false,
            scroll: Scroll::default(),
            last_known_width: 0,
            last_known_height: 0,
        };
    }

    pub fn is_logged_in(&self) -> bool {
        return self.session.is_logged_in();
    }

    /// Contents of the response panel. The help menu wins over the last reply
    /// until the next reply arrives.
    pub fn panel_lines(&self) -> Vec<String> {
        if self.show_help {
            return help_text().lines().map(|e| return e.to_string()).collect();
        }

        return self
            .reply
            .as_ref()
            .map(|reply| return reply.as_lines())
            .unwrap_or_default();
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_scroll();
    }

    /// Number of rows the panel needs once lines wrap at the last known width.
    fn panel_height(&self) -> u16 {
        let width = self.last_known_width.max(1) as usize;
        let rows: usize = self
            .panel_lines()
            .iter()
            .map(|line| return (line.chars().count().max(1) + width - 1) / width)
            .sum();

        return rows.min(u16::MAX as usize) as u16;
    }

    fn sync_scroll(&mut self) {
        self.scroll
            .set_state(self.panel_height(), self.last_known_height);
    }

    fn set_panel(&mut self, reply: Option<ChatReply>, show_help: bool) {
        self.reply = reply;
        self.show_help = show_help;
        self.scroll.reset();
        self.sync_scroll();
    }

    /// Drops the session token and everything that was shown with it.
    pub fn logout(&mut self) {
        self.session.logout();
        self.login_form.clear_password();
        self.query = TextArea::default();
        self.set_panel(None, false);
        self.notice = Some(Notice::info("Logged out."));
        tracing::info!("Logged out");
    }

    fn submit_login(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.loading {
            return Ok(());
        }

        let credentials = self.login_form.credentials();
        if !credentials.is_complete() {
            self.notice = Some(Notice::error("Email and password are required."));
            return Ok(());
        }

        self.notice = None;
        self.loading = true;
        tx.send(Action::Login(credentials))?;

        return Ok(());
    }

    /// Returns true when the command asks to quit.
    pub fn handle_slash_commands(
        &mut self,
        command: SlashCommand,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        if command.is_quit() {
            return Ok(true);
        }

        self.query = TextArea::default();

        if command.is_help() {
            self.set_panel(self.reply.clone(), true);
            return Ok(false);
        }

        if command.is_clear() {
            self.notice = None;
            self.set_panel(None, false);
            return Ok(false);
        }

        if command.is_logout() {
            self.logout();
            return Ok(false);
        }

        let token = match self.session.token() {
            Some(token) => token.clone(),
            None => return Ok(false),
        };

        if command.is_agent_list() {
            self.loading = true;
            tx.send(Action::ListAgents())?;
            return Ok(false);
        }

        if command.is_whoami() {
            self.loading = true;
            tx.send(Action::WhoAmI(token))?;
            return Ok(false);
        }

        if command.is_agent_call() {
            match command.agent_call_args() {
                Some((agent, query)) => {
                    self.loading = true;
                    tx.send(Action::CallAgent(token, agent, ChatRequest::new(&query)))?;
                }
                None => {
                    self.notice = Some(Notice::error("Usage: /agent AGENT_NAME QUERY"));
                }
            }
        }

        return Ok(false);
    }

    fn submit_query(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        let input_str = self.query.lines().join("\n");
        let query = input_str.trim();
        if query.is_empty() {
            return Ok(false);
        }

        if let Some(command) = SlashCommand::parse(query) {
            return self.handle_slash_commands(command, tx);
        }

        let token = match self.session.token() {
            Some(token) => token.clone(),
            None => return Ok(false),
        };

        self.notice = None;
        self.loading = true;
        tx.send(Action::Chat(token, ChatRequest::new(&input_str)))?;

        return Ok(false);
    }

    fn handle_login_response(&mut self, outcome: LoginOutcome) {
        self.loading = false;
        match outcome {
            LoginOutcome::Authenticated(token) => {
                self.session.login(token);
                self.login_form.clear_password();
                self.notice = Some(Notice::success("Login successful!"));
            }
            LoginOutcome::NoToken => {
                self.notice = None;
            }
            LoginOutcome::Failed => {
                self.notice = Some(Notice::error("Login failed"));
            }
        }
    }

    fn paste(&mut self, text: &str) {
        if !self.is_logged_in() {
            self.login_form.paste(text);
            return;
        }

        for (idx, line) in text.lines().enumerate() {
            if idx > 0 {
                self.query.insert_newline();
            }
            for c in line.chars() {
                self.query.insert_char(c);
            }
        }
    }

    /// Applies one event to the state. Returns true when the app should quit.
    pub fn handle_event(
        &mut self,
        event: Event,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        match event {
            Event::KeyboardCTRLC() => return Ok(true),
            Event::KeyboardEsc() => {
                if self.loading {
                    tx.send(Action::Abort())?;
                }
            }
            Event::KeyboardEnter() => {
                if self.is_logged_in() {
                    return self.submit_query(tx);
                }
                self.submit_login(tx)?;
            }
            Event::KeyboardTab() => {
                if !self.is_logged_in() {
                    self.login_form.toggle_focus();
                }
            }
            Event::KeyboardPaste(text) => self.paste(&text),
            Event::KeyboardCharInput(input) => {
                if self.is_logged_in() {
                    self.query.input(input);
                } else {
                    self.login_form.input(input);
                }
            }
            // Arrow keys move between login fields until there is a panel to scroll.
            Event::UIScrollDown() | Event::UIScrollUp() if !self.is_logged_in() => {
                self.login_form.toggle_focus();
            }
            Event::UIScrollDown() => self.scroll.down(),
            Event::UIScrollUp() => self.scroll.up(),
            Event::UIScrollPageDown() => self.scroll.down_page(),
            Event::UIScrollPageUp() => self.scroll.up_page(),
            Event::LoginResponse(outcome) => self.handle_login_response(outcome),
            Event::ChatResponse(reply) => {
                self.loading = false;
                self.set_panel(Some(reply), false);
            }
            Event::RequestNotice(notice) => {
                self.loading = false;
                self.notice = Some(notice);
            }
            Event::RequestAborted() => {
                self.loading = false;
                self.notice = Some(Notice::info("Request cancelled."));
            }
            Event::RequestRejected() => {
                self.notice = Some(Notice::error("A request is already in progress."));
            }
            Event::UITick() => (),
        }

        return Ok(false);
    }
}
