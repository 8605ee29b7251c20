use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use super::AppState;
use crate::domain::models::Action;
use crate::domain::models::AgentAnswer;
use crate::domain::models::ChatReply;
use crate::domain::models::Event;
use crate::domain::models::LoginField;
use crate::domain::models::LoginOutcome;
use crate::domain::models::NoticeKind;
use crate::domain::models::SessionToken;

fn token() -> SessionToken {
    return SessionToken::parse("token123").unwrap();
}

fn logged_in() -> AppState<'static> {
    let mut app_state = AppState::new("");
    app_state.session.login(token());
    return app_state;
}

fn type_text(
    app_state: &mut AppState,
    text: &str,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<()> {
    for c in text.chars() {
        app_state.handle_event(
            Event::KeyboardCharInput(Input {
                key: Key::Char(c),
                ctrl: false,
                alt: false,
            }),
            tx,
        )?;
    }

    return Ok(());
}

fn answer() -> ChatReply {
    return ChatReply::Answered(AgentAnswer {
        agent_name: "Scheduler".to_string(),
        response: "Your appointment is booked".to_string(),
        confidence: Some(0.92),
    });
}

mod login {
    use super::*;

    #[test]
    fn it_requires_email_and_password() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("");
        type_text(&mut app_state, "dr@clinic.org", &tx)?;

        let should_quit = app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(!should_quit);
        assert!(!app_state.loading);
        assert!(rx.try_recv().is_err());
        assert_eq!(
            app_state.notice.map(|e| return e.kind),
            Some(NoticeKind::Error)
        );

        return Ok(());
    }

    #[test]
    fn it_sends_credentials() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("dr@clinic.org");
        type_text(&mut app_state, "hunter2", &tx)?;

        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(app_state.loading);
        match rx.try_recv()? {
            Action::Login(credentials) => {
                assert_eq!(credentials.email, "dr@clinic.org");
                assert_eq!(credentials.password, "hunter2");
            }
            _ => bail!("Wrong action"),
        }

        return Ok(());
    }

    #[test]
    fn it_moves_between_fields_with_arrow_keys() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("");
        assert_eq!(app_state.login_form.focus(), LoginField::Email);

        app_state.handle_event(Event::UIScrollDown(), &tx)?;
        assert_eq!(app_state.login_form.focus(), LoginField::Password);

        app_state.handle_event(Event::UIScrollUp(), &tx)?;
        assert_eq!(app_state.login_form.focus(), LoginField::Email);

        return Ok(());
    }

    #[test]
    fn it_does_not_send_twice_while_loading() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("dr@clinic.org");
        type_text(&mut app_state, "hunter2", &tx)?;

        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_logs_in_with_token() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("dr@clinic.org");
        app_state.loading = true;
        app_state.login_form.password = "hunter2".to_string();

        app_state.handle_event(
            Event::LoginResponse(LoginOutcome::Authenticated(token())),
            &tx,
        )?;

        assert!(app_state.is_logged_in());
        assert!(!app_state.loading);
        assert_eq!(app_state.login_form.password, "");
        insta::assert_snapshot!(app_state.notice.unwrap().text, @"Login successful!");

        return Ok(());
    }

    #[test]
    fn it_stays_logged_out_without_token() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("dr@clinic.org");
        app_state.loading = true;

        app_state.handle_event(Event::LoginResponse(LoginOutcome::NoToken), &tx)?;

        assert!(!app_state.is_logged_in());
        assert!(!app_state.loading);
        assert!(app_state.notice.is_none());

        return Ok(());
    }

    #[test]
    fn it_reports_failed_login() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("dr@clinic.org");
        app_state.loading = true;

        app_state.handle_event(Event::LoginResponse(LoginOutcome::Failed), &tx)?;

        assert!(!app_state.is_logged_in());
        assert!(!app_state.loading);
        insta::assert_snapshot!(app_state.notice.unwrap().text, @"Login failed");

        return Ok(());
    }

    #[test]
    fn it_switches_fields_on_tab() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::new("");
        type_text(&mut app_state, "dr@clinic.org", &tx)?;
        app_state.handle_event(Event::KeyboardTab(), &tx)?;
        app_state.handle_event(Event::KeyboardPaste("hunter2\nignored".to_string()), &tx)?;

        assert_eq!(app_state.login_form.email, "dr@clinic.org");
        assert_eq!(app_state.login_form.password, "hunter2");

        return Ok(());
    }
}

mod query {
    use super::*;

    #[test]
    fn it_sends_nothing_for_blank_query() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        type_text(&mut app_state, "   ", &tx)?;

        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(!app_state.loading);
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_sends_chat_with_token() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        type_text(&mut app_state, " Book an appointment ", &tx)?;

        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(app_state.loading);
        match rx.try_recv()? {
            Action::Chat(sent_token, request) => {
                assert_eq!(sent_token, token());
                assert_eq!(request.query, " Book an appointment ");
                assert!(request.context.is_empty());
                assert!(request.session_id.is_none());
            }
            _ => bail!("Wrong action"),
        }
        assert_eq!(app_state.query.lines().join("\n"), " Book an appointment ");

        return Ok(());
    }

    #[test]
    fn it_ignores_enter_while_loading() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        type_text(&mut app_state, "hello", &tx)?;

        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_shows_reply_and_stops_loading() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        app_state.loading = true;

        app_state.handle_event(Event::ChatResponse(answer()), &tx)?;

        assert!(!app_state.loading);
        insta::assert_snapshot!(app_state.panel_lines().join("\n"), @r###"
        Agent: Scheduler
        Response: Your appointment is booked
        Confidence: 0.92
        "###);

        return Ok(());
    }

    #[test]
    fn it_replaces_reply_with_failure() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        app_state.reply = Some(answer());
        app_state.loading = true;

        app_state.handle_event(Event::ChatResponse(ChatReply::failed()), &tx)?;

        assert!(!app_state.loading);
        insta::assert_snapshot!(app_state.panel_lines().join("\n"), @"Error: Failed to get response");

        return Ok(());
    }

    #[test]
    fn it_aborts_on_esc_while_loading() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        app_state.handle_event(Event::KeyboardEsc(), &tx)?;
        assert!(rx.try_recv().is_err());

        app_state.loading = true;
        app_state.handle_event(Event::KeyboardEsc(), &tx)?;
        match rx.try_recv()? {
            Action::Abort() => (),
            _ => bail!("Wrong action"),
        }

        app_state.handle_event(Event::RequestAborted(), &tx)?;
        assert!(!app_state.loading);
        insta::assert_snapshot!(app_state.notice.unwrap().text, @"Request cancelled.");

        return Ok(());
    }

    #[test]
    fn it_keeps_loading_when_rejected() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        app_state.loading = true;

        app_state.handle_event(Event::RequestRejected(), &tx)?;

        assert!(app_state.loading);
        assert_eq!(
            app_state.notice.map(|e| return e.kind),
            Some(NoticeKind::Error)
        );

        return Ok(());
    }

    #[test]
    fn it_quits_on_ctrl_c() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        assert!(app_state.handle_event(Event::KeyboardCTRLC(), &tx)?);

        return Ok(());
    }
}

mod handle_slash_commands {
    use super::*;

    fn submit(
        app_state: &mut AppState,
        text: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        type_text(app_state, text, tx)?;
        return app_state.handle_event(Event::KeyboardEnter(), tx);
    }

    #[test]
    fn it_breaks_on_quit() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        assert!(submit(&mut app_state, "/q", &tx)?);
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_logs_out() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        app_state.reply = Some(answer());

        assert!(!submit(&mut app_state, "/logout", &tx)?);

        assert!(!app_state.is_logged_in());
        assert!(app_state.reply.is_none());
        assert!(app_state.panel_lines().is_empty());
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_clears_the_panel() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        app_state.reply = Some(answer());

        submit(&mut app_state, "/clear", &tx)?;

        assert!(app_state.panel_lines().is_empty());
        assert_eq!(app_state.query.lines().join("\n"), "");

        return Ok(());
    }

    #[test]
    fn it_shows_help_until_next_reply() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        submit(&mut app_state, "/help", &tx)?;
        assert_eq!(app_state.panel_lines()[0], "COMMANDS:");

        app_state.handle_event(Event::ChatResponse(answer()), &tx)?;
        assert_eq!(app_state.panel_lines()[0], "Agent: Scheduler");

        return Ok(());
    }

    #[test]
    fn it_lists_agents() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        submit(&mut app_state, "/agents", &tx)?;

        assert!(app_state.loading);
        match rx.try_recv()? {
            Action::ListAgents() => (),
            _ => bail!("Wrong action"),
        }

        return Ok(());
    }

    #[test]
    fn it_calls_named_agent() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        submit(&mut app_state, "/agent appointment Book for Monday", &tx)?;

        match rx.try_recv()? {
            Action::CallAgent(_, agent, request) => {
                assert_eq!(agent, "appointment");
                assert_eq!(request.query, "Book for Monday");
            }
            _ => bail!("Wrong action"),
        }

        return Ok(());
    }

    #[test]
    fn it_rejects_agent_call_without_query() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        submit(&mut app_state, "/agent appointment", &tx)?;

        assert!(!app_state.loading);
        assert!(rx.try_recv().is_err());
        insta::assert_snapshot!(app_state.notice.unwrap().text, @"Usage: /agent AGENT_NAME QUERY");

        return Ok(());
    }

    #[test]
    fn it_requests_current_user() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        submit(&mut app_state, "/whoami", &tx)?;

        match rx.try_recv()? {
            Action::WhoAmI(sent_token) => assert_eq!(sent_token, token()),
            _ => bail!("Wrong action"),
        }

        return Ok(());
    }
}
