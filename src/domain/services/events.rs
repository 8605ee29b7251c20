use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyEventKind;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

fn key_event(input: Input) -> Event {
    match (&input.key, input.ctrl) {
        (Key::Char('c'), true) => return Event::KeyboardCTRLC(),
        (Key::Char('d'), true) | (Key::PageDown, _) => return Event::UIScrollPageDown(),
        (Key::Char('u'), true) | (Key::PageUp, _) => return Event::UIScrollPageUp(),
        (Key::Down, _) => return Event::UIScrollDown(),
        (Key::Up, _) => return Event::UIScrollUp(),
        (Key::Tab, _) => return Event::KeyboardTab(),
        (Key::Esc, _) => return Event::KeyboardEsc(),
        (Key::Enter, _) => return Event::KeyboardEnter(),
        _ => return Event::KeyboardCharInput(input),
    }
}

/// Merges terminal input with request outcomes from the actions worker.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(Event::KeyboardPaste(text));
            }
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            CrosstermEvent::Key(keyevent) => {
                // Windows reports both press and release.
                if keyevent.kind == KeyEventKind::Release {
                    return None;
                }

                return Some(key_event(keyevent.into()));
            }
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
