use std::time::Duration;
use tracing::trace;

use crate::domain::{AppConfig, GSError, Message};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, GSError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            if model.raw_keyevents() {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Message::Quit),
                _ => None,
            };
        }
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => Some(Message::PrevPage),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => Some(Message::NextPage),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::FirstPage),
            KeyCode::End | KeyCode::Char('G') => Some(Message::LastPage),
            KeyCode::Tab => Some(Message::NextFilter),
            KeyCode::BackTab => Some(Message::PrevFilter),
            KeyCode::Char(c @ '1'..='6') => Some(Message::SelectFilter(c as usize - '1' as usize)),
            KeyCode::Char('s') => Some(Message::NextPageSize),
            KeyCode::Char('S') => Some(Message::PrevPageSize),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Char('y') => Some(Message::CopyRow),
            KeyCode::Char(':') => Some(Message::GotoPage),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
