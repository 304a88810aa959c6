use std::fmt;
use std::io::Error;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;

use crate::dataset::Game;
use crate::view_state::PageSize;

#[derive(Debug)]
pub enum GSError {
    IoError(Error),
    UnknownGame(String),
    InvalidPageSize(String),
    InvalidConfig(String),
    LoggingFailed(String),
}

impl fmt::Display for GSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GSError::IoError(e) => write!(f, "io error: {e}"),
            GSError::UnknownGame(name) => write!(
                f,
                "unknown game '{name}', expected one of {}",
                Game::ALL.map(|g| g.name()).join(", ")
            ),
            GSError::InvalidPageSize(size) => {
                write!(f, "invalid page size '{size}', expected 10, 20 or 30")
            }
            GSError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            GSError::LoggingFailed(msg) => write!(f, "could not set up logging: {msg}"),
        }
    }
}

impl std::error::Error for GSError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GSError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for GSError {
    fn from(err: Error) -> Self {
        GSError::IoError(err)
    }
}

#[derive(Debug, Clone, Setters)]
pub struct AppConfig {
    pub event_poll_time: u64,
    pub seed: Option<u64>,
    pub initial_filter: Game,
    pub initial_page_size: PageSize,
    pub quick_filters: Vec<Game>,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            event_poll_time: 100,
            seed: None,
            initial_filter: Game::Dice,
            initial_page_size: PageSize::Ten,
            quick_filters: Game::ALL.to_vec(),
            log_file: "~/.game-sections.log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GSError> {
        if self.quick_filters.is_empty() {
            return Err(GSError::InvalidConfig(
                "at least one quick filter is required".into(),
            ));
        }
        for (idx, game) in self.quick_filters.iter().enumerate() {
            if self.quick_filters[..idx].contains(game) {
                return Err(GSError::InvalidConfig(format!(
                    "quick filter {game} is listed twice"
                )));
            }
        }
        if !self.quick_filters.contains(&self.initial_filter) {
            return Err(GSError::InvalidConfig(format!(
                "initial filter {} is not one of the quick filters",
                self.initial_filter
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Help,
    Exit,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    NextFilter,
    PrevFilter,
    SelectFilter(usize),
    NextPageSize,
    PrevPageSize,
    MoveUp,
    MoveDown,
    CopyRow,
    GotoPage,
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Game Sections

Pages
  Left  h p      Previous page
  Right l n      Next page
  Home  g        First page
  End   G        Last page
  :              Go to page

Filter
  Tab / BackTab  Next / previous game
  1 .. 6         Select game by position

Rows per page
  s / S          Next / previous page size

Rows
  Up   k         Move up
  Down j         Move down
  y              Copy row to clipboard

  ?              Help
  Esc            Close
  q              Quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn initial_filter_must_be_quick_filter() {
        let config = AppConfig::default()
            .quick_filters(vec![Game::Dice, Game::Mines, Game::Wheel])
            .initial_filter(Game::Crash);
        assert!(matches!(
            config.validate(),
            Err(GSError::InvalidConfig(_))
        ));
    }

    #[test]
    fn duplicate_or_empty_quick_filters_are_rejected() {
        let config = AppConfig::default().quick_filters(vec![Game::Dice, Game::Dice]);
        assert!(config.validate().is_err());

        let config = AppConfig::default().quick_filters(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn errors_display_context() {
        let err = GSError::UnknownGame("poker".into());
        assert_eq!(
            err.to_string(),
            "unknown game 'poker', expected one of Dice, Crash, Plinko, Mines, Wheel, Blackjack"
        );
        let err: GSError = Error::other("boom").into();
        assert!(err.to_string().contains("boom"));
    }
}
