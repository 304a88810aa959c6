use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::dataset::Game;
use crate::domain::GSError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    Ten,
    Twenty,
    Thirty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::Twenty, PageSize::Thirty];

    pub fn rows(&self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Thirty => 30,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            PageSize::Ten => PageSize::Twenty,
            PageSize::Twenty => PageSize::Thirty,
            PageSize::Thirty => PageSize::Ten,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            PageSize::Ten => PageSize::Thirty,
            PageSize::Twenty => PageSize::Ten,
            PageSize::Thirty => PageSize::Twenty,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows())
    }
}

impl FromStr for PageSize {
    type Err = GSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "10" => Ok(PageSize::Ten),
            "20" => Ok(PageSize::Twenty),
            "30" => Ok(PageSize::Thirty),
            other => Err(GSError::InvalidPageSize(other.to_string())),
        }
    }
}

/// Filter, page size and page of the table view.
///
/// Every transition is a pure function returning the next state. Changing the
/// filter or the page size always starts over at page 1; page navigation takes
/// the current number of pages so it can clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub active_filter: Game,
    pub rows_per_page: PageSize,
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(Game::Dice, PageSize::Ten)
    }
}

impl ViewState {
    pub fn new(active_filter: Game, rows_per_page: PageSize) -> Self {
        Self {
            active_filter,
            rows_per_page,
            current_page: 1,
        }
    }

    pub fn select_filter(self, game: Game) -> Self {
        trace!("Filter {} -> {}", self.active_filter, game);
        Self {
            active_filter: game,
            current_page: 1,
            ..self
        }
    }

    pub fn select_page_size(self, size: PageSize) -> Self {
        trace!("Rows per page {} -> {}", self.rows_per_page, size);
        Self {
            rows_per_page: size,
            current_page: 1,
            ..self
        }
    }

    pub fn prev_page(self) -> Self {
        Self {
            current_page: self.current_page.saturating_sub(1).max(1),
            ..self
        }
    }

    // An empty filtered set has zero pages; stay on page 1 instead of moving to page 0.
    pub fn next_page(self, total_pages: usize) -> Self {
        if total_pages == 0 {
            return self;
        }
        Self {
            current_page: std::cmp::min(self.current_page + 1, total_pages),
            ..self
        }
    }

    pub fn first_page(self) -> Self {
        Self {
            current_page: 1,
            ..self
        }
    }

    pub fn last_page(self, total_pages: usize) -> Self {
        Self {
            current_page: total_pages.max(1),
            ..self
        }
    }

    pub fn goto_page(self, page: usize, total_pages: usize) -> Self {
        Self {
            current_page: page.clamp(1, total_pages.max(1)),
            ..self
        }
    }
}
