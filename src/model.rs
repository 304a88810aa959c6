use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info, trace, warn};

use crate::dataset::{Dataset, Game, Record};
use crate::domain::{AppConfig, GSError, HELP_TEXT, Message};
use crate::inputter::{InputResult, Inputter};
use crate::pagination::{PageView, paginate};
use crate::view_state::{PageSize, ViewState};

const MAX_PAGE_DIGITS: usize = 4;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    CMDINPUT,
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone)]
pub struct UIData {
    pub title: String,
    pub quick_filters: Vec<Game>,
    pub active_filter: Game,
    pub page_size: PageSize,
    pub rows: Vec<Record>,
    pub selected_row: Option<usize>,
    pub current_page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub show_popup: bool,
    pub popup_message: String,
    pub cmdinput: InputResult,
    pub active_cmdinput: bool,
    pub status_message: String,
}

pub struct Model {
    config: AppConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    dataset: Dataset,
    state: ViewState,
    selected_row: usize,
    uidata: UIData,
    clipboard: Option<Clipboard>,
    input: Inputter,
    last_input: InputResult,
    active_cmdinput: bool,
    status_message: String,
}

impl Model {
    pub fn init(config: &AppConfig, dataset: Dataset) -> Result<Self, GSError> {
        config.validate()?;
        let state = ViewState::new(config.initial_filter, config.initial_page_size);
        info!(
            "Model ready: {} records, filter {}, {} rows per page",
            dataset.len(),
            state.active_filter,
            state.rows_per_page
        );
        for game in Game::ALL {
            debug!("{game}: {} records", dataset.count(game));
        }

        let mut model = Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            dataset,
            state,
            selected_row: 0,
            uidata: UIData {
                title: String::new(),
                quick_filters: Vec::new(),
                active_filter: state.active_filter,
                page_size: state.rows_per_page,
                rows: Vec::new(),
                selected_row: None,
                current_page: state.current_page,
                total_pages: 0,
                filtered_count: 0,
                show_popup: false,
                popup_message: String::new(),
                cmdinput: InputResult::default(),
                active_cmdinput: false,
                status_message: String::new(),
            },
            clipboard: None,
            input: Inputter::numeric(MAX_PAGE_DIGITS),
            last_input: InputResult::default(),
            active_cmdinput: false,
            status_message: "Press ? for help".to_string(),
        };
        model.update_uidata();
        Ok(model)
    }

    pub fn with_clipboard(mut self, clipboard: Clipboard) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn view_state(&self) -> ViewState {
        self.state
    }

    pub fn page_view(&self) -> PageView<'_> {
        paginate(self.dataset.records(), &self.state)
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), GSError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);

        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::Help => self.show_help(),
                Message::PrevPage => self.prev_page(),
                Message::NextPage => self.next_page(),
                Message::FirstPage => self.apply(self.state.first_page()),
                Message::LastPage => {
                    let total = self.page_view().total_pages;
                    self.apply(self.state.last_page(total));
                }
                Message::NextFilter => self.cycle_filter(1),
                Message::PrevFilter => self.cycle_filter(-1),
                Message::SelectFilter(slot) => self.select_filter_slot(slot),
                Message::NextPageSize => self.select_page_size(self.state.rows_per_page.next()),
                Message::PrevPageSize => {
                    self.select_page_size(self.state.rows_per_page.previous())
                }
                Message::MoveUp => self.move_selection_up(),
                Message::MoveDown => self.move_selection_down(),
                Message::CopyRow => self.copy_row(),
                Message::GotoPage => self.enter_cmd_mode(),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.exit(),
                _ => (),
            },
            Modus::CMDINPUT => {
                if let Message::RawKey(key) = msg {
                    self.raw_input(key)
                }
            }
        }
        Ok(())
    }

    // -------------------- View state transitions ---------------------- //

    pub fn select_filter(&mut self, game: Game) {
        if !self.config.quick_filters.contains(&game) {
            debug!("Ignoring filter {game}, not a quick filter");
            self.set_status_message(format!("{game} is not available as a filter"));
            return;
        }
        self.apply(self.state.select_filter(game));
        self.set_status_message(format!("{}: {}", game, game.description()));
    }

    pub fn select_page_size(&mut self, size: PageSize) {
        self.apply(self.state.select_page_size(size));
        self.set_status_message(format!("Showing {size} rows per page"));
    }

    fn select_filter_slot(&mut self, slot: usize) {
        let game = self.config.quick_filters.get(slot).copied();
        match game {
            Some(game) => self.select_filter(game),
            None => self.set_status_message(format!("No filter at position {}", slot + 1)),
        }
    }

    fn cycle_filter(&mut self, step: isize) {
        let filters = &self.config.quick_filters;
        let current = filters
            .iter()
            .position(|&g| g == self.state.active_filter)
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(filters.len() as isize) as usize;
        let game = filters[next];
        self.select_filter(game);
    }

    fn prev_page(&mut self) {
        let next = self.state.prev_page();
        if next == self.state {
            self.set_status_message("Already on the first page");
        }
        self.apply(next);
    }

    fn next_page(&mut self) {
        let total = self.page_view().total_pages;
        let next = self.state.next_page(total);
        if next == self.state {
            self.set_status_message("Already on the last page");
        }
        self.apply(next);
    }

    fn apply(&mut self, state: ViewState) {
        if state != self.state {
            trace!("ViewState {:?} -> {:?}", self.state, state);
            self.state = state;
            self.selected_row = 0;
        }
        self.update_uidata();
    }

    // -------------------- Row cursor and clipboard ---------------------- //

    fn move_selection_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
        self.update_uidata();
    }

    fn move_selection_down(&mut self) {
        let visible = self.page_view().visible.len();
        if self.selected_row + 1 < visible {
            self.selected_row += 1;
        }
        self.update_uidata();
    }

    fn copy_row(&mut self) {
        let line = self
            .page_view()
            .visible
            .get(self.selected_row)
            .map(|r| csv_line(r));
        let Some(line) = line else {
            self.set_status_message("Nothing to copy");
            return;
        };
        trace!("Row content: {}", line);

        let message = match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(line) {
                Ok(_) => "Copied row to clipboard".to_string(),
                Err(e) => {
                    warn!("Error copying to clipboard: {:?}", e);
                    format!("Copy failed: {e}")
                }
            },
            None => "Clipboard not available".to_string(),
        };
        self.set_status_message(message);
    }

    // -------------------- Popup and command input ---------------------- //

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.uidata.popup_message = HELP_TEXT.to_string();
        self.uidata.show_popup = true;
    }

    fn exit(&mut self) {
        if self.modus == Modus::POPUP {
            trace!("Close popup ...");
            self.modus = self.previous_modus;
            self.previous_modus = Modus::POPUP;
            self.uidata.show_popup = false;
        }
    }

    fn enter_cmd_mode(&mut self) {
        trace!("Entering command mode ...");
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.active_cmdinput = true;
        self.input.clear();
        self.last_input = self.input.get();
        self.update_uidata();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        if self.active_cmdinput {
            self.last_input = self.input.read(key);
            if self.last_input.finished {
                self.handle_cmd_input();
            }
            self.update_uidata();
        }
    }

    fn handle_cmd_input(&mut self) {
        trace!("Handle cmd input {}", self.last_input.input);
        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;

        if self.last_input.canceled {
            return;
        }
        match self.last_input.input.parse::<usize>() {
            Ok(page) => {
                let total = self.page_view().total_pages;
                self.apply(self.state.goto_page(page, total));
                self.set_status_message(format!("Page {} of {}", self.state.current_page, total));
            }
            Err(_) => self.set_status_message("Enter a page number"),
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
    }

    fn update_uidata(&mut self) {
        let page = paginate(self.dataset.records(), &self.state);
        let selected_row = if page.is_empty() {
            None
        } else {
            Some(std::cmp::min(self.selected_row, page.visible.len() - 1))
        };

        self.uidata = UIData {
            title: "Game Sections".to_string(),
            quick_filters: self.config.quick_filters.clone(),
            active_filter: self.state.active_filter,
            page_size: self.state.rows_per_page,
            rows: page.visible.into_iter().cloned().collect(),
            selected_row,
            current_page: self.state.current_page,
            total_pages: page.total_pages,
            filtered_count: page.filtered_count,
            show_popup: self.modus == Modus::POPUP,
            popup_message: self.uidata.popup_message.clone(),
            cmdinput: self.last_input.clone(),
            active_cmdinput: self.active_cmdinput,
            status_message: self.status_message.clone(),
        }
    }
}

fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',' || c == '"');
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping {
        out = format!("\"{out}\"");
    }
    out
}

/// Record as one CSV line, in column order.
pub fn csv_line(record: &Record) -> String {
    record
        .cells()
        .iter()
        .map(|c| wrap_cell_content(c))
        .collect::<Vec<String>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn dice_only(n: usize) -> Dataset {
        Dataset::from_records(
            (0..n)
                .map(|i| Record::new(Game::Dice, format!("Player{}", i + 1), 0.01, 1.5, 0.02))
                .collect(),
        )
    }

    fn model_with(dataset: Dataset) -> Model {
        Model::init(&AppConfig::default(), dataset).unwrap()
    }

    fn send(model: &mut Model, msgs: &[Message]) {
        for msg in msgs {
            model.update(Some(msg.clone())).unwrap();
        }
    }

    fn key(code: KeyCode) -> Message {
        Message::RawKey(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn init_rejects_invalid_config() {
        let config = AppConfig::default().quick_filters(vec![Game::Mines]);
        assert!(Model::init(&config, Dataset::default()).is_err());
    }

    #[test]
    fn initial_view_shows_first_page_of_dice() {
        let model = model_with(Dataset::seeded(Some(11)));
        let ui = model.get_uidata();
        assert_eq!(ui.title, "Game Sections");
        assert_eq!(ui.active_filter, Game::Dice);
        assert_eq!(ui.page_size, PageSize::Ten);
        assert_eq!(ui.rows.len(), 5);
        assert_eq!(ui.current_page, 1);
        assert_eq!(ui.total_pages, 1);
        assert_eq!(ui.selected_row, Some(0));
    }

    #[test]
    fn filter_change_resets_page() {
        let mut model = model_with(dice_only(25));
        send(&mut model, &[Message::NextPage, Message::NextPage]);
        assert_eq!(model.view_state().current_page, 3);

        send(&mut model, &[Message::SelectFilter(3)]);
        let ui = model.get_uidata();
        assert_eq!(ui.active_filter, Game::Mines);
        assert_eq!(ui.current_page, 1);
        assert_eq!(ui.total_pages, 0);
        assert!(ui.rows.is_empty());
        assert_eq!(ui.selected_row, None);
    }

    #[test]
    fn next_page_on_empty_filter_stays_on_page_one() {
        let mut model = model_with(dice_only(3));
        send(&mut model, &[Message::SelectFilter(1), Message::NextPage]);
        assert_eq!(model.view_state().current_page, 1);
        send(&mut model, &[Message::LastPage]);
        assert_eq!(model.view_state().current_page, 1);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut model = model_with(dice_only(25));
        send(&mut model, &[Message::NextPage]);
        assert_eq!(model.get_uidata().rows[0].player, "Player11");

        send(&mut model, &[Message::NextPageSize]);
        let ui = model.get_uidata();
        assert_eq!(ui.page_size, PageSize::Twenty);
        assert_eq!(ui.current_page, 1);
        assert_eq!(ui.rows.len(), 20);
        assert_eq!(ui.rows[0].player, "Player1");
    }

    #[test]
    fn restricted_quick_filters_ignore_other_games() {
        let config = AppConfig::default().quick_filters(vec![Game::Dice, Game::Mines, Game::Wheel]);
        let mut model = Model::init(&config, Dataset::seeded(Some(5))).unwrap();

        model.select_filter(Game::Crash);
        assert_eq!(model.view_state().active_filter, Game::Dice);

        send(&mut model, &[Message::SelectFilter(4)]);
        assert_eq!(model.view_state().active_filter, Game::Dice);
        assert_eq!(model.get_uidata().status_message, "No filter at position 5");

        send(&mut model, &[Message::NextFilter]);
        assert_eq!(model.view_state().active_filter, Game::Mines);
        send(&mut model, &[Message::PrevFilter, Message::PrevFilter]);
        assert_eq!(model.view_state().active_filter, Game::Wheel);
    }

    #[test]
    fn row_cursor_is_bounded_and_reset_on_page_change() {
        let mut model = model_with(dice_only(12));
        send(&mut model, &[Message::MoveUp]);
        assert_eq!(model.get_uidata().selected_row, Some(0));

        send(&mut model, &vec![Message::MoveDown; 15]);
        assert_eq!(model.get_uidata().selected_row, Some(9));

        send(&mut model, &[Message::NextPage]);
        assert_eq!(model.get_uidata().selected_row, Some(0));
        send(&mut model, &[Message::MoveDown, Message::MoveDown]);
        assert_eq!(model.get_uidata().selected_row, Some(1));
    }

    #[test]
    fn copy_without_clipboard_reports_status() {
        let mut model = model_with(dice_only(1));
        send(&mut model, &[Message::CopyRow]);
        assert_eq!(model.get_uidata().status_message, "Clipboard not available");

        send(&mut model, &[Message::SelectFilter(1), Message::CopyRow]);
        assert_eq!(model.get_uidata().status_message, "Nothing to copy");
    }

    #[test]
    fn goto_page_prompt() {
        let mut model = model_with(dice_only(25));
        send(&mut model, &[Message::GotoPage]);
        assert!(model.raw_keyevents());
        assert!(model.get_uidata().active_cmdinput);

        send(&mut model, &[key(KeyCode::Char('3')), key(KeyCode::Enter)]);
        assert!(!model.raw_keyevents());
        assert_eq!(model.view_state().current_page, 3);
        assert_eq!(model.get_uidata().rows.len(), 5);

        send(&mut model, &[Message::GotoPage, key(KeyCode::Char('9')), key(KeyCode::Enter)]);
        assert_eq!(model.view_state().current_page, 3);

        send(&mut model, &[Message::GotoPage, key(KeyCode::Char('1')), key(KeyCode::Esc)]);
        assert_eq!(model.view_state().current_page, 3);

        send(&mut model, &[Message::GotoPage, key(KeyCode::Enter)]);
        assert_eq!(model.get_uidata().status_message, "Enter a page number");
    }

    #[test]
    fn help_popup_blocks_navigation_until_closed() {
        let mut model = model_with(dice_only(25));
        send(&mut model, &[Message::Help, Message::NextPage]);
        assert!(model.get_uidata().show_popup);
        assert_eq!(model.view_state().current_page, 1);

        send(&mut model, &[Message::Exit, Message::NextPage]);
        assert!(!model.get_uidata().show_popup);
        assert_eq!(model.view_state().current_page, 2);
    }

    #[test]
    fn quit_from_table_and_popup() {
        let mut model = model_with(dice_only(1));
        send(&mut model, &[Message::Quit]);
        assert_eq!(model.status, Status::QUITTING);

        let mut model = model_with(dice_only(1));
        send(&mut model, &[Message::Help, Message::Quit]);
        assert_eq!(model.status, Status::QUITTING);
    }

    #[test]
    fn csv_line_quotes_when_needed() {
        let record = Record {
            game: Game::Dice,
            player: "Big \"Al\", Jr".to_string(),
            bet: "0.01000000".to_string(),
            multiplier: "2.00".to_string(),
            profit: "0.02000000".to_string(),
        };
        assert_eq!(
            csv_line(&record),
            "Dice,\"Big \"\"Al\"\", Jr\",0.01000000,2.00,0.02000000"
        );
    }
}
