use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
};

use crate::dataset::Record;
use crate::model::{Model, UIData};
use crate::view_state::PageSize;

pub const CMDLINE_HEIGHT: u16 = 1;
pub const TABLE_HEADER_HEIGHT: u16 = 2;
pub const PAGE_SIZE_BAR_WIDTH: u16 = 30;
pub const EMPTY_MESSAGE: &str = "No data available for the selected filter.";
const COLUMNS: [&str; 5] = ["Game", "Player", "Bet", "Multiplier", "Profit"];
const CMD_PROMPT: &str = "Go to page: ";

#[derive(Debug, Default)]
pub struct TableUI {
    table_state: TableState,
}

impl TableUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let area = frame.area();

        let title = Line::from(format!(" {} ", uidata.title).bold());
        let instructions = Line::from(vec![
            " Filter ".into(),
            "<Tab>".blue().bold(),
            " Rows ".into(),
            "<S>".blue().bold(),
            " Page ".into(),
            "<Left/Right>".blue().bold(),
            " Help ".into(),
            "<?>".blue().bold(),
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [bars, table_area, footer, cmdline] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(TABLE_HEADER_HEIGHT + 1),
            Constraint::Length(1),
            Constraint::Length(CMDLINE_HEIGHT),
        ])
        .areas(inner);

        self.render_bars(uidata, frame, bars);
        self.render_table(uidata, frame, table_area);
        self.render_footer(uidata, frame, footer);
        self.render_cmdline(uidata, frame, cmdline);

        if uidata.show_popup {
            self.render_popup(uidata, frame, area);
        }
    }

    fn render_bars(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let [filter_area, size_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(PAGE_SIZE_BAR_WIDTH)])
                .areas(area);

        let selected_filter = uidata
            .quick_filters
            .iter()
            .position(|&g| g == uidata.active_filter)
            .unwrap_or(0);
        let filters = Tabs::new(uidata.quick_filters.iter().map(|g| g.name()))
            .select(selected_filter)
            .highlight_style(Style::new().black().on_yellow().bold())
            .divider(" ");
        frame.render_widget(filters, filter_area);

        let selected_size = PageSize::ALL
            .iter()
            .position(|&s| s == uidata.page_size)
            .unwrap_or(0);
        let sizes = Tabs::new(PageSize::ALL.map(|s| format!("Show {s}")))
            .select(selected_size)
            .highlight_style(Style::new().black().on_green().bold())
            .divider(" ");
        frame.render_widget(sizes, size_area);
    }

    fn render_table(&mut self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let header = Row::new(COLUMNS)
            .style(Style::new().gray().bold().reversed())
            .bottom_margin(1);
        let rows = uidata.rows.iter().map(record_row);
        let widths = [
            Constraint::Length(10),
            Constraint::Fill(1),
            Constraint::Length(15),
            Constraint::Length(11),
            Constraint::Length(16),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(Style::new().reversed())
            .highlight_symbol("> ");

        self.table_state.select(uidata.selected_row);
        frame.render_stateful_widget(table, area, &mut self.table_state);

        if uidata.rows.is_empty() {
            let [_, message_area] =
                Layout::vertical([Constraint::Length(TABLE_HEADER_HEIGHT), Constraint::Min(1)])
                    .areas(area);
            frame.render_widget(
                Paragraph::new(EMPTY_MESSAGE).white().centered(),
                message_area,
            );
        }
    }

    fn render_footer(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let summary = format!(
            "Showing {} rows per page (Filter: {}) {} records",
            uidata.page_size, uidata.active_filter, uidata.filtered_count
        );
        let pager = Line::from(vec![
            "< Previous".blue(),
            format!("  Page {} of {}  ", uidata.current_page, uidata.total_pages).into(),
            "Next >".blue(),
        ]);
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(pager.width() as u16)])
                .areas(area);
        frame.render_widget(Paragraph::new(summary).gray(), left);
        frame.render_widget(Paragraph::new(pager), right);
    }

    fn render_cmdline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        if uidata.active_cmdinput {
            let line = Line::from(vec![
                Span::from(CMD_PROMPT).yellow(),
                Span::from(uidata.cmdinput.input.as_str()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let x = area.x + (CMD_PROMPT.len() + uidata.cmdinput.cursor_pos) as u16;
            frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
        } else {
            frame.render_widget(Paragraph::new(uidata.status_message.as_str()).dark_gray(), area);
        }
    }

    fn render_popup(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let popup = popup_area(area, 60, 80);
        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .title_bottom(Line::from(" <Esc> to close ").centered())
            .border_set(border::ROUNDED);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(uidata.popup_message.as_str())
                .wrap(Wrap { trim: false })
                .block(block),
            popup,
        );
    }
}

fn record_row(record: &Record) -> Row<'_> {
    Row::new(vec![
        Cell::from(record.game.name()),
        Cell::from(record.player.as_str()),
        Cell::from(format!("{} BTC", record.bet)),
        Cell::from(format!("{}x", record.multiplier)),
        Cell::from(format!("+{} BTC", record.profit)).style(Style::new().green()),
    ])
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
