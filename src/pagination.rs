use tracing::trace;

use crate::dataset::Record;
use crate::view_state::ViewState;

/// The slice of records visible for a given `ViewState`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub visible: Vec<&'a Record>,
    pub filtered_count: usize,
    pub total_pages: usize,
}

impl PageView<'_> {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

pub fn total_pages(filtered_count: usize, rows_per_page: usize) -> usize {
    filtered_count.div_ceil(rows_per_page)
}

pub fn paginate<'a>(records: &'a [Record], state: &ViewState) -> PageView<'a> {
    let rows = state.rows_per_page.rows();
    let filtered: Vec<&Record> = records
        .iter()
        .filter(|r| r.game == state.active_filter)
        .collect();

    let filtered_count = filtered.len();
    let total_pages = total_pages(filtered_count, rows);

    // A page past the filtered range yields an empty slice, not a panic.
    let rbegin = std::cmp::min(
        state.current_page.saturating_sub(1).saturating_mul(rows),
        filtered_count,
    );
    let rend = std::cmp::min(rbegin.saturating_add(rows), filtered_count);

    trace!(
        "Paginate: filter {}, page {}/{}, rows {}, Rb {}, Re {}",
        state.active_filter, state.current_page, total_pages, rows, rbegin, rend
    );

    PageView {
        visible: filtered[rbegin..rend].to_vec(),
        filtered_count,
        total_pages,
    }
}
