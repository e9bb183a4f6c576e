//! Pagination, sort and selection state of one table.

use super::comparator::{Comparator, Order};

/// Table state controller
///
/// Holds the page window, sort order, density and row selection that a
/// listing screen binds its controls to. It does not observe filter state:
/// whoever changes filter criteria must call [`TableState::on_reset_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    page: usize,
    rows_per_page: usize,
    order: Order,
    order_by: String,
    dense: bool,
    selected: Vec<String>,
    default_order_by: String,
}

impl TableState {
    pub fn new(default_order_by: impl Into<String>) -> Self {
        let default_order_by = default_order_by.into();
        Self {
            page: 0,
            rows_per_page: 5,
            order: Order::Asc,
            order_by: default_order_by.clone(),
            dense: false,
            selected: Vec::new(),
            default_order_by,
        }
    }

    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page.max(1);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn with_dense(mut self, dense: bool) -> Self {
        self.dense = dense;
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn dense(&self) -> bool {
        self.dense
    }

    /// Selected identifiers in selection order
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Comparator for the current sort order
    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.order, self.order_by.clone())
    }

    /// Column header click
    ///
    /// The active ascending column flips to descending; any other column
    /// becomes the ascending sort. A blank field restores the default.
    pub fn on_sort(&mut self, field: &str) {
        let field = field.trim();
        if field.is_empty() {
            self.order_by = self.default_order_by.clone();
            self.order = Order::Asc;
            return;
        }

        let is_asc = self.order_by == field && self.order == Order::Asc;
        self.order = if is_asc { Order::Desc } else { Order::Asc };
        self.order_by = field.to_string();
    }

    /// Toggle one row in or out of the selection
    pub fn on_select_row(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
    }

    /// Select every id given, or clear the selection
    pub fn on_select_all_rows<I, S>(&mut self, checked: bool, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if checked {
            self.selected = ids.into_iter().map(Into::into).collect();
        } else {
            self.selected.clear();
        }
    }

    pub fn on_change_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Changing the page size always returns to the first page
    pub fn on_change_rows_per_page(&mut self, rows_per_page: usize) {
        self.page = 0;
        self.rows_per_page = rows_per_page.max(1);
    }

    pub fn on_change_dense(&mut self, dense: bool) {
        self.dense = dense;
    }

    pub fn on_reset_page(&mut self) {
        self.page = 0;
    }

    pub fn on_reset_selected(&mut self) {
        self.selected.clear();
    }

    /// Rows of `items` on the current page
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.page.saturating_mul(self.rows_per_page).min(items.len());
        let end = start.saturating_add(self.rows_per_page).min(items.len());
        &items[start..end]
    }

    /// Number of pages needed for `len` rows (at least one)
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.rows_per_page).max(1)
    }
}

/// Rows of the page window that the page offset overshoots past the end of the data
///
/// Zero for any page that starts inside the data; non-zero only when a stale
/// page index points past a shrunk result.
pub fn empty_rows(page: usize, rows_per_page: usize, len: usize) -> usize {
    if page == 0 {
        return 0;
    }
    page.saturating_mul(rows_per_page)
        .saturating_sub(len)
        .min(rows_per_page)
}
