//! Sort, filter and page position for a listing.
//!
//! Pure state. Every mutator resets or sets the page index; the controller
//! turns each mutation into a fetch request.

use crate::constants::ALL_FILTER_LABEL;
use crate::error::{Error, Result};
use crate::paging::{Direction, PageParams};

/// A column the listing can be sorted by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortColumn {
    /// Stable identifier used by callers (`name`, `date`).
    pub id: String,
    /// Human-readable label (a translation key).
    pub label: String,
    /// Server field sent as `sort`.
    pub field: String,
    /// Direction applied when the column becomes active.
    pub default_direction: Direction,
}

impl SortColumn {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        field: impl Into<String>,
        default_direction: Direction,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field: field.into(),
            default_direction,
        }
    }
}

/// Column id for sorting by name.
pub const NAME_COLUMN: &str = "name";
/// Column id for sorting by upload date.
pub const DATE_COLUMN: &str = "date";

/// Active sort column and direction, active filter, and page index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFilterState {
    columns: Vec<SortColumn>,
    initial: usize,
    active: usize,
    direction: Direction,
    filter: String,
    page: usize,
    page_size: usize,
}

impl SortFilterState {
    /// Create state over a set of sortable columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if `initial_column` is not among
    /// `columns`.
    pub fn new(columns: Vec<SortColumn>, initial_column: &str, page_size: usize) -> Result<Self> {
        let initial = columns
            .iter()
            .position(|c| c.id == initial_column)
            .ok_or_else(|| Error::UnknownColumn(initial_column.to_string()))?;
        let direction = columns[initial].default_direction;
        Ok(Self {
            columns,
            initial,
            active: initial,
            direction,
            filter: String::new(),
            page: 0,
            page_size,
        })
    }

    /// State for the asset listing: name (ascending) and date added
    /// (descending), starting on date added.
    #[must_use]
    pub fn for_assets(page_size: usize) -> Self {
        let columns = vec![
            SortColumn::new(NAME_COLUMN, "Name", "display_name", Direction::Asc),
            SortColumn::new(DATE_COLUMN, "Date Added", "date_added", Direction::Desc),
        ];
        Self {
            columns,
            initial: 1,
            active: 1,
            direction: Direction::Desc,
            filter: String::new(),
            page: 0,
            page_size,
        }
    }

    /// Toggle sorting on a column.
    ///
    /// The active column flips direction; any other column becomes active
    /// with its default direction. Either way the page resets to 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for an unregistered column; the state
    /// is left unchanged.
    pub fn toggle_sort(&mut self, column: &str) -> Result<()> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id == column)
            .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;
        if index == self.active {
            self.direction = self.direction.flip();
        } else {
            self.active = index;
            self.direction = self.columns[index].default_direction;
        }
        self.page = 0;
        Ok(())
    }

    /// Return to the initial column with its default direction.
    pub fn reset_sort(&mut self) {
        self.active = self.initial;
        self.direction = self.columns[self.initial].default_direction;
    }

    /// Select a filter value. `ALL` clears the filter. Resets the page to 0.
    pub fn select_filter(&mut self, value: &str) {
        if value == ALL_FILTER_LABEL {
            self.filter.clear();
        } else {
            self.filter = value.to_string();
        }
        self.page = 0;
    }

    /// Jump to a page. There is no upper bound; the server answers an
    /// out-of-range page with its own idea of the page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Parameters for the next fetch.
    #[must_use]
    pub fn params(&self) -> PageParams {
        PageParams {
            page: self.page,
            page_size: self.page_size,
            sort_field: self.active_column().field.clone(),
            direction: self.direction,
            filter: self.filter.clone(),
        }
    }

    #[must_use]
    pub fn active_column(&self) -> &SortColumn {
        &self.columns[self.active]
    }

    #[must_use]
    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Active filter; empty when no filter is applied.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }

    /// Filter as shown in the column header.
    #[must_use]
    pub fn filter_label(&self) -> &str {
        if self.filter.is_empty() {
            ALL_FILTER_LABEL
        } else {
            &self.filter
        }
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}
