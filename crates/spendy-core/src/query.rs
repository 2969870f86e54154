//! Search, filter, sort and pagination parameters
//!
//! # Invariants
//! - Changing search, date range, either multi-select, sort or page size
//!   moves `page` back to 0.
//! - Selected categories and tags hold no duplicates.

use log::debug;
use serde::{Deserialize, Serialize};
use spendy_config::Config;

use crate::error::CoreResult;
use crate::observer::{Listeners, SubscriptionId};
use crate::time::DateRange;
use crate::types::{PageSize, SortField, SortOrder};

/// Active sort; `field == None` keeps collection order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self {
            field: Some(field),
            order,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == SortSpec::default()
    }
}

/// What the user currently wants to see.
///
/// Only serialized: every change goes through the setters below.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    search: String,
    date_range: DateRange,
    selected_categories: Vec<String>,
    selected_tags: Vec<String>,
    sort: SortSpec,
    page_size: PageSize,
    page: usize,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state with the configured page size and sort
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let page_size = PageSize::try_from(config.pagination.default_page_size)?;
        let field = if config.sort.field.is_empty() {
            None
        } else {
            Some(config.sort.field.parse::<SortField>()?)
        };
        let order = config.sort.order.parse::<SortOrder>()?;

        Ok(Self {
            page_size,
            sort: SortSpec { field, order },
            ..Self::default()
        })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn selected_categories(&self) -> &[String] {
        &self.selected_categories
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.selected_tags
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Any of search, date range or the multi-selects is narrowing the view
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.date_range.is_unbounded()
            || !self.selected_categories.is_empty()
            || !self.selected_tags.is_empty()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.reset_page();
    }

    pub fn set_date_range(&mut self, range: DateRange) -> CoreResult<()> {
        range.validate()?;
        self.date_range = range;
        self.reset_page();
        Ok(())
    }

    pub fn set_selected_categories(&mut self, categories: Vec<String>) {
        self.selected_categories = dedup(categories);
        self.reset_page();
    }

    /// Checkbox semantics: select if absent, deselect if present
    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.selected_categories, category);
        self.reset_page();
    }

    pub fn set_selected_tags(&mut self, tags: Vec<String>) {
        self.selected_tags = dedup(tags);
        self.reset_page();
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        toggle(&mut self.selected_tags, tag);
        self.reset_page();
    }

    pub fn set_sort_field(&mut self, field: Option<SortField>) {
        self.sort.field = field;
        self.reset_page();
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort.order = order;
        self.reset_page();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.reset_page();
    }

    /// Back to collection order, descending; filters untouched
    pub fn clear_sort(&mut self) {
        self.set_sort(SortSpec::default());
    }

    /// Empty search, date range and multi-selects; sort untouched
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.date_range = DateRange::default();
        self.selected_categories.clear();
        self.selected_tags.clear();
        self.reset_page();
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.reset_page();
    }

    /// Jump to a page; out-of-range pages are allowed and render empty
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Advance if another page exists; returns whether it moved.
    ///
    /// A page already past the end stays where it is.
    pub fn next_page(&mut self, page_count: usize) -> bool {
        if self.page.saturating_add(1) < page_count {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    fn reset_page(&mut self) {
        if self.page != 0 {
            debug!("Query changed, resetting page {} to 0", self.page);
        }
        self.page = 0;
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}

/// Owns the query state and notifies subscribers after every change
#[derive(Debug, Default)]
pub struct QueryController {
    state: QueryState,
    initial: QueryState,
    listeners: Listeners<QueryState>,
}

impl QueryController {
    pub fn new(initial: QueryState) -> Self {
        Self {
            state: initial.clone(),
            initial,
            listeners: Listeners::new(),
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Apply `change` to the state, then notify subscribers
    pub fn update<T>(&mut self, change: impl FnOnce(&mut QueryState) -> T) -> T {
        let result = change(&mut self.state);
        self.listeners.notify(&self.state);
        result
    }

    /// Like `update`, for changes that can be rejected; nothing is notified on error
    pub fn try_update(
        &mut self,
        change: impl FnOnce(&mut QueryState) -> CoreResult<()>,
    ) -> CoreResult<()> {
        change(&mut self.state)?;
        self.listeners.notify(&self.state);
        Ok(())
    }

    /// Return to the state the controller was created with
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.listeners.notify(&self.state);
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&QueryState) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
