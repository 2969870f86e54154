//! Mutation coordinator
//!
//! `TransactionBook` is the single writer for the record store and the query
//! state. Every operation recomputes the visible rows synchronously before
//! returning, so `view()` never lags behind a committed change.

use chrono::{DateTime, Utc};
use log::debug;
use spendy_config::Config;

use crate::categories::CategoryRegistry;
use crate::engine::{available_categories, available_tags, visible_rows, VisibleRows};
use crate::error::CoreResult;
use crate::models::{Transaction, TransactionFormData, TransactionPatch};
use crate::observer::{Listeners, SubscriptionId};
use crate::query::{QueryController, QueryState, SortSpec};
use crate::reports::{summarize, ViewSummary};
use crate::store::{RecordStore, StoreEvent};
use crate::time::DateRange;
use crate::types::{PageSize, SortField, SortOrder};

#[derive(Debug, Default)]
pub struct TransactionBook {
    store: RecordStore,
    query: QueryController,
    categories: CategoryRegistry,
    view: VisibleRows,
    view_listeners: Listeners<VisibleRows>,
}

impl TransactionBook {
    /// Empty book with the default query state and no known categories
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty book starting from the configured page size, sort and categories
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let query = QueryState::from_config(config)?;
        let categories = CategoryRegistry::with_names(&config.categories.defaults);
        Ok(Self {
            query: QueryController::new(query),
            categories,
            ..Self::default()
        })
    }

    // ==================== Reads ====================

    pub fn records(&self) -> &[Transaction] {
        self.store.records()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn query(&self) -> &QueryState {
        self.query.state()
    }

    /// Current page, recomputed after every change
    pub fn view(&self) -> &VisibleRows {
        &self.view
    }

    pub fn summary(&self) -> ViewSummary {
        summarize(self.store.records(), self.query.state())
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Categories present in the records, for the filter picker
    pub fn available_categories(&self) -> Vec<String> {
        available_categories(self.store.records())
    }

    pub fn available_tags(&self) -> Vec<String> {
        available_tags(self.store.records())
    }

    // ==================== Record mutations ====================

    pub fn replace_all(&mut self, records: Vec<Transaction>) {
        self.store.replace_all(records);
        self.refresh_in_range();
    }

    /// Insert a new transaction; query state is left alone
    pub fn create(
        &mut self,
        form: TransactionFormData,
        id: String,
        now: DateTime<Utc>,
    ) -> CoreResult<Transaction> {
        let created = self.store.create(form, id, now)?.clone();
        self.refresh();
        Ok(created)
    }

    /// Returns `Ok(false)` if no record has `id`
    pub fn update(
        &mut self,
        id: &str,
        patch: TransactionPatch,
        now: DateTime<Utc>,
    ) -> CoreResult<bool> {
        let changed = self.store.update(id, patch, now)?;
        if changed {
            self.refresh_in_range();
        }
        Ok(changed)
    }

    /// Returns the removed record, `None` if no record has `id`
    pub fn delete(&mut self, id: &str) -> Option<Transaction> {
        let removed = self.store.delete(id);
        if removed.is_some() {
            self.refresh_in_range();
        }
        removed
    }

    /// Drop every record and return the query to its initial state
    pub fn reset(&mut self) {
        self.store.replace_all(Vec::new());
        self.query.reset();
        self.refresh();
    }

    pub fn register_category(&mut self, name: &str) -> bool {
        self.categories.register(name)
    }

    // ==================== Query changes ====================

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        self.query.update(|q| q.set_search(search));
        self.refresh();
    }

    pub fn set_date_range(&mut self, range: DateRange) -> CoreResult<()> {
        self.query.try_update(|q| q.set_date_range(range))?;
        self.refresh();
        Ok(())
    }

    pub fn set_selected_categories(&mut self, categories: Vec<String>) {
        self.query.update(|q| q.set_selected_categories(categories));
        self.refresh();
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.query.update(|q| q.toggle_category(category));
        self.refresh();
    }

    pub fn set_selected_tags(&mut self, tags: Vec<String>) {
        self.query.update(|q| q.set_selected_tags(tags));
        self.refresh();
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.query.update(|q| q.toggle_tag(tag));
        self.refresh();
    }

    pub fn set_sort_field(&mut self, field: Option<SortField>) {
        self.query.update(|q| q.set_sort_field(field));
        self.refresh();
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.query.update(|q| q.set_sort_order(order));
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.query.update(|q| q.set_sort(sort));
        self.refresh();
    }

    pub fn clear_sort(&mut self) {
        self.query.update(|q| q.clear_sort());
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.query.update(|q| q.clear_filters());
        self.refresh();
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.query.update(|q| q.set_page_size(page_size));
        self.refresh();
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.update(|q| q.set_page(page));
        self.refresh();
    }

    pub fn next_page(&mut self) -> bool {
        let page_count = self.view.page_count;
        let moved = self.query.update(|q| q.next_page(page_count));
        self.refresh();
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.query.update(|q| q.previous_page());
        self.refresh();
        moved
    }

    // ==================== Subscriptions ====================

    pub fn subscribe_records<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe_records(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn subscribe_query<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&QueryState) + 'static,
    {
        self.query.subscribe(callback)
    }

    pub fn unsubscribe_query(&mut self, id: SubscriptionId) -> bool {
        self.query.unsubscribe(id)
    }

    /// Called with the recomputed rows after every change
    pub fn subscribe_view<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&VisibleRows) + 'static,
    {
        self.view_listeners.subscribe(callback)
    }

    pub fn unsubscribe_view(&mut self, id: SubscriptionId) -> bool {
        self.view_listeners.unsubscribe(id)
    }

    // ==================== Recompute ====================

    fn refresh(&mut self) {
        self.view = visible_rows(self.store.records(), self.query.state());
        self.publish();
    }

    /// Recompute after a change that can shrink the match set, pulling the
    /// page back to the last one that still has rows
    fn refresh_in_range(&mut self) {
        let mut view = visible_rows(self.store.records(), self.query.state());
        let page = self.query.state().page();
        if page > 0 && page >= view.page_count {
            let last = view.page_count.saturating_sub(1);
            debug!("Page {} out of range after mutation, moving to {}", page, last);
            self.query.update(|q| q.set_page(last));
            view = visible_rows(self.store.records(), self.query.state());
        }
        self.view = view;
        self.publish();
    }

    fn publish(&mut self) {
        debug!(
            "View recomputed: {} matched, page {} of {}",
            self.view.total_matched,
            self.query.state().page(),
            self.view.page_count
        );
        self.view_listeners.notify(&self.view);
    }
}
