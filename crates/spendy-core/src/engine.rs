//! Derived view of the transaction collection
//!
//! `visible_rows` is a pure function of the records and the query state:
//! search, date, category and tag stages are ANDed together, survivors are
//! stably sorted, then a single page is sliced out.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::Transaction;
use crate::query::{QueryState, SortSpec};
use crate::types::{SortField, SortOrder};

/// One page of the view plus the numbers pagination controls need
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRows {
    pub rows: Vec<Transaction>,
    /// Records passing every filter stage, before pagination
    pub total_matched: usize,
    pub page_count: usize,
}

/// Compute the visible page for `query`
pub fn visible_rows(records: &[Transaction], query: &QueryState) -> VisibleRows {
    let mut matched = matching(records, query);
    sort_rows(&mut matched, query.sort());

    let page_size = query.page_size().get();
    let total_matched = matched.len();
    let page_count = (total_matched + page_size - 1) / page_size;

    let rows = match query.page().checked_mul(page_size) {
        Some(start) if start < total_matched => matched
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect(),
        _ => Vec::new(),
    };

    VisibleRows {
        rows,
        total_matched,
        page_count,
    }
}

/// Records passing the search, date, category and tag stages, in collection order
pub fn matching<'a>(records: &'a [Transaction], query: &QueryState) -> Vec<&'a Transaction> {
    let filter = StageFilter::new(query);
    records.iter().filter(|tx| filter.accepts(tx)).collect()
}

/// Stable sort; equal keys keep their relative input order
pub fn sort_rows(rows: &mut [&Transaction], sort: SortSpec) {
    let Some(field) = sort.field else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = compare_by(field, a, b);
        match sort.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

/// Natural comparison of one field: text ignores case, amount is numeric,
/// date is chronological
pub fn compare_by(field: SortField, a: &Transaction, b: &Transaction) -> Ordering {
    match field {
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::TransactionDate => a.transaction_date.cmp(&b.transaction_date),
        SortField::Type => a.kind.as_str().cmp(b.kind.as_str()),
        SortField::Category => compare_text(&a.category, &b.category),
        SortField::Amount => a.amount.cmp(&b.amount),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Distinct categories present in the collection, sorted
pub fn available_categories(records: &[Transaction]) -> Vec<String> {
    records
        .iter()
        .map(|tx| tx.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct tags present in the collection, sorted
pub fn available_tags(records: &[Transaction]) -> Vec<String> {
    records
        .iter()
        .flat_map(|tx| tx.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Filter stages prepared once per query
struct StageFilter<'q> {
    needle: Option<String>,
    query: &'q QueryState,
}

impl<'q> StageFilter<'q> {
    fn new(query: &'q QueryState) -> Self {
        let search = query.search();
        let needle = if search.trim().is_empty() {
            None
        } else {
            Some(search.to_lowercase())
        };
        Self { needle, query }
    }

    fn accepts(&self, tx: &Transaction) -> bool {
        if let Some(ref needle) = self.needle {
            if !tx.matches_search(needle) {
                return false;
            }
        }

        let range = self.query.date_range();
        if !range.is_unbounded() && !range.contains(&tx.transaction_date) {
            return false;
        }

        let categories = self.query.selected_categories();
        if !categories.is_empty() && !categories.iter().any(|c| *c == tx.category) {
            return false;
        }

        let tags = self.query.selected_tags();
        if !tags.is_empty() && !tags.iter().any(|t| tx.has_tag(t)) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::DateRange;
    use crate::types::{PageSize, TransactionType};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn tx(
        id: &str,
        name: &str,
        category: &str,
        amount: i64,
        day: u32,
        tags: &[&str],
    ) -> Transaction {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Transaction {
            id: id.to_string(),
            name: name.to_string(),
            amount: Decimal::from(amount),
            account: String::new(),
            kind: TransactionType::Expense,
            category: category.to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            notes: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn ids(view: &VisibleRows) -> Vec<&str> {
        view.rows.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", "Coffee", "Food", 4, 1, &["daily"]),
            tx("2", "Salary", "Work", 2000, 5, &[]),
            tx("3", "Lunch", "Food", 12, 10, &["work", "daily"]),
            tx("4", "Train", "Transport", 30, 20, &["commute"]),
        ]
    }

    #[test]
    fn test_empty_query_returns_collection_order() {
        let view = visible_rows(&sample(), &QueryState::new());
        assert_eq!(ids(&view), vec!["1", "2", "3", "4"]);
        assert_eq!(view.total_matched, 4);
        assert_eq!(view.page_count, 1);
    }

    #[test]
    fn test_whitespace_search_is_skipped() {
        let mut q = QueryState::new();
        q.set_search("   ");
        assert_eq!(visible_rows(&sample(), &q).total_matched, 4);
    }

    #[test]
    fn test_search_is_or_across_fields() {
        let mut q = QueryState::new();
        q.set_search("DAILY");
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["1", "3"]);

        q.set_search("foo");
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["1", "3"]);

        q.set_search("sal");
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["2"]);
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let mut q = QueryState::new();
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();

        q.set_date_range(DateRange::between(d(5), d(10))).unwrap();
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["2", "3"]);

        q.set_date_range(DateRange::since(d(10))).unwrap();
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["3", "4"]);

        q.set_date_range(DateRange::until(d(5))).unwrap();
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["1", "2"]);
    }

    #[test]
    fn test_multi_selects_are_or_within_and_across() {
        let mut q = QueryState::new();
        q.set_selected_categories(vec!["Food".to_string(), "Transport".to_string()]);
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["1", "3", "4"]);

        q.set_selected_tags(vec!["work".to_string(), "commute".to_string()]);
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["3", "4"]);

        q.set_search("train");
        assert_eq!(ids(&visible_rows(&sample(), &q)), vec!["4"]);
    }

    #[test]
    fn test_category_match_is_exact() {
        let mut q = QueryState::new();
        q.set_selected_categories(vec!["food".to_string()]);
        assert_eq!(visible_rows(&sample(), &q).total_matched, 0);
    }

    #[test]
    fn test_sort_desc_keeps_ties_in_insertion_order() {
        let records = vec![
            tx("a", "A", "X", 10, 1, &[]),
            tx("b", "B", "X", 10, 1, &[]),
            tx("c", "C", "X", 5, 1, &[]),
        ];
        let mut q = QueryState::new();
        q.set_sort(SortSpec::new(SortField::Amount, SortOrder::Desc));
        assert_eq!(ids(&visible_rows(&records, &q)), vec!["a", "b", "c"]);

        q.set_sort_order(SortOrder::Asc);
        assert_eq!(ids(&visible_rows(&records, &q)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_by_text_and_date() {
        let mut records = sample();
        records.push(tx("5", "apple", "food", 1, 15, &[]));
        let mut q = QueryState::new();

        q.set_sort(SortSpec::new(SortField::Name, SortOrder::Asc));
        assert_eq!(ids(&visible_rows(&records, &q)), vec!["5", "1", "3", "2", "4"]);

        q.set_sort(SortSpec::new(SortField::Category, SortOrder::Asc));
        assert_eq!(ids(&visible_rows(&records, &q)), vec!["1", "3", "5", "4", "2"]);

        q.set_sort(SortSpec::new(SortField::TransactionDate, SortOrder::Desc));
        assert_eq!(ids(&visible_rows(&records, &q)), vec!["4", "5", "3", "2", "1"]);
    }

    #[test]
    fn test_sort_by_type() {
        let mut records = sample();
        records[1].kind = TransactionType::Income;
        let mut q = QueryState::new();
        q.set_sort(SortSpec::new(SortField::Type, SortOrder::Asc));
        assert_eq!(ids(&visible_rows(&records, &q)), vec!["1", "3", "4", "2"]);
    }

    #[test]
    fn test_pagination_bounds() {
        let records: Vec<Transaction> = (0..30)
            .map(|i| tx(&i.to_string(), "Row", "X", i, 1, &[]))
            .collect();
        let mut q = QueryState::new();
        q.set_page_size(PageSize::TwentyFive);

        let first = visible_rows(&records, &q);
        assert_eq!(first.page_count, 2);
        assert_eq!(first.rows.len(), 25);

        q.set_page(1);
        assert_eq!(visible_rows(&records, &q).rows.len(), 5);

        q.set_page(2);
        let past = visible_rows(&records, &q);
        assert!(past.rows.is_empty());
        assert_eq!(past.total_matched, 30);
        assert_eq!(past.page_count, 2);

        q.set_page(usize::MAX);
        assert!(visible_rows(&records, &q).rows.is_empty());
    }

    #[test]
    fn test_no_matches_has_zero_pages() {
        let mut q = QueryState::new();
        q.set_search("nothing matches this");
        let view = visible_rows(&sample(), &q);
        assert_eq!(view.total_matched, 0);
        assert_eq!(view.page_count, 0);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_facets_sorted_and_distinct() {
        assert_eq!(available_categories(&sample()), vec!["Food", "Transport", "Work"]);
        assert_eq!(available_tags(&sample()), vec!["commute", "daily", "work"]);
    }
}
