use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use spendy_core::engine::compare_by;
use spendy_core::{
    visible_rows, DateRange, PageSize, QueryState, SortField, SortOrder, SortSpec, StoreEvent,
    Transaction, TransactionBook, TransactionFormData, TransactionPatch, TransactionType,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
}

fn form(
    name: &str,
    category: &str,
    amount: i64,
    kind: TransactionType,
    tags: &[&str],
) -> TransactionFormData {
    TransactionFormData {
        name: name.to_string(),
        amount: Decimal::from(amount),
        account: "Checking".to_string(),
        kind,
        category: category.to_string(),
        transaction_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        notes: String::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn expense(name: &str, amount: i64) -> TransactionFormData {
    form(name, "Misc", amount, TransactionType::Expense, &[])
}

fn names(book: &TransactionBook) -> Vec<String> {
    book.view().rows.iter().map(|t| t.name.clone()).collect()
}

/// Records with varied names, categories, tags and dates
fn mixed_records() -> Vec<Transaction> {
    let categories = ["Food", "Work", "Travel", "Bills"];
    let tags = ["daily", "trip", "rent", "bonus"];
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..40)
        .map(|i: i64| {
            let mut tx_tags = Vec::new();
            if i % 3 == 0 {
                tx_tags.push(tags[(i % 4) as usize].to_string());
            }
            if i % 5 == 0 {
                tx_tags.push("shared".to_string());
            }
            Transaction {
                id: format!("tx-{}", i),
                name: format!("Item {}", i % 7),
                amount: Decimal::from((i * 37) % 11),
                account: String::new(),
                kind: if i % 4 == 0 { TransactionType::Income } else { TransactionType::Expense },
                category: categories[(i % 4) as usize].to_string(),
                transaction_date: first_day + Duration::days(i * 3),
                notes: String::new(),
                tags: tx_tags,
                created_at: start(),
                updated_at: start(),
            }
        })
        .collect()
}

fn reference_filter<'a>(records: &'a [Transaction], q: &QueryState) -> Vec<&'a Transaction> {
    records
        .iter()
        .filter(|tx| {
            let search = q.search();
            search.trim().is_empty() || {
                let needle = search.to_lowercase();
                tx.name.to_lowercase().contains(&needle)
                    || tx.category.to_lowercase().contains(&needle)
                    || tx.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            }
        })
        .filter(|tx| {
            let range = q.date_range();
            range.from.map_or(true, |from| tx.transaction_date >= from)
                && range.to.map_or(true, |to| tx.transaction_date <= to)
        })
        .filter(|tx| {
            let categories = q.selected_categories();
            categories.is_empty() || categories.contains(&tx.category)
        })
        .filter(|tx| {
            let tags = q.selected_tags();
            tags.is_empty() || tx.tags.iter().any(|t| tags.contains(t))
        })
        .collect()
}

fn query_variants() -> Vec<QueryState> {
    let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
    let mut variants = vec![QueryState::new()];

    let mut q = QueryState::new();
    q.set_search("item 3");
    variants.push(q);

    let mut q = QueryState::new();
    q.set_search("TRIP");
    variants.push(q);

    let mut q = QueryState::new();
    q.set_date_range(DateRange::between(d(1, 10), d(2, 20))).unwrap();
    q.set_selected_categories(vec!["Food".to_string(), "Bills".to_string()]);
    variants.push(q);

    let mut q = QueryState::new();
    q.set_selected_tags(vec!["shared".to_string(), "rent".to_string()]);
    q.set_search("o");
    variants.push(q);

    let mut q = QueryState::new();
    q.set_date_range(DateRange::since(d(3, 1))).unwrap();
    q.set_selected_tags(vec!["nope".to_string()]);
    variants.push(q);

    variants
}

#[test]
fn test_total_matched_agrees_with_reference_filter() {
    let records = mixed_records();
    for q in query_variants() {
        let expected = reference_filter(&records, &q).len();
        assert_eq!(visible_rows(&records, &q).total_matched, expected, "query {:?}", q);
    }
}

#[test]
fn test_sorted_rows_are_monotonic_and_stable() {
    let records = mixed_records();
    let position = |id: &str| records.iter().position(|t| t.id == id).unwrap();

    for field in SortField::ALL {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let mut q = QueryState::new();
            q.set_page_size(PageSize::OneHundred);
            q.set_sort(SortSpec::new(field, order));
            let rows = visible_rows(&records, &q).rows;
            assert_eq!(rows.len(), records.len());

            for pair in rows.windows(2) {
                let ord = compare_by(field, &pair[0], &pair[1]);
                let ord = if order == SortOrder::Desc { ord.reverse() } else { ord };
                assert!(ord.is_le(), "{} {} out of order", field, order);
                if ord.is_eq() {
                    assert!(position(&pair[0].id) < position(&pair[1].id));
                }
            }
        }
    }
}

#[test]
fn test_page_count_and_row_bounds() {
    let records = mixed_records();
    for size in [PageSize::TwentyFive, PageSize::Fifty, PageSize::OneHundred] {
        for mut q in query_variants() {
            q.set_page_size(size);
            let view = visible_rows(&records, &q);
            let expected_pages = (view.total_matched + size.get() - 1) / size.get();
            assert_eq!(view.page_count, expected_pages);
            assert!(view.rows.len() <= size.get());
        }
    }
}

#[test]
fn test_category_filter_scenario() {
    let mut book = TransactionBook::new();
    let salary = form("Salary", "Work", 2000, TransactionType::Income, &[]);
    book.create(salary, "s".to_string(), start()).unwrap();
    let coffee = form("Coffee", "Food", 4, TransactionType::Expense, &["daily"]);
    book.create(coffee, "c".to_string(), start()).unwrap();

    book.set_selected_categories(vec!["Food".to_string()]);
    assert_eq!(book.view().total_matched, 1);
    assert_eq!(names(&book), vec!["Coffee"]);
}

#[test]
fn test_thirty_records_paginate_into_two_pages() {
    let mut book = TransactionBook::new();
    for i in 0..30 {
        book.create(expense(&format!("row {}", i), 1), format!("id-{}", i), start()).unwrap();
    }
    book.set_page_size(PageSize::TwentyFive);

    assert_eq!(book.view().page_count, 2);
    assert_eq!(book.view().rows.len(), 25);
    book.set_page(1);
    assert_eq!(book.view().rows.len(), 5);
    book.set_page(2);
    assert!(book.view().rows.is_empty());
}

#[test]
fn test_amount_desc_ties_keep_collection_order() {
    let records: Vec<Transaction> = [("first", 10), ("second", 10), ("third", 5)]
        .iter()
        .map(|(name, amount)| {
            Transaction::from_form(expense(name, *amount), name.to_string(), start()).unwrap()
        })
        .collect();

    let mut book = TransactionBook::new();
    book.replace_all(records);
    book.set_sort(SortSpec::new(SortField::Amount, SortOrder::Desc));
    assert_eq!(names(&book), vec!["first", "second", "third"]);
}

#[test]
fn test_empty_search_returns_unfiltered_order() {
    let mut book = TransactionBook::new();
    book.replace_all(mixed_records());
    let before: Vec<String> = book.records().iter().take(25).map(|t| t.name.clone()).collect();

    book.set_search("item");
    book.set_search("");
    assert_eq!(book.view().total_matched, 40);
    assert_eq!(names(&book), before);
}

#[test]
fn test_query_changes_reset_page() {
    let mut book = TransactionBook::new();
    book.replace_all(mixed_records());

    let changes: Vec<Box<dyn Fn(&mut TransactionBook)>> = vec![
        Box::new(|b| b.set_search("item")),
        Box::new(|b| b.set_date_range(DateRange::default()).unwrap()),
        Box::new(|b| b.set_selected_categories(vec![])),
        Box::new(|b| b.toggle_tag("daily")),
        Box::new(|b| b.set_sort_field(Some(SortField::Name))),
        Box::new(|b| b.clear_sort()),
        Box::new(|b| b.set_page_size(PageSize::TwentyFive)),
    ];
    for change in changes {
        book.clear_filters();
        book.set_page(1);
        assert_eq!(book.query().page(), 1);
        change(&mut book);
        assert_eq!(book.query().page(), 0);
    }
}

#[test]
fn test_update_preserves_unpatched_fields() {
    let mut book = TransactionBook::new();
    let lunch = form("Lunch", "Food", 12, TransactionType::Expense, &["work"]);
    let original = book.create(lunch, "l".to_string(), start()).unwrap();

    let later = start() + Duration::minutes(5);
    let patch = TransactionPatch {
        notes: Some("with team".to_string()),
        ..Default::default()
    };
    assert!(book.update("l", patch, later).unwrap());

    let updated = book.get("l").unwrap();
    assert_eq!(updated.notes, "with team");
    assert_eq!(updated.name, original.name);
    assert_eq!(updated.amount, original.amount);
    assert_eq!(updated.tags, original.tags);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);
}

#[test]
fn test_update_and_delete_on_missing_id_change_nothing() {
    let mut book = TransactionBook::new();
    book.replace_all(mixed_records());
    let before = book.records().to_vec();

    let patch = TransactionPatch {
        name: Some("ghost".to_string()),
        ..Default::default()
    };
    assert!(!book.update("missing", patch, start()).unwrap());
    assert!(book.delete("missing").is_none());
    assert_eq!(book.records(), before.as_slice());

    assert!(book.delete("tx-3").is_some());
    assert_eq!(book.len(), before.len() - 1);
    assert!(book.get("tx-3").is_none());
}

#[test]
fn test_subscribers_run_after_commit() {
    let mut book = TransactionBook::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&log);
    book.subscribe_records(move |e| {
        let entry = match e {
            StoreEvent::Created { id } => format!("created {}", id),
            StoreEvent::Updated { id } => format!("updated {}", id),
            StoreEvent::Deleted { id } => format!("deleted {}", id),
            StoreEvent::Replaced { count } => format!("replaced {}", count),
        };
        sink.borrow_mut().push(entry);
    });
    let sink = Rc::clone(&log);
    let query_sub = book.subscribe_query(move |q| {
        sink.borrow_mut().push(format!("search '{}'", q.search()));
    });

    book.create(expense("Tea", 3), "t".to_string(), start()).unwrap();
    book.set_search("tea");
    assert!(book.create(expense("", 3), "bad".to_string(), start()).is_err());
    book.unsubscribe_query(query_sub);
    book.set_search("");
    book.delete("t");

    assert_eq!(
        *log.borrow(),
        vec!["created t".to_string(), "search 'tea'".to_string(), "deleted t".to_string()]
    );
}
