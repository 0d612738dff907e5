//! Properties of the filter, sort and paginate pipeline.

use tableview_lib::filter::{FilterState, filter_rows};
use tableview_lib::model::{ColumnSet, Row};
use tableview_lib::paging::PaginationController;
use tableview_lib::sort::{CellType, SortController, SortDirection, SortKey, infer_str};
use tableview_lib::view::TableView;
use tableview_lib::ViewConfig;

/// Deterministic pseudo-random rows.
fn dataset(len: usize, seed: u64) -> Vec<Row> {
    const NAMES: [&str; 6] = ["alpha", "Beta", "gamma", "delta", "Alpha", "epsilon"];
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    (0..len)
        .map(|i| {
            Row::new(i)
                .set("name", NAMES[next() % NAMES.len()])
                .set("price", (next() % 5) * 10)
                .set("active", next() % 2 == 0)
        })
        .collect()
}

fn ordered(rows: &[Row], query: &str, keys: &[SortKey]) -> Vec<usize> {
    let columns = ColumnSet::new();
    let mut indices = filter_rows(rows, &columns, &FilterState::new(query)).indices;
    SortController::with_keys(keys.iter().cloned()).apply(rows, &columns, &mut indices);
    indices
}

// =============================================================================
// Partition
// =============================================================================

#[test]
fn test_pages_partition_ordered_rows() {
    let keys = [SortKey::desc("price"), SortKey::asc("name")];
    for (len, seed) in [(0, 1), (1, 2), (37, 3), (100, 4)] {
        let rows = dataset(len, seed);
        for query in ["", "a", "alpha", "zzz"] {
            let expected = ordered(&rows, query, &keys);
            for page_size in [1, 3, 10, 40] {
                let mut pages = PaginationController::new(page_size);
                pages.on_data_changed(expected.len());
                let mut seen = Vec::new();
                loop {
                    seen.extend_from_slice(pages.window_for(&expected));
                    if !pages.next() {
                        break;
                    }
                }
                assert_eq!(seen, expected, "len={len} query={query:?} size={page_size}");
            }
        }
    }
}

#[test]
fn test_table_view_pages_partition() {
    let rows = dataset(53, 9);
    let table = TableView::with_rows(
        ViewConfig::default().with_page_size(7),
        ColumnSet::new(),
        rows.clone(),
    );
    table.search_now("a");
    table.set_sort("price", SortDirection::Ascending);
    table.add_sort("name", SortDirection::Descending);

    let expected: Vec<String> = ordered(
        &rows,
        "a",
        &[SortKey::asc("price"), SortKey::desc("name")],
    )
    .into_iter()
    .map(|i| rows[i].id().to_string())
    .collect();

    let mut seen = Vec::new();
    table.first_page();
    loop {
        seen.extend(table.snapshot().rows.iter().map(|r| r.id().to_string()));
        if !table.next_page() {
            break;
        }
    }
    assert_eq!(seen, expected);
}

// =============================================================================
// Stability
// =============================================================================

#[test]
fn test_sort_is_stable() {
    let rows = dataset(80, 5);
    let sorted = ordered(&rows, "", &[SortKey::asc("price")]);
    for pair in sorted.windows(2) {
        let (a, b) = (&rows[pair[0]], &rows[pair[1]]);
        if a.get("price") == b.get("price") {
            assert!(pair[0] < pair[1], "equal rows swapped: {pair:?}");
        }
    }
}

#[test]
fn test_resort_by_same_keys_keeps_order() {
    let rows = dataset(40, 6);
    let keys = [SortKey::asc("active"), SortKey::desc("price")];
    let first = ordered(&rows, "", &keys);
    let resorted: Vec<Row> = first.iter().map(|&i| rows[i].clone()).collect();
    let second = ordered(&resorted, "", &keys);
    assert_eq!(second, (0..resorted.len()).collect::<Vec<_>>());
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_filter_is_idempotent() {
    let rows = dataset(60, 7);
    let columns = ColumnSet::new();
    for query in ["a", "Alpha", "ta", "0"] {
        let state = FilterState::new(query);
        let once: Vec<Row> = filter_rows(&rows, &columns, &state)
            .rows(&rows)
            .cloned()
            .collect();
        let twice = filter_rows(&once, &columns, &state);
        assert_eq!(twice.indices, (0..once.len()).collect::<Vec<_>>());
    }
}

#[test]
fn test_min_length_boundary() {
    let rows = dataset(30, 8);
    let columns = ColumnSet::new();

    let short = FilterState::new("alp").with_min_length(4);
    assert_eq!(filter_rows(&rows, &columns, &short).len(), rows.len());

    let long = FilterState::new("alph").with_min_length(4);
    let outcome = filter_rows(&rows, &columns, &long);
    assert!(outcome.len() < rows.len());
    let names_match = outcome.rows(&rows).all(|r| {
        r.get("name")
            .and_then(|v| v.as_str())
            .is_some_and(|n| n.to_lowercase().contains("alph"))
    });
    assert!(names_match);
}

#[test]
fn test_filtered_rows_keep_input_order() {
    let rows = dataset(50, 10);
    let outcome = filter_rows(&rows, &ColumnSet::new(), &FilterState::new("e"));
    assert!(outcome.indices.windows(2).all(|w| w[0] < w[1]));
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn test_filter_clamps_current_page() {
    let mut pages = PaginationController::new(10);
    pages.on_data_changed(25);
    assert!(pages.goto(3));

    pages.on_data_changed(5);
    assert_eq!(pages.total_pages(), 1);
    assert_eq!(pages.current_page(), 1);
}

// =============================================================================
// Inference
// =============================================================================

#[test]
fn test_inference_examples() {
    assert_eq!(infer_str("2024-01-01"), CellType::Date);
    assert_eq!(infer_str("123.45"), CellType::Number);
    assert_eq!(infer_str("true"), CellType::Boolean);
    assert_eq!(infer_str("hello"), CellType::String);
}

#[test]
fn test_boolean_ascending_puts_true_first() {
    let rows = vec![
        Row::new("f").set("flag", false),
        Row::new("t").set("flag", true),
    ];
    let sorted = ordered(&rows, "", &[SortKey::asc("flag")]);
    assert_eq!(sorted, vec![1, 0]);

    let rows = vec![
        Row::new("f").set("flag", "false"),
        Row::new("t").set("flag", "true"),
    ];
    let sorted = ordered(&rows, "", &[SortKey::asc("flag")]);
    assert_eq!(sorted, vec![1, 0]);
}
