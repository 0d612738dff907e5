//! Multi-key row comparison

use std::borrow::Cow;
use std::cmp::Ordering;

use super::infer::{CellType, infer, parse_bool, parse_number, parse_timestamp};
use super::key::{SortDirection, SortKey};
use crate::model::{CellValue, ColumnSet, Comparator, Row};

/// A sort key with its column metadata looked up once.
struct ResolvedKey {
    column: String,
    direction: SortDirection,
    sort_type: Option<CellType>,
    comparator: Option<Comparator>,
}

/// A cell decoded for comparison under one key.
#[derive(Debug)]
enum SortValue<'a> {
    Number(f64),
    Date(i64),
    Boolean(bool),
    Text(Cow<'a, str>),
    Custom(Cow<'a, CellValue>),
}

impl SortValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => CellType::Number.rank(),
            SortValue::Date(_) => CellType::Date.rank(),
            SortValue::Boolean(_) => CellType::Boolean.rank(),
            SortValue::Text(_) | SortValue::Custom(_) => CellType::String.rank(),
        }
    }
}

/// Compares rows by an ordered list of sort keys.
///
/// Each key picks its comparator from the column's custom comparator, its
/// explicit `sort_type`, or the type inferred from each value. Values of
/// different inferred types are ordered by type (numbers, dates, booleans,
/// strings) so the comparison stays a total order.
///
/// # Example
///
/// ```
/// use tableview_lib::model::{ColumnSet, Row};
/// use tableview_lib::sort::{RowComparator, SortKey};
///
/// let rows = vec![
///     Row::new("1").set("price", 100).set("name", "B"),
///     Row::new("2").set("price", 100).set("name", "A"),
/// ];
/// let columns = ColumnSet::new();
/// let comparator = RowComparator::new(&columns, &[SortKey::desc("price"), SortKey::asc("name")]);
///
/// let mut order = vec![0, 1];
/// comparator.sort_indices(&rows, &mut order);
/// assert_eq!(order, vec![1, 0]);
/// ```
pub struct RowComparator<'c> {
    columns: &'c ColumnSet,
    keys: Vec<ResolvedKey>,
}

impl<'c> RowComparator<'c> {
    /// Build a comparator for the given keys (in priority order).
    pub fn new(columns: &'c ColumnSet, keys: &[SortKey]) -> Self {
        let keys = keys
            .iter()
            .map(|key| {
                let descriptor = columns.get(&key.column);
                ResolvedKey {
                    column: key.column.clone(),
                    direction: key.direction,
                    sort_type: descriptor.and_then(|d| d.sort_type),
                    comparator: descriptor.and_then(|d| d.comparator.clone()),
                }
            })
            .collect();
        Self { columns, keys }
    }

    /// Returns `true` if there is nothing to compare by.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compare two rows; the first non-equal key decides.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for key in &self.keys {
            let left = self.decode(a, key);
            let right = self.decode(b, key);
            let ordering = key.direction.apply(compare_values(&left, &right, key));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Stable-sort row indices in place.
    ///
    /// Each row is decoded once per key before sorting. Indices past the end
    /// of `rows` behave like rows with no fields.
    pub fn sort_indices(&self, rows: &[Row], indices: &mut [usize]) {
        if self.keys.is_empty() || indices.len() < 2 {
            return;
        }

        let empty = Row::new("");
        let mut decorated: Vec<(usize, Vec<SortValue<'_>>)> = indices
            .iter()
            .map(|&index| {
                let row = rows.get(index).unwrap_or(&empty);
                let values = self.keys.iter().map(|key| self.decode(row, key)).collect();
                (index, values)
            })
            .collect();

        decorated.sort_by(|(_, a), (_, b)| self.compare_decoded(a, b));

        for (slot, (index, _)) in indices.iter_mut().zip(decorated) {
            *slot = index;
        }
    }

    fn compare_decoded(&self, a: &[SortValue<'_>], b: &[SortValue<'_>]) -> Ordering {
        self.keys
            .iter()
            .zip(a.iter().zip(b))
            .map(|(key, (left, right))| key.direction.apply(compare_values(left, right, key)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    fn decode<'r>(&self, row: &'r Row, key: &ResolvedKey) -> SortValue<'r> {
        let value = self.columns.resolve(row, &key.column);
        if key.comparator.is_some() {
            return SortValue::Custom(value);
        }
        let cell_type = key.sort_type.unwrap_or_else(|| infer(&value));
        decode_as(value, cell_type)
    }
}

fn decode_as(value: Cow<'_, CellValue>, cell_type: CellType) -> SortValue<'_> {
    match cell_type {
        CellType::Number => SortValue::Number(coerce_number(&value)),
        CellType::Date => SortValue::Date(coerce_timestamp(&value)),
        CellType::Boolean => SortValue::Boolean(coerce_bool(&value)),
        CellType::String => SortValue::Text(match value {
            Cow::Borrowed(CellValue::Text(s)) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.display_text()),
        }),
    }
}

fn compare_values(a: &SortValue<'_>, b: &SortValue<'_>, key: &ResolvedKey) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(y),
        (SortValue::Date(x), SortValue::Date(y)) => x.cmp(y),
        // true sorts before false in ascending order
        (SortValue::Boolean(x), SortValue::Boolean(y)) => y.cmp(x),
        (SortValue::Text(x), SortValue::Text(y)) => collate(x, y),
        (SortValue::Custom(x), SortValue::Custom(y)) => match &key.comparator {
            Some(comparator) => comparator(x, y),
            None => Ordering::Equal,
        },
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Non-numeric values count as zero.
fn coerce_number(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) if n.is_finite() => *n,
        CellValue::Bool(true) => 1.0,
        CellValue::Text(s) => parse_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Unparseable dates count as the epoch.
fn coerce_timestamp(value: &CellValue) -> i64 {
    match value {
        CellValue::Number(n) if n.is_finite() => *n as i64,
        CellValue::Text(s) => parse_timestamp(s).unwrap_or(0),
        _ => 0,
    }
}

fn coerce_bool(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n != 0.0,
        CellValue::Text(s) => parse_bool(s)
            .or_else(|| parse_bool(&s.trim().to_lowercase()))
            .unwrap_or(false),
        CellValue::Null => false,
    }
}

/// Case-folded string ordering.
///
/// Letters compare case-insensitively first; among strings equal up to
/// case, lowercase sorts before uppercase (`"a" < "A" < "b"`). Remaining
/// ties fall back to code-point order. There is no locale tailoring:
/// accented letters sort by code point, after the unaccented alphabet.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(a)
        .cmp(&folded(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnDescriptor;

    fn sorted(rows: &[Row], columns: &ColumnSet, keys: &[SortKey]) -> Vec<String> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        RowComparator::new(columns, keys).sort_indices(rows, &mut indices);
        indices.iter().map(|&i| rows[i].id().to_string()).collect()
    }

    #[test]
    fn test_numeric_not_lexical() {
        let rows = vec![
            Row::new("a").set("qty", "10"),
            Row::new("b").set("qty", "9"),
            Row::new("c").set("qty", 100),
        ];
        assert_eq!(
            sorted(&rows, &ColumnSet::new(), &[SortKey::asc("qty")]),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn test_boolean_true_first_ascending() {
        let rows = vec![
            Row::new("f").set("active", false),
            Row::new("t").set("active", true),
        ];
        let columns = ColumnSet::new();
        assert_eq!(sorted(&rows, &columns, &[SortKey::asc("active")]), vec!["t", "f"]);
        assert_eq!(sorted(&rows, &columns, &[SortKey::desc("active")]), vec!["f", "t"]);
    }

    #[test]
    fn test_dates_chronological() {
        let rows = vec![
            Row::new("late").set("acquired", "2024년 3월 1일"),
            Row::new("early").set("acquired", "2023-12-31"),
            Row::new("mid").set("acquired", "01/15/2024"),
        ];
        assert_eq!(
            sorted(&rows, &ColumnSet::new(), &[SortKey::asc("acquired")]),
            vec!["early", "mid", "late"]
        );
    }

    #[test]
    fn test_collate_case_insensitive() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("A", "b"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_collate_has_no_locale_tailoring() {
        // code-point order: accented letters follow 'z'
        assert_eq!(collate("éclair", "zebra"), Ordering::Greater);
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let rows = vec![
            Row::new("named").set("name", "Zed"),
            Row::new("blank"),
        ];
        assert_eq!(
            sorted(&rows, &ColumnSet::new(), &[SortKey::asc("name")]),
            vec!["blank", "named"]
        );
    }

    #[test]
    fn test_explicit_type_override() {
        let rows = vec![
            Row::new("a").set("code", "10"),
            Row::new("b").set("code", "9"),
            Row::new("c").set("code", "n/a"),
        ];
        let columns = ColumnSet::from(vec![ColumnDescriptor::new("code").sort_type(CellType::String)]);
        assert_eq!(
            sorted(&rows, &columns, &[SortKey::asc("code")]),
            vec!["a", "b", "c"]
        );

        let columns = ColumnSet::from(vec![ColumnDescriptor::new("code").sort_type(CellType::Number)]);
        // "n/a" coerces to zero
        assert_eq!(
            sorted(&rows, &columns, &[SortKey::asc("code")]),
            vec!["c", "b", "a"]
        );
    }

    #[test]
    fn test_custom_comparator() {
        let rank = |v: &CellValue| match v.as_str() {
            Some("high") => 0,
            Some("medium") => 1,
            _ => 2,
        };
        let columns = ColumnSet::from(vec![
            ColumnDescriptor::new("priority").comparator(move |a, b| rank(a).cmp(&rank(b))),
        ]);
        let rows = vec![
            Row::new("l").set("priority", "low"),
            Row::new("h").set("priority", "high"),
            Row::new("m").set("priority", "medium"),
        ];
        assert_eq!(
            sorted(&rows, &columns, &[SortKey::asc("priority")]),
            vec!["h", "m", "l"]
        );
    }

    #[test]
    fn test_mixed_types_ordered_by_type() {
        let rows = vec![
            Row::new("text").set("v", "abc"),
            Row::new("num").set("v", 5),
            Row::new("date").set("v", "2024-01-01"),
            Row::new("bool").set("v", true),
        ];
        assert_eq!(
            sorted(&rows, &ColumnSet::new(), &[SortKey::asc("v")]),
            vec!["num", "date", "bool", "text"]
        );
    }

    #[test]
    fn test_compare_matches_sort() {
        let columns = ColumnSet::new();
        let keys = [SortKey::desc("price"), SortKey::asc("name")];
        let comparator = RowComparator::new(&columns, &keys);
        let a = Row::new("1").set("price", 100).set("name", "B");
        let b = Row::new("2").set("price", 100).set("name", "A");
        assert_eq!(comparator.compare(&a, &b), Ordering::Greater);
        assert_eq!(comparator.compare(&b, &b), Ordering::Equal);
    }
}
