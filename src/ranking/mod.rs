//! Ranking engine
//!
//! Orders records by an ordered list of sort keys. The first key whose
//! values differ decides a pair; when every key ties, the input order is
//! kept (the sort is stable), so callers control tie-breaks through the
//! order in which they pass records in.

mod key;
mod value;

pub use key::{parse_sort_keys, SortDirection, SortKey};
pub use value::{
    compare_with_sentinel, key_column, parse_count, parse_ordinal, parse_percentage,
    PERCENTAGE_TOLERANCE,
};

use crate::record::Record;
use std::cmp::Ordering;

/// Ranks records by the given sort keys
///
/// Missing or unparseable values rank above every present value regardless
/// of direction: ascending places them last, descending places them first.
///
/// # Arguments
///
/// * `records` - Records in their base order (e.g. by link)
/// * `keys` - Sort keys in priority order
///
/// # Returns
///
/// The records in ranked order
///
/// # Example
///
/// ```
/// use guide_scraper::{rank, Field, Record, SortKey};
///
/// let mut easy = Record::new("https://example.com/guide/1");
/// easy.difficulty = "3/10".to_string();
/// let mut hard = Record::new("https://example.com/guide/2");
/// hard.difficulty = "7/10".to_string();
///
/// let ranked = rank(vec![hard, easy], &[SortKey::ascending(Field::Difficulty)]);
/// assert_eq!(ranked[0].difficulty, "3/10");
/// ```
pub fn rank(records: Vec<Record>, keys: &[SortKey]) -> Vec<Record> {
    if keys.is_empty() || records.len() < 2 {
        return records;
    }

    let columns: Vec<Vec<Option<u64>>> = keys
        .iter()
        .map(|key| key_column(&records, key.field))
        .collect();

    let mut order: Vec<usize> = (0..records.len()).collect();
    // Stable: full ties keep their base order
    order.sort_by(|&a, &b| {
        keys.iter()
            .zip(&columns)
            .map(|(key, column)| {
                let ordering = compare_with_sentinel(column[a], column[b]);
                match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    let mut slots: Vec<Option<Record>> = records.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
