//! Parsing of raw field text into rankable values
//!
//! A missing or unparseable value is the sentinel `None`. Sentinels rank
//! above every present value whatever the sort direction.

use crate::record::{Field, FieldKind, Record};
use std::cmp::Ordering;

/// Percentages closer than this compare as equal
pub const PERCENTAGE_TOLERANCE: f64 = 0.005;

/// Parses "x/N" text into its integer numerator
pub fn parse_ordinal(raw: &str) -> Option<u64> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    match parts.as_slice() {
        [numerator, _] => numerator.trim().parse().ok(),
        _ => None,
    }
}

/// Parses integer text, accepting `,` as a group separator
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with(',') || raw.ends_with(',') {
        return None;
    }
    raw.replace(',', "").parse().ok()
}

/// Parses "x.y%" text into its floating value
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().strip_suffix('%')?.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Compares two optional values with the sentinel ranked highest
pub fn compare_with_sentinel<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Computes one comparable value per record for a field
///
/// Integer kinds map directly to their parsed value. Percentages are grouped
/// into tolerance clusters (sorted values chained by gaps of at most
/// `PERCENTAGE_TOLERANCE`) and mapped to their cluster index, so two values
/// within tolerance always tie while the column stays totally ordered.
pub fn key_column(records: &[Record], field: Field) -> Vec<Option<u64>> {
    match field.kind() {
        Some(FieldKind::Ordinal) | Some(FieldKind::Rating) => records
            .iter()
            .map(|record| parse_ordinal(record.get(field)))
            .collect(),
        Some(FieldKind::Count) => records
            .iter()
            .map(|record| parse_count(record.get(field)))
            .collect(),
        Some(FieldKind::Percentage) => {
            let values: Vec<Option<f64>> = records
                .iter()
                .map(|record| parse_percentage(record.get(field)))
                .collect();
            cluster_percentages(&values)
        }
        None => vec![None; records.len()],
    }
}

fn cluster_percentages(values: &[Option<f64>]) -> Vec<Option<u64>> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);

    // Lowest value of each cluster, ascending
    let mut cluster_starts: Vec<f64> = Vec::new();
    let mut previous: Option<f64> = None;
    for value in present {
        match previous {
            Some(prev) if value - prev <= PERCENTAGE_TOLERANCE => {}
            _ => cluster_starts.push(value),
        }
        previous = Some(value);
    }

    values
        .iter()
        .map(|value| {
            value.map(|v| {
                let after = cluster_starts.partition_point(|start| *start <= v);
                (after - 1) as u64
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordinal() {
        assert_eq!(parse_ordinal("7/10"), Some(7));
        assert_eq!(parse_ordinal(" 3/5 "), Some(3));
        assert_eq!(parse_ordinal(""), None);
        assert_eq!(parse_ordinal("7"), None);
        assert_eq!(parse_ordinal("a/10"), None);
        assert_eq!(parse_ordinal("1/2/3"), None);
        assert_eq!(parse_ordinal("-1/10"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count("1,204"), Some(1204));
        assert_eq!(parse_count(" 0 "), Some(0));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("12 hours"), None);
        assert_eq!(parse_count(",5"), None);
        assert_eq!(parse_count("-3"), None);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("23%"), Some(23.0));
        assert_eq!(parse_percentage("12.345%"), Some(12.345));
        assert_eq!(parse_percentage("12.345"), None);
        assert_eq!(parse_percentage("%"), None);
        assert_eq!(parse_percentage(""), None);
        assert_eq!(parse_percentage("NaN%"), None);
    }

    #[test]
    fn test_sentinel_is_greatest() {
        assert_eq!(compare_with_sentinel(Some(1), Some(2)), Ordering::Less);
        assert_eq!(compare_with_sentinel(Some(u64::MAX), None), Ordering::Less);
        assert_eq!(compare_with_sentinel::<u64>(None, Some(0)), Ordering::Greater);
        assert_eq!(compare_with_sentinel::<u64>(None, None), Ordering::Equal);
    }

    fn rarity_records(values: &[&str]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let mut record = Record::new(format!("https://a/guide/{}", i));
                record.platinum_rarity = value.to_string();
                record
            })
            .collect()
    }

    #[test]
    fn test_percentages_within_tolerance_share_a_cluster() {
        let records = rarity_records(&["12.345%", "12.349%", "50%", ""]);
        let column = key_column(&records, Field::PlatinumRarity);

        assert_eq!(column[0], column[1]);
        assert!(column[1] < column[2]);
        assert_eq!(column[3], None);
    }

    #[test]
    fn test_percentages_outside_tolerance_are_ordered() {
        let records = rarity_records(&["10.02%", "10.01%", "10%"]);
        let column = key_column(&records, Field::PlatinumRarity);

        assert_eq!(column, vec![Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn test_rating_column_uses_numerator() {
        let mut a = Record::new("https://a/guide/1");
        a.guide_rating = "4/5".to_string();
        let b = Record::new("https://a/guide/2");

        assert_eq!(
            key_column(&[a, b], Field::GuideRating),
            vec![Some(4), None]
        );
    }
}
