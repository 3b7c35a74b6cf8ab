// Stateless aggregations over the shipment table

use crate::data::ShipmentTable;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of equal-width bins in the weight histogram
pub const WEIGHT_BINS: usize = 30;

/// Mean rating at or above which a shipment mode counts as well rated
pub const RATING_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRange {
    pub mode: String,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl RatingRange {
    pub fn is_well_rated(&self) -> bool {
        self.mean >= RATING_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin boundaries, `counts.len() + 1` entries
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) if !self.counts.is_empty() => {
                (last - first) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }
}

/// Row count per warehouse block, ordered by block label ascending.
pub fn warehouse_counts(table: &ShipmentTable) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &table.records {
        *counts.entry(record.warehouse_block.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Row count per shipment mode, most frequent first.
/// Ties keep the order in which the modes first appear.
pub fn shipment_mode_counts(table: &ShipmentTable) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for record in &table.records {
        let mode = record.mode_of_shipment.as_str();
        match index.get(mode) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                index.insert(mode, counts.len());
                counts.push(CategoryCount {
                    label: mode.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, preserving first appearance on ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Percentage share of each count, in input order. Sums to 100.
pub fn shares(counts: &[CategoryCount]) -> Vec<f64> {
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|c| c.count as f64 * 100.0 / total as f64)
        .collect()
}

/// Format a percentage the way the donut labels show it, e.g. `66.7%`.
pub fn format_share(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// (min, mean, max) of the customer rating per shipment mode,
/// sorted by mean ascending.
pub fn rating_by_mode(table: &ShipmentTable) -> Vec<RatingRange> {
    let mut groups: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for record in &table.records {
        groups
            .entry(record.mode_of_shipment.as_str())
            .or_default()
            .push(record.customer_rating);
    }

    let mut ranges: Vec<RatingRange> = groups
        .into_iter()
        .map(|(mode, ratings)| {
            let min = ratings.iter().copied().min().unwrap_or(0) as f64;
            let max = ratings.iter().copied().max().unwrap_or(0) as f64;
            let sum: u64 = ratings.iter().map(|&r| r as u64).sum();
            let mean = sum as f64 / ratings.len() as f64;
            RatingRange {
                mode: mode.to_string(),
                min,
                mean,
                max,
            }
        })
        .collect();

    ranges.sort_by(|a, b| {
        a.mean
            .partial_cmp(&b.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranges
}

/// Bin the weight column into [`WEIGHT_BINS`] equal-width bins.
pub fn weight_histogram(table: &ShipmentTable) -> Histogram {
    histogram(&table.weights(), WEIGHT_BINS)
}

/// Equal-width histogram across the observed range of `values`.
///
/// The last bin is closed on the right so the maximum is counted.
/// A zero-width range is widened by half a unit on each side.
pub fn histogram(values: &[f64], bin_count: usize) -> Histogram {
    if values.is_empty() || bin_count == 0 {
        return Histogram {
            edges: Vec::new(),
            counts: vec![0; bin_count],
        };
    }

    let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bin_count as f64;
    let edges: Vec<f64> = (0..=bin_count)
        .map(|i| if i == bin_count { max } else { min + i as f64 * width })
        .collect();

    let mut counts = vec![0usize; bin_count];
    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ShipmentRecord;

    /// The three-row table from the dashboard documentation
    fn make_table() -> ShipmentTable {
        ShipmentTable::new(vec![
            ShipmentRecord::new("A", "Ship", 3, 4000.0),
            ShipmentRecord::new("A", "Road", 5, 3000.0),
            ShipmentRecord::new("B", "Ship", 2, 5000.0),
        ])
    }

    fn make_large_table() -> ShipmentTable {
        let blocks = ["F", "A", "D", "B", "C", "F"];
        let modes = ["Ship", "Flight", "Road", "Ship"];
        let records = (0..97)
            .map(|i| {
                ShipmentRecord::new(
                    blocks[i % blocks.len()],
                    modes[i % modes.len()],
                    (i % 5) as u32 + 1,
                    1000.0 + (i * 53 % 5000) as f64,
                )
            })
            .collect();
        ShipmentTable::new(records)
    }

    fn count(label: &str, count: usize) -> CategoryCount {
        CategoryCount {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_warehouse_counts_scenario() {
        assert_eq!(warehouse_counts(&make_table()), vec![count("A", 2), count("B", 1)]);
    }

    #[test]
    fn test_warehouse_counts_sorted_by_label() {
        let counts = warehouse_counts(&make_large_table());
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D", "F"]);
    }

    #[test]
    fn test_warehouse_counts_sum_to_rows() {
        let table = make_large_table();
        let total: usize = warehouse_counts(&table).iter().map(|c| c.count).sum();
        assert_eq!(total, table.len());
    }

    #[test]
    fn test_mode_counts_scenario() {
        assert_eq!(shipment_mode_counts(&make_table()), vec![count("Ship", 2), count("Road", 1)]);
    }

    #[test]
    fn test_mode_counts_frequency_order_with_ties() {
        let table = ShipmentTable::new(vec![
            ShipmentRecord::new("A", "Road", 1, 1.0),
            ShipmentRecord::new("A", "Flight", 1, 1.0),
            ShipmentRecord::new("A", "Ship", 1, 1.0),
            ShipmentRecord::new("A", "Ship", 1, 1.0),
        ]);
        assert_eq!(
            shipment_mode_counts(&table),
            vec![count("Ship", 2), count("Road", 1), count("Flight", 1)]
        );
    }

    #[test]
    fn test_mode_counts_sum_to_rows() {
        let table = make_large_table();
        let total: usize = shipment_mode_counts(&table).iter().map(|c| c.count).sum();
        assert_eq!(total, table.len());
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let counts = shipment_mode_counts(&make_large_table());
        let total: f64 = shares(&counts).iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_share_labels_sum_to_hundred_within_rounding() {
        let counts = vec![count("Ship", 1), count("Road", 1), count("Flight", 1)];
        let labels: Vec<String> = shares(&counts).into_iter().map(format_share).collect();
        assert_eq!(labels, vec!["33.3%", "33.3%", "33.3%"]);
        let total: f64 = labels
            .iter()
            .map(|l| l.trim_end_matches('%').parse::<f64>().unwrap())
            .sum();
        assert!((total - 100.0).abs() <= 0.1 * counts.len() as f64);
    }

    #[test]
    fn test_shares_empty() {
        assert!(shares(&[]).is_empty());
    }

    #[test]
    fn test_rating_by_mode_scenario() {
        let ranges = rating_by_mode(&make_table());
        assert_eq!(
            ranges,
            vec![
                RatingRange { mode: "Ship".to_string(), min: 2.0, mean: 2.5, max: 3.0 },
                RatingRange { mode: "Road".to_string(), min: 5.0, mean: 5.0, max: 5.0 },
            ]
        );
        assert!(!ranges[0].is_well_rated());
        assert!(ranges[1].is_well_rated());
    }

    #[test]
    fn test_rating_by_mode_bounds_and_order() {
        let ranges = rating_by_mode(&make_large_table());
        assert_eq!(ranges.len(), 3);
        for r in &ranges {
            assert!(r.min <= r.mean && r.mean <= r.max, "{r:?}");
        }
        assert!(ranges.windows(2).all(|w| w[0].mean <= w[1].mean));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let r = RatingRange { mode: "Ship".to_string(), min: 1.0, mean: 3.0, max: 5.0 };
        assert!(r.is_well_rated());
    }

    #[test]
    fn test_weight_histogram_counts_every_row() {
        let table = make_large_table();
        let hist = weight_histogram(&table);
        assert_eq!(hist.counts.len(), WEIGHT_BINS);
        assert_eq!(hist.edges.len(), WEIGHT_BINS + 1);
        assert_eq!(hist.total(), table.len());
    }

    #[test]
    fn test_histogram_max_in_last_bin() {
        let hist = histogram(&[0.0, 5.0, 10.0], 10);
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[5], 1);
        assert_eq!(hist.counts[9], 1);
        assert_eq!(hist.edges[0], 0.0);
        assert_eq!(hist.edges[10], 10.0);
        assert!((hist.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_single_value() {
        let hist = histogram(&[4000.0, 4000.0], 30);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.edges[0], 3999.5);
        assert_eq!(hist.edges[30], 4000.5);
        assert_eq!(hist.counts.iter().filter(|&&c| c == 2).count(), 1);
    }

    #[test]
    fn test_histogram_empty() {
        let hist = histogram(&[], 30);
        assert_eq!(hist.total(), 0);
        assert!(hist.edges.is_empty());
    }

    #[test]
    fn test_aggregations_repeatable() {
        let table = make_large_table();
        assert_eq!(warehouse_counts(&table), warehouse_counts(&table));
        assert_eq!(shipment_mode_counts(&table), shipment_mode_counts(&table));
        assert_eq!(rating_by_mode(&table), rating_by_mode(&table));
    }
}
