//! Dynamically sized price histogram.
//!
//! Bucket count is tied to the observed price spread in units of 10,000
//! currency, clamped to [5, 8]. Only positive prices participate and
//! zero-count buckets are omitted from the output.

use crate::types::{PriceBucket, SaleRecord};

const BUCKET_UNIT: f64 = 10_000.0;
const MIN_BUCKETS: usize = 5;
const MAX_BUCKETS: usize = 8;

/// Build the price histogram for a record snapshot.
pub fn dynamic_price_histogram(records: &[SaleRecord]) -> Vec<PriceBucket> {
    let prices: Vec<f64> = records.iter().map(|r| r.price).filter(|p| *p > 0.0).collect();
    if prices.is_empty() {
        return Vec::new();
    }

    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let bucket_count = ((range / BUCKET_UNIT).ceil() as usize).clamp(MIN_BUCKETS, MAX_BUCKETS);
    let step = range / bucket_count as f64;

    let mut counts = vec![0usize; bucket_count];
    for price in &prices {
        // step is 0 when all prices are identical; everything lands in
        // the first bucket. The last bucket is closed above so the
        // maximum price is never dropped.
        let index = if step > 0.0 {
            (((price - min) / step).floor() as usize).min(bucket_count - 1)
        } else {
            0
        };
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(i, count)| {
            let lo = min + i as f64 * step;
            let hi = min + (i + 1) as f64 * step;
            PriceBucket {
                label: format!("{}K-{}K", (lo / 1000.0).round(), (hi / 1000.0).round()),
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleRecordInput;
    use proptest::prelude::*;

    fn record(price: f64) -> SaleRecord {
        SaleRecord::from_input(SaleRecordInput {
            product_name: Some("p".to_string()),
            price: Some(price),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_and_nonpositive_prices() {
        assert!(dynamic_price_histogram(&[]).is_empty());
        let records = vec![record(0.0), record(-5.0)];
        assert!(dynamic_price_histogram(&records).is_empty());
    }

    #[test]
    fn test_identical_prices_single_bucket() {
        let records = vec![record(5000.0), record(5000.0), record(5000.0)];
        let histogram = dynamic_price_histogram(&records);
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram[0].count, 3);
        assert_eq!(histogram[0].label, "5K-5K");
    }

    #[test]
    fn test_max_price_is_counted() {
        let records = vec![record(1000.0), record(2000.0), record(50_000.0)];
        let histogram = dynamic_price_histogram(&records);
        let total: usize = histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_bucket_count_scales_with_range() {
        // range 70,000 → ceil(7) = 7 buckets before zero-count pruning
        let records: Vec<SaleRecord> =
            (0..=70).map(|i| record(1000.0 + i as f64 * 1000.0)).collect();
        let histogram = dynamic_price_histogram(&records);
        assert_eq!(histogram.len(), 7);
    }

    #[test]
    fn test_small_range_clamps_to_five_buckets() {
        // range 400 → ceil(0.04) = 1, clamped up to 5
        let records = vec![record(100.0), record(200.0), record(300.0), record(500.0)];
        let histogram = dynamic_price_histogram(&records);
        assert!(histogram.len() <= 5);
        let total: usize = histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, 4);
    }

    proptest! {
        #[test]
        fn prop_counts_cover_all_positive_prices(
            prices in prop::collection::vec(0.0f64..200_000.0, 1..60)
        ) {
            let records: Vec<SaleRecord> = prices.iter().map(|p| record(*p)).collect();
            let positive = prices.iter().filter(|p| **p > 0.0).count();
            let histogram = dynamic_price_histogram(&records);
            let total: usize = histogram.iter().map(|b| b.count).sum();
            prop_assert_eq!(total, positive);
            prop_assert!(histogram.len() <= 8);
        }
    }
}
