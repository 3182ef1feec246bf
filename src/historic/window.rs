//! Time windows over a price history

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use crate::{types::PricePoint, utils::{coefficient_of_variation, mean}};

/// Prices observed within `days` of the series' most recent timestamp.
pub struct PriceWindow {
    prices: Vec<Decimal>,
    days: i64,
}

impl PriceWindow {
    pub fn trailing(series: &[PricePoint], days: i64) -> Self {
        let prices = match latest_timestamp(series) {
            Some(anchor) => {
                let cutoff = anchor - Duration::days(days);
                series
                    .iter()
                    .filter(|p| p.timestamp >= cutoff)
                    .filter(|p| {
                        if p.price < Decimal::ZERO {
                            warn!(timestamp = %p.timestamp, price = %p.price, "Ignoring negative historic price");
                            false
                        } else {
                            true
                        }
                    })
                    .map(|p| p.price)
                    .collect()
            }
            None => Vec::new(),
        };
        Self { prices, days }
    }

    pub fn mean(&self) -> Option<Decimal> {
        mean(&self.prices)
    }

    pub fn coefficient_of_variation(&self) -> f64 {
        coefficient_of_variation(&self.prices)
    }

    pub fn sample_count(&self) -> usize {
        self.prices.len()
    }

    pub fn days(&self) -> i64 {
        self.days
    }
}

pub fn latest_timestamp(series: &[PricePoint]) -> Option<DateTime<Utc>> {
    series.iter().map(|p| p.timestamp).max()
}

/// Lowest and highest non-negative price over the whole series.
pub fn price_range(series: &[PricePoint]) -> Option<(Decimal, Decimal)> {
    let mut prices = series.iter().map(|p| p.price).filter(|p| *p >= Decimal::ZERO);
    let first = prices.next()?;
    Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn point(day: u32, month: u32, price: Decimal) -> PricePoint {
        PricePoint {
            timestamp: Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap(),
            price,
        }
    }

    #[test]
    fn window_is_anchored_at_latest_point() {
        let series = vec![
            point(1, 1, dec!(500)),
            point(1, 5, dec!(100)),
            point(15, 5, dec!(110)),
            point(30, 5, dec!(90)),
        ];
        let window = PriceWindow::trailing(&series, 90);
        assert_eq!(window.sample_count(), 3);
        assert_eq!(window.mean(), Some(dec!(100)));
        assert_eq!(window.days(), 90);
    }

    #[test]
    fn empty_series_has_no_mean() {
        let window = PriceWindow::trailing(&[], 90);
        assert_eq!(window.sample_count(), 0);
        assert_eq!(window.mean(), None);
        assert_eq!(price_range(&[]), None);
    }

    #[test]
    fn range_covers_whole_series() {
        let series = vec![point(1, 1, dec!(80)), point(1, 2, dec!(120)), point(1, 3, dec!(95))];
        assert_eq!(price_range(&series), Some((dec!(80), dec!(120))));
    }
}
