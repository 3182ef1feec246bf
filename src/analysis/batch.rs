//! Batch analysis over many products, sequential or across blocking workers

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};
use crate::{
    config::AnalysisConfig,
    errors::AnalysisResult,
    types::{ProductFailure, ProductObservation, ProductOutcome, RawObservation},
};
use super::analyze_product;

/// Raw records grouped by product id, in product-id order.
pub fn group_by_product(raw: Vec<RawObservation>) -> BTreeMap<String, Vec<RawObservation>> {
    let mut groups: BTreeMap<String, Vec<RawObservation>> = BTreeMap::new();
    for record in raw {
        groups.entry(record.product_id.clone()).or_default().push(record);
    }
    groups
}

/// Converts and analyzes one product group. Never fails: errors become the
/// product's failure marker.
pub fn analyze_group(product_id: &str, records: Vec<RawObservation>, config: &AnalysisConfig) -> ProductOutcome {
    let result = convert(records).and_then(|observations| analyze_product(product_id, &observations, config));

    let result = result.map_err(|e| {
        warn!(product = product_id, kind = e.kind(), error = %e, "Product analysis failed");
        ProductFailure::from_error(product_id, &e)
    });

    ProductOutcome {
        product_id: product_id.to_string(),
        result,
    }
}

fn convert(records: Vec<RawObservation>) -> AnalysisResult<Vec<ProductObservation>> {
    records.into_iter().map(ProductObservation::try_from).collect()
}

/// One outcome per product, ordered by product id.
pub fn analyze_batch(raw: Vec<RawObservation>, config: &AnalysisConfig) -> Vec<ProductOutcome> {
    let groups = group_by_product(raw);
    debug!(products = groups.len(), "Starting sequential batch");
    groups
        .into_iter()
        .map(|(product_id, records)| analyze_group(&product_id, records, config))
        .collect()
}

/// Same outcomes as `analyze_batch`, with products spread over at most
/// `workers` blocking tasks at a time.
pub async fn analyze_batch_concurrent(
    raw: Vec<RawObservation>,
    config: Arc<AnalysisConfig>,
    workers: usize,
) -> Vec<ProductOutcome> {
    let groups = group_by_product(raw);
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    debug!(products = groups.len(), workers = workers.max(1), "Starting concurrent batch");

    let mut handles = Vec::with_capacity(groups.len());
    for (product_id, records) in groups {
        let config = config.clone();
        let permits = permits.clone();
        let id = product_id.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await;
            tokio::task::spawn_blocking(move || analyze_group(&id, records, &config)).await
        });
        handles.push((product_id, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (product_id, handle) in handles {
        let outcome = match handle.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) | Err(e) => {
                error!(product = %product_id, error = %e, "Analysis worker failed");
                ProductOutcome {
                    result: Err(ProductFailure {
                        product_id: product_id.clone(),
                        kind: "worker_failed",
                        reason: e.to_string(),
                    }),
                    product_id,
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use crate::types::PricePoints;

    fn raw(product: &str, market: &str, price: Decimal) -> RawObservation {
        RawObservation {
            product_id: product.to_string(),
            market_code: market.to_string(),
            gross_price: price,
            prices: PricePoints::default(),
            category: None,
            weight_kg: None,
            price_history: None,
            sales_rank: Some(5_000),
            rating: Some(dec!(4.2)),
            offer_count: Some(3),
            buy_box_winner_count: None,
            amazon_buy_box_share_pct: None,
            out_of_stock_pct: None,
            prime_eligible: None,
        }
    }

    fn batch() -> Vec<RawObservation> {
        vec![
            raw("B0ZZZ", "DE", dec!(70)),
            raw("B0AAA", "IT", dec!(30)),
            raw("B0ZZZ", "IT", dec!(35)),
            raw("B0AAA", "FR", dec!(65)),
            raw("B0BAD", "XX", dec!(20)),
        ]
    }

    #[test]
    fn groups_in_product_order() {
        let groups = group_by_product(batch());
        let ids: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["B0AAA", "B0BAD", "B0ZZZ"]);
        assert_eq!(groups["B0ZZZ"].len(), 2);
    }

    #[test]
    fn bad_record_fails_only_its_product() {
        let outcomes = analyze_batch(batch(), &AnalysisConfig::default());
        assert_eq!(outcomes.len(), 3);

        assert!(outcomes[0].record().is_some());
        let failure = outcomes[1].failure().unwrap();
        assert_eq!(failure.product_id, "B0BAD");
        assert_eq!(failure.kind, "unknown_market");
        assert!(outcomes[2].record().is_some());
    }

    #[test]
    fn duplicate_market_rows_fail_the_product() {
        let rows = vec![raw("B0DUP", "DE", dec!(50)), raw("B0DUP", "DE", dec!(55))];
        let outcomes = analyze_batch(rows, &AnalysisConfig::default());
        assert_eq!(outcomes[0].failure().unwrap().kind, "malformed_input");
    }

    #[tokio::test]
    async fn concurrent_batch_matches_sequential_order() {
        let config = Arc::new(AnalysisConfig::default());
        let sequential = analyze_batch(batch(), &config);
        let concurrent = analyze_batch_concurrent(batch(), config.clone(), 2).await;

        assert_eq!(sequential.len(), concurrent.len());
        for (s, c) in sequential.iter().zip(&concurrent) {
            assert_eq!(s.product_id, c.product_id);
            match (&s.result, &c.result) {
                (Ok(a), Ok(b)) => {
                    assert_eq!(a.best, b.best);
                    assert_eq!(a.opportunity_score, b.opportunity_score);
                }
                (Err(a), Err(b)) => assert_eq!(a, b),
                _ => panic!("outcome mismatch for {}", s.product_id),
            }
        }
    }
}
