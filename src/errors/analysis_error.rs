//! Error taxonomy for the analytics engine

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid price: {price} for {context}")]
    InvalidPrice {
        price: Decimal,
        context: String,
    },

    #[error("Unknown market: {code}")]
    UnknownMarket {
        code: String,
    },

    #[error("Division undefined: {quantity} has a zero denominator")]
    DivisionUndefined {
        quantity: &'static str,
    },

    #[error("No viable route for {product_id}: {candidates} candidate routes, none with positive margin")]
    NoViableRoute {
        product_id: String,
        candidates: usize,
    },

    #[error("Insufficient history: {found} observations in window, {required} required")]
    InsufficientHistory {
        required: usize,
        found: usize,
    },

    #[error("Invalid weight configuration: {reason}")]
    InvalidWeightConfiguration {
        reason: String,
    },

    #[error("Malformed input record: {context}")]
    Input {
        context: String,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
