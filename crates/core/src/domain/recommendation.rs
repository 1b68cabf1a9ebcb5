use crate::domain::product::{Product, ProductType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Presentation-only highlight class. Never feeds back into ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmphasisTier {
    Top,
    PrimaryType,
    SecondaryType,
}

impl EmphasisTier {
    pub fn for_type(product_type: ProductType) -> Self {
        match product_type {
            ProductType::Savings => EmphasisTier::PrimaryType,
            ProductType::Deposit => EmphasisTier::SecondaryType,
        }
    }
}

/// A product with its derived score. The source row is cloned, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub rank: usize,
    #[serde(flatten)]
    pub product: Product,
    pub total_rate: Decimal,
    pub recommendation_score: Decimal,
    pub emphasis: EmphasisTier,
}
