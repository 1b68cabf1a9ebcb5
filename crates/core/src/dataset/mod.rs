pub mod table;

use crate::domain::product::{Product, ProductType};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape of the loaded table. Simple tables carry a single rate column that loads as the base
/// rate; detailed tables carry base/bonus rates and account conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Simple,
    Detailed,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub source: String,
    pub products: Vec<Product>,
}

impl Dataset {
    /// Loads `path` if given, otherwise the built-in sample table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::sample());
        };

        let (kind, products) = table::load_table_file(path)?;
        anyhow::ensure!(
            !products.is_empty(),
            "product table {} has no rows",
            path.display()
        );

        tracing::info!(path = %path.display(), ?kind, rows = products.len(), "loaded product table");
        Ok(Self {
            kind,
            source: path.display().to_string(),
            products,
        })
    }

    pub fn sample() -> Self {
        Self {
            kind: DatasetKind::Simple,
            source: "builtin".to_string(),
            products: sample_products(),
        }
    }
}

/// The eight-row comparison table shipped with the dashboard.
pub fn sample_products() -> Vec<Product> {
    use ProductType::{Deposit, Savings};

    let rows: [(&str, &str, ProductType, i64, u32); 8] = [
        ("국민은행", "KB Star 정기예금", Deposit, 320, 12),
        ("신한은행", "쏠편한 정기예금", Deposit, 335, 12),
        ("우리은행", "WON 정기예금", Deposit, 310, 6),
        ("하나은행", "하나의 정기예금", Deposit, 325, 12),
        ("국민은행", "KB 자유적금", Savings, 380, 12),
        ("신한은행", "신한 My 적금", Savings, 400, 12),
        ("우리은행", "우리 WON 적금", Savings, 370, 6),
        ("하나은행", "하나 청년 적금", Savings, 410, 12),
    ];

    rows.into_iter()
        .map(|(bank, name, product_type, rate_bp, term)| {
            Product::simple(bank, name, product_type, Decimal::new(rate_bp, 2), term)
        })
        .collect()
}
