use crate::domain::error::DataValidationError;
use crate::domain::product::{Product, ProductType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive rate bounds, applied to a product's base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl RateRange {
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, DataValidationError> {
        if min > max {
            return Err(DataValidationError::with_detail(
                "rate_range",
                format!("min {min} is greater than max {max}"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, rate: Decimal) -> bool {
        self.min <= rate && rate <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// `None` means all product types.
    pub product_type: Option<ProductType>,
    /// Allowed banks. An empty set admits nothing.
    pub banks: BTreeSet<String>,
    /// `None` means all terms; otherwise an exact match.
    pub term_months: Option<u32>,
    pub rate_range: RateRange,
}

impl FilterSet {
    /// The default control state: every bank selected, full observed rate range.
    pub fn admit_all(options: &FilterOptions) -> Self {
        Self {
            product_type: None,
            banks: options.banks.iter().cloned().collect(),
            term_months: None,
            rate_range: options.rate_range,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(t) = self.product_type {
            if product.product_type != t {
                return false;
            }
        }

        if !self.banks.contains(&product.bank) {
            return false;
        }

        if let Some(term) = self.term_months {
            if product.term_months != term {
                return false;
            }
        }

        self.rate_range.contains(product.base_rate)
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Values that populate the user controls, derived from the loaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct banks in first-seen order.
    pub banks: Vec<String>,
    /// Distinct terms, ascending.
    pub terms: Vec<u32>,
    pub product_types: Vec<ProductType>,
    /// Observed min/max base rate. Zero-width when the table is empty.
    pub rate_range: RateRange,
}

impl FilterOptions {
    pub fn from_products(products: &[Product]) -> Self {
        let mut banks: Vec<String> = Vec::new();
        for p in products {
            if !banks.contains(&p.bank) {
                banks.push(p.bank.clone());
            }
        }

        let terms: Vec<u32> = products
            .iter()
            .map(|p| p.term_months)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let min = products.iter().map(|p| p.base_rate).min().unwrap_or(Decimal::ZERO);
        let max = products.iter().map(|p| p.base_rate).max().unwrap_or(Decimal::ZERO);

        Self {
            banks,
            terms,
            product_types: ProductType::ALL.to_vec(),
            rate_range: RateRange { min, max },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn options_describe_sample_table() {
        let products = dataset::sample_products();
        let opts = FilterOptions::from_products(&products);
        assert_eq!(opts.banks, vec!["국민은행", "신한은행", "우리은행", "하나은행"]);
        assert_eq!(opts.terms, vec![6, 12]);
        assert_eq!(opts.rate_range.min, d("3.10"));
        assert_eq!(opts.rate_range.max, d("4.10"));
    }

    #[test]
    fn admit_all_keeps_every_row() {
        let products = dataset::sample_products();
        let filters = FilterSet::admit_all(&FilterOptions::from_products(&products));
        assert_eq!(filters.apply(&products).len(), products.len());
    }

    #[test]
    fn empty_bank_selection_yields_nothing() {
        let products = dataset::sample_products();
        let mut filters = FilterSet::admit_all(&FilterOptions::from_products(&products));
        filters.banks.clear();
        assert!(filters.apply(&products).is_empty());

        filters.product_type = Some(ProductType::Savings);
        filters.term_months = Some(12);
        assert!(filters.apply(&products).is_empty());
    }

    #[test]
    fn rate_range_is_inclusive_at_both_bounds() {
        let products = dataset::sample_products();
        let mut filters = FilterSet::admit_all(&FilterOptions::from_products(&products));
        filters.rate_range = RateRange::new(d("3.10"), d("3.20")).unwrap();

        let names: Vec<&str> = filters
            .apply(&products)
            .iter()
            .map(|p| p.product_name.as_str())
            .collect();
        assert_eq!(names, vec!["KB Star 정기예금", "WON 정기예금"]);
    }

    #[test]
    fn type_and_term_filters_are_exact() {
        let products = dataset::sample_products();
        let mut filters = FilterSet::admit_all(&FilterOptions::from_products(&products));
        filters.product_type = Some(ProductType::Savings);
        filters.term_months = Some(6);

        let out = filters.apply(&products);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_name, "우리 WON 적금");
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(RateRange::new(d("4.0"), d("3.0")).is_err());
    }
}
