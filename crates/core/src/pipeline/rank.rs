use crate::domain::error::DataValidationError;
use crate::domain::product::Product;
use crate::domain::recommendation::{EmphasisTier, ScoredProduct};
use crate::scoring::Scorer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Final display order. Exactly one is applied per pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Score desc, then total rate desc.
    #[default]
    Score,
    /// Total rate desc, then score desc.
    Rate,
}

impl FromStr for SortOrder {
    type Err = DataValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(SortOrder::Score),
            "rate" => Ok(SortOrder::Rate),
            other => Err(DataValidationError::invalid("sort", other)),
        }
    }
}

/// Scores every row, sorts by `order` and assigns ranks and emphasis tiers.
///
/// Ties fall back to bank then product name so the output never depends on input order.
pub fn rank<'a, I>(products: I, scorer: Scorer, order: SortOrder) -> Vec<ScoredProduct>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut scored: Vec<ScoredProduct> = products
        .into_iter()
        .map(|p| ScoredProduct {
            rank: 0,
            total_rate: p.total_rate(),
            recommendation_score: scorer.score(p),
            emphasis: EmphasisTier::for_type(p.product_type),
            product: p.clone(),
        })
        .collect();

    scored.sort_by(|a, b| compare(a, b, order));

    for (idx, row) in scored.iter_mut().enumerate() {
        row.rank = idx + 1;
        if idx == 0 {
            row.emphasis = EmphasisTier::Top;
        }
    }

    scored
}

fn compare(a: &ScoredProduct, b: &ScoredProduct, order: SortOrder) -> Ordering {
    let by_score = b.recommendation_score.cmp(&a.recommendation_score);
    let by_rate = b.total_rate.cmp(&a.total_rate);

    let primary = match order {
        SortOrder::Score => by_score.then(by_rate),
        SortOrder::Rate => by_rate.then(by_score),
    };

    primary
        .then_with(|| a.product.bank.cmp(&b.product.bank))
        .then_with(|| a.product.product_name.cmp(&b.product.product_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::domain::preference::Preference;
    use crate::domain::product::ProductType;
    use rust_decimal::Decimal;

    #[test]
    fn score_order_puts_short_term_savings_first() {
        let products = dataset::sample_products();
        let out = rank(&products, Scorer::Fixed, SortOrder::Score);

        assert_eq!(out.len(), 8);
        // 3.70 * 0.6 + 2 + 1.5 = 5.72
        assert_eq!(out[0].product.product_name, "우리 WON 적금");
        assert_eq!(out[0].recommendation_score, Decimal::new(572, 2));
        assert_eq!(out[0].emphasis, EmphasisTier::Top);
        assert_eq!(out[0].rank, 1);
        assert!(out
            .windows(2)
            .all(|w| w[0].recommendation_score >= w[1].recommendation_score));
    }

    #[test]
    fn rate_order_puts_highest_rate_first() {
        let products = dataset::sample_products();
        let out = rank(&products, Scorer::Fixed, SortOrder::Rate);

        assert_eq!(out[0].product.product_name, "하나 청년 적금");
        assert!(out.windows(2).all(|w| w[0].total_rate >= w[1].total_rate));
    }

    #[test]
    fn non_top_rows_are_tiered_by_type() {
        let products = dataset::sample_products();
        let out = rank(&products, Scorer::Preference(Preference::RateFocused), SortOrder::Score);

        for row in out.iter().skip(1) {
            let expected = match row.product.product_type {
                ProductType::Savings => EmphasisTier::PrimaryType,
                ProductType::Deposit => EmphasisTier::SecondaryType,
            };
            assert_eq!(row.emphasis, expected);
        }
        assert_eq!(out.iter().filter(|r| r.emphasis == EmphasisTier::Top).count(), 1);
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let products = dataset::sample_products();
        let mut reversed = products.clone();
        reversed.reverse();

        let a = rank(&products, Scorer::Fixed, SortOrder::Score);
        let b = rank(&reversed, Scorer::Fixed, SortOrder::Score);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_ranks_to_empty_output() {
        let empty: Vec<Product> = Vec::new();
        let out = rank(&empty, Scorer::Fixed, SortOrder::Score);
        assert!(out.is_empty());
    }

    #[test]
    fn source_rows_are_not_mutated() {
        let products = dataset::sample_products();
        let before = products.clone();
        let _ = rank(&products, Scorer::Fixed, SortOrder::Rate);
        assert_eq!(products, before);
    }
}
