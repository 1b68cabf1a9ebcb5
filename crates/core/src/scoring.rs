//! Recommendation scoring. Both variants are pure, row-at-a-time and rounded to 2 dp.

use crate::domain::preference::Preference;
use crate::domain::product::{InterestMethod, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 0.6
const FIXED_RATE_WEIGHT: Decimal = Decimal::from_parts(6, 0, 0, false, 1);
// 1.5
const FIXED_SAVINGS_BONUS: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
const SMALL_DEPOSIT_LIMIT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Which weighting scheme a scoring pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "preference", rename_all = "kebab-case")]
pub enum Scorer {
    /// Fixed weights, no user preference.
    Fixed,
    Preference(Preference),
}

impl Scorer {
    pub fn from_preference(preference: Option<Preference>) -> Self {
        preference.map_or(Scorer::Fixed, Scorer::Preference)
    }

    pub fn score(&self, product: &Product) -> Decimal {
        match self {
            Scorer::Fixed => fixed_score(product),
            Scorer::Preference(p) => preference_score(product, *p),
        }
    }
}

/// `rate * 0.6`, a short-term bonus (+2 up to 6 months, +1 up to 12) and +1.5 for savings.
pub fn fixed_score(product: &Product) -> Decimal {
    let mut score = product.total_rate() * FIXED_RATE_WEIGHT;

    score += match product.term_months {
        0..=6 => Decimal::TWO,
        7..=12 => Decimal::ONE,
        _ => Decimal::ZERO,
    };

    if product.is_savings() {
        score += FIXED_SAVINGS_BONUS;
    }

    score.round_dp(2)
}

pub fn preference_score(product: &Product, preference: Preference) -> Decimal {
    let total_rate = product.total_rate();

    let mut score = match preference {
        Preference::RateFocused => {
            let mut s = total_rate * Decimal::TWO;
            if product.is_savings() {
                s += Decimal::ONE;
            }
            s
        }
        Preference::TermFocused => {
            total_rate
                + match product.term_months {
                    0..=6 => Decimal::from(3),
                    7..=12 => Decimal::TWO,
                    _ => Decimal::ZERO,
                }
        }
        Preference::SavingsPreferred => {
            let mut s = total_rate;
            if product.is_savings() {
                s += Decimal::from(3);
            }
            s
        }
    };

    if product.interest_payment_method == InterestMethod::Compound {
        score += Decimal::ONE;
    }

    // Missing minimum counts as 0 and qualifies.
    if product.minimum_deposit_amount.unwrap_or(Decimal::ZERO) <= SMALL_DEPOSIT_LIMIT {
        score += Decimal::ONE;
    }

    score.round_dp(2)
}
