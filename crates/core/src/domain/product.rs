use crate::domain::error::DataValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// 예금: lump-sum time deposit.
    Deposit,
    /// 적금: installment savings.
    Savings,
}

impl ProductType {
    pub const ALL: [ProductType; 2] = [ProductType::Deposit, ProductType::Savings];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Deposit => "deposit",
            ProductType::Savings => "savings",
        }
    }

    pub fn label_ko(self) -> &'static str {
        match self {
            ProductType::Deposit => "예금",
            ProductType::Savings => "적금",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = DataValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "예금" => Ok(ProductType::Deposit),
            "적금" => Ok(ProductType::Savings),
            other => match other.to_ascii_lowercase().as_str() {
                "deposit" => Ok(ProductType::Deposit),
                "savings" | "saving" => Ok(ProductType::Savings),
                _ => Err(DataValidationError::invalid("product_type", other)),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestMethod {
    /// 단리
    #[default]
    Simple,
    /// 복리
    Compound,
}

impl FromStr for InterestMethod {
    type Err = DataValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "단리" => Ok(InterestMethod::Simple),
            "복리" => Ok(InterestMethod::Compound),
            other => match other.to_ascii_lowercase().as_str() {
                "simple" => Ok(InterestMethod::Simple),
                "compound" => Ok(InterestMethod::Compound),
                _ => Err(DataValidationError::invalid("interest_payment_method", other)),
            },
        }
    }
}

/// One row of the comparison table. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub bank: String,
    pub product_name: String,
    pub product_type: ProductType,
    pub base_rate: Decimal,
    #[serde(default)]
    pub bonus_rate: Decimal,
    pub term_months: u32,
    #[serde(default)]
    pub interest_payment_method: InterestMethod,
    pub minimum_deposit_amount: Option<Decimal>,
    pub enrollment_condition: Option<String>,
    #[serde(default)]
    pub maximum_rate: Decimal,
}

impl Product {
    /// Builds a row of the simple dataset shape (single rate, no conditions).
    pub fn simple(
        bank: &str,
        product_name: &str,
        product_type: ProductType,
        rate: Decimal,
        term_months: u32,
    ) -> Self {
        Self {
            bank: bank.to_string(),
            product_name: product_name.to_string(),
            product_type,
            base_rate: rate,
            bonus_rate: Decimal::ZERO,
            term_months,
            interest_payment_method: InterestMethod::Simple,
            minimum_deposit_amount: None,
            enrollment_condition: None,
            maximum_rate: Decimal::ZERO,
        }
    }

    pub fn total_rate(&self) -> Decimal {
        self.base_rate + self.bonus_rate
    }

    pub fn is_savings(&self) -> bool {
        self.product_type == ProductType::Savings
    }
}
