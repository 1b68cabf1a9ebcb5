use crate::domain::error::DataValidationError;
use crate::domain::product::{InterestMethod, Product, ProductType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A product row as it arrives from a table source, before validation.
///
/// Every column is an optional string so that a missing or blank cell can be told apart from a
/// malformed one. `rate` is the single-rate column of the simple dataset; detailed datasets use
/// `base_rate` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProductRecord {
    pub bank: Option<String>,
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    pub rate: Option<String>,
    pub base_rate: Option<String>,
    pub bonus_rate: Option<String>,
    pub term_months: Option<String>,
    pub interest_payment_method: Option<String>,
    pub minimum_deposit_amount: Option<String>,
    pub enrollment_condition: Option<String>,
    pub maximum_rate: Option<String>,
}

impl RawProductRecord {
    pub fn validate_and_into_product(self) -> Result<Product, DataValidationError> {
        let bank = required_text("bank", self.bank)?;
        let product_name = required_text("product_name", self.product_name)?;
        let product_type = ProductType::from_str(&required_text("product_type", self.product_type)?)?;

        let base_rate = match non_blank(self.base_rate).or_else(|| non_blank(self.rate)) {
            Some(s) => parse_rate("base_rate", &s)?,
            None => return Err(DataValidationError::missing("base_rate")),
        };
        let bonus_rate = optional_rate("bonus_rate", self.bonus_rate)?.unwrap_or(Decimal::ZERO);
        let maximum_rate = optional_rate("maximum_rate", self.maximum_rate)?.unwrap_or(Decimal::ZERO);

        let term_months = parse_term(&required_text("term_months", self.term_months)?)?;

        let interest_payment_method = match non_blank(self.interest_payment_method) {
            Some(s) => InterestMethod::from_str(&s)?,
            None => InterestMethod::default(),
        };

        let minimum_deposit_amount = match non_blank(self.minimum_deposit_amount) {
            Some(s) => Some(parse_amount("minimum_deposit_amount", &s)?),
            None => None,
        };

        Ok(Product {
            bank,
            product_name,
            product_type,
            base_rate,
            bonus_rate,
            term_months,
            interest_payment_method,
            minimum_deposit_amount,
            enrollment_condition: non_blank(self.enrollment_condition),
            maximum_rate,
        })
    }
}

/// Validates a whole table, tagging errors with their 1-based row number.
pub fn validate_table(rows: Vec<RawProductRecord>) -> Result<Vec<Product>, DataValidationError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            raw.validate_and_into_product()
                .map_err(|e| e.at_row(idx + 1))
        })
        .collect()
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn required_text(field: &'static str, v: Option<String>) -> Result<String, DataValidationError> {
    non_blank(v).ok_or_else(|| DataValidationError::missing(field))
}

fn parse_decimal(field: &'static str, s: &str) -> Result<Decimal, DataValidationError> {
    let cleaned: String = s
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(cleaned.trim()).map_err(|_| DataValidationError::invalid(field, s))
}

fn parse_rate(field: &'static str, s: &str) -> Result<Decimal, DataValidationError> {
    let rate = parse_decimal(field, s)?;
    if rate.is_sign_negative() {
        return Err(DataValidationError::with_detail(
            field,
            format!("rate must be non-negative (got {rate})"),
        ));
    }
    Ok(rate)
}

fn optional_rate(
    field: &'static str,
    v: Option<String>,
) -> Result<Option<Decimal>, DataValidationError> {
    non_blank(v).map(|s| parse_rate(field, &s)).transpose()
}

fn parse_amount(field: &'static str, s: &str) -> Result<Decimal, DataValidationError> {
    let cleaned = s.trim().trim_end_matches('원');
    let amount = parse_decimal(field, cleaned)?;
    if amount.is_sign_negative() {
        return Err(DataValidationError::with_detail(
            field,
            format!("amount must be non-negative (got {amount})"),
        ));
    }
    Ok(amount)
}

fn parse_term(s: &str) -> Result<u32, DataValidationError> {
    let cleaned = s.trim().trim_end_matches("개월").trim();
    cleaned
        .parse::<u32>()
        .map_err(|_| DataValidationError::invalid("term_months", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bank: &str, rate: &str, term: &str) -> RawProductRecord {
        RawProductRecord {
            bank: Some(bank.to_string()),
            product_name: Some("테스트 상품".to_string()),
            product_type: Some("적금".to_string()),
            base_rate: Some(rate.to_string()),
            term_months: Some(term.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_optional_fields() {
        let p = raw("신한은행", "3.50", "12").validate_and_into_product().unwrap();
        assert_eq!(p.bonus_rate, Decimal::ZERO);
        assert_eq!(p.maximum_rate, Decimal::ZERO);
        assert_eq!(p.interest_payment_method, InterestMethod::Simple);
        assert_eq!(p.minimum_deposit_amount, None);
        assert_eq!(p.enrollment_condition, None);
    }

    #[test]
    fn accepts_plain_rate_column() {
        let mut r = raw("우리은행", "", "6");
        r.base_rate = None;
        r.rate = Some("3.10".to_string());
        let p = r.validate_and_into_product().unwrap();
        assert_eq!(p.base_rate, Decimal::new(310, 2));
    }

    #[test]
    fn tolerates_units_in_cells() {
        let mut r = raw("하나은행", "4.10%", "12개월");
        r.minimum_deposit_amount = Some("10,000원".to_string());
        r.interest_payment_method = Some("복리".to_string());
        let p = r.validate_and_into_product().unwrap();
        assert_eq!(p.base_rate, Decimal::new(410, 2));
        assert_eq!(p.term_months, 12);
        assert_eq!(p.minimum_deposit_amount, Some(Decimal::new(10_000, 0)));
        assert_eq!(p.interest_payment_method, InterestMethod::Compound);
    }

    #[test]
    fn missing_base_rate_is_a_validation_error() {
        let mut r = raw("국민은행", "", "12");
        r.base_rate = None;
        let err = r.validate_and_into_product().unwrap_err();
        assert_eq!(err.field, "base_rate");
    }

    #[test]
    fn rejects_negative_rate() {
        let err = raw("국민은행", "-0.1", "12")
            .validate_and_into_product()
            .unwrap_err();
        assert_eq!(err.field, "base_rate");
    }

    #[test]
    fn table_errors_carry_row_number() {
        let rows = vec![raw("국민은행", "3.2", "12"), raw("신한은행", "abc", "12")];
        let err = validate_table(rows).unwrap_err();
        assert_eq!(err.row, Some(2));
        assert_eq!(err.field, "base_rate");
    }
}
