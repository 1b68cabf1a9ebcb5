use crate::dataset::DatasetKind;
use crate::domain::contract::{validate_table, RawProductRecord};
use crate::domain::product::Product;
use anyhow::{Context, Result};
use encoding_rs::{EUC_KR, UTF_8};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Bank,
    ProductName,
    ProductType,
    Rate,
    BaseRate,
    BonusRate,
    TermMonths,
    InterestMethod,
    MinimumDeposit,
    EnrollmentCondition,
    MaximumRate,
}

// Header labels are compared after removing whitespace and ASCII-lowercasing.
const COLUMN_ALIASES: &[(&str, Column)] = &[
    ("은행", Column::Bank),
    ("bank", Column::Bank),
    ("상품명", Column::ProductName),
    ("product_name", Column::ProductName),
    ("상품유형", Column::ProductType),
    ("product_type", Column::ProductType),
    ("금리(%)", Column::Rate),
    ("금리", Column::Rate),
    ("rate", Column::Rate),
    ("기본금리(%)", Column::BaseRate),
    ("기본금리", Column::BaseRate),
    ("base_rate", Column::BaseRate),
    ("우대금리(%)", Column::BonusRate),
    ("우대금리", Column::BonusRate),
    ("bonus_rate", Column::BonusRate),
    ("기간(개월)", Column::TermMonths),
    ("가입기간(개월)", Column::TermMonths),
    ("기간", Column::TermMonths),
    ("term_months", Column::TermMonths),
    ("이자지급방식", Column::InterestMethod),
    ("interest_payment_method", Column::InterestMethod),
    ("최소가입금액", Column::MinimumDeposit),
    ("최소가입금액(원)", Column::MinimumDeposit),
    ("minimum_deposit_amount", Column::MinimumDeposit),
    ("가입조건", Column::EnrollmentCondition),
    ("enrollment_condition", Column::EnrollmentCondition),
    ("최고금리(%)", Column::MaximumRate),
    ("최고금리", Column::MaximumRate),
    ("maximum_rate", Column::MaximumRate),
];

pub fn load_table_file(path: &Path) -> Result<(DatasetKind, Vec<Product>)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read product table {}", path.display()))?;
    parse_products(&bytes).with_context(|| format!("invalid product table {}", path.display()))
}

/// Parses a delimited product table. Comma or tab separated, UTF-8 (with or without BOM) or
/// EUC-KR.
pub fn parse_products(bytes: &[u8]) -> Result<(DatasetKind, Vec<Product>)> {
    let text = decode_text(bytes);
    let delimiter = sniff_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("failed to read header row")?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(column_for_header).collect();

    let unmapped = unmapped_headers(&headers, &columns);
    if !unmapped.is_empty() {
        tracing::warn!(?unmapped, "ignoring unrecognised product table columns");
    }

    let has = |c: Column| columns.contains(&Some(c));
    anyhow::ensure!(
        has(Column::Rate) || has(Column::BaseRate),
        "product table has no rate column (headers: {:?})",
        headers.iter().collect::<Vec<_>>()
    );
    let kind = if has(Column::BaseRate) {
        DatasetKind::Detailed
    } else {
        DatasetKind::Simple
    };

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV record at data row {}", idx + 1))?;
        let mut raw = RawProductRecord::default();
        for (column, value) in columns.iter().zip(record.iter()) {
            if let Some(column) = column {
                assign(&mut raw, *column, value);
            }
        }
        rows.push(raw);
    }

    let products = validate_table(rows)?;
    tracing::debug!(?kind, rows = products.len(), "parsed product table");
    Ok((kind, products))
}

fn decode_text(bytes: &[u8]) -> String {
    // Strips a UTF-8 BOM; falls back to EUC-KR when the bytes are not valid UTF-8.
    let (cow, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return cow.into_owned();
    }
    let (cow, _, _) = EUC_KR.decode(bytes);
    cow.into_owned()
}

fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.contains('\t') && !header.contains(',') {
        b'\t'
    } else {
        b','
    }
}

fn column_for_header(header: &str) -> Option<Column> {
    let key: String = header
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, column)| *column)
}

fn unmapped_headers<'a>(headers: &'a csv::StringRecord, columns: &[Option<Column>]) -> Vec<&'a str> {
    headers
        .iter()
        .zip(columns)
        .filter(|(_, column)| column.is_none())
        .map(|(header, _)| header)
        .collect()
}

fn assign(raw: &mut RawProductRecord, column: Column, value: &str) {
    let value = Some(value.to_string());
    match column {
        Column::Bank => raw.bank = value,
        Column::ProductName => raw.product_name = value,
        Column::ProductType => raw.product_type = value,
        Column::Rate => raw.rate = value,
        Column::BaseRate => raw.base_rate = value,
        Column::BonusRate => raw.bonus_rate = value,
        Column::TermMonths => raw.term_months = value,
        Column::InterestMethod => raw.interest_payment_method = value,
        Column::MinimumDeposit => raw.minimum_deposit_amount = value,
        Column::EnrollmentCondition => raw.enrollment_condition = value,
        Column::MaximumRate => raw.maximum_rate = value,
    }
}
