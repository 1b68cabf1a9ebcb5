use crate::domain::product::{Product, ProductType};
use crate::domain::recommendation::ScoredProduct;
use crate::pipeline::filter::FilterSet;
use crate::pipeline::rank::{rank, SortOrder};
use crate::scoring::Scorer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NO_RESULTS_NOTICE: &str = "조건에 맞는 상품이 없습니다.";

/// One render pass worth of user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub filters: FilterSet,
    pub scorer: Scorer,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateGroup<K> {
    pub key: K,
    pub mean_rate: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub scorer: Scorer,
    pub order: SortOrder,
    pub rows: Vec<ScoredProduct>,
    pub mean_rate_by_bank: Vec<RateGroup<String>>,
    pub mean_rate_by_type: Vec<RateGroup<ProductType>>,
    /// The first row after the final sort, if any row survived filtering.
    pub top: Option<ScoredProduct>,
    pub notice: Option<String>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Filter, score, sort and summarize. The source table is only borrowed.
pub fn build_dashboard(products: &[Product], request: &DashboardRequest) -> DashboardView {
    let filtered = request.filters.apply(products);
    let rows = rank(filtered, request.scorer, request.order);

    let mean_rate_by_bank = mean_rate_by(&rows, |r| r.product.bank.clone());
    let mean_rate_by_type = mean_rate_by(&rows, |r| r.product.product_type);

    let top = rows.first().cloned();
    let notice = top.is_none().then(|| NO_RESULTS_NOTICE.to_string());

    DashboardView {
        scorer: request.scorer,
        order: request.order,
        rows,
        mean_rate_by_bank,
        mean_rate_by_type,
        top,
        notice,
    }
}

/// Best products across the whole table, ignoring any filters.
///
/// Computed independently of [`build_dashboard`]; the two never share scores.
pub fn top_picks(products: &[Product], scorer: Scorer, limit: usize) -> Vec<ScoredProduct> {
    let mut ranked = rank(products, scorer, SortOrder::Score);
    ranked.truncate(limit);
    ranked
}

fn mean_rate_by<K, F>(rows: &[ScoredProduct], key: F) -> Vec<RateGroup<K>>
where
    K: Ord,
    F: Fn(&ScoredProduct) -> K,
{
    let mut groups: BTreeMap<K, (Decimal, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(key(row)).or_insert((Decimal::ZERO, 0));
        entry.0 += row.product.base_rate;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (sum, count))| RateGroup {
            key,
            mean_rate: (sum / Decimal::from(count)).round_dp(2),
            count,
        })
        .collect()
}
