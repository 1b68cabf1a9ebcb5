use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use ratecmp_core::dataset::{Dataset, DatasetKind};
use ratecmp_core::domain::error::DataValidationError;
use ratecmp_core::domain::preference::Preference;
use ratecmp_core::domain::product::{Product, ProductType};
use ratecmp_core::domain::recommendation::ScoredProduct;
use ratecmp_core::pipeline::{
    build_dashboard, top_picks, DashboardRequest, DashboardView, FilterOptions, FilterSet,
    RateRange, SortOrder,
};
use ratecmp_core::scoring::Scorer;

const DEFAULT_TOP_PICKS: usize = 3;
const MAX_TOP_PICKS: usize = 50;

#[derive(Debug, Clone)]
pub struct AppState {
    products: Arc<[Product]>,
    options: Arc<FilterOptions>,
    kind: DatasetKind,
    source: Arc<str>,
}

impl AppState {
    pub fn from_dataset(dataset: Dataset) -> Self {
        let options = FilterOptions::from_products(&dataset.products);
        Self {
            products: dataset.products.into(),
            options: Arc::new(options),
            kind: dataset.kind,
            source: dataset.source.into(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/filters", get(get_filters))
        .route("/dashboard", get(get_dashboard))
        .route("/top-picks", get(get_top_picks))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ApiFilters {
    dataset_kind: DatasetKind,
    source: String,
    preferences: Vec<Preference>,
    #[serde(flatten)]
    options: FilterOptions,
}

async fn get_filters(State(state): State<AppState>) -> Json<ApiFilters> {
    Json(ApiFilters {
        dataset_kind: state.kind,
        source: state.source.to_string(),
        preferences: Preference::ALL.to_vec(),
        options: state.options.as_ref().clone(),
    })
}

/// Control values as they arrive on the query string. Absent values mean the default control
/// state; `banks=` (present but empty) selects no bank at all.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub product_type: Option<String>,
    pub banks: Option<String>,
    pub term: Option<String>,
    pub min_rate: Option<String>,
    pub max_rate: Option<String>,
    pub preference: Option<String>,
    pub sort: Option<String>,
}

impl DashboardQuery {
    pub fn into_request(
        self,
        options: &FilterOptions,
    ) -> Result<DashboardRequest, DataValidationError> {
        let product_type = match non_blank(self.product_type.as_deref()) {
            None => None,
            Some(s) if is_all(s) => None,
            Some(s) => Some(ProductType::from_str(s)?),
        };

        let banks: BTreeSet<String> = match self.banks.as_deref() {
            None => options.banks.iter().cloned().collect(),
            Some(s) => s
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string)
                .collect(),
        };

        let term_months = match non_blank(self.term.as_deref()) {
            None => None,
            Some(s) if is_all(s) => None,
            Some(s) => Some(
                s.parse::<u32>()
                    .map_err(|_| DataValidationError::invalid("term", s))?,
            ),
        };

        let min = parse_rate("min_rate", self.min_rate.as_deref())?.unwrap_or(options.rate_range.min);
        let max = parse_rate("max_rate", self.max_rate.as_deref())?.unwrap_or(options.rate_range.max);

        let preference = non_blank(self.preference.as_deref())
            .map(Preference::from_str)
            .transpose()?;

        let order = non_blank(self.sort.as_deref())
            .map(SortOrder::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(DashboardRequest {
            filters: FilterSet {
                product_type,
                banks,
                term_months,
                rate_range: RateRange::new(min, max)?,
            },
            scorer: Scorer::from_preference(preference),
            order,
        })
    }
}

async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, StatusCode> {
    let request = query.into_request(&state.options).map_err(|e| {
        tracing::debug!(error = %e, "rejected dashboard query");
        StatusCode::BAD_REQUEST
    })?;

    let view = build_dashboard(&state.products, &request);
    tracing::debug!(rows = view.rows.len(), scorer = ?view.scorer, "built dashboard view");
    Ok(Json(view))
}

#[derive(Debug, Default, Deserialize)]
pub struct TopPicksQuery {
    pub preference: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ApiTopPicks {
    scorer: Scorer,
    items: Vec<ScoredProduct>,
}

async fn get_top_picks(
    State(state): State<AppState>,
    Query(query): Query<TopPicksQuery>,
) -> Result<Json<ApiTopPicks>, StatusCode> {
    let preference = non_blank(query.preference.as_deref())
        .map(Preference::from_str)
        .transpose()
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected top-picks query");
            StatusCode::BAD_REQUEST
        })?;

    let limit = query.limit.unwrap_or(DEFAULT_TOP_PICKS).min(MAX_TOP_PICKS);
    let scorer = Scorer::from_preference(preference);

    Ok(Json(ApiTopPicks {
        scorer,
        items: top_picks(&state.products, scorer, limit),
    }))
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn is_all(s: &str) -> bool {
    s.eq_ignore_ascii_case("all") || s == "전체"
}

fn parse_rate(
    field: &'static str,
    v: Option<&str>,
) -> Result<Option<Decimal>, DataValidationError> {
    non_blank(v)
        .map(|s| Decimal::from_str(s).map_err(|_| DataValidationError::invalid(field, s)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> FilterOptions {
        FilterOptions::from_products(&ratecmp_core::dataset::sample_products())
    }

    #[test]
    fn empty_query_is_the_default_control_state() {
        let opts = options();
        let req = DashboardQuery::default().into_request(&opts).unwrap();
        assert_eq!(req.filters, FilterSet::admit_all(&opts));
        assert_eq!(req.scorer, Scorer::Fixed);
        assert_eq!(req.order, SortOrder::Score);
    }

    #[test]
    fn present_but_empty_banks_selects_nothing() {
        let query = DashboardQuery {
            banks: Some(String::new()),
            ..Default::default()
        };
        let req = query.into_request(&options()).unwrap();
        assert!(req.filters.banks.is_empty());
    }

    #[test]
    fn parses_korean_labels_and_all() {
        let query = DashboardQuery {
            product_type: Some("적금".to_string()),
            term: Some("전체".to_string()),
            banks: Some("국민은행, 신한은행".to_string()),
            preference: Some("금리 중심".to_string()),
            sort: Some("rate".to_string()),
            ..Default::default()
        };
        let req = query.into_request(&options()).unwrap();
        assert_eq!(req.filters.product_type, Some(ProductType::Savings));
        assert_eq!(req.filters.term_months, None);
        assert_eq!(req.filters.banks.len(), 2);
        assert_eq!(req.scorer, Scorer::Preference(Preference::RateFocused));
        assert_eq!(req.order, SortOrder::Rate);
    }

    #[test]
    fn rejects_unknown_preference_and_bad_range() {
        let query = DashboardQuery {
            preference: Some("lowest-risk".to_string()),
            ..Default::default()
        };
        assert_eq!(query.into_request(&options()).unwrap_err().field, "preference");

        let query = DashboardQuery {
            min_rate: Some("4.5".to_string()),
            max_rate: Some("3.0".to_string()),
            ..Default::default()
        };
        assert_eq!(query.into_request(&options()).unwrap_err().field, "rate_range");
    }
}
