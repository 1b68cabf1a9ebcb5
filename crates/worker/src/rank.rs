use clap::Args;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::io::Write;
use std::str::FromStr;

use ratecmp_core::domain::preference::Preference;
use ratecmp_core::domain::product::ProductType;
use ratecmp_core::domain::recommendation::{EmphasisTier, ScoredProduct};
use ratecmp_core::pipeline::{
    DashboardRequest, DashboardView, FilterOptions, FilterSet, RateRange, SortOrder,
};
use ratecmp_core::scoring::Scorer;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Args)]
pub struct RankArgs {
    /// all | deposit | savings (예금 / 적금 also accepted).
    #[arg(long, default_value = "all")]
    pub product_type: String,

    /// Bank to include; repeat for several. All banks when omitted.
    #[arg(long = "bank")]
    pub banks: Vec<String>,

    /// all, or an exact term in months.
    #[arg(long, default_value = "all")]
    pub term: String,

    /// Lower rate bound (inclusive). Defaults to the lowest observed rate.
    #[arg(long)]
    pub min_rate: Option<Decimal>,

    /// Upper rate bound (inclusive). Defaults to the highest observed rate.
    #[arg(long)]
    pub max_rate: Option<Decimal>,

    /// rate-focused | term-focused | savings-preferred. Fixed weights when omitted.
    #[arg(long)]
    pub preference: Option<Preference>,

    /// score | rate
    #[arg(long, default_value = "score")]
    pub sort: SortOrder,

    /// How many products to list in the full-table top picks.
    #[arg(long, default_value_t = 3)]
    pub top_picks: usize,

    /// Print JSON instead of the text dashboard.
    #[arg(long)]
    pub json: bool,
}

impl RankArgs {
    pub fn to_request(&self, options: &FilterOptions) -> anyhow::Result<DashboardRequest> {
        let product_type = if is_all(&self.product_type) {
            None
        } else {
            Some(ProductType::from_str(&self.product_type)?)
        };

        let term_months = if is_all(&self.term) {
            None
        } else {
            Some(
                self.term
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| anyhow::anyhow!("--term must be 'all' or a number of months (got {:?})", self.term))?,
            )
        };

        let banks: BTreeSet<String> = if self.banks.is_empty() {
            options.banks.iter().cloned().collect()
        } else {
            self.banks.iter().map(|b| b.trim().to_string()).collect()
        };

        let rate_range = RateRange::new(
            self.min_rate.unwrap_or(options.rate_range.min),
            self.max_rate.unwrap_or(options.rate_range.max),
        )?;

        Ok(DashboardRequest {
            filters: FilterSet {
                product_type,
                banks,
                term_months,
                rate_range,
            },
            scorer: Scorer::from_preference(self.preference),
            order: self.sort,
        })
    }
}

fn is_all(s: &str) -> bool {
    let s = s.trim();
    s.eq_ignore_ascii_case("all") || s == "전체"
}

pub fn render_text<W: Write>(
    out: &mut W,
    view: &DashboardView,
    picks: &[ScoredProduct],
) -> std::io::Result<()> {
    writeln!(out, "== 상품 비교 결과 ({}) ==", scorer_label(view.scorer))?;
    if view.rows.is_empty() {
        writeln!(out, "(no rows)")?;
    }
    for row in &view.rows {
        writeln!(out, "{}", row_line(row))?;
    }

    writeln!(out)?;
    writeln!(out, "== 은행별 평균 금리 ==")?;
    let max = view
        .mean_rate_by_bank
        .iter()
        .map(|g| g.mean_rate)
        .max()
        .unwrap_or(Decimal::ZERO);
    for g in &view.mean_rate_by_bank {
        writeln!(out, "{:<10} {:>5}% {}", g.key, g.mean_rate, bar(g.mean_rate, max))?;
    }

    writeln!(out)?;
    writeln!(out, "== 예금 vs 적금 평균 금리 ==")?;
    let max = view
        .mean_rate_by_type
        .iter()
        .map(|g| g.mean_rate)
        .max()
        .unwrap_or(Decimal::ZERO);
    for g in &view.mean_rate_by_type {
        writeln!(out, "{:<10} {:>5}% {}", g.key.label_ko(), g.mean_rate, bar(g.mean_rate, max))?;
    }

    writeln!(out)?;
    match (&view.top, &view.notice) {
        (Some(top), _) => writeln!(
            out,
            "추천 1위: [{}] {} | 금리 {}% | 추천점수 {}",
            top.product.bank, top.product.product_name, top.total_rate, top.recommendation_score
        )?,
        (None, Some(notice)) => writeln!(out, "{notice}")?,
        (None, None) => {}
    }

    if !picks.is_empty() {
        writeln!(out)?;
        writeln!(out, "== 전체 상품 TOP {} ==", picks.len())?;
        for row in picks {
            writeln!(out, "{}", row_line(row))?;
        }
    }

    Ok(())
}

fn row_line(row: &ScoredProduct) -> String {
    let marker = match row.emphasis {
        EmphasisTier::Top => '*',
        EmphasisTier::PrimaryType => '+',
        EmphasisTier::SecondaryType => ' ',
    };
    format!(
        "{marker} {:>2}. [{}] {} ({}) 금리 {}% | {}개월 | 점수 {}",
        row.rank,
        row.product.bank,
        row.product.product_name,
        row.product.product_type.label_ko(),
        row.total_rate,
        row.product.term_months,
        row.recommendation_score,
    )
}

fn scorer_label(scorer: Scorer) -> &'static str {
    match scorer {
        Scorer::Fixed => "기본 가중치",
        Scorer::Preference(p) => p.label_ko(),
    }
}

fn bar(value: Decimal, max: Decimal) -> String {
    if max.is_zero() {
        return String::new();
    }
    let width = (value / max * Decimal::from(BAR_WIDTH)).round();
    let width = usize::try_from(width.mantissa()).unwrap_or(0).min(BAR_WIDTH);
    "#".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ratecmp_core::dataset::sample_products;
    use ratecmp_core::pipeline::{build_dashboard, top_picks};

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RankArgs,
    }

    fn parse(argv: &[&str]) -> RankArgs {
        let mut full = vec!["rank"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    #[test]
    fn defaults_admit_everything() {
        let options = FilterOptions::from_products(&sample_products());
        let req = parse(&[]).to_request(&options).unwrap();
        assert_eq!(req.filters, FilterSet::admit_all(&options));
        assert_eq!(req.scorer, Scorer::Fixed);
    }

    #[test]
    fn parses_filters_and_preference() {
        let options = FilterOptions::from_products(&sample_products());
        let req = parse(&[
            "--product-type",
            "적금",
            "--bank",
            "국민은행",
            "--bank",
            "하나은행",
            "--term",
            "12",
            "--min-rate",
            "3.5",
            "--preference",
            "savings-preferred",
            "--sort",
            "rate",
        ])
        .to_request(&options)
        .unwrap();

        assert_eq!(req.filters.product_type, Some(ProductType::Savings));
        assert_eq!(req.filters.banks.len(), 2);
        assert_eq!(req.filters.term_months, Some(12));
        assert_eq!(req.filters.rate_range.min, Decimal::new(35, 1));
        assert_eq!(req.scorer, Scorer::Preference(Preference::SavingsPreferred));
        assert_eq!(req.order, SortOrder::Rate);
    }

    #[test]
    fn unknown_preference_fails_to_parse() {
        let res = TestCli::try_parse_from(["rank", "--preference", "random"]);
        assert!(res.is_err());
    }

    #[test]
    fn renders_top_line_and_charts() {
        let products = sample_products();
        let options = FilterOptions::from_products(&products);
        let req = parse(&[]).to_request(&options).unwrap();
        let view = build_dashboard(&products, &req);
        let picks = top_picks(&products, req.scorer, 2);

        let mut buf = Vec::new();
        render_text(&mut buf, &view, &picks).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("추천 1위: [우리은행] 우리 WON 적금"));
        assert!(text.contains("은행별 평균 금리"));
        assert!(text.contains("TOP 2"));
    }

    #[test]
    fn renders_notice_when_empty() {
        let products = sample_products();
        let options = FilterOptions::from_products(&products);
        let req = parse(&["--bank", "없는은행"]).to_request(&options).unwrap();
        let view = build_dashboard(&products, &req);

        let mut buf = Vec::new();
        render_text(&mut buf, &view, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains(ratecmp_core::pipeline::view::NO_RESULTS_NOTICE));
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(Decimal::from(2), Decimal::from(4)).len(), BAR_WIDTH / 2);
        assert_eq!(bar(Decimal::ONE, Decimal::ZERO), "");
    }
}
