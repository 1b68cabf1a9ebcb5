pub mod filter;
pub mod rank;
pub mod view;

pub use filter::{FilterOptions, FilterSet, RateRange};
pub use rank::{rank, SortOrder};
pub use view::{build_dashboard, top_picks, DashboardRequest, DashboardView};
