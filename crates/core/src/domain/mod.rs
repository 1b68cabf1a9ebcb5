pub mod contract;
pub mod error;
pub mod preference;
pub mod product;
pub mod recommendation;
