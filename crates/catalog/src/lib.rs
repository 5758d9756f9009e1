mod browse;
mod facet;
pub mod filter;
mod predicate;
pub mod similarity;
pub mod sort;
mod store;

pub use browse::*;
pub use facet::*;
pub use predicate::*;
pub use similarity::{NameEntry, Relevance};
pub use sort::{Direction, SortField, SortKey, SortOrder, SortTerm};
pub use store::*;
