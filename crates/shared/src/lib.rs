mod chemistry;
mod error;
mod ingredient;
mod level;
pub mod tag;
mod unit;

pub use chemistry::*;
pub use error::*;
pub use ingredient::*;
pub use level::*;
pub use unit::*;

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            items: Vec::new(),
        }
    }
}
