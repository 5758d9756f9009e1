mod calculator;
mod composer;
mod input;

pub use calculator::*;
pub use composer::*;
pub use input::*;
