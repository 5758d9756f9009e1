mod migrate;
mod seed;
mod server;

pub use migrate::*;
pub use seed::*;
pub use server::*;
