mod cache;
mod classification;
mod exit_nodes;
mod result;
mod service;
mod target;

pub use cache::*;
pub use classification::*;
pub use exit_nodes::*;
pub use result::*;
pub use service::*;
pub use target::*;
