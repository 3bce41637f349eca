//! Report generation: date-range resolution, range-report aggregation,
//! and dashboard statistics.

mod dashboard;
mod engine;
mod range;

pub use dashboard::*;
pub use engine::*;
pub use range::*;
