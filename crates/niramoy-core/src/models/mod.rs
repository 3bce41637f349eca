//! Domain models for the niramoy clinic system.

mod patient;
mod payment;
mod prescription;
mod settings;
mod visit;

pub use patient::*;
pub use payment::*;
pub use prescription::*;
pub use settings::*;
pub use visit::*;
