//! Assistant flows for the clinic app: instruction sheets, remedy
//! suggestions, and voice note capture.
//!
//! The generation backend was never wired up; every flow ships its
//! deterministic placeholder so the UI pages render today. A real backend
//! would live behind the `model` feature.

pub mod instructions;
pub mod suggest;
pub mod voice;

pub use instructions::*;
pub use suggest::*;
pub use voice::*;

/// Assistant-flow errors.
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("The {0} backend is not available in this build")]
    BackendUnavailable(&'static str),
}
