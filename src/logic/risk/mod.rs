//! Risk Module - Classifier label to human-readable risk

pub mod interpreter;
pub mod types;

pub use interpreter::{distribution, interpret};
pub use types::Probabilities;
