//! Features Module - Sensor record to model input
//!
//! `layout` owns the canonical column order, `vector` turns a JSON record into it.

pub mod layout;
pub mod vector;

pub use layout::{LayoutInfo, FEATURE_COUNT};
pub use vector::{vectorize_with, ValidationError, VectorizeOptions};
