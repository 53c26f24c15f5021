//! Inference logic, independent of HTTP

pub mod features;
pub mod model;
pub mod pipeline;
pub mod risk;

#[cfg(test)]
pub mod testing;
#[cfg(test)]
mod tests;
