//! HTTP handlers

pub mod home;
pub mod model;
pub mod predict;
