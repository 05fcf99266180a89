//! Core form types shared by the application and UI layers.

pub mod errors;
pub mod model;
