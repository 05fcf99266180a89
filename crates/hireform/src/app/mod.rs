//! Application layer orchestrating domain logic and infrastructure.

pub mod form;
pub mod receipt;
pub mod selection;
pub mod surface;
pub mod validation;
