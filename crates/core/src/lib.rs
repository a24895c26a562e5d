//! Domain building blocks shared by the persistence and HTTP layers.
//!
//! Nothing in this crate performs I/O: it holds the error taxonomy, id and
//! timestamp aliases, status enums, pagination math, and the validated input
//! schemas every service operation accepts.

pub mod error;
pub mod pagination;
pub mod schemas;
pub mod status;
pub mod types;
pub mod validation;
