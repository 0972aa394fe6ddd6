//! Unified assessment.request.v1 schema
//!
//! This module defines the input schema for questionnaire submissions, with
//! or without voice readings, and the batch parser that reads them.

mod adapter;
mod request;

pub use adapter::*;
pub use request::*;
