//! Validation and filtering of booking candidates
//!
//! The engine in [`engine`] is the single admissibility rule for bookings. It
//! is composed from the small closure validators and filters next to it and
//! fed by the [`JsonPayload`] extractor.

pub mod engine;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use engine::{REQUIRED_FIELDS, ValidationMode, find_overlap, validate};
pub use extractor::JsonPayload;
