//! Domain validation rules

pub mod validation;

pub use validation::validate_lookup_value;
