//! Validation trait implemented by every configuration section.

/// Validation trait for configuration structures
pub trait Validate {
    /// Returns a human readable reason when the section is unusable
    fn validate(&self) -> Result<(), String>;
}
