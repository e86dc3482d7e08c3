use crate::error::{AppError, AppResult, FieldError};

/// Collects field-level violations for one request before any store call.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Non-blank text of at most `max` characters.
    pub fn text(&mut self, field: &str, label: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
        } else if value.chars().count() > max {
            self.push(field, format!("{label} must not exceed {max} characters"));
        }
    }

    /// Collection with between `min` and `max` entries.
    pub fn count(&mut self, field: &str, len: usize, min: usize, max: usize, message: &str) {
        if len < min || len > max {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn finish(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_fields(self.0))
        }
    }
}
