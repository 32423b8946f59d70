use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static MODULE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,4}[0-9]{3,4}$").expect("valid module code regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Module code is required")]
    ModuleCodeRequired,
    #[error("Invalid module code format (e.g., CS101, COMP2023)")]
    ModuleCodeFormat,
    #[error("Start date must be before end date")]
    StartAfterEnd,
    #[error("End date cannot be in the future")]
    EndInFuture,
}

pub fn validate_module_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::ModuleCodeRequired);
    }
    if !MODULE_CODE.is_match(code) {
        return Err(ValidationError::ModuleCodeFormat);
    }
    Ok(())
}

/// Checks a reporting range. Returns every problem found, not just the first.
pub fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if start > end {
        errors.push(ValidationError::StartAfterEnd);
    }
    if end > today {
        errors.push(ValidationError::EndInFuture);
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
