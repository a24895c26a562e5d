//! Schema validation helpers built on the `validator` crate.
//!
//! Input schemas derive [`Validate`]; [`validate_input`] runs the derived
//! checks and turns every violation into a single
//! [`CoreError::Validation`] whose message lists each failing field, so
//! callers always get a tagged result rather than a panic or a partial
//! report.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;
use crate::types::Date;

/// `#RRGGBB` display colour.
pub static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid colour regex"));

/// Machine identifier: a letter followed by letters, digits or underscores.
pub static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Key used by `validator` for struct-level (schema) errors.
const STRUCT_LEVEL_KEY: &str = "__all__";

/// Run all derived validations on `input`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(format_validation_errors(&errors)))
}

/// Flatten `errors` into `"field: message; other: message"`, sorted by path.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut entries = Vec::new();
    collect_errors(errors, "", &mut entries);
    entries.sort();
    entries.join("; ")
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let path = if field == STRUCT_LEVEL_KEY {
            prefix.trim_end_matches('.').to_string()
        } else {
            format!("{prefix}{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    if path.is_empty() {
                        out.push(describe(error));
                    } else {
                        out.push(format!("{path}: {}", describe(error)));
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_errors(nested, &format!("{path}."), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(nested, &format!("{path}[{index}]."), out);
                }
            }
        }
    }
}

/// Human-readable text for one violated constraint.
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let min = error.params.get("min");
    let max = error.params.get("max");
    match error.code.as_ref() {
        "email" => "must be a valid email address".to_string(),
        "regex" => "has an invalid format".to_string(),
        "required" => "is required".to_string(),
        "length" => match (min, max) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "has an invalid length".to_string(),
        },
        "range" => match (min, max) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "is out of range".to_string(),
        },
        other => other.to_string(),
    }
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Reject strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("blank", "must not be blank"));
    }
    Ok(())
}

/// Reject lists containing blank entries.
pub fn no_blank_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(error_with_message("blank_entry", "must not contain blank values"));
    }
    Ok(())
}

/// Reject a date range whose start falls after its end.
pub fn check_date_range(start: Option<Date>, end: Option<Date>) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(error_with_message(
                "date_range",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}
