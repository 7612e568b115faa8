use crate::error::{StudyError, StudyResult};
use ncert_models::{MAX_STUDY_DAYS, MIN_STUDY_DAYS};
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> StudyResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(StudyError::validation("model", error_messages))
        }
    }
}

/// Flattens nested validator errors into `path: message` pairs.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages("", errors, &mut messages);
    messages.join(", ")
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => match error.code.as_ref() {
                            "length" => format!("Length validation failed for field '{}'", path),
                            "range" => format!("Value out of range for field '{}'", path),
                            "required" => format!("Field '{}' is required", path),
                            code => format!("Validation failed for field '{}': {}", path, code),
                        },
                    };
                    messages.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(&path, nested, messages),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(&format!("{}[{}]", path, index), nested, messages);
                }
            }
        }
    }
}

/// Accepts a day count inside the supported study window.
pub fn validate_day_count(days: i64) -> StudyResult<u32> {
    if days < i64::from(MIN_STUDY_DAYS) || days > i64::from(MAX_STUDY_DAYS) {
        return Err(StudyError::invalid_day_count(days));
    }

    Ok(days as u32)
}

/// Parses a day count typed by the user.
pub fn parse_day_count(input: &str) -> StudyResult<u32> {
    let trimmed = input.trim();
    let days: i64 = trimmed.parse().map_err(|_| {
        StudyError::validation(
            "days",
            format!("'{}' is not a whole number of days", trimmed),
        )
    })?;

    validate_day_count(days)
}

/// Gemini API keys are issued with an `AIza` prefix.
pub fn validate_api_key(api_key: &str) -> StudyResult<()> {
    let trimmed = api_key.trim();
    if trimmed.is_empty() {
        return Err(StudyError::configuration(
            "Gemini API key is not set (NCERT__GEMINI__API_KEY)",
        ));
    }
    if !trimmed.starts_with("AIza") {
        return Err(StudyError::configuration(
            "Gemini API key has an unexpected format",
        ));
    }

    Ok(())
}
