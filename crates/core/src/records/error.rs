use thiserror::Error;

/// Errors raised while validating an incoming document or patch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Field `{0}` cannot be blank")]
    BlankField(&'static str),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Invalid time (expected HH:MM or HH:MM:SS): {0}")]
    InvalidTime(String),
    #[error("Number of people must be at least 1, got {0}")]
    TooFewPeople(u32),
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display() {
        let error = ValidationError::MissingFields(vec!["date".to_string(), "time".to_string()]);
        assert_eq!(error.to_string(), "Missing required fields: date, time");
    }

    #[test]
    fn test_blank_field_display() {
        assert_eq!(
            ValidationError::BlankField("title").to_string(),
            "Field `title` cannot be blank"
        );
    }

    #[test]
    fn test_too_few_people_display() {
        assert_eq!(
            ValidationError::TooFewPeople(0).to_string(),
            "Number of people must be at least 1, got 0"
        );
    }
}
