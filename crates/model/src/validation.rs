//! Field level constraints for request payloads.
//!
//! The rules themselves are `validator` derives on the forms. `validator`
//! reports violations per field without order, so every form names its
//! fields in declaration order and the messages are collected in that order.

use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", .messages.join("; "))]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the messages of `errors`, field by field in the order of
    /// `fields`. A rule without a message reports its code.
    pub fn ordered(errors: &validator::ValidationErrors, fields: &[&str]) -> Self {
        let field_errors = errors.field_errors();
        let mut collected = Self::new();
        for field in fields {
            let Some(violations) = field_errors.get(*field) else {
                continue;
            };
            for violation in violations.iter() {
                collected.push(
                    violation
                        .message
                        .as_ref()
                        .unwrap_or(&violation.code)
                        .to_string(),
                );
            }
        }
        collected
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// A `validator::Validate` payload whose violations are reported in field
/// declaration order.
pub trait ValidateOrdered: Validate {
    /// Names of the validated fields, in declaration order.
    const FIELDS: &'static [&'static str];

    fn validate_ordered(&self) -> Result<(), ValidationErrors> {
        self.validate()
            .map_err(|errors| ValidationErrors::ordered(&errors, Self::FIELDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Validate)]
    struct Sample {
        #[validate(required(message = "first missing"), length(min = 3, message = "first short"))]
        first: Option<String>,
        #[validate(required(message = "second missing"), range(min = 0, max = 10))]
        second: Option<i32>,
    }

    impl ValidateOrdered for Sample {
        const FIELDS: &'static [&'static str] = &["first", "second"];
    }

    #[test]
    fn messages_follow_field_order() {
        let errors = Sample::default().validate_ordered().unwrap_err();
        assert_eq!(errors.messages(), ["first missing", "second missing"]);

        let raw = Sample::default().validate().unwrap_err();
        let reversed = ValidationErrors::ordered(&raw, &["second", "first"]);
        assert_eq!(reversed.into_messages(), vec!["second missing", "first missing"]);
    }

    #[test]
    fn present_value_only_reports_its_bound() {
        let sample = Sample {
            first: Some("ab".to_owned()),
            second: Some(11),
        };
        let errors = sample.validate_ordered().unwrap_err();
        // the range rule has no message and falls back to its code
        assert_eq!(errors.messages(), ["first short", "range"]);
    }

    #[test]
    fn valid_payload_passes() {
        let sample = Sample {
            first: Some("abc".to_owned()),
            second: Some(10),
        };
        assert!(sample.validate_ordered().is_ok());
    }
}
