use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ViolationRule {
    Required,
    Type { expected: String },
    Bounds { min: f64, max: f64 },
    Length { min: usize, max: usize },
    Pattern { pattern: String },
    Enumeration { allowed: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    #[serde(flatten)]
    pub rule: ViolationRule,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, rule: ViolationRule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{field} is required");
        Self::new(field, ViolationRule::Required, message)
    }

    pub fn wrong_type(field: impl Into<String>, expected: &str) -> Self {
        let field = field.into();
        let message = format!("{field} must be a {expected}");
        Self::new(
            field,
            ViolationRule::Type {
                expected: expected.to_string(),
            },
            message,
        )
    }

    pub fn out_of_bounds(field: impl Into<String>, min: f64, max: f64) -> Self {
        let field = field.into();
        let message = format!("{field} must be between {min} and {max}");
        Self::new(field, ViolationRule::Bounds { min, max }, message)
    }

    pub fn bad_length(field: impl Into<String>, min: usize, max: usize) -> Self {
        let field = field.into();
        let message = format!("{field} must be between {min} and {max} characters");
        Self::new(field, ViolationRule::Length { min, max }, message)
    }

    pub fn not_allowed(field: impl Into<String>, allowed: &[&str]) -> Self {
        let field = field.into();
        let message = format!("{field} must be one of {}", allowed.join(", "));
        Self::new(
            field,
            ViolationRule::Enumeration {
                allowed: allowed.iter().map(|value| value.to_string()).collect(),
            },
            message,
        )
    }

    /// Re-roots the violation under a parent object, e.g. `age` -> `profileA.age`.
    pub fn nested_under(mut self, parent: &str) -> Self {
        self.field = format!("{parent}.{}", self.field);
        self.message = format!("{parent}.{}", self.message);
        self
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every field-level violation found in one input, in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations
            .iter()
            .map(|violation| violation.field.as_str())
            .collect()
    }

    pub fn violation_for(&self, field: &str) -> Option<&FieldViolation> {
        self.violations
            .iter()
            .find(|violation| violation.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .violations
            .iter()
            .map(|violation| violation.message.as_str())
            .collect();
        write!(f, "invalid input: {}", messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}
