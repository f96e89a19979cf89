//! Declarative per-field validation schemas for data-entry forms.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use vetclinic_core::{AppError, AppResult};

use crate::EmailAddress;

/// Date format exchanged with the backend and typed by users.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field name to first validation failure message. Absent fields are valid.
pub type FieldErrors = BTreeMap<String, String>;

/// Value type a form field must parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Finite decimal number.
    Number,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// Structurally valid email address.
    Email,
}

impl FieldKind {
    /// Returns a stable name for the field kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Email => "email",
        }
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Text => true,
            Self::Number => parse_number(value).is_some(),
            Self::Date => parse_date(value).is_some(),
            Self::Email => EmailAddress::new(value).is_ok(),
        }
    }
}

impl FromStr for FieldKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "email" => Ok(Self::Email),
            _ => Err(AppError::Validation(format!(
                "unknown field kind '{value}'"
            ))),
        }
    }
}

/// Parses user input as a JSON number, preferring an integer representation.
#[must_use]
pub fn parse_number(value: &str) -> Option<serde_json::Number> {
    let trimmed = value.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(serde_json::Number::from(integer));
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .and_then(serde_json::Number::from_f64)
}

/// Parses user input as a `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Named predicate with the message reported when it fails.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    message: String,
    check: fn(&str) -> bool,
}

impl FieldRule {
    /// Creates a named rule.
    #[must_use]
    pub fn new(name: &'static str, message: impl Into<String>, check: fn(&str) -> bool) -> Self {
        Self {
            name,
            message: message.into(),
            check,
        }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns whether the value satisfies the rule.
    #[must_use]
    pub fn passes(&self, value: &str) -> bool {
        (self.check)(value)
    }
}

/// Validation declaration for one form field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    label: String,
    kind: FieldKind,
    required_message: Option<String>,
    kind_message: String,
    rules: Vec<FieldRule>,
}

impl FieldSchema {
    /// Declares an optional field of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let kind_message = format!("{name} must be a valid {}", kind.as_str());
        Self {
            name,
            label: label.into(),
            kind,
            required_message: None,
            kind_message,
            rules: Vec::new(),
        }
    }

    /// Marks the field required with the given message.
    #[must_use]
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required_message = Some(message.into());
        self
    }

    /// Overrides the message reported when the value does not parse as the kind.
    #[must_use]
    pub fn invalid(mut self, message: impl Into<String>) -> Self {
        self.kind_message = message.into();
        self
    }

    /// Appends a named rule, evaluated after the kind check.
    #[must_use]
    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns the field name used in payloads.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns whether the field must be filled in.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required_message.is_some()
    }

    /// Returns the named rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Validates one value and returns the first failure message.
    #[must_use]
    pub fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return self.required_message.clone();
        }

        if !self.kind.accepts(value) {
            return Some(self.kind_message.clone());
        }

        self.rules
            .iter()
            .find(|rule| !rule.passes(value))
            .map(|rule| rule.message.clone())
    }
}

/// Ordered, immutable set of field declarations for one form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
}

impl FormSchema {
    /// Creates a schema, rejecting duplicate or blank field names.
    pub fn new(fields: Vec<FieldSchema>) -> AppResult<Self> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(AppError::Validation(
                    "form field name must not be empty".to_owned(),
                ));
            }

            if !seen.insert(field.name.as_str()) {
                return Err(AppError::Validation(format!(
                    "duplicate form field '{}'",
                    field.name
                )));
            }
        }

        Ok(Self { fields })
    }

    /// Returns the field declarations in display order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Finds a field declaration by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns every declared field name.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSchema::name)
    }

    /// Returns values with every declared field set to an empty string.
    #[must_use]
    pub fn empty_values(&self) -> FormValues {
        let mut values = FormValues::default();
        for field in &self.fields {
            values.set(field.name.as_str(), "");
        }
        values
    }

    /// Validates a single field against current values.
    ///
    /// Undeclared names are always valid.
    #[must_use]
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Option<String> {
        self.field(name)
            .and_then(|field| field.validate(values.get(name)))
    }

    /// Validates every declared field.
    #[must_use]
    pub fn validate(&self, values: &FormValues) -> FieldErrors {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .validate(values.get(field.name()))
                    .map(|message| (field.name.clone(), message))
            })
            .collect()
    }
}

/// Current text of each form field, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Returns the value for a field, or an empty string if unset.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Sets a field value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|value| value.is_empty())
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Parses a field as a JSON number.
    pub fn number(&self, name: &str) -> AppResult<serde_json::Number> {
        parse_number(self.get(name)).ok_or_else(|| {
            AppError::Validation(format!("field '{name}' is not a valid number"))
        })
    }

    /// Parses a field as a calendar date.
    pub fn date(&self, name: &str) -> AppResult<NaiveDate> {
        parse_date(self.get(name))
            .ok_or_else(|| AppError::Validation(format!("field '{name}' is not a valid date")))
    }
}

impl<N, V> FromIterator<(N, V)> for FormValues
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_digits(value: &str) -> bool {
        !value.chars().any(|character| character.is_ascii_digit())
    }

    fn sample_schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSchema::new("name", "Name", FieldKind::Text)
                .required("name is required")
                .rule(FieldRule::new("noDigits", "no digits allowed", no_digits)),
            FieldSchema::new("age", "Age", FieldKind::Number)
                .required("age is required")
                .invalid("age must be numeric"),
            FieldSchema::new("notes", "Notes", FieldKind::Date),
        ])
        .unwrap_or_else(|error| panic!("schema should build: {error}"))
    }

    #[test]
    fn required_check_runs_before_kind_and_rules() {
        let schema = sample_schema();
        let values = schema.empty_values();
        let errors = schema.validate(&values);

        assert_eq!(errors.get("name").map(String::as_str), Some("name is required"));
        assert_eq!(errors.get("age").map(String::as_str), Some("age is required"));
        assert!(!errors.contains_key("notes"));
    }

    #[test]
    fn kind_and_rule_messages_are_reported() {
        let schema = sample_schema();
        let values: FormValues = [("name", "R2D2"), ("age", "old"), ("notes", "yesterday")]
            .into_iter()
            .collect();
        let errors = schema.validate(&values);

        assert_eq!(errors.get("name").map(String::as_str), Some("no digits allowed"));
        assert_eq!(errors.get("age").map(String::as_str), Some("age must be numeric"));
        assert_eq!(
            errors.get("notes").map(String::as_str),
            Some("notes must be a valid date")
        );
    }

    #[test]
    fn whitespace_only_value_is_not_empty() {
        let schema = sample_schema();
        let values: FormValues = [("name", "   "), ("age", "  ")].into_iter().collect();

        assert_eq!(schema.validate_field("name", &values), None);
        assert_eq!(
            schema.validate_field("age", &values).as_deref(),
            Some("age must be numeric")
        );
    }

    #[test]
    fn undeclared_field_is_valid() {
        let schema = sample_schema();
        assert_eq!(schema.validate_field("unknown", &FormValues::default()), None);
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let result = FormSchema::new(vec![
            FieldSchema::new("a", "A", FieldKind::Text),
            FieldSchema::new("a", "A again", FieldKind::Text),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn numbers_prefer_integer_representation() {
        assert_eq!(parse_number("0991234567").map(|n| n.to_string()).as_deref(), Some("991234567"));
        assert_eq!(parse_number(" 2.5 ").map(|n| n.to_string()).as_deref(), Some("2.5"));
        assert!(parse_number("inf").is_none());
        assert!(parse_number("NaN").is_none());
        assert!(parse_number("12a").is_none());
    }

    #[test]
    fn dates_must_be_real_calendar_days() {
        assert!(parse_date("2024-02-29").is_some());
        assert!(parse_date("2023-02-29").is_none());
        assert!(parse_date("29/02/2024").is_none());
    }

    #[test]
    fn field_kind_round_trips_through_name() {
        for kind in [FieldKind::Text, FieldKind::Number, FieldKind::Date, FieldKind::Email] {
            assert_eq!(kind.as_str().parse::<FieldKind>().ok(), Some(kind));
        }
        assert!("boolean".parse::<FieldKind>().is_err());
    }
}
