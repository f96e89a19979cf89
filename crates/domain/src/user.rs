//! Account screens: email rules plus the login and registration schemas.

use serde::{Deserialize, Serialize};
use vetclinic_core::{AppError, AppResult};

use crate::{FieldKind, FieldSchema, FormSchema};

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs structural validation: no whitespace, exactly one `@`, local
    /// part and domain are non-empty, domain has a `.` with non-empty labels.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(
                "email address must not contain whitespace".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return Err(AppError::Validation(
                "email domain must contain at least one '.' between non-empty labels".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Field names of the login form.
pub mod login_fields {
    /// Account email.
    pub const EMAIL: &str = "email";
    /// Account password.
    pub const PASSWORD: &str = "password";
}

/// Field names of the registration form.
pub mod registration_fields {
    /// First name.
    pub const NOMBRE: &str = "nombre";
    /// Last name.
    pub const APELLIDO: &str = "apellido";
    /// Postal address.
    pub const DIRECCION: &str = "direccion";
    /// Phone number.
    pub const TELEFONO: &str = "telefono";
    /// Account email.
    pub const EMAIL: &str = "email";
    /// Account password.
    pub const PASSWORD: &str = "password";
}

/// Schema for the login screen: both fields required, no format checks.
pub fn login_schema() -> AppResult<FormSchema> {
    FormSchema::new(vec![
        FieldSchema::new(login_fields::EMAIL, "Email", FieldKind::Text)
            .required("El email es obligatorio"),
        FieldSchema::new(login_fields::PASSWORD, "Contraseña", FieldKind::Text)
            .required("La contraseña es obligatoria"),
    ])
}

/// Schema for the registration screen.
///
/// Only the phone number is required here, unlike the patient form.
pub fn registration_schema() -> AppResult<FormSchema> {
    FormSchema::new(vec![
        FieldSchema::new(registration_fields::NOMBRE, "Nombre", FieldKind::Text),
        FieldSchema::new(registration_fields::APELLIDO, "Apellido", FieldKind::Text),
        FieldSchema::new(registration_fields::DIRECCION, "Dirección", FieldKind::Text),
        FieldSchema::new(registration_fields::TELEFONO, "Teléfono", FieldKind::Text)
            .required("El teléfono es obligatorio"),
        FieldSchema::new(registration_fields::EMAIL, "Email", FieldKind::Text),
        FieldSchema::new(registration_fields::PASSWORD, "Contraseña", FieldKind::Text),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormValues;

    #[test]
    fn valid_email_is_accepted() {
        let email = EmailAddress::new("USER@Example.COM");
        assert_eq!(
            email.map(String::from).ok().as_deref(),
            Some("user@example.com")
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
    }

    #[test]
    fn email_with_two_at_signs_is_rejected() {
        assert!(EmailAddress::new("a@b@example.com").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@nodot").is_err());
        assert!(EmailAddress::new("user@example.").is_err());
    }

    #[test]
    fn email_with_inner_space_is_rejected() {
        assert!(EmailAddress::new("us er@example.com").is_err());
    }

    #[test]
    fn empty_email_is_rejected() {
        assert!(EmailAddress::new("").is_err());
    }

    #[test]
    fn login_requires_both_fields_without_format_check() {
        let Ok(schema) = login_schema() else {
            panic!("login schema should build");
        };

        let errors = schema.validate(&schema.empty_values());
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("El email es obligatorio")
        );
        assert_eq!(
            errors.get("password").map(String::as_str),
            Some("La contraseña es obligatoria")
        );

        let values: FormValues = [("email", "not-an-email"), ("password", "x")]
            .into_iter()
            .collect();
        assert!(schema.validate(&values).is_empty());
    }

    #[test]
    fn registration_requires_only_phone() {
        let Ok(schema) = registration_schema() else {
            panic!("registration schema should build");
        };

        let errors = schema.validate(&schema.empty_values());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("telefono").map(String::as_str),
            Some("El teléfono es obligatorio")
        );
    }
}
