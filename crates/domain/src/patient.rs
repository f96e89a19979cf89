//! Patient intake form: schema, existing records, and pre-population.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vetclinic_core::AppResult;

use crate::schema::{DATE_FORMAT, parse_date};
use crate::{FieldKind, FieldRule, FieldSchema, FormSchema, FormValues};

/// Message reported when a pet name contains anything but ASCII letters.
pub const PET_NAME_LETTERS_ONLY_MESSAGE: &str =
    "El nombre de la mascota solo debe contener letras";

static LETTERS_ONLY: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$"));

/// Field names of the patient form.
pub mod patient_fields {
    /// Pet name.
    pub const NOMBRE: &str = "nombre";
    /// Owner name.
    pub const PROPIETARIO: &str = "propietario";
    /// Owner email.
    pub const EMAIL: &str = "email";
    /// Mobile phone.
    pub const CELULAR: &str = "celular";
    /// Landline phone.
    pub const CONVENCIONAL: &str = "convencional";
    /// Checkout date.
    pub const SALIDA: &str = "salida";
    /// Symptoms.
    pub const SINTOMAS: &str = "sintomas";
}

/// Returns whether a pet name is one or more ASCII letters.
#[must_use]
pub fn is_valid_pet_name(value: &str) -> bool {
    LETTERS_ONLY
        .as_ref()
        .map(|pattern| pattern.is_match(value))
        .unwrap_or(false)
}

/// Schema for the patient create/update form.
pub fn patient_schema() -> AppResult<FormSchema> {
    use patient_fields::*;

    FormSchema::new(vec![
        FieldSchema::new(NOMBRE, "Nombre de la mascota", FieldKind::Text)
            .required("El nombre de la mascota es obligatorio")
            .rule(FieldRule::new(
                "nombreValido",
                PET_NAME_LETTERS_ONLY_MESSAGE,
                is_valid_pet_name,
            )),
        FieldSchema::new(PROPIETARIO, "Nombre del propietario", FieldKind::Text)
            .required("El nombre del propietario es obligatorio"),
        FieldSchema::new(EMAIL, "Email", FieldKind::Email)
            .required("El correo electrónico es obligatorio")
            .invalid("Correo electrónico no válido"),
        FieldSchema::new(CELULAR, "Celular", FieldKind::Number)
            .required("El número de celular es obligatorio")
            .invalid("El número de celular debe ser numérico"),
        FieldSchema::new(CONVENCIONAL, "Convencional", FieldKind::Number)
            .required("El número convencional es obligatorio")
            .invalid("El número convencional debe ser numérico"),
        FieldSchema::new(SALIDA, "Fecha de salida", FieldKind::Date)
            .required("La fecha de salida es obligatoria")
            .invalid("La fecha de salida no es válida"),
        FieldSchema::new(SINTOMAS, "Síntomas", FieldKind::Text)
            .required("Los síntomas son obligatorios"),
    ])
}

/// Patient as stored by the backend, used to pre-populate an edit form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Backend identifier; absent for records that were never saved.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Pet name.
    #[serde(default)]
    pub nombre: String,
    /// Owner name.
    #[serde(default)]
    pub propietario: String,
    /// Owner email.
    #[serde(default)]
    pub email: String,
    /// Mobile phone, stored as a number or a string.
    #[serde(default)]
    pub celular: Value,
    /// Landline phone, stored as a number or a string.
    #[serde(default)]
    pub convencional: Value,
    /// Stored checkout date or timestamp.
    #[serde(default)]
    pub salida: Option<String>,
    /// Symptoms.
    #[serde(default)]
    pub sintomas: String,
}

impl PatientRecord {
    /// Returns whether this record already exists on the backend.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    /// Returns the form values this record pre-populates.
    #[must_use]
    pub fn to_form_values(&self) -> FormValues {
        use patient_fields::*;

        [
            (NOMBRE, self.nombre.clone()),
            (PROPIETARIO, self.propietario.clone()),
            (EMAIL, self.email.clone()),
            (CELULAR, scalar_text(&self.celular)),
            (CONVENCIONAL, scalar_text(&self.convencional)),
            (
                SALIDA,
                self.salida
                    .as_deref()
                    .and_then(format_checkout_date)
                    .unwrap_or_default(),
            ),
            (SINTOMAS, self.sintomas.clone()),
        ]
        .into_iter()
        .collect()
    }
}

/// Returns the submit label for the patient form.
#[must_use]
pub fn patient_submit_label(record: Option<&PatientRecord>) -> &'static str {
    if record.is_some_and(PatientRecord::is_persisted) {
        "Actualizar paciente"
    } else {
        "Registrar paciente"
    }
}

/// Formats a stored date as the `YYYY-MM-DD` of its UTC calendar day.
///
/// Accepts RFC 3339 timestamps, naive timestamps (read as UTC) and plain dates.
#[must_use]
pub fn format_checkout_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let day = DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|timestamp| timestamp.date())
                .ok()
        })
        .or_else(|| parse_date(raw))?;

    Some(day.format(DATE_FORMAT).to_string())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}
