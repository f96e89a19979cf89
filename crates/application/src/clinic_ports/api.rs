use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use vetclinic_core::AppResult;

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Account email as typed.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body of `POST /registro`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    /// First name.
    pub nombre: String,
    /// Last name.
    pub apellido: String,
    /// Postal address.
    pub direccion: String,
    /// Phone number.
    pub telefono: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body of `POST /paciente/registro`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRequest {
    /// Pet name.
    pub nombre: String,
    /// Owner name.
    pub propietario: String,
    /// Owner email.
    pub email: String,
    /// Mobile phone.
    pub celular: serde_json::Number,
    /// Landline phone.
    pub convencional: serde_json::Number,
    /// Checkout date as `YYYY-MM-DD`.
    pub salida: String,
    /// Symptoms.
    pub sintomas: String,
    /// Identifier of the authenticated user registering the patient.
    pub id: String,
}

/// Port for the clinic backend REST API.
///
/// Failures with a backend `msg` surface as `AppError::Rejected`.
#[async_trait]
pub trait ClinicApi: Send + Sync {
    /// Authenticates and returns the full login response body.
    async fn login(&self, request: &LoginRequest) -> AppResult<Map<String, Value>>;

    /// Registers an account and returns the backend message, if any.
    async fn register(&self, request: &RegistrationRequest) -> AppResult<Option<String>>;

    /// Registers a patient on behalf of the bearer of `token`.
    async fn register_patient(&self, token: &str, request: &PatientRequest) -> AppResult<()>;
}
