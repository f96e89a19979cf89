//! Ports implemented by adapters outside the application layer.

mod api;
mod navigation;
mod session;

pub use api::{ClinicApi, LoginRequest, PatientRequest, RegistrationRequest};
pub use navigation::Navigator;
pub use session::SessionStore;
