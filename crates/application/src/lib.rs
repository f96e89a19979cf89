//! Application services and ports.

#![forbid(unsafe_code)]

mod clinic_ports;
mod form_controller;
mod form_screen;
mod form_state;

pub use clinic_ports::{
    ClinicApi, LoginRequest, Navigator, PatientRequest, RegistrationRequest, SessionStore,
};
pub use form_controller::{FormController, SubmitStatus};
pub use form_screen::{
    FormScreen, LoginScreen, PatientScreen, REGISTRATION_DEFAULT_MESSAGE, RegistrationScreen,
    SubmitOutcome,
};
pub use form_state::{FormState, FormStore};
