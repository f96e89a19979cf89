//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_session_store;
mod http_clinic_api;
mod in_memory_session_store;

pub use file_session_store::FileSessionStore;
pub use http_clinic_api::HttpClinicApi;
pub use in_memory_session_store::InMemorySessionStore;
