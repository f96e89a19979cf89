//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod notice;
mod patient;
mod schema;
mod user;
mod view;

pub use notice::{NOTICE_DISPLAY_DURATION, Notice};
pub use patient::{
    PET_NAME_LETTERS_ONLY_MESSAGE, PatientRecord, format_checkout_date, is_valid_pet_name,
    patient_fields, patient_schema, patient_submit_label,
};
pub use schema::{
    DATE_FORMAT, FieldErrors, FieldKind, FieldRule, FieldSchema, FormSchema, FormValues,
    parse_date, parse_number,
};
pub use user::{
    EmailAddress, login_fields, login_schema, registration_fields, registration_schema,
};
pub use view::View;
