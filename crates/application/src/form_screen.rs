//! Screens that plug a schema and an endpoint into the form controller.

mod login;
mod patient;
mod registration;

use async_trait::async_trait;
use vetclinic_core::AppResult;
use vetclinic_domain::{FormSchema, FormValues, Notice, View};

pub use login::LoginScreen;
pub use patient::PatientScreen;
pub use registration::{REGISTRATION_DEFAULT_MESSAGE, RegistrationScreen};

/// What the controller does after a screen's endpoint succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Leave the screen for another view.
    Navigate(View),
    /// Stay, clear every field, and show the notice.
    ResetWithNotice(Notice),
}

/// One data-entry screen: its schema, initial values and submission call.
#[async_trait]
pub trait FormScreen: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Validation schema of the screen.
    fn schema(&self) -> &FormSchema;

    /// Values the form starts with.
    fn initial_values(&self) -> FormValues {
        self.schema().empty_values()
    }

    /// Sends already-validated values to the backend.
    async fn submit(&self, values: &FormValues) -> AppResult<SubmitOutcome>;
}
