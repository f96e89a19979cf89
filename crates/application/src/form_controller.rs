//! Data-entry form controller: field binding, validation and submission.
//!
//! One controller backs one mounted screen. All state lives in a [`FormStore`]
//! so renderers can subscribe to changes instead of polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use vetclinic_domain::{FieldErrors, FormSchema, FormValues, NOTICE_DISPLAY_DURATION, Notice, View};

use crate::{FormScreen, FormState, FormStore, Navigator, SubmitOutcome};


/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Validation failed; nothing was sent.
    Invalid,
    /// Another submission is still in flight; nothing was sent.
    AlreadySubmitting,
    /// The backend accepted the submission and the user was moved on.
    Navigated(View),
    /// The backend accepted the submission and the form was reset.
    Completed,
    /// The backend call failed; a failure notice is shown.
    Failed,
}

enum SubmitStart {
    Ready(FormValues),
    Invalid,
    Busy,
}

/// Controller for one form session.
pub struct FormController {
    screen: Arc<dyn FormScreen>,
    navigator: Arc<dyn Navigator>,
    store: FormStore,
    notice_duration: Duration,
}

impl FormController {
    /// Mounts a screen with its initial values.
    #[must_use]
    pub fn new(screen: Arc<dyn FormScreen>, navigator: Arc<dyn Navigator>) -> Self {
        let store = FormStore::new(FormState::new(screen.initial_values()));
        Self {
            screen,
            navigator,
            store,
            notice_duration: NOTICE_DISPLAY_DURATION,
        }
    }

    /// Overrides how long notices stay visible.
    #[must_use]
    pub fn with_notice_duration(mut self, notice_duration: Duration) -> Self {
        self.notice_duration = notice_duration;
        self
    }

    /// Returns the schema of the mounted screen.
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        self.screen.schema()
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.store.snapshot()
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.store.subscribe()
    }

    /// Updates a field value, revalidating it when already touched.
    pub fn set_field(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let schema = self.screen.schema();
        self.store.update(|state| {
            state.set_value(name, value);
            if state.is_touched(name) {
                let error = schema.validate_field(name, state.values());
                state.set_field_error(name, error);
            }
        });
    }

    /// Marks a field as touched and validates it.
    pub fn touch_field(&self, name: &str) {
        let schema = self.screen.schema();
        self.store.update(|state| {
            state.touch(name);
            let error = schema.validate_field(name, state.values());
            state.set_field_error(name, error);
        });
    }

    /// Validates every field, stores the result and returns it.
    pub fn validate_all(&self) -> FieldErrors {
        let schema = self.screen.schema();
        let mut errors = FieldErrors::new();
        self.store.update(|state| {
            errors = schema.validate(state.values());
            state.set_errors(errors.clone());
        });
        errors
    }

    /// Restores the screen's initial values and forgets touched fields.
    pub fn reset(&self) {
        let values = self.screen.initial_values();
        self.store.update(|state| state.reset_values(values));
    }

    /// Validates and submits the form.
    ///
    /// A call made while another submission is in flight returns
    /// [`SubmitStatus::AlreadySubmitting`] without reaching the backend.
    pub async fn submit(&self) -> SubmitStatus {
        let schema = self.screen.schema();
        let mut start = SubmitStart::Busy;
        self.store.update_if(|state| {
            if state.is_submitting() {
                return false;
            }

            let errors = schema.validate(state.values());
            if errors.is_empty() {
                state.set_errors(errors);
                state.set_submitting(true);
                start = SubmitStart::Ready(state.values().clone());
            } else {
                for name in schema.field_names() {
                    state.touch(name);
                }
                state.set_errors(errors);
                start = SubmitStart::Invalid;
            }
            true
        });

        let values = match start {
            SubmitStart::Ready(values) => values,
            SubmitStart::Invalid => {
                debug!(screen = self.screen.name(), "form submission blocked by validation");
                return SubmitStatus::Invalid;
            }
            SubmitStart::Busy => {
                debug!(screen = self.screen.name(), "form submission already in flight");
                return SubmitStatus::AlreadySubmitting;
            }
        };

        let submission = Submission::begin(&self.store, self.screen.name());
        info!(screen = self.screen.name(), "submitting form");
        match self.screen.submit(&values).await {
            Ok(SubmitOutcome::Navigate(view)) => {
                submission.finish(|_| {});
                info!(screen = self.screen.name(), view = %view, "form submitted");
                self.navigator.navigate(view);
                SubmitStatus::Navigated(view)
            }
            Ok(SubmitOutcome::ResetWithNotice(notice)) => {
                let empty = schema.empty_values();
                info!(screen = self.screen.name(), "form submitted and reset");
                self.show_notice(submission, notice, Some(empty));
                SubmitStatus::Completed
            }
            Err(error) => {
                warn!(
                    screen = self.screen.name(),
                    error = %error,
                    "form submission failed"
                );
                self.show_notice(submission, Notice::failure(error.user_message()), None);
                SubmitStatus::Failed
            }
        }
    }

    fn show_notice(&self, submission: Submission, notice: Notice, reset: Option<FormValues>) {
        let mut epoch = 0;
        submission.finish(|state| {
            if let Some(values) = reset {
                state.reset_values(values);
            }
            epoch = state.post_notice(notice);
        });

        let store = self.store.clone();
        let notice_duration = self.notice_duration;
        tokio::spawn(async move {
            tokio::time::sleep(notice_duration).await;
            store.update_if(|state| state.expire_notice(epoch));
        });
    }
}

/// In-flight submission. Clears `is_submitting` when finished or when the
/// submitting future is dropped before the backend answered.
struct Submission {
    store: Option<FormStore>,
    screen: &'static str,
}

impl Submission {
    fn begin(store: &FormStore, screen: &'static str) -> Self {
        Self {
            store: Some(store.clone()),
            screen,
        }
    }

    /// Ends the submission, applying `mutate` in the same state update.
    fn finish(mut self, mutate: impl FnOnce(&mut FormState)) {
        if let Some(store) = self.store.take() {
            store.update(|state| {
                state.set_submitting(false);
                mutate(state);
            });
        }
    }
}

impl Drop for Submission {
    fn drop(&mut self) {
        if let Some(store) = self.store.take() {
            debug!(screen = self.screen, "form submission abandoned");
            store.update(|state| state.set_submitting(false));
        }
    }
}
