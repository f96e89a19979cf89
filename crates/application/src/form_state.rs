//! Observable per-screen form state.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use vetclinic_domain::{FieldErrors, FormValues, Notice};

/// Snapshot of one form session.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: FormValues,
    touched: BTreeSet<String>,
    errors: FieldErrors,
    is_submitting: bool,
    notice: Option<Notice>,
    notice_epoch: u64,
}

impl FormState {
    /// Creates a fresh session holding the given values.
    #[must_use]
    pub fn new(values: FormValues) -> Self {
        Self {
            values,
            touched: BTreeSet::new(),
            errors: FieldErrors::new(),
            is_submitting: false,
            notice: None,
            notice_epoch: 0,
        }
    }

    /// Returns the current field values.
    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Returns the fields the user has interacted with.
    #[must_use]
    pub fn touched(&self) -> &BTreeSet<String> {
        &self.touched
    }

    /// Returns whether the user has interacted with a field.
    #[must_use]
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Returns the current validation errors.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the error a renderer should show for a field: only once touched.
    #[must_use]
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if !self.is_touched(name) {
            return None;
        }

        self.errors.get(name).map(String::as_str)
    }

    /// Returns whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Returns the submission notice currently displayed.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub(crate) fn set_value(&mut self, name: &str, value: String) {
        self.values.set(name, value);
    }

    pub(crate) fn touch(&mut self, name: impl Into<String>) {
        self.touched.insert(name.into());
    }

    pub(crate) fn set_field_error(&mut self, name: &str, error: Option<String>) {
        match error {
            Some(message) => {
                self.errors.insert(name.to_owned(), message);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }

    pub(crate) fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub(crate) fn set_submitting(&mut self, is_submitting: bool) {
        self.is_submitting = is_submitting;
    }

    pub(crate) fn reset_values(&mut self, values: FormValues) {
        self.values = values;
        self.touched.clear();
        self.errors.clear();
    }

    /// Shows a notice and returns the epoch its expiry timer must match.
    pub(crate) fn post_notice(&mut self, notice: Notice) -> u64 {
        self.notice_epoch = self.notice_epoch.wrapping_add(1);
        self.notice = Some(notice);
        self.notice_epoch
    }

    /// Clears the notice if it is still the one posted at `epoch`.
    pub(crate) fn expire_notice(&mut self, epoch: u64) -> bool {
        if self.notice_epoch != epoch || self.notice.is_none() {
            return false;
        }

        self.notice = None;
        true
    }
}

/// Shared state container that notifies subscribers on every change.
#[derive(Debug, Clone)]
pub struct FormStore {
    sender: Arc<watch::Sender<FormState>>,
}

impl FormStore {
    /// Creates a store holding the initial state.
    #[must_use]
    pub fn new(state: FormState) -> Self {
        let (sender, _receiver) = watch::channel(state);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FormState {
        self.sender.borrow().clone()
    }

    /// Returns a receiver woken after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.sender.subscribe()
    }

    /// Mutates the state and notifies subscribers.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut FormState)) {
        self.sender.send_modify(mutate);
    }

    /// Mutates the state, notifying subscribers only when `mutate` returns true.
    pub(crate) fn update_if(&self, mutate: impl FnOnce(&mut FormState) -> bool) -> bool {
        self.sender.send_if_modified(mutate)
    }
}
