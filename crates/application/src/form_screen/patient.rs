use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use vetclinic_core::{AppError, AppResult};
use vetclinic_domain::{
    DATE_FORMAT, FormSchema, FormValues, PatientRecord, View, patient_fields, patient_schema,
    patient_submit_label,
};

use crate::{ClinicApi, PatientRequest, SessionStore};

use super::{FormScreen, SubmitOutcome};

/// Patient intake screen, either blank or pre-populated from a stored record.
pub struct PatientScreen {
    schema: FormSchema,
    api: Arc<dyn ClinicApi>,
    sessions: Arc<dyn SessionStore>,
    record: Option<PatientRecord>,
}

impl PatientScreen {
    /// Creates the patient screen; pass a record to edit it.
    pub fn new(
        api: Arc<dyn ClinicApi>,
        sessions: Arc<dyn SessionStore>,
        record: Option<PatientRecord>,
    ) -> AppResult<Self> {
        Ok(Self {
            schema: patient_schema()?,
            api,
            sessions,
            record,
        })
    }

    /// Returns the label of the submit action.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        patient_submit_label(self.record.as_ref())
    }

    fn build_request(values: &FormValues, user_id: &str) -> AppResult<PatientRequest> {
        use patient_fields::*;

        Ok(PatientRequest {
            nombre: values.get(NOMBRE).to_owned(),
            propietario: values.get(PROPIETARIO).to_owned(),
            email: values.get(EMAIL).trim().to_owned(),
            celular: values.number(CELULAR)?,
            convencional: values.number(CONVENCIONAL)?,
            salida: values.date(SALIDA)?.format(DATE_FORMAT).to_string(),
            sintomas: values.get(SINTOMAS).to_owned(),
            id: user_id.to_owned(),
        })
    }
}

#[async_trait]
impl FormScreen for PatientScreen {
    fn name(&self) -> &'static str {
        "patient"
    }

    fn schema(&self) -> &FormSchema {
        &self.schema
    }

    fn initial_values(&self) -> FormValues {
        self.record
            .as_ref()
            .map(PatientRecord::to_form_values)
            .unwrap_or_else(|| self.schema.empty_values())
    }

    async fn submit(&self, values: &FormValues) -> AppResult<SubmitOutcome> {
        let session = self
            .sessions
            .get()
            .await?
            .ok_or_else(|| AppError::Unauthorized("no active session".to_owned()))?;
        let user_id = session.user_id().ok_or_else(|| {
            AppError::Unauthorized("session does not carry a user id".to_owned())
        })?;

        let request = Self::build_request(values, user_id)?;
        debug!(user_id = %user_id, "registering patient");
        self.api.register_patient(session.token(), &request).await?;

        Ok(SubmitOutcome::Navigate(View::PatientList))
    }
}
