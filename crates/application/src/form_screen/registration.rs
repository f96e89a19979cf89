use std::sync::Arc;

use async_trait::async_trait;
use vetclinic_core::AppResult;
use vetclinic_domain::{FormSchema, FormValues, Notice, registration_fields, registration_schema};

use crate::{ClinicApi, RegistrationRequest};

use super::{FormScreen, SubmitOutcome};

/// Notice text used when the backend confirms registration without a message.
pub const REGISTRATION_DEFAULT_MESSAGE: &str = "Registro completado";

/// Account registration screen: clears itself and confirms on success.
pub struct RegistrationScreen {
    schema: FormSchema,
    api: Arc<dyn ClinicApi>,
}

impl RegistrationScreen {
    /// Creates the registration screen.
    pub fn new(api: Arc<dyn ClinicApi>) -> AppResult<Self> {
        Ok(Self {
            schema: registration_schema()?,
            api,
        })
    }
}

#[async_trait]
impl FormScreen for RegistrationScreen {
    fn name(&self) -> &'static str {
        "registration"
    }

    fn schema(&self) -> &FormSchema {
        &self.schema
    }

    async fn submit(&self, values: &FormValues) -> AppResult<SubmitOutcome> {
        use registration_fields::*;

        let request = RegistrationRequest {
            nombre: values.get(NOMBRE).to_owned(),
            apellido: values.get(APELLIDO).to_owned(),
            direccion: values.get(DIRECCION).to_owned(),
            telefono: values.get(TELEFONO).to_owned(),
            email: values.get(EMAIL).to_owned(),
            password: values.get(PASSWORD).to_owned(),
        };

        let message = self
            .api
            .register(&request)
            .await?
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| REGISTRATION_DEFAULT_MESSAGE.to_owned());

        Ok(SubmitOutcome::ResetWithNotice(Notice::success(message)))
    }
}
