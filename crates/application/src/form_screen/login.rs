use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use vetclinic_core::{AppResult, Session};
use vetclinic_domain::{FormSchema, FormValues, View, login_fields, login_schema};

use crate::{ClinicApi, LoginRequest, SessionStore};

use super::{FormScreen, SubmitOutcome};

/// Login screen: stores the returned session and opens the dashboard.
pub struct LoginScreen {
    schema: FormSchema,
    api: Arc<dyn ClinicApi>,
    sessions: Arc<dyn SessionStore>,
}

impl LoginScreen {
    /// Creates the login screen.
    pub fn new(api: Arc<dyn ClinicApi>, sessions: Arc<dyn SessionStore>) -> AppResult<Self> {
        Ok(Self {
            schema: login_schema()?,
            api,
            sessions,
        })
    }
}

#[async_trait]
impl FormScreen for LoginScreen {
    fn name(&self) -> &'static str {
        "login"
    }

    fn schema(&self) -> &FormSchema {
        &self.schema
    }

    async fn submit(&self, values: &FormValues) -> AppResult<SubmitOutcome> {
        let request = LoginRequest {
            email: values.get(login_fields::EMAIL).to_owned(),
            password: values.get(login_fields::PASSWORD).to_owned(),
        };

        let body = self.api.login(&request).await?;
        let session = Session::from_login_response(body)?;
        let user_id = session.user_id().map(str::to_owned);
        self.sessions.set(session).await?;

        info!(user_id = ?user_id, "session established");
        Ok(SubmitOutcome::Navigate(View::Dashboard))
    }
}
