use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;
use vetclinic_application::{ClinicApi, LoginRequest, PatientRequest, RegistrationRequest};
use vetclinic_core::{AppError, AppResult};

#[cfg(test)]
mod tests;

/// Body shape the backend uses for messages on success and failure.
#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default)]
    msg: Option<String>,
}

/// reqwest-based client for the clinic backend REST API.
pub struct HttpClinicApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpClinicApi {
    /// Creates a client rooted at the backend base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http_client,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B>(
        &self,
        path: &str,
        body: &B,
        bearer_token: Option<&str>,
    ) -> AppResult<reqwest::Response>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut builder = self.http_client.post(self.endpoint(path)).json(body);
        if let Some(token) = bearer_token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = builder.send().await.map_err(|error| {
            AppError::Transport(format!("failed to call backend endpoint {path}: {error}"))
        })?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<MessageBody>()
            .await
            .ok()
            .and_then(|body| body.msg)
            .filter(|message| !message.trim().is_empty());

        Err(match message {
            Some(message) => AppError::Rejected(message),
            None => AppError::Transport(format!(
                "backend endpoint {path} returned status {}",
                status.as_u16()
            )),
        })
    }
}

#[async_trait]
impl ClinicApi for HttpClinicApi {
    async fn login(&self, request: &LoginRequest) -> AppResult<Map<String, Value>> {
        self.post_json("/login", request, None)
            .await?
            .json::<Map<String, Value>>()
            .await
            .map_err(|error| {
                AppError::Transport(format!("failed to parse login response body: {error}"))
            })
    }

    async fn register(&self, request: &RegistrationRequest) -> AppResult<Option<String>> {
        let body = self
            .post_json("/registro", request, None)
            .await?
            .json::<MessageBody>()
            .await
            .unwrap_or_default();

        Ok(body.msg)
    }

    async fn register_patient(&self, token: &str, request: &PatientRequest) -> AppResult<()> {
        self.post_json("/paciente/registro", request, Some(token))
            .await
            .map(|_| ())
    }
}
