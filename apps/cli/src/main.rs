//! Vet clinic terminal client.

#![forbid(unsafe_code)]

mod cli_config;
mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use vetclinic_application::{
    ClinicApi, FormController, FormScreen, LoginScreen, Navigator, PatientScreen,
    RegistrationScreen, SessionStore, SubmitStatus,
};
use vetclinic_core::{AppError, AppResult};
use vetclinic_domain::PatientRecord;
use vetclinic_infrastructure::{FileSessionStore, HttpClinicApi};

use crate::cli_config::{CliConfig, init_tracing};
use crate::terminal::{TerminalNavigator, run_form};

#[derive(Debug, Parser)]
#[command(name = "vetclinic", version, about = "Veterinary clinic client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login,
    /// Create a new account.
    Register,
    /// Register a patient, or update one loaded from a JSON record.
    Patient {
        /// Patient record to edit, as returned by the backend.
        #[arg(long, value_name = "FILE")]
        record: Option<PathBuf>,
    },
    /// Forget the stored session.
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = CliConfig::load()?;
    let sessions: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_file));

    if matches!(cli.command, Command::Logout) {
        sessions.clear().await?;
        info!(path = %config.session_file.display(), "session cleared");
        return Ok(());
    }

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;
    let api: Arc<dyn ClinicApi> = Arc::new(HttpClinicApi::new(http_client, &config.backend_url));

    let (screen, submit_label): (Arc<dyn FormScreen>, &str) = match cli.command {
        Command::Login => {
            let screen: Arc<dyn FormScreen> = Arc::new(LoginScreen::new(api, sessions)?);
            (screen, "Iniciar sesión")
        }
        Command::Register => {
            let screen: Arc<dyn FormScreen> = Arc::new(RegistrationScreen::new(api)?);
            (screen, "Registrar")
        }
        Command::Patient { record } => {
            let record = match record {
                Some(path) => Some(load_record(&path).await?),
                None => None,
            };
            let patient_screen = PatientScreen::new(api, sessions, record)?;
            let label = patient_screen.submit_label();
            let screen: Arc<dyn FormScreen> = Arc::new(patient_screen);
            (screen, label)
        }
        Command::Logout => return Ok(()),
    };

    info!(
        backend = %config.backend_url,
        screen = screen.name(),
        "vetclinic client started"
    );

    let navigator: Arc<dyn Navigator> = Arc::new(TerminalNavigator);
    let controller = FormController::new(screen, navigator);
    let status = run_form(&controller, submit_label).await?;
    submission_result(status)
}

fn submission_result(status: SubmitStatus) -> AppResult<()> {
    match status {
        SubmitStatus::Navigated(_) | SubmitStatus::Completed => Ok(()),
        status => Err(AppError::Validation(format!(
            "form was not submitted ({status:?})"
        ))),
    }
}

async fn load_record(path: &Path) -> AppResult<PatientRecord> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Validation(format!(
            "failed to read patient record '{}': {error}",
            path.display()
        ))
    })?;

    serde_json::from_str(&raw).map_err(|error| {
        AppError::Validation(format!(
            "invalid patient record '{}': {error}",
            path.display()
        ))
    })
}
