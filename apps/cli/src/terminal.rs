//! Line-oriented rendering of a form controller on stdin/stdout.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;
use vetclinic_application::{FormController, FormState, Navigator, SubmitStatus};
use vetclinic_core::{AppError, AppResult};
use vetclinic_domain::{FieldSchema, View};

type InputLines = Lines<BufReader<Stdin>>;

/// Navigator that reports route changes on stdout.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, view: View) {
        println!("-> {} ({view})", view.path());
    }
}

/// Prompts for every field, then submits until the form succeeds or the user gives up.
pub async fn run_form(controller: &FormController, submit_label: &str) -> AppResult<SubmitStatus> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        for field in controller.schema().fields() {
            prompt_field(controller, field, &mut lines).await?;
        }

        println!("{submit_label}...");
        let status = controller.submit().await;
        render_notice(&controller.state());
        debug!(?status, "form submission finished");

        match status {
            SubmitStatus::Failed => {
                if !confirm("Reintentar? [s/N] ", &mut lines).await? {
                    return Ok(status);
                }
            }
            SubmitStatus::Invalid => render_errors(controller),
            other => return Ok(other),
        }
    }
}

async fn prompt_field(
    controller: &FormController,
    field: &FieldSchema,
    lines: &mut InputLines,
) -> AppResult<()> {
    loop {
        let current = controller.state().values().get(field.name()).to_owned();
        let marker = if field.is_required() { "*" } else { "" };
        let prompt = if current.is_empty() {
            format!("{}{marker}: ", field.label())
        } else {
            format!("{}{marker} [{current}]: ", field.label())
        };

        let input = read_line(&prompt, lines).await?;
        if !(input.is_empty() && !current.is_empty()) {
            controller.set_field(field.name(), input);
        }
        controller.touch_field(field.name());

        match controller.state().visible_error(field.name()) {
            Some(error) => eprintln!("  {error}"),
            None => return Ok(()),
        }
    }
}

fn render_notice(state: &FormState) {
    if let Some(notice) = state.notice() {
        println!("{notice}");
    }
}

fn render_errors(controller: &FormController) {
    let state = controller.state();
    for field in controller.schema().fields() {
        if let Some(error) = state.visible_error(field.name()) {
            eprintln!("  {}: {error}", field.label());
        }
    }
}

async fn confirm(prompt: &str, lines: &mut InputLines) -> AppResult<bool> {
    let answer = read_line(prompt, lines).await?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes"))
}

async fn read_line(prompt: &str, lines: &mut InputLines) -> AppResult<String> {
    print!("{prompt}");
    std::io::stdout()
        .flush()
        .map_err(|error| AppError::Internal(format!("failed to flush stdout: {error}")))?;

    lines
        .next_line()
        .await
        .map_err(|error| AppError::Internal(format!("failed to read stdin: {error}")))?
        .ok_or_else(|| AppError::Validation("input closed before the form was completed".to_owned()))
}
