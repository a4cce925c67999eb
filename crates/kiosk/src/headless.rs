//! `kiosk register`: one registration without the terminal UI.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use color_eyre::{
    eyre::{bail, eyre, WrapErr},
    Result,
};
use tracing::info;
use visitor_pass::{
    executor::run_task, FormController, FormError, QrPass, RegistrationEndpoint, TaskKind,
    PASS_TTL_SECS,
};

use crate::{cli::RegisterArgs, components::pass::NOTICE, config::Config};

/// Validate, submit and print the pass to stdout.
///
/// `passes_dir` receives the SVG when `--svg` is given without a path.
pub async fn register(config: &Config, args: RegisterArgs, passes_dir: &Path) -> Result<()> {
    let endpoint = config.http_endpoint()?;
    let pass = register_with(&endpoint, &args).await?;

    let mut out = std::io::stdout().lock();
    for line in pass.to_terminal_lines() {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "This code will expire in {PASS_TTL_SECS} seconds.")?;
    for line in NOTICE {
        writeln!(out, "{line}")?;
    }

    if let Some(target) = &args.svg {
        let path = svg_path(target.as_deref(), passes_dir);
        std::fs::write(&path, pass.to_svg(config.pass.qr_size))
            .wrap_err_with(|| format!("writing pass image to {}", path.display()))?;
        info!(path = %path.display(), "pass image written");
    }
    Ok(())
}

fn svg_path(target: Option<&Path>, passes_dir: &Path) -> PathBuf {
    match target {
        Some(path) => path.to_path_buf(),
        None => {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            passes_dir.join(format!("pass-{secs}.svg"))
        }
    }
}

/// Drive a fresh controller through one submission against `endpoint`.
pub async fn register_with<E: RegistrationEndpoint>(
    endpoint: &E,
    args: &RegisterArgs,
) -> Result<QrPass> {
    let mut form = FormController::new();
    for (field, value) in args.fields() {
        form.update_field(field, value)
            .wrap_err_with(|| format!("invalid {}", field.label()))?;
    }

    let payload = form
        .submit()?
        .ok_or_else(|| eyre!("a registration is already in flight"))?;
    let result = run_task(endpoint, &TaskKind::Register(payload)).await;

    if !form.finish_submission(result) {
        match form.error() {
            Some(FormError::TransportFailure { reason }) => {
                bail!("{} ({reason})", form.error_message())
            }
            _ => bail!("{}", form.error_message()),
        }
    }

    let payload = form
        .pass_payload()
        .ok_or_else(|| eyre!("registration accepted but no pass is visible"))?;
    Ok(QrPass::encode(&payload)?)
}
