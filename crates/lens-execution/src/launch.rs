//! Client start-up: logging and session construction.

use crate::tracing_layer::DiagnosticsLayer;
use anyhow::Context;
use lens_application::LensApp;
use lens_infrastructure::{ConfigService, LensPaths};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. When `diagnostics` is
/// given, client events are also forwarded to it.
pub fn init_tracing(default_filter: &str, diagnostics: Option<DiagnosticsLayer>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter: {}", default_filter))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(diagnostics)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(())
}

/// Loads configuration and builds a ready-to-use session, then pre-warms the
/// bearer token.
pub async fn launch(paths: LensPaths) -> anyhow::Result<LensApp> {
    let config = ConfigService::new(paths.clone())
        .load()
        .context("failed to load client configuration")?;
    tracing::info!(
        base_url = %config.api.base_url,
        access_enabled = config.access.enabled,
        "[Launch] Configuration loaded"
    );

    let app = LensApp::from_config(&config, &paths).context("failed to build session")?;
    app.on_view_load().await;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn invalid_default_filter_is_reported() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(init_tracing("lens_core=bogus_level", None).is_err());
    }

    #[tokio::test]
    async fn malformed_config_fails_launch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "api = 42").unwrap();

        let err = launch(LensPaths::new(Some(dir.path())))
            .await
            .err()
            .expect("launch must fail");

        assert!(format!("{:#}", err).contains("failed to load client configuration"));
    }

    #[tokio::test]
    async fn launch_with_unreachable_backend_still_builds_session() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[api]\nbase_url = \"http://127.0.0.1:9\"\n\n[access]\nenabled = true\n",
        )
        .unwrap();

        let app = launch(LensPaths::new(Some(dir.path()))).await.unwrap();

        assert!(!app.gate().is_unlocked());
        assert!(!app.controller().is_loading());
    }
}
