//! Wiring for one page session.

use crate::access_gate::AccessGate;
use crate::session::{AnalysisSessionController, SessionContext};
use crate::token_lifecycle::TokenLifecycleManager;
use lens_core::{
    AnalysisService, Clock, LensConfig, PasswordVerifier, Result, SystemClock, TokenProvider,
    TokenStore,
};
use lens_infrastructure::{FileTokenStore, LensPaths};
use lens_interaction::BackendClient;
use std::sync::Arc;

/// The backend collaborators a session needs.
pub struct Services {
    pub store: Arc<dyn TokenStore>,
    pub provider: Arc<dyn TokenProvider>,
    pub verifier: Arc<dyn PasswordVerifier>,
    pub analysis: Arc<dyn AnalysisService>,
    pub clock: Arc<dyn Clock>,
}

/// A fully wired client session: context, gate, token manager and controller.
pub struct LensApp {
    context: Arc<SessionContext>,
    gate: AccessGate,
    tokens: Arc<TokenLifecycleManager>,
    controller: AnalysisSessionController,
}

impl LensApp {
    /// Builds a session against the HTTP backend described by `config`,
    /// persisting tokens under `paths`.
    pub fn from_config(config: &LensConfig, paths: &LensPaths) -> Result<Self> {
        let token_file = paths.token_file()?;
        tracing::debug!("[LensApp] Token slot at {}", token_file.display());

        let backend = Arc::new(BackendClient::new(&config.api));
        Ok(Self::with_services(
            Services {
                store: Arc::new(FileTokenStore::new(token_file)),
                provider: backend.clone(),
                verifier: backend.clone(),
                analysis: backend,
                clock: Arc::new(SystemClock),
            },
            config.access.enabled,
        ))
    }

    pub fn with_services(services: Services, access_required: bool) -> Self {
        let context = Arc::new(SessionContext::new(services.store, access_required));
        let tokens = Arc::new(TokenLifecycleManager::new(
            context.token_store(),
            services.provider,
            services.clock,
        ));
        let gate = AccessGate::new(context.clone(), services.verifier);
        let controller =
            AnalysisSessionController::new(context.clone(), tokens.clone(), services.analysis);

        tracing::info!(access_required, "[LensApp] Session initialized");
        Self {
            context,
            gate,
            tokens,
            controller,
        }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn tokens(&self) -> &Arc<TokenLifecycleManager> {
        &self.tokens
    }

    pub fn controller(&self) -> &AnalysisSessionController {
        &self.controller
    }

    /// Page-load hook.
    pub async fn on_view_load(&self) {
        self.controller.on_view_load().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SubmitOutcome, View};
    use crate::test_support::{
        MockAnalysisService, MockPasswordVerifier, MockTokenProvider, NOW, jwt,
    };
    use lens_core::{FixedClock, IdeaDraft, ValidationError};
    use lens_infrastructure::InMemoryTokenStore;
    use tempfile::TempDir;

    fn services(
        store: Arc<dyn TokenStore>,
        provider: Arc<MockTokenProvider>,
        analysis: Arc<MockAnalysisService>,
    ) -> Services {
        Services {
            store,
            provider,
            verifier: Arc::new(MockPasswordVerifier {
                accepted: "open sesame",
            }),
            analysis,
            clock: Arc::new(FixedClock(NOW)),
        }
    }

    #[tokio::test]
    async fn gated_session_flow() {
        let provider = Arc::new(MockTokenProvider::healthy());
        let analysis = Arc::new(MockAnalysisService::succeeding());
        let app = LensApp::with_services(
            services(
                Arc::new(InMemoryTokenStore::new()),
                provider.clone(),
                analysis.clone(),
            ),
            true,
        );
        let draft = IdeaDraft::new("Idea", "Description");

        app.on_view_load().await;
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            app.controller().submit(&draft).await,
            Err(ValidationError::AccessNotGranted)
        );

        assert!(app.gate().check_password("nope").await.is_err());
        app.gate().check_password("open sesame").await.unwrap();
        assert!(app.controller().can_submit(&draft));

        assert_eq!(
            app.controller().submit(&draft).await,
            Ok(SubmitOutcome::Navigate(View::Results))
        );
        assert_eq!(provider.calls(), 1);
        assert_eq!(analysis.calls(), 1);
    }

    #[tokio::test]
    async fn grant_survives_a_failed_analysis() {
        let analysis = Arc::new(MockAnalysisService::failing());
        let app = LensApp::with_services(
            services(
                Arc::new(InMemoryTokenStore::new()),
                Arc::new(MockTokenProvider::healthy()),
                analysis,
            ),
            true,
        );
        app.gate().check_password("open sesame").await.unwrap();

        let outcome = app
            .controller()
            .submit(&IdeaDraft::new("Idea", "Description"))
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(app.gate().is_unlocked());
        assert!(app.context().is_access_granted());
    }

    #[tokio::test]
    async fn stored_token_is_reused_across_sessions() {
        let dir = TempDir::new().unwrap();
        let paths = LensPaths::new(Some(dir.path()));
        let store = || -> Arc<dyn TokenStore> {
            Arc::new(FileTokenStore::new(paths.token_file().unwrap()))
        };

        let first = Arc::new(MockTokenProvider::healthy());
        LensApp::with_services(
            services(store(), first.clone(), Arc::new(MockAnalysisService::succeeding())),
            false,
        )
        .tokens()
        .ensure_valid_token()
        .await
        .unwrap();

        let second = Arc::new(MockTokenProvider::healthy());
        let token = LensApp::with_services(
            services(store(), second.clone(), Arc::new(MockAnalysisService::succeeding())),
            false,
        )
        .tokens()
        .ensure_valid_token()
        .await
        .unwrap();

        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
        assert_eq!(token.as_str(), jwt(NOW + 3600));
    }

    #[test]
    fn from_config_honours_disabled_gate() {
        let dir = TempDir::new().unwrap();
        let mut config = LensConfig::default();
        config.access.enabled = false;

        let app = LensApp::from_config(&config, &LensPaths::new(Some(dir.path()))).unwrap();

        assert!(app.gate().is_unlocked());
        assert!(!app.context().is_in_flight());
    }
}
