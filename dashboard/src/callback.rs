//! Handling of the OAuth redirect.
//!
//! After the user grants (or refuses) access, the provider sends their browser back to the
//! callback route with either `?code=...` or `?error=...`. [`AuthCallback`] turns that
//! query string into a signed-in [`SessionStore`], or into a terminal failure with a
//! message the user can read. It makes at most one exchange attempt and never retries.

use crate::api::CodeExchange;
use crate::credentials::{AccessToken, AuthorizationCode};
use crate::notifications::Notifier;
use crate::routes::{Navigator, Route};
use crate::session::SessionStore;
use crate::storage::TokenStorage;
use eyre::Context;
use reqwest::Url;

pub const CANCELLED_MESSAGE: &str = "Authentication was cancelled or failed";
pub const MISSING_CODE_MESSAGE: &str = "No authorization code received";
pub const REJECTED_MESSAGE: &str = "Failed to authenticate with YouTube";
pub const FALLBACK_MESSAGE: &str = "Authentication failed";
pub const CONNECTED_MESSAGE: &str = "Successfully connected to YouTube!";

/// Where the callback flow stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackState {
    /// The redirect has been received but not yet acted on.
    Processing,
    /// The session is authenticated and the user has been sent to the dashboard.
    Success,
    /// The flow ended without a session.
    Failed { message: String },
}

impl CallbackState {
    fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        CallbackState::Failed { message }
    }

    /// Leaves a failed callback for the dashboard.
    ///
    /// This is the only way out of [`CallbackState::Failed`]; it does not retry the
    /// exchange. Returns whether navigation happened.
    pub fn return_to_dashboard(&self, navigator: &mut impl Navigator) -> bool {
        match self {
            CallbackState::Failed { .. } => {
                navigator.navigate(Route::Dashboard);
                true
            }
            CallbackState::Processing | CallbackState::Success => false,
        }
    }
}

/// The parameters of a redirect that the callback cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<AuthorizationCode>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Extracts `code` and `error` from a query string, with or without its leading `?`.
    ///
    /// Only the first occurrence of each parameter counts, and an empty `code` is
    /// treated as absent. Everything else in the query is ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        let mut seen_code = false;
        for (k, v) in form_urlencoded::parse(query.as_bytes()) {
            match &*k {
                "code" if !seen_code => {
                    seen_code = true;
                    params.code = AuthorizationCode::new(v.into_owned());
                }
                "error" if params.error.is_none() => params.error = Some(v.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Extracts the parameters from a full redirect URL.
    pub fn from_url(url: &str) -> eyre::Result<Self> {
        let url = Url::parse(url).with_context(|| format!("parse redirect URL {url:?}"))?;
        Ok(Self::from_query(url.query().unwrap_or("")))
    }
}

/// One mount of the callback route.
#[derive(Debug)]
pub struct AuthCallback {
    params: CallbackParams,
    state: CallbackState,
}

impl AuthCallback {
    /// Mounts the callback for a redirect carrying `params`.
    pub fn mount(params: CallbackParams) -> Self {
        Self {
            params,
            state: CallbackState::Processing,
        }
    }

    pub fn state(&self) -> &CallbackState {
        &self.state
    }

    /// Drives the callback to a terminal state.
    ///
    /// On success the token is stored in `session`, a success notification is shown and
    /// the navigator is sent to the dashboard. On failure an error notification carries
    /// the same message as [`CallbackState::Failed`], and the session is not touched.
    ///
    /// The exchange is attempted at most once: calling this again after the state has
    /// left [`CallbackState::Processing`] does nothing.
    pub async fn run<E, S, N, U>(
        &mut self,
        api: &E,
        session: &mut SessionStore<S>,
        navigator: &mut N,
        notifier: &mut U,
    ) -> &CallbackState
    where
        E: CodeExchange,
        S: TokenStorage,
        N: Navigator,
        U: Notifier,
    {
        if self.state != CallbackState::Processing {
            return &self.state;
        }
        tracing::debug!(
            has_code = self.params.code.is_some(),
            has_error = self.params.error.is_some(),
            "handling OAuth redirect"
        );

        self.state = resolve(&mut self.params, api, session).await;
        match &self.state {
            CallbackState::Success => {
                notifier.success(CONNECTED_MESSAGE);
                navigator.navigate(Route::Dashboard);
            }
            CallbackState::Failed { message } => {
                tracing::warn!(%message, "authentication callback failed");
                notifier.error(message.clone());
            }
            CallbackState::Processing => {
                unreachable!("resolve always returns a terminal state")
            }
        }
        &self.state
    }
}

async fn resolve<E, S>(
    params: &mut CallbackParams,
    api: &E,
    session: &mut SessionStore<S>,
) -> CallbackState
where
    E: CodeExchange,
    S: TokenStorage,
{
    if let Some(error) = &params.error {
        tracing::debug!(%error, "provider redirected with an error");
        return CallbackState::failed(CANCELLED_MESSAGE);
    }

    let Some(code) = params.code.take() else {
        return CallbackState::failed(MISSING_CODE_MESSAGE);
    };

    let response = match api.exchange_code(code).await {
        Ok(response) => response,
        Err(e) => return CallbackState::failed(e.to_string()),
    };

    if !response.success {
        return CallbackState::failed(response.failure_message().unwrap_or(REJECTED_MESSAGE));
    }

    let Some(token) = response.extra.access_token.and_then(AccessToken::new) else {
        return CallbackState::failed(FALLBACK_MESSAGE);
    };

    match session.login(token) {
        Ok(()) => CallbackState::Success,
        Err(e) => CallbackState::failed(format!("{e:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, TokenExchange};
    use crate::notifications::{CollectingNotifier, Level};
    use crate::routes::History;
    use crate::session::ACCESS_TOKEN_KEY;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Answers every exchange with a canned JSON body and records the codes it saw.
    struct ScriptedExchange {
        response: Result<&'static str, &'static str>,
        codes: RefCell<Vec<String>>,
    }

    impl ScriptedExchange {
        fn answering(json: &'static str) -> Self {
            Self {
                response: Ok(json),
                codes: RefCell::default(),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                response: Err(message),
                codes: RefCell::default(),
            }
        }
    }

    impl CodeExchange for ScriptedExchange {
        async fn exchange_code(&self, code: AuthorizationCode) -> Result<TokenExchange, ApiError> {
            self.codes.borrow_mut().push(code.secret().to_string());
            match self.response {
                Ok(json) => Ok(serde_json::from_str(json).unwrap()),
                Err(message) => Err(ApiError::Application {
                    message: Some(message.to_string()),
                }),
            }
        }
    }

    struct Harness {
        session: SessionStore<MemoryStorage>,
        history: History,
        notifier: CollectingNotifier,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                session: SessionStore::initialize(MemoryStorage::new()),
                history: History::default(),
                notifier: CollectingNotifier::default(),
            }
        }

        async fn run(&mut self, query: &str, api: &ScriptedExchange) -> CallbackState {
            let mut callback = AuthCallback::mount(CallbackParams::from_query(query));
            assert_eq!(callback.state(), &CallbackState::Processing);
            callback
                .run(api, &mut self.session, &mut self.history, &mut self.notifier)
                .await
                .clone()
        }
    }

    #[test]
    fn parses_query_parameters() {
        let params = CallbackParams::from_query("?code=4%2F0Ab&scope=youtube&code=second");
        assert_eq!(params.code.unwrap().secret(), "4/0Ab");
        assert_eq!(params.error, None);

        let params = CallbackParams::from_query("error=access_denied");
        assert_eq!(params.code, None);
        assert_eq!(params.error.as_deref(), Some("access_denied"));

        assert_eq!(CallbackParams::from_query("code="), CallbackParams::default());

        let params =
            CallbackParams::from_url("http://127.0.0.1:5173/callback?state=x&code=xyz").unwrap();
        assert_eq!(params.code.unwrap().secret(), "xyz");
        assert!(CallbackParams::from_url("/callback?code=xyz").is_err());
    }

    #[tokio::test]
    async fn provider_error_fails_without_exchange() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":true,"accessToken":"tok1"}"#);

        let state = h.run("error=access_denied", &api).await;

        let CallbackState::Failed { message } = &state else {
            panic!("expected failure, got {state:?}");
        };
        assert!(message.contains("cancelled or failed"));
        assert!(api.codes.borrow().is_empty());
        assert!(!h.session.is_authenticated());
        assert!(h.session.storage().is_empty());
        assert_eq!(h.notifier.errors(), vec![CANCELLED_MESSAGE]);
        assert!(h.history.visited().is_empty());
    }

    #[tokio::test]
    async fn error_wins_over_code() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":true,"accessToken":"tok1"}"#);
        let state = h.run("code=abc123&error=access_denied", &api).await;
        assert_eq!(
            state,
            CallbackState::Failed {
                message: CANCELLED_MESSAGE.into()
            }
        );
        assert!(!h.session.is_authenticated());
    }

    #[tokio::test]
    async fn missing_code_fails() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":true,"accessToken":"tok1"}"#);
        let state = h.run("state=whatever", &api).await;
        assert_eq!(
            state,
            CallbackState::Failed {
                message: "No authorization code received".into()
            }
        );
        assert!(api.codes.borrow().is_empty());
    }

    #[tokio::test]
    async fn successful_exchange_logs_in_and_navigates_once() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":true,"accessToken":"tok1"}"#);

        let state = h.run("code=abc123", &api).await;

        assert_eq!(state, CallbackState::Success);
        assert_eq!(api.codes.borrow().as_slice(), ["abc123"]);
        assert_eq!(h.session.access_token().unwrap().secret(), "tok1");
        assert_eq!(
            h.session.storage().get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some("tok1")
        );
        assert_eq!(h.history.visited(), [Route::Dashboard]);
        assert_eq!(h.notifier.notifications.len(), 1);
        assert_eq!(h.notifier.notifications[0].level, Level::Success);
    }

    #[tokio::test]
    async fn rejected_exchange_leaves_session_alone() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":false}"#);

        let state = h.run("code=abc123", &api).await;

        assert_eq!(
            state,
            CallbackState::Failed {
                message: REJECTED_MESSAGE.into()
            }
        );
        assert!(!h.session.is_authenticated());
        assert!(h.session.storage().is_empty());
        assert!(h.history.visited().is_empty());
    }

    #[tokio::test]
    async fn rejected_exchange_surfaces_server_reason() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":false,"error":"invalid_grant"}"#);
        let state = h.run("code=abc123", &api).await;
        assert_eq!(
            state,
            CallbackState::Failed {
                message: "invalid_grant".into()
            }
        );
    }

    #[tokio::test]
    async fn success_without_token_fails() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":true,"accessToken":""}"#);
        let state = h.run("code=abc123", &api).await;
        assert_eq!(
            state,
            CallbackState::Failed {
                message: FALLBACK_MESSAGE.into()
            }
        );
        assert!(!h.session.is_authenticated());
    }

    #[tokio::test]
    async fn transport_failure_fails_with_its_message() {
        let mut h = Harness::new();
        let api = ScriptedExchange::failing("backend unreachable");
        let state = h.run("code=abc123", &api).await;
        assert_eq!(
            state,
            CallbackState::Failed {
                message: "backend unreachable".into()
            }
        );
        assert!(!h.session.is_authenticated());
    }

    #[tokio::test]
    async fn runs_at_most_once() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":false}"#);
        let mut callback = AuthCallback::mount(CallbackParams::from_query("code=abc123"));
        callback
            .run(&api, &mut h.session, &mut h.history, &mut h.notifier)
            .await;
        let second = callback
            .run(&api, &mut h.session, &mut h.history, &mut h.notifier)
            .await
            .clone();

        assert!(matches!(second, CallbackState::Failed { .. }));
        assert_eq!(api.codes.borrow().len(), 1);
        assert_eq!(h.notifier.notifications.len(), 1);
    }

    #[tokio::test]
    async fn failure_offers_way_back_to_dashboard() {
        let mut h = Harness::new();
        let api = ScriptedExchange::answering(r#"{"success":false}"#);
        let state = h.run("code=abc123", &api).await;

        assert!(state.return_to_dashboard(&mut h.history));
        assert_eq!(h.history.visited(), [Route::Dashboard]);
        assert!(!CallbackState::Success.return_to_dashboard(&mut h.history));
        assert_eq!(api.codes.borrow().len(), 1);
    }
}
