use pretty_assertions::assert_eq;
use std::cell::Cell;
use yt_dashboard::api::{ApiError, CodeExchange, TokenExchange};
use yt_dashboard::notifications::{CollectingNotifier, Level};
use yt_dashboard::routes::{History, Route};
use yt_dashboard::session::ACCESS_TOKEN_KEY;
use yt_dashboard::storage::{FileStorage, MemoryStorage, TokenStorage};
use yt_dashboard::views::dashboard::Dashboard;
use yt_dashboard::views::header;
use yt_dashboard::{ApiClient, AuthCallback, AuthorizationCode, CallbackParams, CallbackState, SessionStore};

/// Trades exactly the code `xyz` for the token `T1`.
#[derive(Default)]
struct Backend {
    exchanges: Cell<usize>,
}

impl CodeExchange for Backend {
    async fn exchange_code(&self, code: AuthorizationCode) -> Result<TokenExchange, ApiError> {
        self.exchanges.set(self.exchanges.get() + 1);
        let body = if code.secret() == "xyz" {
            r#"{"success":true,"accessToken":"T1"}"#
        } else {
            r#"{"success":false,"error":"invalid_grant"}"#
        };
        Ok(serde_json::from_str(body).expect("valid fixture"))
    }
}

fn unreachable_api() -> ApiClient {
    // nothing should be fetched while signed out
    ApiClient::new("http://127.0.0.1:9/api").unwrap()
}

#[tokio::test]
async fn sign_in_survives_reload() {
    let api = unreachable_api();
    let backend = Backend::default();
    let mut notifier = CollectingNotifier::default();

    // first visit: nobody is signed in
    let mut store = SessionStore::initialize(MemoryStorage::new());
    let dashboard = Dashboard::load(&api, store.session(), None, &mut notifier).await;
    assert!(matches!(dashboard, Dashboard::Welcome));
    assert!(dashboard.render().contains("Connect your YouTube account"));
    assert!(header::render(store.session(), Route::Dashboard).ends_with("Disconnected"));

    // the provider redirects back with a code
    let mut history = History::default();
    let mut callback = AuthCallback::mount(CallbackParams::from_query("?code=xyz"));
    let state = callback
        .run(&backend, &mut store, &mut history, &mut notifier)
        .await;
    assert_eq!(state, &CallbackState::Success);
    assert_eq!(history.visited(), [Route::Dashboard]);
    assert_eq!(store.access_token().unwrap().secret(), "T1");
    assert_eq!(notifier.notifications.len(), 1);
    assert_eq!(notifier.notifications[0].level, Level::Success);

    // reload: a fresh store over the same storage
    let storage = store.into_storage();
    let store = SessionStore::initialize(storage);
    assert!(store.is_authenticated());
    assert_eq!(store.access_token().unwrap().secret(), "T1");
    assert_eq!(backend.exchanges.get(), 1);
}

#[tokio::test]
async fn file_backed_session_and_logout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");
    let backend = Backend::default();
    let mut notifier = CollectingNotifier::default();
    let mut history = History::default();

    let mut store = SessionStore::initialize(FileStorage::new(&path));
    let mut callback = AuthCallback::mount(CallbackParams::from_query("code=xyz"));
    callback
        .run(&backend, &mut store, &mut history, &mut notifier)
        .await;
    assert!(store.is_authenticated());
    drop(store);

    let mut store = SessionStore::initialize(FileStorage::new(&path));
    assert_eq!(store.access_token().unwrap().secret(), "T1");
    assert!(header::disconnect(&mut store, &mut notifier));
    assert!(!store.is_authenticated());

    let store = SessionStore::initialize(FileStorage::new(&path));
    assert!(!store.is_authenticated());
    assert_eq!(store.storage().get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn rejected_code_keeps_user_signed_out() {
    let backend = Backend::default();
    let mut notifier = CollectingNotifier::default();
    let mut history = History::default();
    let mut store = SessionStore::initialize(MemoryStorage::new());

    let mut callback = AuthCallback::mount(CallbackParams::from_query("code=stale"));
    let state = callback
        .run(&backend, &mut store, &mut history, &mut notifier)
        .await
        .clone();
    assert_eq!(
        state,
        CallbackState::Failed {
            message: "invalid_grant".into()
        }
    );
    assert!(!store.is_authenticated());
    assert!(history.visited().is_empty());
    assert!(state.return_to_dashboard(&mut history));
    assert_eq!(history.current(), Some(Route::Dashboard));
    assert_eq!(notifier.errors(), vec!["invalid_grant"]);
}
