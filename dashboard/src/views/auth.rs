//! The "Connect YouTube Account" action.

use crate::api::ApiClient;
use crate::notifications::Notifier;

pub const URL_FAILED_MESSAGE: &str = "Failed to generate authentication URL";
pub const UNREACHABLE_MESSAGE: &str = "Unable to connect to authentication service";

/// Asks the backend for the consent URL the user should be sent to.
pub async fn request_auth_url(api: &ApiClient, notifier: &mut impl Notifier) -> Option<String> {
    let response = match api.get_auth_url().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "could not reach auth service");
            notifier.error(UNREACHABLE_MESSAGE);
            return None;
        }
    };

    let url = response
        .extra
        .auth_url
        .filter(|url| response.success && !url.trim().is_empty());
    if url.is_none() {
        tracing::warn!(
            success = response.success,
            error = response.error.as_deref(),
            "backend did not provide an auth URL"
        );
        notifier.error(URL_FAILED_MESSAGE);
    }
    url
}
