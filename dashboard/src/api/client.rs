//! HTTP client for the dashboard backend.

use crate::api::auth::{AuthUrlResponse, TokenExchange};
use crate::api::comments::{CommentThread, NewComment};
use crate::api::error::ApiError;
use crate::api::events::{Event, EventFilters};
use crate::api::notes::{Note, NoteFilters, NoteInput};
use crate::api::types::{Envelope, PagedStream};
use crate::api::videos::{Video, VideoUpdate};
use crate::credentials::{AccessToken, AuthorizationCode};
use eyre::Context;
use http::Method;
use http::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::future::Future;
use tokio_stream::Stream;
use tracing::instrument;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// A request body with the caller's access token folded in next to its own fields.
#[derive(Debug, Serialize)]
struct Authorized<'a, B: Serialize> {
    #[serde(flatten)]
    body: &'a B,
    #[serde(rename = "accessToken")]
    access_token: &'a AccessToken,
}

/// Only the fields we need from a failure response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Client for the dashboard backend's REST API.
///
/// There is one method per backend operation. Every method resolves to the backend's
/// [`Envelope`], or to an [`ApiError`] when no usable envelope came back. The client
/// holds no authorization state: operations that act on the user's YouTube account take
/// the current [`AccessToken`] as an argument, and it travels in the request body.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Root of the API, e.g. `http://localhost:5000/api`
    base_url: Url,
    /// HTTP client for API requests
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> eyre::Result<Self> {
        let client = reqwest::ClientBuilder::new()
            // the backend never redirects API calls; don't follow anything it sends
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("build HTTP client")?;
        Self::with_http_client(base_url, client)
    }

    /// Creates a client that sends its requests through `client`.
    pub fn with_http_client(base_url: &str, client: reqwest::Client) -> eyre::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("parse API base URL {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            eyre::bail!("API base URL {base_url} cannot have paths appended to it");
        }
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for `segments` below the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("base URL was checked to be a base in the constructor")
            .pop_if_empty()
            .extend(segments);
        url
    }

    /// Sends one request to the backend and decodes its JSON answer.
    ///
    /// Shared by every operation:
    /// - builds the URL from path segments
    /// - always sends `Content-Type: application/json`
    /// - serializes `query` into the query string and `json_body` into the body
    /// - maps non-2xx answers to [`ApiError::Status`], keeping the body's `error` text
    #[instrument(skip(self, query, json_body), level = tracing::Level::TRACE)]
    async fn send<R, Q, B>(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<&Q>,
        json_body: Option<&B>,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments);
        let path = url.path().to_string();

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = json_body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                return Err(ApiError::Transport {
                    method,
                    path,
                    source,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.or(body.message));
            return Err(ApiError::Status {
                method,
                path,
                status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Transport {
                method,
                path,
                source,
            })
    }

    /// Asks the backend where to send the user to grant access to their channel.
    ///
    /// `GET /auth/youtube`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn get_auth_url(&self) -> Result<AuthUrlResponse, ApiError> {
        self.send(Method::GET, &["auth", "youtube"], None::<&()>, None::<&()>)
            .await
    }

    /// Exchanges an OAuth authorization code for an access token.
    ///
    /// `POST /auth/callback` with `{ code }`. The code is consumed: it is only ever
    /// valid for one exchange.
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn exchange_code(&self, code: AuthorizationCode) -> Result<TokenExchange, ApiError> {
        let body = serde_json::json!({ "code": code.secret() });
        let response: TokenExchange = self
            .send(Method::POST, &["auth", "callback"], None::<&()>, Some(&body))
            .await?;
        tracing::debug!(
            success = response.success,
            has_token = response.extra.access_token.is_some(),
            "exchanged authorization code"
        );
        Ok(response)
    }

    /// Fetches one video's metadata and statistics.
    ///
    /// `GET /video/:id`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn get_video(&self, video_id: &str) -> Result<Envelope<Video>, ApiError> {
        self.send(Method::GET, &["video", video_id], None::<&()>, None::<&()>)
            .await
    }

    /// Updates a video's title and description on the user's behalf.
    ///
    /// `PUT /video/:id` with the fields and `accessToken` in the body.
    #[instrument(skip(self, token), err(level = tracing::Level::WARN))]
    pub async fn update_video(
        &self,
        video_id: &str,
        fields: &VideoUpdate,
        token: &AccessToken,
    ) -> Result<Envelope<serde_json::Value>, ApiError> {
        let body = Authorized {
            body: fields,
            access_token: token,
        };
        let response: Envelope<serde_json::Value> = self
            .send(Method::PUT, &["video", video_id], None::<&()>, Some(&body))
            .await?;
        tracing::debug!(video_id, success = response.success, "updated video");
        Ok(response)
    }

    /// Lists the comment threads on a video.
    ///
    /// `GET /comments/:videoId`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn get_comments(
        &self,
        video_id: &str,
    ) -> Result<Envelope<Vec<CommentThread>>, ApiError> {
        let response: Envelope<Vec<CommentThread>> = self
            .send(Method::GET, &["comments", video_id], None::<&()>, None::<&()>)
            .await?;
        tracing::debug!(
            video_id,
            returned_items = response.data.as_ref().map_or(0, Vec::len),
            "fetched comment threads"
        );
        Ok(response)
    }

    /// Posts a comment, or a reply when `comment.parent_id` is set.
    ///
    /// `POST /comments/:videoId` with `{ text, parentId?, accessToken }`.
    #[instrument(skip(self, token), err(level = tracing::Level::WARN))]
    pub async fn add_comment(
        &self,
        video_id: &str,
        comment: &NewComment,
        token: &AccessToken,
    ) -> Result<Envelope<serde_json::Value>, ApiError> {
        let body = Authorized {
            body: comment,
            access_token: token,
        };
        self.send(Method::POST, &["comments", video_id], None::<&()>, Some(&body))
            .await
    }

    /// Deletes a comment.
    ///
    /// `DELETE /comments/:commentId` with `{ accessToken }` in the body.
    #[instrument(skip(self, token), err(level = tracing::Level::WARN))]
    pub async fn delete_comment(
        &self,
        comment_id: &str,
        token: &AccessToken,
    ) -> Result<Envelope<IgnoredAny>, ApiError> {
        let body = serde_json::json!({ "accessToken": token });
        self.send(
            Method::DELETE,
            &["comments", comment_id],
            None::<&()>,
            Some(&body),
        )
        .await
    }

    /// Lists notes matching `filters`.
    ///
    /// `GET /notes?videoId=&search=&tags=`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn get_notes(&self, filters: &NoteFilters) -> Result<Envelope<Vec<Note>>, ApiError> {
        let response: Envelope<Vec<Note>> = self
            .send(Method::GET, &["notes"], Some(filters), None::<&()>)
            .await?;
        tracing::debug!(
            returned_items = response.data.as_ref().map_or(0, Vec::len),
            "fetched notes"
        );
        Ok(response)
    }

    /// Creates a note.
    ///
    /// `POST /notes`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn create_note(&self, note: &NoteInput) -> Result<Envelope<Note>, ApiError> {
        self.send(Method::POST, &["notes"], None::<&()>, Some(note))
            .await
    }

    /// Replaces a note's fields.
    ///
    /// `PUT /notes/:id`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn update_note(
        &self,
        note_id: &str,
        note: &NoteInput,
    ) -> Result<Envelope<Note>, ApiError> {
        self.send(Method::PUT, &["notes", note_id], None::<&()>, Some(note))
            .await
    }

    /// Deletes a note.
    ///
    /// `DELETE /notes/:id`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn delete_note(&self, note_id: &str) -> Result<Envelope<IgnoredAny>, ApiError> {
        self.send(Method::DELETE, &["notes", note_id], None::<&()>, None::<&()>)
            .await
    }

    /// Fetches one page of the audit log.
    ///
    /// `GET /events?action=&videoId=&page=&limit=`
    #[instrument(skip(self), err(level = tracing::Level::WARN))]
    pub async fn get_events(
        &self,
        filters: &EventFilters,
    ) -> Result<Envelope<Vec<Event>>, ApiError> {
        let response: Envelope<Vec<Event>> = self
            .send(Method::GET, &["events"], Some(filters), None::<&()>)
            .await?;
        tracing::debug!(
            page = filters.page,
            total_results = response.pagination.map(|p| p.total),
            "fetched events"
        );
        Ok(response)
    }

    /// Walks the audit log from `filters.page` to the last page.
    ///
    /// Pages are requested lazily as the stream is consumed. A page answered with
    /// `success: false` ends the stream with an [`ApiError::Application`].
    pub fn all_events(
        &self,
        filters: EventFilters,
    ) -> impl Stream<Item = Result<Event, ApiError>> + use<'_> {
        let first_page = filters.page;
        PagedStream::new(first_page, move |page| {
            let filters = filters.clone().with_page(page);
            async move {
                let response = self.get_events(&filters).await?.ensure_success()?;
                let next_page = response.pagination.and_then(|p| p.page_after(page));
                let items: VecDeque<Event> = response.data.unwrap_or_default().into();
                Ok((items, next_page))
            }
        })
    }
}

/// Something that can trade an authorization code for an access token.
///
/// [`ApiClient`] is the real implementation; the callback handler is generic over this
/// so its state transitions can be exercised without a backend.
pub trait CodeExchange {
    fn exchange_code(
        &self,
        code: AuthorizationCode,
    ) -> impl Future<Output = Result<TokenExchange, ApiError>>;
}

impl CodeExchange for ApiClient {
    fn exchange_code(
        &self,
        code: AuthorizationCode,
    ) -> impl Future<Output = Result<TokenExchange, ApiError>> {
        ApiClient::exchange_code(self, code)
    }
}
