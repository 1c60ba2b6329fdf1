//! The response envelope shared by every backend operation, and page-walking support.

use crate::api::error::ApiError;
use serde::Deserialize;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

/// Marker for envelopes that carry no operation-specific top-level fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NoExtra {}

/// The uniform `{ success, data?, error?, pagination? }` shape of every response.
///
/// A few operations put extra fields next to `success` (the auth URL, the exchanged
/// access token); those land in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T, X = NoExtra> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Human-readable status text some endpoints send alongside (or instead of) `error`.
    pub message: Option<String>,
    pub pagination: Option<Pagination>,
    #[serde(flatten)]
    pub extra: X,
}

impl<T, X> Envelope<T, X> {
    /// The server's explanation for a failed call, if it gave one.
    pub fn failure_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }

    /// Turns `success: false` into an [`ApiError::Application`].
    pub fn ensure_success(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Application {
                message: self.error.or(self.message),
            })
        }
    }

    /// The payload of a successful call.
    ///
    /// A successful response without `data` is reported as an application error too,
    /// since there is nothing for the caller to work with.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.ensure_success()?
            .data
            .ok_or_else(|| ApiError::Application {
                message: Some("response did not include any data".to_string()),
            })
    }
}

/// Paging details for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// The 1-based page this response holds.
    pub page: u32,
    /// The page size that was requested.
    pub limit: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub pages: u32,
}

impl Pagination {
    /// The page to ask for after `requested`, if there is one.
    ///
    /// Counts from the page that was asked for, not the echoed `page`, so a backend that
    /// keeps answering with the same page number cannot keep a walk going forever.
    pub fn page_after(&self, requested: u32) -> Option<u32> {
        (requested < self.pages).then(|| requested + 1)
    }
}

type OneFuturePage<'a, F, T> = Pin<
    Box<dyn Future<Output = Result<(F, (VecDeque<T>, Option<u32>)), ApiError>> + 'a + Send>,
>;

/// A paginated stream that fetches subsequent pages from a list endpoint on demand.
///
/// Items are yielded one by one; the next page is only requested once the current one
/// is exhausted. The fetcher receives the 1-based page number and returns that page's
/// items together with the number of the page after it, if any.
pub struct PagedStream<'a, T, F> {
    /// Current batch of items from the most recent response
    current_items: VecDeque<T>,
    /// Future representing the currently pending request, if any
    pending_request: Option<OneFuturePage<'a, F, T>>,
    /// Whether we've reached the end of all available data
    is_done: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    /// Create a new PagedStream that starts at `first_page`.
    pub fn new<Fut>(first_page: u32, fetcher: F) -> Self
    where
        F: Fn(u32) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<(VecDeque<T>, Option<u32>), ApiError>> + Send + 'a,
    {
        let first_page = async move {
            let results = fetcher(first_page).await?;
            Ok((fetcher, results))
        };
        Self {
            pending_request: Some(Box::pin(first_page)),
            current_items: VecDeque::new(),
            is_done: false,
        }
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(u32) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = Result<(VecDeque<T>, Option<u32>), ApiError>> + Send + 'a,
{
    type Item = Result<T, ApiError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if self.is_done {
                return Poll::Ready(None);
            }

            let Some(pending) = self.pending_request.as_mut() else {
                self.is_done = true;
                return Poll::Ready(None);
            };

            match pending.as_mut().poll(cx) {
                Poll::Ready(Ok((fetcher, (items, next_page)))) => {
                    self.current_items.extend(items);

                    if let Some(next_page) = next_page {
                        // queue the next page, but only poll it once this one is drained
                        self.pending_request = Some(Box::pin(async move {
                            let results = fetcher(next_page).await?;
                            Ok((fetcher, results))
                        }));
                    } else {
                        self.is_done = true;
                        self.pending_request = None;
                    }
                }
                Poll::Ready(Err(e)) => {
                    self.pending_request = None;
                    self.is_done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
