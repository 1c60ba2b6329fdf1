//! A one-shot local HTTP endpoint that catches the OAuth redirect.
//!
//! The backend's consent URL sends the browser back to `http://<addr>/callback?...`. When
//! that address is local, we can listen on it ourselves and hand the query string straight
//! to [`AuthCallback`](crate::callback::AuthCallback) instead of asking the user to paste
//! the URL.

use bytes::Bytes;
use eyre::Context;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

const DONE_HTML: &str = "<!DOCTYPE html>
<html>
<head><title>YouTube Dashboard</title></head>
<body>
<p>You can close this window and return to the terminal.</p>
</body>
</html>
";

/// Listens for the browser's return from the consent screen.
#[derive(Debug)]
pub struct RedirectListener {
    socket: TcpListener,
    addr: SocketAddr,
}

impl RedirectListener {
    /// Binds the listener. Use port 0 to have one picked for you.
    pub async fn bind(addr: SocketAddr) -> eyre::Result<Self> {
        let socket = TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind redirect listener to {addr}"))?;
        let addr = socket.local_addr().context("get local address")?;
        Ok(Self { socket, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// The URL the browser is expected to come back to.
    pub fn redirect_url(&self) -> String {
        format!("http://{}/callback", self.addr)
    }

    /// Waits for the first request to `/callback` and returns its query string.
    ///
    /// Requests for any other path (browsers like to ask for `/favicon.ico`) get a `404`
    /// and are otherwise ignored. The query is returned as-is, so a redirect that carries
    /// `error=...` instead of `code=...` is delivered too.
    pub async fn wait_for_redirect(self) -> eyre::Result<String> {
        let (got, mut gotten) = mpsc::channel::<String>(1);
        loop {
            tokio::select! {
                query = gotten.recv() => {
                    return query.ok_or_else(|| eyre::eyre!("redirect channel closed"));
                }
                conn = self.socket.accept() => {
                    let (conn, peer) = conn.context("accept")?;
                    tracing::debug!(%peer, "redirect listener accepted connection");
                    let got = got.clone();
                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<Incoming>| {
                            let got = got.clone();
                            async move { Ok::<_, Infallible>(respond(req, &got).await) }
                        });
                        if let Err(e) = hyper::server::conn::http1::Builder::new()
                            .serve_connection(TokioIo::new(conn), service)
                            .await
                        {
                            tracing::debug!("redirect connection ended: {e}");
                        }
                    });
                }
            }
        }
    }
}

async fn respond(req: Request<Incoming>, got: &mpsc::Sender<String>) -> Response<Full<Bytes>> {
    if req.uri().path() != "/callback" {
        let mut res = Response::new(Full::new(Bytes::from_static(b"not found")));
        *res.status_mut() = StatusCode::NOT_FOUND;
        return res;
    }

    let query = req.uri().query().unwrap_or("").to_string();
    // a second redirect while the first is being handled is dropped
    let _ = got.try_send(query);
    let mut res = Response::new(Full::new(Bytes::from_static(DONE_HTML.as_bytes())));
    res.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("text/html; charset=utf-8"),
    );
    res
}
