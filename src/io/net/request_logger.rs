//! One colored log line per completed request:
//!
//! `<method> <path> <status> <bytes> - <elapsed> ms`
//!
//! The status is green for 2xx, red for 4xx and yellow for everything else.
//! The middleware only observes; the response leaves as it arrived.  A body
//! that fails to read is logged as 0 bytes and the response keeps its status
//! and headers.

use colored::ColoredString;
use colored::Colorize;
use poem::http::Method;
use poem::http::StatusCode;
use poem::Endpoint;
use poem::Middleware;
use poem::Request;
use poem::Response;
use poem::Result;
use std::time::Duration;
use std::time::Instant;
use tracing::info;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Success,
    ClientError,
    Other,
}

impl StatusStyle {
    #[must_use]
    pub fn of(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Success
        } else if status.is_client_error() {
            Self::ClientError
        } else {
            Self::Other
        }
    }

    fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Success => text.green().bold(),
            Self::ClientError => text.red().bold(),
            Self::Other => text.yellow().bold(),
        }
    }
}

#[must_use]
pub fn format_line(
    method: &Method,
    path: &str,
    status: StatusCode,
    len: usize,
    elapsed: Duration,
) -> String {
    let elapsed_ms = format!("{:.3}", elapsed.as_secs_f64() * 1000.0);
    format!(
        "{} {} {} {} - {} ms",
        method.as_str().white().bold(),
        path.cyan().bold(),
        StatusStyle::of(status).paint(status.as_str()),
        len,
        elapsed_ms.as_str().yellow().bold(),
    )
}

pub struct RequestLogger;

impl<E: Endpoint> Middleware<E> for RequestLogger {
    type Output = RequestLoggerEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RequestLoggerEndpoint { inner: ep }
    }
}

pub struct RequestLoggerEndpoint<E> {
    inner: E,
}

#[poem::async_trait]
impl<E: Endpoint> Endpoint for RequestLoggerEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.uri().path().to_string(), ToString::to_string);

        let mut resp = self.inner.get_response(req).await;
        let elapsed = start.elapsed();

        // buffered to learn the length, then put back untouched
        let len = match resp.take_body().into_bytes().await {
            Ok(body) => {
                let len = body.len();
                resp.set_body(body);
                len
            }
            Err(e) => {
                warn!(target: "pessoas::http", "can not read response body of {method} {path}: {e}");
                0
            }
        };

        info!(
            target: "pessoas::http",
            "{}",
            format_line(&method, &path, resp.status(), len, elapsed)
        );
        Ok(resp)
    }
}
