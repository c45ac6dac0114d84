use poem::endpoint::make_sync;
use poem::http::Method;
use poem::http::StatusCode;
use poem::test::TestClient;
use poem::Body;
use poem::EndpointExt;
use poem::Response;
use pessoas::io::net::request_logger::format_line;
use pessoas::io::net::request_logger::RequestLogger;
use pessoas::io::net::request_logger::StatusStyle;
use std::io;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;
use std::time::Duration;
use test_log::test;
use tokio::io::AsyncRead;
use tokio::io::ReadBuf;

/// a response body whose first read fails
struct BrokenBody;

impl AsyncRead for BrokenBody {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("broken body")))
    }
}

#[test]
fn test_status_style() {
    assert_eq!(StatusStyle::of(StatusCode::OK), StatusStyle::Success);
    assert_eq!(StatusStyle::of(StatusCode::CREATED), StatusStyle::Success);
    assert_eq!(
        StatusStyle::of(StatusCode::BAD_REQUEST),
        StatusStyle::ClientError
    );
    assert_eq!(
        StatusStyle::of(StatusCode::NOT_FOUND),
        StatusStyle::ClientError
    );
    assert_eq!(
        StatusStyle::of(StatusCode::INTERNAL_SERVER_ERROR),
        StatusStyle::Other
    );
    assert_eq!(StatusStyle::of(StatusCode::FOUND), StatusStyle::Other);
}

#[test]
fn test_format_line() {
    let line = format_line(
        &Method::POST,
        "/pessoa",
        StatusCode::CREATED,
        58,
        Duration::from_micros(1500),
    );
    assert!(line.contains("POST"), "{line}");
    assert!(line.contains("/pessoa"), "{line}");
    assert!(line.contains("201"), "{line}");
    assert!(line.contains(" 58 - "), "{line}");
    assert!(line.contains("1.500"), "{line}");
    assert!(line.ends_with(" ms"), "{line}");
}

#[test(tokio::test)]
async fn test_logger_leaves_response_untouched() {
    let cli = TestClient::new(make_sync(|_| "hello").with(RequestLogger));

    let resp = cli.get("/anything?x=1").send().await;
    resp.assert_status_is_ok();
    resp.assert_text("hello").await;
}

#[test(tokio::test)]
async fn test_logger_keeps_error_status() {
    let app = make_sync(|_| {
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body("nada")
    })
    .with(RequestLogger);
    let cli = TestClient::new(app);

    let resp = cli.delete("/pessoa/nope").send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
    resp.assert_text("nada").await;
}

#[test(tokio::test)]
async fn test_logger_passes_unreadable_body_through() {
    let app = make_sync(|_| {
        Response::builder()
            .status(StatusCode::CREATED)
            .header("x-pessoa", "a1")
            .body(Body::from_async_read(BrokenBody))
    })
    .with(RequestLogger);
    let cli = TestClient::new(app);

    let resp = cli.post("/pessoa").send().await;
    resp.assert_status(StatusCode::CREATED);
    resp.assert_header("x-pessoa", "a1");
}
