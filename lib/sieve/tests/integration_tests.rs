//! Integration tests for `ResponseExecutor` over `HyperTransport` using wiremock.

use std::net::TcpListener;
use std::time::Duration;

use assert2::{check, let_assert};
use bytes::Bytes;
use serde::Deserialize;
use sieve::{
    Error, HyperTransport, ResponseExecutor, ServiceTransport, StatusCode, Transport,
    TransportConfig, header::HeaderName,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Record {
    x: i64,
}

fn get(url: &str) -> http::Request<Bytes> {
    http::Request::get(url).body(Bytes::new()).expect("request")
}

fn executor() -> ResponseExecutor<HyperTransport> {
    ResponseExecutor::new(HyperTransport::new())
        .with_request_id_header(HeaderName::from_static("x-request-id"))
}

#[tokio::test]
async fn test_execute_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"x":1}"#))
        .mount(&mock_server)
        .await;

    let url = format!("{}/records/1", mock_server.uri());
    let_assert!(Ok(record) = executor().execute_json::<Record>(get(&url)).await);
    check!(record == Record { x: 1 });
}

#[tokio::test]
async fn test_execute_returns_body_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string("streamed content"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/stream", mock_server.uri());
    let_assert!(Ok(body) = executor().execute(get(&url)).await);
    let_assert!(Ok(bytes) = body.bytes().await);
    check!(bytes.as_ref() == b"streamed content");
}

#[tokio::test]
async fn test_client_error_with_request_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-Request-Id", "abc123")
                .set_body_string("not found"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let_assert!(Err(Error::Client(status_error)) = executor().execute(get(&url)).await);
    check!(status_error.status() == StatusCode::NOT_FOUND);
    check!(status_error.request_id() == "abc123");
    check!(status_error.message() == "not found");
}

#[tokio::test]
async fn test_server_error_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let url = format!("{}/busy", mock_server.uri());
    let_assert!(Err(err) = executor().execute_void(get(&url)).await);
    check!(err.is_server_error());
    check!(err.request_id() == Some(""));
    insta::assert_snapshot!(err.to_string(), @"server error: HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn test_malformed_json_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/malformed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"malformed""#))
        .mount(&mock_server)
        .await;

    let url = format!("{}/malformed", mock_server.uri());
    let_assert!(Err(err) = executor().execute_json::<Record>(get(&url)).await);
    check!(err.is_decode());
    check!(err.status().is_none());
}

#[tokio::test]
async fn test_execute_void_ignores_body_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(202).set_body_bytes(vec![0xff, 0xfe, b'{']))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/events", mock_server.uri());
    let request = http::Request::post(url)
        .header("Content-Type", "application/json")
        .body(Bytes::from_static(br#"{"kind":"ping"}"#))
        .expect("request");

    let_assert!(Ok(()) = executor().execute_void(request).await);
}

#[tokio::test]
async fn test_execute_string_is_repeatable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/greeting"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let executor = executor();
    let url = format!("{}/greeting", mock_server.uri());
    let_assert!(Ok(first) = executor.execute_string(get(&url)).await);
    let_assert!(Ok(second) = executor.execute_string(get(&url)).await);
    check!(first == "hello");
    check!(first == second);
}

#[tokio::test]
async fn test_error_transform() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no access"))
        .mount(&mock_server)
        .await;

    let executor = executor().with_error_transform(|status: StatusCode, err: Error| {
        Error::custom(format!("api refused ({}): {err}", status.as_u16()))
    });

    let url = format!("{}/forbidden", mock_server.uri());
    let_assert!(Err(err) = executor.execute(get(&url)).await);
    check!(err.to_string() == "api refused (403): client error: HTTP 403: no access");
}

#[tokio::test]
async fn test_connection_refused_is_not_transformed() {
    // Bind then drop a listener to get a port nothing listens on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };

    let executor = executor().with_error_transform(|_status: StatusCode, _err: Error| -> Error {
        panic!("transform must not run for transport errors")
    });

    let url = format!("http://127.0.0.1:{port}/unreachable");
    let_assert!(Err(err) = executor.execute(get(&url)).await);
    check!(err.is_connection());
    check!(err.status().is_none());
    check!(err.to_string().to_lowercase().contains("refused"));
}

#[tokio::test]
async fn test_https_to_plain_http_server_is_a_tls_error() {
    let mock_server = MockServer::start().await;

    let url = format!("https://{}/secure", mock_server.address());
    let_assert!(Err(err) = executor().execute(get(&url)).await);
    check!(matches!(err, Error::Tls(_)));
    check!(err.is_transport());
}

#[tokio::test]
async fn test_stalled_error_body_still_classifies() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");

    // Announce more body than is ever sent, then hold the connection open
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = [0_u8; 1024];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .expect("write head");
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let transport = HyperTransport::with_config(
        TransportConfig::builder()
            .timeout(Duration::from_millis(200))
            .build(),
    );
    let executor = ResponseExecutor::new(transport);

    let url = format!("http://{addr}/stalled");
    let result = tokio::time::timeout(Duration::from_secs(5), executor.execute(get(&url))).await;
    let_assert!(Ok(Err(Error::Server(status_error))) = result);
    check!(status_error.status() == StatusCode::SERVICE_UNAVAILABLE);
    check!(status_error.message() == "Service Unavailable");
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::with_config(
        TransportConfig::builder()
            .timeout(Duration::from_millis(50))
            .build(),
    );

    let url = format!("{}/slow", mock_server.uri());
    let_assert!(Err(err) = transport.send(get(&url)).await);
    check!(err.is_timeout());
}

#[tokio::test]
async fn test_tower_layers_over_hyper_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agent"))
        .and(header("user-agent", "sieve-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tagged"))
        .mount(&mock_server)
        .await;

    let service = sieve::tower::ServiceBuilder::new()
        .map_request(|mut request: http::Request<Bytes>| {
            request.headers_mut().insert(
                http::header::USER_AGENT,
                http::HeaderValue::from_static("sieve-tests"),
            );
            request
        })
        .service(HyperTransport::new());

    let executor = ResponseExecutor::new(ServiceTransport::new(service));
    let url = format!("{}/agent", mock_server.uri());
    let_assert!(Ok(text) = executor.execute_string(get(&url)).await);
    check!(text == "tagged");
}
