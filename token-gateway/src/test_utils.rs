use crate::config::GatewayConfig;
use crate::create_app;
use crate::publisher::tests::RecordingBroker;
use crate::publisher::EventPublisher;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Path of the token endpoint on the authorization server mock
pub const TOKEN_PATH: &str = "/realms/finance-app/protocol/openid-connect/token";

/// Test fixture for setting up a complete test environment with mocked services.
///
/// Starts a mock authorization server and a mock resource API, points the
/// gateway configuration at them and builds the application router. Events
/// are captured by an in-memory broker.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture
///         .add_token_mock(json!({"access_token": token}), StatusCode::OK, 1)
///         .await;
///     fixture
///         .add_resource_mock(json!({"transactions": []}), StatusCode::OK, 1)
///         .await;
///
///     let response = fixture.get("/token?code=AUTH_CODE").await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration the application was built with
    pub config: GatewayConfig,
    /// Mock server for the authorization server
    pub auth_mock: MockServer,
    /// Mock server for the resource API
    pub resource_mock: MockServer,
    /// Broker receiving published events
    pub broker: Arc<RecordingBroker>,
}

impl TestFixture {
    /// Creates a fixture with the default test configuration
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Creates a fixture after letting `customize` adjust the configuration
    pub async fn with_config(customize: impl FnOnce(&mut GatewayConfig)) -> Self {
        Self::with_broker(customize, RecordingBroker::default()).await
    }

    /// Creates a fixture publishing into `broker`
    pub async fn with_broker(
        customize: impl FnOnce(&mut GatewayConfig),
        broker: RecordingBroker,
    ) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let auth_mock = MockServer::start().await;
        let resource_mock = MockServer::start().await;

        let mut config = GatewayConfig::for_test_with_mocks(&auth_mock, &resource_mock);
        customize(&mut config);

        let broker = Arc::new(broker);
        let publisher = EventPublisher::new(
            config.publish.enabled,
            config.publish.topic.clone(),
            broker.clone(),
        );
        let state = AppState::with_publisher(&config, publisher)
            .expect("Failed to create application state");
        let app = create_app(state).await;

        Self {
            app,
            config,
            auth_mock,
            resource_mock,
            broker,
        }
    }

    /// Initializes the test logger; later calls are ignored
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Sends a GET request to the specified URI
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        self.get_with_headers(uri, &[]).await
    }

    /// Sends a GET request with additional headers
    pub async fn get_with_headers(
        &self,
        uri: impl AsRef<str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri.as_ref());
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// Mounts a token endpoint response on the authorization server mock
    pub async fn add_token_mock(
        &self,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path(TOKEN_PATH))
            .and(matchers::header(
                "content-type",
                "application/x-www-form-urlencoded",
            ))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.auth_mock)
            .await;
    }

    /// Mounts a response for the configured resource path on the resource API mock
    pub async fn add_resource_mock(
        &self,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path(self.config.resource.path.as_str()))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.resource_mock)
            .await;
    }

    /// Decodes the form body of the last request the token endpoint received
    pub async fn token_request_form(&self) -> HashMap<String, String> {
        let requests = self
            .auth_mock
            .received_requests()
            .await
            .expect("Request recording is disabled");
        let request = requests.last().expect("No token request was received");
        url::form_urlencoded::parse(&request.body)
            .into_owned()
            .collect()
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Returns a response header as text
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
