use axum::http::HeaderMap;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::module::ApiModule;

/// A test application builder for integration testing.
///
/// Spins up the server on a random port with an in-memory SQLite database
/// and the given modules mounted and migrated.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn lists_publications() {
///     let app = TestApp::with_module(PublicationsModule).await;
///     let res = app.client.get(&app.url("/api/v1/publications")).await;
///     assert_eq!(res.status, 200);
/// }
/// ```
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: TestClient,
    pub db: DatabaseConnection,
    pub config: Config,
}

impl TestApp {
    /// Create a test app with no modules mounted.
    pub async fn new() -> Self {
        Self::build(Config::for_tests(), Vec::new()).await
    }

    /// Create a test app with a single module mounted.
    pub async fn with_module(module: impl ApiModule + 'static) -> Self {
        Self::build(Config::for_tests(), vec![Box::new(module)]).await
    }

    /// Create a test app from a custom config and module list.
    pub async fn build(config: Config, modules: Vec<Box<dyn ApiModule>>) -> Self {
        let mut app = crate::App::with_config(config)
            .await
            .expect("Failed to create test app");
        for module in modules {
            app = app.mount_boxed(module);
        }

        app.run_migrations()
            .await
            .expect("Failed to run module migrations");

        let router = app.router();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestApp {
            addr,
            client: TestClient::new(),
            db: app.db,
            config: app.config,
        }
    }

    /// Get the full URL for a path on the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// A simple HTTP test client with helper methods.
#[derive(Clone, Default)]
pub struct TestClient {
    inner: reqwest::Client,
}

impl TestClient {
    /// Create a new test client. Requests take absolute URLs, see [`TestApp::url`].
    pub fn new() -> Self {
        TestClient {
            inner: reqwest::Client::new(),
        }
    }

    /// Send a GET request.
    pub async fn get(&self, url: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .get(url)
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a GET request with an extra header.
    pub async fn get_with_header(&self, url: &str, name: &str, value: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .get(url)
            .header(name, value)
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }
}

/// A simplified HTTP response for test assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
    pub headers: HeaderMap,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let body = res.text().await.unwrap_or_default();
        TestResponse {
            status,
            body,
            headers,
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Failed to parse response as JSON")
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.json()["success"].as_bool().unwrap_or(false)
    }

    /// Get the data field from the response.
    pub fn data(&self) -> serde_json::Value {
        self.json()["data"].clone()
    }

    /// Get the error field from the response.
    pub fn error(&self) -> serde_json::Value {
        self.json()["error"].clone()
    }
}
