//! Runtime retrieval of coordinate artifacts
//!
//! A [`RouteSource`] resolves a route key to its static artifact and parses
//! it. Sources are shared with spawned tasks, so fetches return owned
//! `'static` futures.

use crate::artifact::{self, ArtifactError};
use crate::catalog::RouteKey;
use crate::coordinate::CoordinatePath;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unparseable route data: {0}")]
    Parse(#[from] ArtifactError),
}

/// Anything that can deliver the coordinate path of a route
pub trait RouteSource: Send + Sync {
    fn fetch(&self, key: RouteKey) -> BoxFuture<Result<CoordinatePath, FetchError>>;

    /// Human-readable location of the artifacts, for logging
    fn describe(&self) -> String;
}

/// Reads artifacts from a local asset directory
#[derive(Clone, Debug)]
pub struct DirRouteSource {
    root: PathBuf,
}

impl DirRouteSource {
    /// `root` is the directory that `data/routes/<key>.json` is relative to
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn artifact_path(&self, key: RouteKey) -> PathBuf {
        self.root.join(key.definition().data_file)
    }
}

impl RouteSource for DirRouteSource {
    fn fetch(&self, key: RouteKey) -> BoxFuture<Result<CoordinatePath, FetchError>> {
        let path = self.artifact_path(key);
        Box::pin(async move {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| FetchError::Io { path, source })?;
            Ok(artifact::parse_artifact(&bytes)?)
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches artifacts over HTTP from a static file host
#[derive(Clone, Debug)]
pub struct HttpRouteSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRouteSource {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn artifact_url(&self, key: RouteKey) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            key.definition().data_file
        )
    }
}

impl RouteSource for HttpRouteSource {
    fn fetch(&self, key: RouteKey) -> BoxFuture<Result<CoordinatePath, FetchError>> {
        let client = self.client.clone();
        let url = self.artifact_url(key);
        Box::pin(async move {
            let response = client
                .get(&url)
                .send()
                .await
                .and_then(|r| r.error_for_status());
            let response = match response {
                Ok(r) => r,
                Err(source) => return Err(FetchError::Http { url, source }),
            };
            let bytes = match response.bytes().await {
                Ok(b) => b,
                Err(source) => return Err(FetchError::Http { url, source }),
            };
            Ok(artifact::parse_artifact(&bytes)?)
        })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;

    #[tokio::test]
    async fn test_dir_source_reads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("data").join("routes");
        std::fs::create_dir_all(&routes).unwrap();
        std::fs::write(routes.join("city.json"), "[[52.365,4.89],[52.366,4.891]]").unwrap();

        let source = DirRouteSource::new(dir.path());
        let path = source.fetch(RouteKey::City).await.unwrap();
        assert_eq!(
            path.points(),
            &[Coordinate::new(52.365, 4.89), Coordinate::new(52.366, 4.891)]
        );
    }

    #[tokio::test]
    async fn test_dir_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirRouteSource::new(dir.path());
        assert!(matches!(
            source.fetch(RouteKey::River).await,
            Err(FetchError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_dir_source_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("data").join("routes");
        std::fs::create_dir_all(&routes).unwrap();
        std::fs::write(routes.join("river.json"), "{\"oops\": true}").unwrap();

        let source = DirRouteSource::new(dir.path());
        assert!(matches!(
            source.fetch(RouteKey::River).await,
            Err(FetchError::Parse(_))
        ));
    }

    async fn serve_city(status: usize, body: &str) -> (mockito::ServerGuard, mockito::Mock) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data/routes/city.json")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        (server, mock)
    }

    #[tokio::test]
    async fn test_http_source_reads_artifact() {
        let (server, mock) = serve_city(200, "[[52.365,4.89],[52.366,4.891]]").await;

        let source = HttpRouteSource::new(server.url(), HttpRouteSource::DEFAULT_TIMEOUT).unwrap();
        let path = source.fetch(RouteKey::City).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            path.points(),
            &[Coordinate::new(52.365, 4.89), Coordinate::new(52.366, 4.891)]
        );
    }

    #[tokio::test]
    async fn test_http_source_not_found() {
        let (server, mock) = serve_city(404, "not found").await;

        let source = HttpRouteSource::new(server.url(), HttpRouteSource::DEFAULT_TIMEOUT).unwrap();
        let err = source.fetch(RouteKey::City).await.unwrap_err();

        mock.assert_async().await;
        match err {
            FetchError::Http { url, source } => {
                assert!(url.ends_with("/data/routes/city.json"));
                assert_eq!(source.status(), Some(reqwest::StatusCode::NOT_FOUND));
            }
            other => panic!("expected an HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_source_malformed_body() {
        let (server, mock) = serve_city(200, "{\"oops\": true}").await;

        let source = HttpRouteSource::new(server.url(), HttpRouteSource::DEFAULT_TIMEOUT).unwrap();
        let result = source.fetch(RouteKey::City).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_http_urls() {
        let source =
            HttpRouteSource::new("https://example.org/app/", HttpRouteSource::DEFAULT_TIMEOUT)
                .unwrap();
        assert_eq!(
            source.artifact_url(RouteKey::Sanctuary),
            "https://example.org/app/data/routes/sanctuary.json"
        );
    }
}
