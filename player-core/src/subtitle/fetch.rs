//! Subtitle source fetching
//!
//! Source locations are either HTTP(S) URLs, `file://` URLs, or plain
//! filesystem paths (resolved against an optional base directory).

use reqwest::Url;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PlayerError, Result};

/// Anything that can turn a source location into subtitle text
pub trait SubtitleFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Default fetcher: HTTP via reqwest, local files via tokio::fs
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

/// Where a location resolved to
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Http(Url),
    File(PathBuf),
}

impl SourceFetcher {
    /// Create a fetcher with the given HTTP timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlayerError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_dir: None,
        })
    }

    /// Resolve relative paths against `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, location: &str) -> Result<Resolved> {
        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Resolved::Http(url)),
                "file" => url
                    .to_file_path()
                    .map(Resolved::File)
                    .map_err(|_| PlayerError::InvalidSource(location.to_string())),
                // "C:\subs\eng.vtt" parses as scheme "c"
                scheme if scheme.len() == 1 => Ok(Resolved::File(PathBuf::from(location))),
                scheme => Err(PlayerError::InvalidSource(format!(
                    "unsupported scheme {:?} in {}",
                    scheme, location
                ))),
            },
            Err(_) => {
                let path = Path::new(location);
                let path = match &self.base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path.to_path_buf(),
                };
                Ok(Resolved::File(path))
            }
        }
    }

    async fn fetch_http(&self, location: &str, url: Url) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PlayerError::Fetch {
                location: location.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlayerError::HttpStatus {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| PlayerError::Fetch {
            location: location.to_string(),
            source,
        })
    }
}

impl SubtitleFetcher for SourceFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        match self.resolve(location)? {
            Resolved::Http(url) => self.fetch_http(location, url).await,
            Resolved::File(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| PlayerError::ReadFile { path, source })?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fetcher() -> SourceFetcher {
        SourceFetcher::new(Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_resolve_http() {
        let resolved = fetcher().resolve("https://cdn.example.com/eng.vtt").unwrap();
        assert!(matches!(resolved, Resolved::Http(url) if url.host_str() == Some("cdn.example.com")));
    }

    #[test]
    fn test_resolve_relative_path_against_base() {
        let f = fetcher().with_base_dir("/srv/subs");
        assert_eq!(
            f.resolve("eng.vtt").unwrap(),
            Resolved::File(PathBuf::from("/srv/subs/eng.vtt"))
        );
        assert_eq!(
            f.resolve("/abs/spa.vtt").unwrap(),
            Resolved::File(PathBuf::from("/abs/spa.vtt"))
        );
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let err = fetcher().resolve("ftp://example.com/eng.vtt").unwrap_err();
        assert!(matches!(err, PlayerError::InvalidSource(_)));
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nhi\n")
            .unwrap();

        let text = fetcher()
            .fetch(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert!(text.starts_with("WEBVTT"));
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let err = fetcher()
            .with_base_dir("/definitely/not/here")
            .fetch("missing.vtt")
            .await
            .unwrap_err();
        assert!(matches!(err, PlayerError::ReadFile { .. }));
    }
}
