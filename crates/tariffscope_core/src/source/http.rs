use std::fmt;
use std::time::Duration;

use reqwest::header::CACHE_CONTROL;
use url::Url;

use crate::error::FetchError;

use super::{INDEX_FILE, TableSource};

/// Timeout applied to index probes against remote mirrors
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Table tree served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpMirror {
    base: Url,
    client: reqwest::Client,
    probe_timeout: Option<Duration>,
}

impl PartialEq for HttpMirror {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl HttpMirror {
    /// Mirror rooted at `base`. Index probes use [`DEFAULT_PROBE_TIMEOUT`].
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self {
            base,
            client: reqwest::Client::new(),
            probe_timeout: Some(DEFAULT_PROBE_TIMEOUT),
        })
    }

    /// Raw GitHub content mirror: `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{dir}`
    pub fn github_raw(
        owner: &str,
        repo: &str,
        branch: &str,
        dir: &str,
    ) -> Result<Self, url::ParseError> {
        let mut mirror = Self::new("https://raw.githubusercontent.com/")?;
        mirror.base = mirror.url_of(&[owner, repo, branch, dir]);
        Ok(mirror)
    }

    /// A same-origin server needs no probe timeout; pass `None` for that case.
    pub fn with_probe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of `segments` below the base, each segment percent-encoded
    pub fn url_of(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url, timeout: Option<Duration>) -> Result<String, FetchError> {
        let location = url.to_string();
        tracing::debug!(url = %location, "fetching remote table file");

        let mut request = self.client.get(url).header(CACHE_CONTROL, "no-store");
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(|e| FetchError::Transport {
            location: location.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                location,
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|e| FetchError::Transport {
            location,
            message: e.to_string(),
        })
    }
}

impl fmt::Display for HttpMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base.as_str().trim_end_matches('/'))
    }
}

impl TableSource for HttpMirror {
    async fn fetch_text(&self, segments: &[&str]) -> Result<String, FetchError> {
        self.get(self.url_of(segments), None).await
    }

    async fn probe_index(&self) -> Result<String, FetchError> {
        self.get(self.url_of(&[INDEX_FILE]), self.probe_timeout).await
    }

    fn sibling(&self, segment: &str) -> Self {
        let mut sibling = self.clone();
        if let Ok(mut path) = sibling.base.path_segments_mut() {
            path.pop_if_empty().pop().push(segment);
        }
        sibling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_raw_layout() {
        let mirror = HttpMirror::github_raw("stfnrpplngr", "TVData", "main", "tables").unwrap();
        assert_eq!(
            mirror.to_string(),
            "https://raw.githubusercontent.com/stfnrpplngr/TVData/main/tables"
        );
    }

    #[test]
    fn test_table_names_are_encoded_as_one_segment() {
        let mirror = HttpMirror::new("https://example.org/tables/").unwrap();
        let url = mirror.url_of(&["TVöD VKA", "Table.csv"]);
        assert_eq!(
            url.as_str(),
            "https://example.org/tables/TV%C3%B6D%20VKA/Table.csv"
        );

        let slashed = mirror.url_of(&["a/b", "Meta.csv"]);
        assert_eq!(slashed.as_str(), "https://example.org/tables/a%2Fb/Meta.csv");
    }

    #[test]
    fn test_sibling_and_equality() {
        let mirror = HttpMirror::new("https://example.org/repo/tables").unwrap();
        let allowances = mirror.sibling("allowances");
        assert_eq!(allowances.to_string(), "https://example.org/repo/allowances");
        assert_ne!(mirror, allowances);
        assert_eq!(mirror, HttpMirror::new("https://example.org/repo/tables").unwrap());
    }

    #[tokio::test]
    async fn test_index_request_times_out_on_silent_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let timeout = Duration::from_millis(200);
        let mirror = HttpMirror::new(&format!("http://{addr}/tables/"))
            .unwrap()
            .with_probe_timeout(Some(timeout));
        let started = std::time::Instant::now();
        let result = tokio::time::timeout(Duration::from_secs(5), mirror.probe_index())
            .await
            .expect("index request outlived its timeout");

        assert!(matches!(result, Err(FetchError::Transport { .. })), "{result:?}");
        assert!(started.elapsed() >= timeout);
    }

    #[test]
    fn test_rejects_cannot_be_a_base() {
        assert!(HttpMirror::new("mailto:someone@example.org").is_err());
        assert!(HttpMirror::new("not a url").is_err());
    }
}
