use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::FetchError;

use super::TableSource;

/// Table tree in a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDir {
    root: PathBuf,
}

impl LocalDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, segments: &[&str]) -> PathBuf {
        segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for LocalDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

impl TableSource for LocalDir {
    async fn fetch_text(&self, segments: &[&str]) -> Result<String, FetchError> {
        let path = self.path_of(segments);
        tracing::debug!(path = %path.display(), "reading local table file");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                location: path.display().to_string(),
                source,
            })
    }

    fn sibling(&self, segment: &str) -> Self {
        let parent = self.root.parent().unwrap_or_else(|| Path::new(""));
        Self::new(parent.join(segment))
    }
}
