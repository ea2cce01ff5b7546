use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::adapter;
use crate::error::{Attempt, FetchError, LoadError, ResolutionError};
use crate::model::{Grid, Metadata, Table};

use super::index::IndexError;
use super::{
    ADVANCEMENT_FILE, DEFAULT_ALLOWANCES_SEGMENT, INDEX_FILE, META_FILE, Source, TABLE_FILE,
    TableSource, dedup_candidates, parse_index, try_in_order,
};

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("{}", .0.reason())]
    Fetch(FetchError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug)]
struct Resolved {
    /// Position of the winning candidate
    index: usize,
    names: Vec<String>,
}

/// Auxiliary allowance table referenced from a tariff's metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllowanceTable {
    pub name: String,
    /// `false` when the allowance files could not be fetched
    pub available: bool,
    pub metadata: Metadata,
    pub grid: Grid,
}

impl AllowanceTable {
    fn unavailable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Resolves a table source once and caches every table loaded from it.
///
/// Create one loader per session and share it by reference; the resolved
/// base and the cache live exactly as long as the loader.
pub struct TableLoader<S: TableSource = Source> {
    candidates: Vec<S>,
    allowances_segment: String,
    resolved: OnceCell<Resolved>,
    cache: Mutex<FxHashMap<String, Arc<Table>>>,
}

impl<S: TableSource + PartialEq> TableLoader<S> {
    /// Loader over `candidates` in priority order; repeats are dropped.
    pub fn new(candidates: Vec<S>) -> Self {
        Self {
            candidates: dedup_candidates(candidates),
            allowances_segment: DEFAULT_ALLOWANCES_SEGMENT.to_string(),
            resolved: OnceCell::new(),
            cache: Mutex::new(FxHashMap::default()),
        }
    }
}

impl<S: TableSource> TableLoader<S> {
    pub fn with_allowances_segment(mut self, segment: impl Into<String>) -> Self {
        self.allowances_segment = segment.into();
        self
    }

    pub fn candidates(&self) -> &[S] {
        &self.candidates
    }

    /// The first candidate exposing a non-empty index listing.
    ///
    /// Probing happens on the first call only. Later calls return the same
    /// source, and a failed resolution is retried on the next call.
    pub async fn resolve_base(&self) -> Result<&S, ResolutionError> {
        let resolved = self.resolved.get_or_try_init(|| self.probe()).await?;
        Ok(&self.candidates[resolved.index])
    }

    /// Base source once resolved, without probing
    pub fn resolved_base(&self) -> Option<&S> {
        self.resolved.get().map(|r| &self.candidates[r.index])
    }

    async fn probe(&self) -> Result<Resolved, ResolutionError> {
        let outcome = try_in_order(&self.candidates, |candidate| async move {
            tracing::debug!(candidate = %candidate, "probing table index");
            let text = candidate.probe_index().await.map_err(ProbeError::Fetch)?;
            Ok::<_, ProbeError>(parse_index(&text)?)
        })
        .await;

        match outcome {
            Ok((index, names)) => {
                tracing::info!(
                    base = %self.candidates[index],
                    tables = names.len(),
                    "resolved table source"
                );
                Ok(Resolved { index, names })
            }
            Err(failure) => Err(ResolutionError {
                attempts: failure
                    .attempts
                    .into_iter()
                    .map(|(location, err)| Attempt {
                        location: format!("{location}/{INDEX_FILE}"),
                        reason: err.to_string(),
                    })
                    .collect(),
            }),
        }
    }

    /// Table names listed in the resolved index, in listing order
    pub async fn table_names(&self) -> Result<&[String], ResolutionError> {
        self.resolve_base().await?;
        Ok(self
            .resolved
            .get()
            .map(|r| r.names.as_slice())
            .unwrap_or_default())
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, Arc<Table>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cached(&self, name: &str) -> Option<Arc<Table>> {
        self.cache().get(name).cloned()
    }

    /// Names currently held in the cache, sorted
    pub fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cache().keys().cloned().collect();
        names.sort();
        names
    }

    /// Load `name` from the resolved base, serving repeats from the cache.
    ///
    /// The salary grid, duration grid and metadata are fetched concurrently.
    /// Nothing is cached unless all three arrive and parse.
    pub async fn load_table(&self, name: &str) -> Result<Arc<Table>, LoadError> {
        if let Some(table) = self.cached(name) {
            tracing::debug!(table = name, "table served from cache");
            return Ok(table);
        }
        let base = self.resolve_base().await?;
        let fetch_failed = |source| LoadError::Fetch {
            name: name.to_string(),
            source,
        };

        let table_path = [name, TABLE_FILE];
        let adv_path = [name, ADVANCEMENT_FILE];
        let meta_path = [name, META_FILE];
        let (table_csv, adv_csv, meta_csv) = tokio::try_join!(
            base.fetch_text(&table_path),
            base.fetch_text(&adv_path),
            base.fetch_text(&meta_path),
        )
        .map_err(fetch_failed)?;

        let table = adapter::parse_table(name, &table_csv, &adv_csv, &meta_csv).map_err(|e| {
            fetch_failed(FetchError::Decode {
                location: format!("{base}/{name}"),
                message: e.to_string(),
            })
        })?;

        tracing::info!(
            table = name,
            groups = table.grid.rows().len(),
            steps = table.grid.steps().len(),
            "loaded table"
        );
        let table = Arc::new(table);
        let mut cache = self.cache();
        Ok(cache.entry(name.to_string()).or_insert(table).clone())
    }

    /// Load the allowance table `name` from the allowances sibling of the base.
    ///
    /// Missing or unreadable allowance files give an unavailable entry rather
    /// than an error; only an unresolvable base fails.
    pub async fn load_allowance(&self, name: &str) -> Result<AllowanceTable, ResolutionError> {
        let base = self.resolve_base().await?.sibling(&self.allowances_segment);

        let meta_path = [name, META_FILE];
        let table_path = [name, TABLE_FILE];
        let fetched = tokio::try_join!(base.fetch_text(&meta_path), base.fetch_text(&table_path));
        let (meta_csv, table_csv) = match fetched {
            Ok(texts) => texts,
            Err(err) => {
                tracing::debug!(allowance = name, error = %err, "allowance unavailable");
                return Ok(AllowanceTable::unavailable(name));
            }
        };

        let parsed = adapter::parse_metadata(&meta_csv)
            .and_then(|metadata| Ok((metadata, adapter::parse_grid(&table_csv)?)));
        match parsed {
            Ok((metadata, grid)) => Ok(AllowanceTable {
                name: name.to_string(),
                available: true,
                metadata,
                grid,
            }),
            Err(err) => {
                tracing::warn!(allowance = name, error = %err, "allowance files do not parse");
                Ok(AllowanceTable::unavailable(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source keyed by joined path, counting every fetch
    #[derive(Debug, Default)]
    struct MemorySource {
        label: String,
        files: FxHashMap<String, String>,
        fetches: AtomicUsize,
    }

    impl MemorySource {
        fn new(label: &str, files: &[(&str, &str)]) -> Self {
            Self {
                label: label.to_string(),
                files: files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl PartialEq for MemorySource {
        fn eq(&self, other: &Self) -> bool {
            self.label == other.label
        }
    }

    impl fmt::Display for MemorySource {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.label)
        }
    }

    impl TableSource for MemorySource {
        async fn fetch_text(&self, segments: &[&str]) -> Result<String, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let key = segments.join("/");
            self.files.get(&key).cloned().ok_or(FetchError::Status {
                location: format!("{}/{key}", self.label),
                status: 404,
            })
        }

        fn sibling(&self, segment: &str) -> Self {
            let prefix = format!("../{segment}/");
            let files = self
                .files
                .iter()
                .filter_map(|(k, v)| k.strip_prefix(&prefix).map(|rest| (rest.to_string(), v.clone())))
                .collect();
            Self {
                label: format!("{}/../{segment}", self.label),
                files,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    const TABLE: &str = "EG,1,2\nE5,2500,2600\n";
    const ADV: &str = "EG,1,2\nE5,1,2\n";
    const META: &str = "key,value\nversion,2024\nallowances,Schicht\n";

    fn full_source(label: &str) -> MemorySource {
        MemorySource::new(
            label,
            &[
                ("index.json", r#"["TV-L"]"#),
                ("TV-L/Table.csv", TABLE),
                ("TV-L/Adv.csv", ADV),
                ("TV-L/Meta.csv", META),
                ("../allowances/Schicht/Meta.csv", "key,value\nlabel_de,Schichtzulage\n"),
                ("../allowances/Schicht/Table.csv", "EG,1\nE5,40\n"),
            ],
        )
    }

    #[tokio::test]
    async fn test_resolves_first_candidate_with_listing() {
        let loader = TableLoader::new(vec![
            MemorySource::new("missing", &[]),
            MemorySource::new("empty", &[("index.json", "[]")]),
            full_source("good"),
            full_source("later"),
        ]);

        let base = loader.resolve_base().await.unwrap();
        assert_eq!(base.label, "good");
        assert_eq!(loader.table_names().await.unwrap(), &["TV-L".to_string()]);
        assert_eq!(loader.candidates()[3].fetches(), 0);
    }

    #[tokio::test]
    async fn test_resolution_is_not_repeated() {
        let loader = TableLoader::new(vec![full_source("only")]);
        loader.resolve_base().await.unwrap();
        loader.resolve_base().await.unwrap();
        loader.table_names().await.unwrap();
        assert_eq!(loader.candidates()[0].fetches(), 1);
    }

    #[tokio::test]
    async fn test_resolution_error_lists_candidates() {
        let loader = TableLoader::new(vec![
            MemorySource::new("one", &[]),
            MemorySource::new("two", &[("index.json", "{}")]),
        ]);

        let err = loader.resolve_base().await.unwrap_err();
        assert_eq!(err.attempts.len(), 2);
        assert_eq!(err.attempts[0].location, "one/index.json");
        assert_eq!(err.attempts[0].reason, "HTTP status 404");
        assert!(err.attempts[1].reason.starts_with("index is not a JSON array"));
    }

    #[tokio::test]
    async fn test_duplicate_candidates_are_dropped() {
        let loader = TableLoader::new(vec![full_source("a"), full_source("a"), full_source("b")]);
        assert_eq!(loader.candidates().len(), 2);
    }

    #[tokio::test]
    async fn test_load_table_caches() {
        let loader = TableLoader::new(vec![full_source("mem")]);

        let first = loader.load_table("TV-L").await.unwrap();
        let fetches = loader.candidates()[0].fetches();
        let second = loader.load_table("TV-L").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.candidates()[0].fetches(), fetches);
        assert_eq!(first.grid.number("E5", "2"), Some(2600.0));
        assert_eq!(first.duration("E5", "1"), Some(1.0));
        assert_eq!(first.metadata.version(), Some("2024"));
        assert_eq!(loader.cached_names(), vec!["TV-L"]);
    }

    #[tokio::test]
    async fn test_partial_table_is_not_cached() {
        let loader = TableLoader::new(vec![MemorySource::new(
            "mem",
            &[
                ("index.json", r#"["Half"]"#),
                ("Half/Table.csv", TABLE),
                ("Half/Meta.csv", META),
            ],
        )]);

        let err = loader.load_table("Half").await.unwrap_err();
        match err {
            LoadError::Fetch { name, source } => {
                assert_eq!(name, "Half");
                assert_eq!(source.location(), "mem/Half/Adv.csv");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(loader.cached("Half").is_none());
    }

    #[tokio::test]
    async fn test_allowances_from_sibling() {
        let loader = TableLoader::new(vec![full_source("mem")]);

        let found = loader.load_allowance("Schicht").await.unwrap();
        assert!(found.available);
        assert_eq!(found.metadata.label(), "Schichtzulage");
        assert_eq!(found.grid.number("E5", "1"), Some(40.0));

        let missing = loader.load_allowance("Nacht").await.unwrap();
        assert!(!missing.available);
        assert_eq!(missing.name, "Nacht");
    }
}
