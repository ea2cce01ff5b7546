//! User settings stored in `config.yaml`
//!
//! Directory structure:
//! ~/.tariffscope/
//!   config.yaml          # Sources, export directory, default selections
//!   tariffscope.log      # Rotated application log
//!   exports/             # Default export target

use std::path::{Path, PathBuf};
#[cfg(feature = "remote")]
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tariffscope_core::Selections;
use tariffscope_core::source::{DEFAULT_ALLOWANCES_SEGMENT, Source, TableLoader};
#[cfg(feature = "remote")]
use tariffscope_core::source::HttpMirror;

/// Settings file name inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Directory under the data directory that receives exports by default
pub const EXPORT_DIR: &str = "exports";

/// Remote index probe timeout unless configured otherwise
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

fn default_table_dir() -> String {
    "tables".to_string()
}

/// One candidate location for the table tree, tried in file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSetting {
    /// A directory holding `index.json`; relative paths resolve against the working directory
    Local { path: PathBuf },
    /// Any HTTP(S) base URL
    Url { url: String },
    /// `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{dir}`
    GithubRaw {
        owner: String,
        repo: String,
        branch: String,
        #[serde(default = "default_table_dir")]
        dir: String,
    },
}

impl SourceSetting {
    fn github(branch: &str) -> Self {
        SourceSetting::GithubRaw {
            owner: "stfnrpplngr".to_string(),
            repo: "TVData".to_string(),
            branch: branch.to_string(),
            dir: default_table_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sources: Vec<SourceSetting>,
    /// Timeout for remote index probes; `0` disables it
    pub remote_probe_timeout_secs: u64,
    pub allowances_segment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// Selections the dashboard starts with
    pub defaults: Selections,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceSetting::Local {
                    path: PathBuf::from(default_table_dir()),
                },
                SourceSetting::github("main"),
                SourceSetting::github("Comparing-Remuneration-Tables"),
            ],
            remote_probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            allowances_segment: DEFAULT_ALLOWANCES_SEGMENT.to_string(),
            export_dir: None,
            defaults: Selections::default(),
        }
    }
}

impl Settings {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Load settings from `path`, returning defaults if the file doesn't exist or fails to parse.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Where exports land unless a path is given explicitly
    pub fn export_dir(&self, data_dir: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| data_dir.join(EXPORT_DIR))
    }

    /// Candidate sources in configured order.
    ///
    /// Remote entries that fail to parse, or appear in a build without remote
    /// support, are skipped with a warning.
    pub fn candidates(&self) -> Vec<Source> {
        self.sources
            .iter()
            .filter_map(|setting| self.to_source(setting))
            .collect()
    }

    #[cfg(feature = "remote")]
    fn probe_timeout(&self) -> Option<Duration> {
        match self.remote_probe_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    #[cfg(feature = "remote")]
    fn to_source(&self, setting: &SourceSetting) -> Option<Source> {
        let mirror = match setting {
            SourceSetting::Local { path } => return Some(Source::local(path)),
            SourceSetting::Url { url } => HttpMirror::new(url),
            SourceSetting::GithubRaw {
                owner,
                repo,
                branch,
                dir,
            } => HttpMirror::github_raw(owner, repo, branch, dir),
        };
        match mirror {
            Ok(mirror) => Some(Source::Http(mirror.with_probe_timeout(self.probe_timeout()))),
            Err(e) => {
                tracing::warn!(?setting, error = %e, "skipping source with invalid URL");
                None
            }
        }
    }

    #[cfg(not(feature = "remote"))]
    fn to_source(&self, setting: &SourceSetting) -> Option<Source> {
        match setting {
            SourceSetting::Local { path } => Some(Source::local(path)),
            _ => {
                tracing::warn!(?setting, "remote sources are not supported in this build");
                None
            }
        }
    }

    pub fn loader(&self) -> TableLoader {
        TableLoader::new(self.candidates()).with_allowances_segment(self.allowances_segment.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tariffscope_core::ReferenceMode;
    use tariffscope_core::simulation::TimeMode;

    #[test]
    fn test_defaults_list_local_then_mirrors() {
        let settings = Settings::default();
        assert_eq!(settings.sources.len(), 3);
        assert!(matches!(settings.sources[0], SourceSetting::Local { .. }));
        assert_eq!(settings.allowances_segment, "allowances");
        assert_eq!(
            settings.export_dir(Path::new("/data")),
            PathBuf::from("/data/exports")
        );
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
sources:
  - kind: local
    path: /srv/tables
  - kind: github_raw
    owner: someone
    repo: tables
    branch: dev
export_dir: /tmp/out
defaults:
  tariff_a: TV-L
  tariff_b: TVöD-VKA
  reference: B_MINUS_A
  simulation:
    years: 25
    time_mode: standard
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.sources.len(), 2);
        assert_eq!(
            settings.sources[1],
            SourceSetting::GithubRaw {
                owner: "someone".to_string(),
                repo: "tables".to_string(),
                branch: "dev".to_string(),
                dir: "tables".to_string(),
            }
        );
        assert_eq!(settings.remote_probe_timeout_secs, DEFAULT_PROBE_TIMEOUT_SECS);
        assert_eq!(settings.export_dir(Path::new("/data")), PathBuf::from("/tmp/out"));
        assert_eq!(settings.defaults.tariff_a, "TV-L");
        assert_eq!(settings.defaults.reference, ReferenceMode::BMinusA);
        assert_eq!(settings.defaults.simulation.years, 25);
        assert_eq!(settings.defaults.simulation.time_mode, TimeMode::Standard);
        assert_eq!(settings.defaults.simulation.work_factor, 1.0);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Settings::path(dir.path());
        std::fs::write(&path, "sources: [unterminated").unwrap();

        assert_eq!(Settings::load_or_default(&path), Settings::default());
        assert_eq!(
            Settings::load_or_default(&dir.path().join("missing.yaml")),
            Settings::default()
        );
    }

    #[test]
    fn test_round_trip_through_yaml() {
        let mut settings = Settings::default();
        settings.defaults.tariff_a = "TV-L".to_string();
        settings.remote_probe_timeout_secs = 0;

        let yaml = settings.to_yaml().unwrap();
        assert_eq!(Settings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    fn test_candidates_keep_order() {
        let settings = Settings {
            sources: vec![
                SourceSetting::Local {
                    path: PathBuf::from("a"),
                },
                SourceSetting::Local {
                    path: PathBuf::from("b"),
                },
                SourceSetting::Local {
                    path: PathBuf::from("a"),
                },
            ],
            ..Settings::default()
        };
        assert_eq!(settings.candidates().len(), 3);
        let loader = settings.loader();
        assert_eq!(loader.candidates(), &[Source::local("a"), Source::local("b")]);
    }

    #[cfg(feature = "remote")]
    #[test]
    fn test_invalid_url_is_skipped() {
        let settings = Settings {
            sources: vec![
                SourceSetting::Url {
                    url: "not a url".to_string(),
                },
                SourceSetting::Url {
                    url: "https://example.org/tables".to_string(),
                },
            ],
            ..Settings::default()
        };
        let candidates = settings.candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].to_string(), "https://example.org/tables");
    }
}
