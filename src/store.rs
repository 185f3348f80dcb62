//! # Artifact store
//! File layout of the pipeline under one data directory:
//!
//! ```text
//! <data_dir>/collected/<source>_<YYYY-MM-DD>.json
//! <data_dir>/processed/sentiment_results.json
//! <data_dir>/processed/trend_summary.json
//! <data_dir>/processed/report.md
//! <data_dir>/processed/daily_report_<YYYY-MM-DD>.json
//! ```
//!
//! Writes go to a sibling `.tmp` file first and are renamed into place, so a
//! later stage never observes a half-written artifact.

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};
use crate::source::Source;

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn collected_dir(&self) -> PathBuf {
        self.root.join("collected")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    pub fn collected_file(&self, source: Source, date: NaiveDate) -> PathBuf {
        self.collected_dir()
            .join(format!("{}_{}.json", source.as_str(), date.format("%Y-%m-%d")))
    }

    pub fn scored_file(&self) -> PathBuf {
        self.processed_dir().join("sentiment_results.json")
    }

    pub fn trend_summary_file(&self) -> PathBuf {
        self.processed_dir().join("trend_summary.json")
    }

    pub fn report_file(&self) -> PathBuf {
        self.processed_dir().join("report.md")
    }

    pub fn daily_report_file(&self, date: NaiveDate) -> PathBuf {
        self.processed_dir()
            .join(format!("daily_report_{}.json", date.format("%Y-%m-%d")))
    }

    /// Every collected batch for `source`, sorted by file name (i.e. by date).
    /// A missing `collected/` directory means nothing was collected yet.
    pub fn collected_files(&self, source: Source) -> PipelineResult<Vec<PathBuf>> {
        let dir = self.collected_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PipelineError::DataUnavailable {
                    path: dir,
                    source: e,
                })
            }
        };

        let prefix = format!("{}_", source.as_str());
        let mut out: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                let name_ok = p
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix));
                let ext_ok = p.extension().and_then(|s| s.to_str()) == Some("json");
                name_ok && ext_ok
            })
            .collect();
        out.sort();
        Ok(out)
    }
}

/// Read a whole artifact as text.
pub fn read_text(path: &Path) -> PipelineResult<String> {
    fs::read_to_string(path).map_err(|e| PipelineError::DataUnavailable {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and deserialize a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> PipelineResult<T> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).map_err(|e| PipelineError::malformed(path, e))
}

/// Atomically replace `path` with `contents`, creating parent directories.
pub fn write_text_atomic(path: &Path, contents: &str) -> PipelineResult<()> {
    let werr = |e: std::io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(werr)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).map_err(werr)?;
    fs::rename(&tmp, path).map_err(werr)
}

/// Serialize `value` as compact JSON and write it atomically.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> PipelineResult<()> {
    let body = serde_json::to_string(value).map_err(|e| PipelineError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    write_text_atomic(path, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_file_names() {
        let store = ArtifactStore::new("data");
        let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            store.collected_file(Source::Reddit, d),
            PathBuf::from("data/collected/reddit_2025-03-07.json")
        );
        assert_eq!(
            store.daily_report_file(d),
            PathBuf::from("data/processed/daily_report_2025-03-07.json")
        );
    }

    #[test]
    fn collected_files_filters_by_prefix_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let dir = store.collected_dir();
        fs::create_dir_all(&dir).unwrap();
        for name in [
            "news_2025-01-02.json",
            "news_2025-01-01.json",
            "twitter_2025-01-01.json",
            "news_notes.txt",
        ] {
            fs::write(dir.join(name), "[]").unwrap();
        }
        let files = store.collected_files(Source::News).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["news_2025-01-01.json", "news_2025-01-02.json"]);
    }

    #[test]
    fn missing_collected_dir_is_empty_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("nope"));
        assert!(store.collected_files(Source::Twitter).unwrap().is_empty());
    }

    #[test]
    fn atomic_write_leaves_no_tmp_file() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("processed/out.json");
        write_json(&p, &vec![1, 2, 3]).unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "[1,2,3]");
        assert!(!tmp.path().join("processed/out.json.tmp").exists());
    }

    #[test]
    fn read_json_maps_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.json");
        let err = read_json::<Vec<u8>>(&missing).unwrap_err();
        assert!(err.is_data_unavailable());

        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        let err = read_json::<Vec<u8>>(&bad).unwrap_err();
        assert!(err.is_malformed());
    }
}
