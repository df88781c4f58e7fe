use std::path::PathBuf;

use crate::delay_manager::DelayRange;

pub const DEFAULT_BASE_URL: &str = "https://docs.unity3d.com/ScriptReference";
pub const DEFAULT_NAMESPACE_PREFIX: &str = "UnityEngine.";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
);

/// Settings shared by every stage of a run.
///
/// Each component takes what it needs from here at construction; nothing
/// reads global state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the documentation site, without a trailing slash.
    pub base_url: String,
    /// Namespace stripped from dotted identifiers when building the first URL candidate.
    pub namespace_prefix: String,
    pub delay: DelayRange,
    /// Carried for logging only; a run persists everything as one batch.
    pub batch_size: usize,
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
    pub log_file: PathBuf,
    pub class_list: PathBuf,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            namespace_prefix: DEFAULT_NAMESPACE_PREFIX.to_string(),
            delay: DelayRange::default(),
            batch_size: 100,
            data_dir: PathBuf::from("data"),
            index_dir: PathBuf::from("index"),
            log_file: PathBuf::from("scraper_log.txt"),
            class_list: PathBuf::from("unity_engine_classes.txt"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn toc_url(&self) -> String {
        format!("{}/docdata/toc.js", self.base_url.trim_end_matches('/'))
    }

    /// Canonical page address for an identifier.
    pub fn page_url(&self, identifier: &str) -> String {
        page_url(&self.base_url, identifier)
    }
}

pub fn page_url(base_url: &str, identifier: &str) -> String {
    format!("{}/{}.html", base_url.trim_end_matches('/'), identifier)
}
