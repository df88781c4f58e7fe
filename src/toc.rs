use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, USER_AGENT};
use serde_json::Value;
use log::info;

use crate::config::Config;
use crate::error::{Error, Result};

const TOC_PREFIX: &str = "var toc = ";

/// Titles that group entries rather than name one.
const CATEGORY_TITLES: [&str; 9] = [
    "Classes", "Structs", "Enums", "Interfaces", "Namespaces",
    "Variables", "Functions", "Properties", "Events",
];

/// Downloads the table of contents and writes its entry titles, one per
/// line, to `output`. Returns the number of titles written.
pub fn download_and_write(config: &Config, output: &Path) -> Result<usize> {
    let url = config.toc_url();
    info!("Downloading TOC from: {}", url);

    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    let content = client
        .get(&url)
        .header(USER_AGENT, HeaderValue::from_str(&config.user_agent)?)
        .send()?
        .error_for_status()?
        .text()?;
    info!("Downloaded {} characters", content.len());

    let titles = entry_titles(&content)?;
    info!("Found {} total items", titles.len());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut body = titles.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(output, body)?;
    info!("All items saved to {:?}", output);

    Ok(titles.len())
}

/// Parses a `toc.js` payload and returns the sorted, deduplicated titles
/// under the first top-level node.
pub fn entry_titles(content: &str) -> Result<Vec<String>> {
    let json = strip_assignment(content);
    let toc: Value = serde_json::from_str(json)?;

    let root = toc
        .get("children")
        .and_then(Value::as_array)
        .and_then(|children| children.first())
        .ok_or_else(|| Error::Toc("no children found in TOC".to_string()))?;

    let mut titles = BTreeSet::new();
    collect_titles(root, &mut titles);
    Ok(titles.into_iter().collect())
}

fn strip_assignment(content: &str) -> &str {
    let trimmed = content.trim();
    let body = trimmed.strip_prefix(TOC_PREFIX).unwrap_or(trimmed);
    body.trim_end().trim_end_matches(';')
}

fn collect_titles(node: &Value, titles: &mut BTreeSet<String>) {
    if let Some(title) = node.get("title").and_then(Value::as_str) {
        if !title.is_empty() && !CATEGORY_TITLES.contains(&title) {
            titles.insert(title.to_string());
        }
    }

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            collect_titles(child, titles);
        }
    }
}
