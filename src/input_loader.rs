use std::fs;
use std::path::Path;
use log::info;

use crate::error::{Error, Result};

/// Reads a newline-delimited identifier list. Lines are trimmed and blank
/// lines skipped.
pub fn load_identifiers<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
    let path_ref = filename.as_ref();
    if !path_ref.exists() {
        return Err(Error::MissingInput(path_ref.to_path_buf()));
    }

    let content = fs::read_to_string(path_ref)?;
    let identifiers = parse_identifiers(&content);
    info!("Loaded {} classes to scrape from {:?}", identifiers.len(), path_ref);
    Ok(identifiers)
}

pub fn parse_identifiers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
