use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::{info, warn};

use crate::error::Result;
use crate::extractor::Extractor;
use crate::fetcher::PageSource;
use crate::model::Record;

/// File name of a persisted batch, e.g. `batch_007.json`.
pub fn batch_file_name(batch_num: usize) -> String {
    format!("batch_{:03}.json", batch_num)
}

/// Sequential fetch → extract driver.
pub struct Pipeline<S: PageSource> {
    source: S,
    extractor: Extractor,
}

impl<S: PageSource> Pipeline<S> {
    pub fn new(source: S, extractor: Extractor) -> Self {
        Pipeline { source, extractor }
    }

    /// Scrapes `identifiers` in order. Identifiers whose fetch fails are
    /// logged and left out of the result.
    pub fn run(&self, identifiers: &[String]) -> Vec<Record> {
        let total = identifiers.len();
        let mut records = Vec::with_capacity(total);

        for (i, identifier) in identifiers.iter().enumerate() {
            info!("Processing {}/{}: {}", i + 1, total, identifier);

            match self.source.fetch(identifier) {
                Ok(html) => {
                    records.push(self.extractor.extract(&html, identifier));
                    info!("  Successfully scraped {}", identifier);
                }
                Err(e) => {
                    warn!("  Failed to scrape {}: {}", identifier, e);
                }
            }
        }

        info!("Completed scraping {} out of {} classes", records.len(), total);
        records
    }

    /// Runs over `identifiers` and persists everything as batch 1.
    ///
    /// `batch_size` is only reported; splitting a run into several batch
    /// files is not implemented.
    pub fn run_and_save(
        &self,
        identifiers: &[String],
        batch_size: usize,
        output_dir: &Path,
    ) -> Result<(Vec<Record>, PathBuf)> {
        info!("Scraping {} classes (batch size {})", identifiers.len(), batch_size);
        let records = self.run(identifiers);
        let path = save_batch(&records, 1, output_dir)?;
        Ok((records, path))
    }
}

/// Writes `records` to `output_dir/batch_NNN.json`, creating the directory
/// if needed.
pub fn save_batch(records: &[Record], batch_num: usize, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let filename = output_dir.join(batch_file_name(batch_num));

    let mut writer = BufWriter::new(File::create(&filename)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;

    info!("Saved batch {} with {} classes to {:?}", batch_num, records.len(), filename);
    Ok(filename)
}

/// Reads one persisted batch back into records.
pub fn load_batch(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
