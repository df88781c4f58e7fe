use std::fs;
use std::path::{Path, PathBuf};
use log::{info, warn};

use crate::error::Result;
use crate::formatter::format_record;
use crate::model::{Member, Record};
use crate::pipeline::{load_batch, save_batch};
use crate::text::sanitize_filename;

/// Converts every persisted batch in `input_dir` into one text document per
/// record under `output_dir`. Returns the number of documents written.
///
/// When `input_dir` holds no batches, a small sample batch is written first
/// so there is always something to process.
pub fn reprocess_all(input_dir: &Path, output_dir: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir)?;

    let mut batch_files = find_batch_files(input_dir);
    if batch_files.is_empty() {
        info!("No batch files found in {:?}", input_dir);
        batch_files.push(create_sample_batch(input_dir)?);
    }

    info!("Processing {} batch files...", batch_files.len());
    let mut total_processed = 0;

    for batch_file in &batch_files {
        info!("Processing batch: {:?}", batch_file);
        let records = match load_batch(batch_file) {
            Ok(records) => records,
            Err(e) => {
                warn!("Skipping unreadable batch {:?}: {}", batch_file, e);
                continue;
            }
        };
        info!("  Found {} classes in batch", records.len());

        for record in &records {
            if record.name.trim().is_empty() {
                warn!("  Skipping entry with no class name");
                continue;
            }

            let safe_name = sanitize_filename(record.name.trim());
            if safe_name.is_empty() {
                warn!("  Skipping {:?}: nothing left after sanitizing", record.name);
                continue;
            }

            let output_file = output_dir.join(format!("{}.txt", safe_name));
            fs::write(&output_file, format_record(record))?;
            total_processed += 1;
            info!("  Created: {:?}", output_file);
        }
    }

    info!("Processed {} classes in total", total_processed);
    Ok(total_processed)
}

/// `batch_*.json` files directly inside `dir`, sorted by name. A missing or
/// unreadable directory has no batches.
pub fn find_batch_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with("batch_") && n.ends_with(".json"))
        })
        .collect();
    files.sort();
    files
}

/// Writes the fixed two-class sample as `batch_001.json` in `input_dir`.
pub fn create_sample_batch(input_dir: &Path) -> Result<PathBuf> {
    let path = save_batch(&sample_records(), 1, input_dir)?;
    info!("Created sample batch file: {:?}", path);
    Ok(path)
}

pub fn sample_records() -> Vec<Record> {
    vec![
        Record {
            name: "GameObject".to_string(),
            description: "Base class for all entities in Unity scenes.".to_string(),
            properties: vec![
                Member::new("transform", "The Transform attached to this GameObject."),
                Member::new("activeSelf", "The local active state of this GameObject."),
            ],
            methods: vec![
                Member::new(
                    "GetComponent",
                    concat!(
                        "Returns the component of Type type if the game object ",
                        "has one attached, null if it doesn't."
                    ),
                ),
                Member::new("SetActive", "Activates/Deactivates the GameObject."),
            ],
            constructors: Vec::new(),
            examples: vec![
                concat!(
                    "using UnityEngine;\n\n",
                    "public class Example : MonoBehaviour {\n",
                    "    void Start() {\n",
                    "        GameObject obj = new GameObject();\n",
                    "        obj.name = \"Example Object\";\n",
                    "    }\n",
                    "}"
                )
                .to_string(),
            ],
            source_url: "https://docs.unity3d.com/ScriptReference/GameObject.html".to_string(),
        },
        Record {
            name: "Transform".to_string(),
            description: "Position, rotation and scale of an object.".to_string(),
            properties: vec![
                Member::new("position", "The position of the transform in world space."),
                Member::new("rotation", "The rotation of the transform in world space."),
                Member::new("localScale", "The scale of the transform relative to the parent."),
            ],
            methods: vec![
                Member::new(
                    "Translate",
                    "Moves the transform in the direction and distance of translation.",
                ),
                Member::new(
                    "Rotate",
                    concat!(
                        "Applies a rotation of eulerAngles degrees around the ",
                        "transform's local z, x and y axis."
                    ),
                ),
            ],
            constructors: Vec::new(),
            examples: vec![
                concat!(
                    "using UnityEngine;\n\n",
                    "public class Example : MonoBehaviour {\n",
                    "    void Update() {\n",
                    "        transform.Translate(Vector3.forward * Time.deltaTime);\n",
                    "    }\n",
                    "}"
                )
                .to_string(),
            ],
            source_url: "https://docs.unity3d.com/ScriptReference/Transform.html".to_string(),
        },
    ]
}
