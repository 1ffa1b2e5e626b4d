//! Scenario and model files, and report output
//!
//! Input files are YAML (`.yaml`, `.yml`) or JSON (`.json`). Reports are
//! written into an output directory created on demand:
//!
//! ```text
//! <output>/
//!   balance_sheet.csv    # deterministic or replayed run
//!   cash_flow.csv
//!   successions.json
//!   results.csv          # Monte-Carlo batch
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use patrim_core::{Model, ModelConfig, Scenario};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
    UnsupportedFormat(PathBuf),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {}", msg),
            StorageError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::UnsupportedFormat(path) => write!(
                f,
                "Unsupported file format: {} (expected .yaml, .yml or .json)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(StorageError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, StorageError> {
        match self {
            FileFormat::Yaml => {
                serde_saphyr::from_str(content).map_err(|e| StorageError::Parse(e.to_string()))
            }
            FileFormat::Json => {
                serde_json::from_str(content).map_err(|e| StorageError::Parse(e.to_string()))
            }
        }
    }
}

/// Read and deserialize a YAML or JSON file
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let format = FileFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    format
        .parse(&content)
        .map_err(|e| StorageError::Parse(format!("Failed to parse {}: {}", path.display(), e)))
}

pub fn load_scenario(path: &Path) -> Result<Scenario, StorageError> {
    load(path)
}

/// Model from a configuration file, or the default French model without one
pub fn load_model(path: Option<&Path>) -> color_eyre::Result<Model> {
    let config = match path {
        Some(path) => load::<ModelConfig>(path)?,
        None => ModelConfig::default(),
    };
    Ok(Model::from_config(config)?)
}

/// Directory that receives the reports
pub struct OutputDirectory {
    root: PathBuf,
}

impl OutputDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| StorageError::Io(format!("Failed to create output directory: {}", e)))
    }

    /// Create `name` in the directory and fill it through `write`
    pub fn write_with<F>(&self, name: &str, write: F) -> Result<PathBuf, StorageError>
    where
        F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
    {
        self.init()?;
        let path = self.root.join(name);
        let file = File::create(&path)
            .map_err(|e| StorageError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }

    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, StorageError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize {}: {}", name, e)))?;
        self.write_with(name, |w| w.write_all(json.as_bytes()))
    }
}
