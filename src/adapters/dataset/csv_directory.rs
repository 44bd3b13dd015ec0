//! CSV dataset source reading files from a configured upload directory.
//!
//! A source reference is a file name relative to the directory. References
//! that would escape the directory are rejected. Parsing runs on the blocking
//! thread pool.

use async_trait::async_trait;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

use crate::domain::analysis::Dataset;
use crate::ports::{DatasetError, DatasetSource};

#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a source reference to a path inside the root directory.
    fn resolve(&self, source_ref: &str) -> Result<PathBuf, DatasetError> {
        let relative = Path::new(source_ref.trim());
        let is_plain = !source_ref.trim().is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(DatasetError::InvalidReference(source_ref.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DatasetSource for CsvDirectorySource {
    async fn load(&self, source_ref: &str) -> Result<Dataset, DatasetError> {
        let path = self.resolve(source_ref)?;
        let reference = source_ref.to_string();

        tokio::task::spawn_blocking(move || read_csv(&path, &reference))
            .await
            .map_err(|e| DatasetError::Unreadable(format!("reader task failed: {}", e)))?
    }
}

fn read_csv(path: &Path, reference: &str) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DatasetError::NotFound(reference.to_string()),
        _ => DatasetError::Unreadable(format!("{}: {}", reference, e)),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(strip_bom(file));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DatasetError::Unreadable(format!("{}: {}", reference, e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DatasetError::Unreadable(format!("{}: {}", reference, e)))?;
        rows.push(
            record
                .iter()
                .map(|cell| Some(cell.to_string()).filter(|c| !c.trim().is_empty()))
                .collect(),
        );
    }

    Ok(Dataset::new(headers, rows))
}

/// Skips a UTF-8 byte order mark, which spreadsheet exports often prepend.
fn strip_bom(file: File) -> impl std::io::Read {
    use std::io::{BufRead, BufReader};

    let mut reader = BufReader::new(file);
    if let Ok(buf) = reader.fill_buf() {
        if buf.starts_with(&[0xEF, 0xBB, 0xBF]) {
            reader.consume(3);
        }
    }
    reader
}
