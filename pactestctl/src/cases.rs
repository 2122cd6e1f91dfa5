use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Columns every test-case CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "description",
    "file",
    "dest_host",
    "src_ip",
    "expected_output",
    "required_flags",
];

/// One row of a `*.test.csv` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub description: String,
    /// Wildcard over PAC paths relative to the PAC directory.
    pub file: String,
    pub dest_host: String,
    pub src_ip: String,
    pub expected_output: String,
    #[serde(default)]
    pub required_flags: String,
}

impl TestCase {
    /// The engine flag this case depends on, if any.
    pub fn required_flag(&self) -> Option<&str> {
        Some(self.required_flags.trim()).filter(|flag| !flag.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("failed to open {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Parses test cases, rejecting the whole source when a column is missing.
pub fn read_cases<R: Read>(source: R) -> Result<Vec<TestCase>, CaseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CaseError::MissingColumns(missing));
    }

    reader
        .into_deserialize()
        .map(|row| row.map_err(CaseError::from))
        .collect()
}

pub fn load_case_file(path: &Path) -> Result<Vec<TestCase>, CaseError> {
    let file = File::open(path).map_err(|source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_cases(file)
}
