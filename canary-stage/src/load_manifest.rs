/// `load_manifest`: reads the CSV/TSV manifest into [`ManifestRow`]s.
///
/// The delimiter is chosen from the file extension before the file is opened,
/// so an unsupported manifest fails before anything touches the network.
/// Header names must match the manifest columns exactly (`"S3 Bucket Name"`,
/// `"In Scope"`, ...). Only `In Scope` may be missing; every other missing
/// column fails the whole load. A single record that cannot be decoded is
/// logged with its line number and skipped, the remaining rows still load.
use canary_stage_core::ManifestRow;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("unsupported file type for {path:?}. Please use only one of CSV or TSV")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to open manifest {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read manifest header: {0}")]
    Header(#[source] csv::Error),

    #[error("manifest is missing required column '{column}'")]
    MissingColumn { column: &'static str },
}

/// Every column except `In Scope` must be present in the header.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Canary Domain",
    "FlockID",
    "FactoryAuthToken",
    "S3 Bucket Name",
    "File Path",
    "Filename",
    "Note",
    "AWSAccountID",
    "AWS Profile Name",
    "Token Type",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Csv,
    Tsv,
}

impl ManifestFormat {
    /// `.csv` or `.tsv`, any casing.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(ManifestFormat::Csv),
            Some("tsv") => Ok(ManifestFormat::Tsv),
            _ => Err(ManifestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            ManifestFormat::Csv => b',',
            ManifestFormat::Tsv => b'\t',
        }
    }
}

/// Parses manifest rows from any reader, preserving row order.
///
/// Header problems are fatal. Records are decoded one by one; a ragged or
/// undecodable record is logged and skipped. Extra trailing fields are ignored.
pub fn read_rows<R: std::io::Read>(
    reader: R,
    format: ManifestFormat,
) -> Result<Vec<ManifestRow>, ManifestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(format.delimiter())
        .from_reader(reader);

    let headers = reader.headers().map_err(ManifestError::Header)?.clone();
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|c| !headers.iter().any(|h| h == *c))
    {
        return Err(ManifestError::MissingColumn { column });
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<ManifestRow>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                let line = e.position().map(|p| p.line());
                error!(?line, error = %e, "Skipping manifest record that could not be decoded");
            }
        }
    }
    Ok(rows)
}

pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<ManifestRow>, ManifestError> {
    let path_ref = path.as_ref();
    let format = ManifestFormat::from_path(path_ref).map_err(|e| {
        error!(manifest_path = ?path_ref, "Unsupported manifest file type");
        e
    })?;
    info!(manifest_path = ?path_ref, ?format, "Loading manifest");

    let file = File::open(path_ref).map_err(|source| {
        error!(error = ?source, manifest_path = ?path_ref, "Failed to open manifest");
        ManifestError::Io {
            path: path_ref.to_path_buf(),
            source,
        }
    })?;

    let rows = read_rows(file, format).map_err(|e| {
        error!(error = %e, manifest_path = ?path_ref, "Failed to parse manifest");
        e
    })?;
    info!(manifest_path = ?path_ref, rows = rows.len(), "Manifest loaded");
    Ok(rows)
}
