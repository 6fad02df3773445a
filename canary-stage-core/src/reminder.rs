//! The reminder (memo) embedded into every created canary token.
//!
//! Whoever trips the token, or audits it later, reads the reminder to find out
//! which bucket and object the decoy was planted at. It is built once per row
//! from the manifest and sent as JSON text in the create request.

use serde::Serialize;

use crate::manifest::ManifestRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    #[serde(rename = "aws-account-id")]
    pub aws_account_id: String,
    #[serde(rename = "s3-bucket-name")]
    pub bucket_name: String,
    /// Normalised key prefix.
    pub path: String,
    pub note: String,
    pub filename: String,
    /// `path` followed by `filename`; identical to the uploaded object key.
    pub fullpath: String,
}

impl Reminder {
    pub fn from_row(row: &ManifestRow) -> Self {
        let path = row.normalized_path();
        let fullpath = format!("{}{}", path, row.file_name);
        Self {
            aws_account_id: row.aws_account_id.clone(),
            bucket_name: row.bucket_name.clone(),
            path,
            note: row.note.clone(),
            filename: row.file_name.clone(),
            fullpath,
        }
    }

    /// JSON text as sent in the `memo` form field.
    pub fn to_memo(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
