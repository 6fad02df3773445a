//! Manifest row model.
//!
//! One [`ManifestRow`] describes one canary token to create and the S3 object it
//! is staged to. Field names map onto the manifest header row exactly, spaces
//! included, so the CLI can deserialise rows straight from the csv reader.

use serde::Deserialize;

/// Bearer credential for the Canary token factory.
///
/// `Debug` never prints the value. Use [`FactoryAuthToken::expose`] where the
/// raw token must go on the wire and [`FactoryAuthToken::masked`] for logs.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct FactoryAuthToken(String);

impl FactoryAuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters only, everything else starred out. Tokens of four
    /// characters or fewer are starred out completely.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let start = chars.len() - 4;
        let visible: String = chars[start..].iter().collect();
        format!("{}{}", "*".repeat(start), visible)
    }
}

impl std::fmt::Debug for FactoryAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FactoryAuthToken").field(&"<redacted>").finish()
    }
}

/// One manifest entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestRow {
    /// Selects the Canary console tenant (`{domain}.canary.tools`).
    #[serde(rename = "Canary Domain")]
    pub canary_domain: String,
    #[serde(rename = "FlockID")]
    pub flock_id: String,
    #[serde(rename = "FactoryAuthToken")]
    pub factory_auth_token: FactoryAuthToken,
    #[serde(rename = "S3 Bucket Name")]
    pub bucket_name: String,
    /// Key prefix inside the bucket. Normalised with [`normalize_prefix`] before use.
    #[serde(rename = "File Path")]
    pub file_path: String,
    #[serde(rename = "Filename")]
    pub file_name: String,
    #[serde(rename = "Note")]
    pub note: String,
    /// Informational only, embedded in the reminder.
    #[serde(rename = "AWSAccountID")]
    pub aws_account_id: String,
    /// Local AWS profile used for the upload of this row.
    #[serde(rename = "AWS Profile Name")]
    pub aws_profile_name: String,
    #[serde(rename = "Token Type")]
    pub token_type: String,
    #[serde(rename = "In Scope", default)]
    pub in_scope: Option<String>,
}

impl ManifestRow {
    /// The key prefix with its trailing separator enforced.
    pub fn normalized_path(&self) -> String {
        normalize_prefix(&self.file_path)
    }

    /// Full object key: normalised prefix followed by the file name.
    pub fn object_key(&self) -> String {
        format!("{}{}", self.normalized_path(), self.file_name)
    }
}

/// Appends a single `/` to a non-empty prefix that does not already end in one.
///
/// Empty prefixes stay empty, so objects land at the bucket root.
pub fn normalize_prefix(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}
