//! # contract: trait seams between the row pipeline and the outside world
//!
//! The pipeline only talks to the Canary factory through [`TokenFactory`] and to
//! object storage through [`ObjectUploader`]. Real clients live in
//! [`crate::factory`] and [`crate::uploader`]; tests use the `mockall` mocks
//! generated here (`MockTokenFactory`, `MockObjectUploader`), exported under the
//! default `test-export-mocks` feature so integration tests can reach them.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::error::{FactoryError, UploadError};
use crate::manifest::FactoryAuthToken;
use crate::reminder::Reminder;

/// Token kinds the Canary factory is known to accept for file-based decoys.
/// Informational only, rows are never checked against it.
pub const KNOWN_TOKEN_KINDS: [&str; 6] = [
    "aws-id",
    "doc-msword",
    "msexcel-macro",
    "msword-macro",
    "pdf-acrobat-reader",
    "slack-api",
];

/// Everything needed to create one token.
#[derive(Debug, Clone)]
pub struct CreateTokenRequest {
    pub domain: String,
    pub flock_id: String,
    pub auth_token: FactoryAuthToken,
    pub reminder: Reminder,
    pub kind: String,
}

/// Everything needed to fetch a created token's artifact.
#[derive(Debug, Clone)]
pub struct DownloadTokenRequest {
    pub domain: String,
    pub auth_token: FactoryAuthToken,
    pub token_id: String,
}

/// Parsed body of a create call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedToken {
    pub result: String,
    #[serde(default)]
    pub canarytoken: Option<CanarytokenDetails>,
    /// Present on some failure responses.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CanarytokenDetails {
    pub canarytoken: String,
}

impl CreatedToken {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }

    pub fn token_id(&self) -> Option<&str> {
        self.canarytoken.as_ref().map(|t| t.canarytoken.as_str())
    }
}

/// One object to put.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    /// Local AWS profile; empty means the default credential chain.
    pub profile_name: String,
}

/// Client for the Canary token factory API.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TokenFactory: Send + Sync {
    /// Create a token. A non-`success` result is returned as `Ok`; only transport
    /// and decoding problems are errors.
    async fn create_token(&self, request: CreateTokenRequest) -> Result<CreatedToken, FactoryError>;

    /// Fetch the raw artifact bytes of a created token.
    async fn download_token(&self, request: DownloadTokenRequest) -> Result<Vec<u8>, FactoryError>;
}

/// Writes staged artifacts to object storage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    async fn upload_object(&self, request: UploadRequest) -> Result<(), UploadError>;
}
