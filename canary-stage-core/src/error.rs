use thiserror::Error;

/// Failures talking to the Canary token factory.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("download from {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("factory response is not valid JSON ({source}): {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("failed to encode reminder: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("factory reported success but returned no canarytoken id")]
    MissingTokenId,
}

/// Failure to stage an object in S3. Covers credential resolution as well as the put itself.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("put s3://{bucket}/{key} with profile '{profile}' failed: {message}")]
    Put {
        bucket: String,
        key: String,
        profile: String,
        message: String,
    },
}

/// Unexpected row failures that the batch runner isolates.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("token creation failed: {0}")]
    Create(#[source] FactoryError),

    #[error("token download failed: {0}")]
    Download(#[source] FactoryError),
}
