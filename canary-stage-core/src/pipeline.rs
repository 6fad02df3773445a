//! Row pipeline: create → download → upload for a single manifest row.
//!
//! ```text
//! normalise path ─ build reminder ─ create ──(success)──▶ download ─▶ upload ─▶ Staged
//!                                     │                                  │
//!                                     └─(other result)─▶ Rejected        └─(error)─▶ UploadFailed
//! ```
//!
//! A non-success create result is an expected outcome and ends the row without
//! an error. Upload failures are logged and reported as
//! [`RowOutcome::UploadFailed`] so the caller still sees them. Transport and
//! decoding errors from create or download are returned as [`PipelineError`]
//! for the batch runner to isolate; nothing is uploaded in that case.

use tracing::{error, info};

use crate::contract::{CreateTokenRequest, DownloadTokenRequest, ObjectUploader, TokenFactory, UploadRequest};
use crate::error::{FactoryError, PipelineError};
use crate::manifest::ManifestRow;
use crate::reminder::Reminder;

/// Terminal state of a processed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Token created, downloaded and written to `s3://{bucket}/{key}`.
    Staged {
        token_id: String,
        bucket: String,
        key: String,
    },
    /// The factory answered with a non-success result.
    Rejected {
        result: String,
        message: Option<String>,
    },
    /// Token exists on the console but the object could not be written.
    UploadFailed { token_id: String, error: String },
}

pub async fn process_row<F, U>(
    row: &ManifestRow,
    factory: &F,
    uploader: &U,
) -> Result<RowOutcome, PipelineError>
where
    F: TokenFactory + ?Sized,
    U: ObjectUploader + ?Sized,
{
    let reminder = Reminder::from_row(row);
    let key = reminder.fullpath.clone();

    let created = factory
        .create_token(CreateTokenRequest {
            domain: row.canary_domain.clone(),
            flock_id: row.flock_id.clone(),
            auth_token: row.factory_auth_token.clone(),
            reminder,
            kind: row.token_type.clone(),
        })
        .await
        .map_err(PipelineError::Create)?;

    if !created.is_success() {
        error!(
            result = %created.result,
            message = created.message.as_deref().unwrap_or(""),
            kind = %row.token_type,
            "[ROW][CREATE] Token factory did not return success, skipping row"
        );
        return Ok(RowOutcome::Rejected {
            result: created.result,
            message: created.message,
        });
    }

    let token_id = created
        .token_id()
        .ok_or(PipelineError::Create(FactoryError::MissingTokenId))?
        .to_string();
    info!(token_id = %token_id, "[ROW][CREATE] Token created");

    let body = factory
        .download_token(DownloadTokenRequest {
            domain: row.canary_domain.clone(),
            auth_token: row.factory_auth_token.clone(),
            token_id: token_id.clone(),
        })
        .await
        .map_err(PipelineError::Download)?;

    let upload = UploadRequest {
        bucket: row.bucket_name.clone(),
        key: key.clone(),
        body,
        profile_name: row.aws_profile_name.clone(),
    };
    match uploader.upload_object(upload).await {
        Ok(()) => Ok(RowOutcome::Staged {
            token_id,
            bucket: row.bucket_name.clone(),
            key,
        }),
        Err(e) => {
            error!(error = %e, token_id = %token_id, "[ROW][UPLOAD] Error uploading file to S3");
            Ok(RowOutcome::UploadFailed {
                token_id,
                error: e.to_string(),
            })
        }
    }
}
