#![doc = "canary-stage-core: provisioning pipeline for canary-stage."]

//! Creates canary tokens through the Canary token factory, downloads their
//! artifacts and stages them into S3 buckets, one manifest row at a time.
//!
//! # Layout
//! - [`manifest`]: the row model read from the manifest.
//! - [`scope`]: which rows take part in a run.
//! - [`reminder`]: the memo embedded in each token.
//! - [`contract`]: the `TokenFactory` / `ObjectUploader` seams and their mocks.
//! - [`factory`], [`uploader`]: reqwest and aws-sdk-s3 implementations.
//! - [`pipeline`], [`batch`]: per-row orchestration and the batch loop.

pub mod batch;
pub mod contract;
pub mod error;
pub mod factory;
pub mod manifest;
pub mod pipeline;
pub mod reminder;
pub mod scope;
pub mod uploader;

pub use batch::{run_batch, BatchReport};
pub use error::{FactoryError, PipelineError, UploadError};
pub use manifest::{FactoryAuthToken, ManifestRow};
pub use pipeline::{process_row, RowOutcome};
