mod support;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use canary_stage_core::contract::{
    CreateTokenRequest, CreatedToken, DownloadTokenRequest, MockObjectUploader, MockTokenFactory,
    TokenFactory,
};
use canary_stage_core::factory::CanaryFactoryClient;
use canary_stage_core::{run_batch, BatchReport, FactoryError, UploadError};
use support::{failure, row, success};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

/// Collects emitted events as their `Debug` rendering.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{event:?}"));
    }
}

#[tokio::test]
async fn mixed_manifest_only_touches_in_scope_rows() {
    // A: in scope, succeeds. B: out of scope. C: in scope, factory rejects.
    let rows = vec![
        row("a.docx", Some("TRUE")),
        row("b.docx", Some("no")),
        row("c.docx", Some("Yes")),
    ];

    let mut factory = MockTokenFactory::new();
    let mut uploader = MockObjectUploader::new();

    factory
        .expect_create_token()
        .times(1)
        .withf(|req| req.reminder.filename == "a.docx")
        .returning(|_| Ok(success("tok-a")));
    factory
        .expect_create_token()
        .times(1)
        .withf(|req| req.reminder.filename == "c.docx")
        .returning(|_| Ok(failure()));
    factory
        .expect_download_token()
        .times(1)
        .withf(|req| req.token_id == "tok-a")
        .returning(|_| Ok(b"docx".to_vec()));
    uploader
        .expect_upload_object()
        .times(1)
        .withf(|req| req.key == "finance/a.docx")
        .returning(|_| Ok(()));

    let report = run_batch(rows, &factory, &uploader).await;

    assert_eq!(
        report,
        BatchReport {
            staged: 1,
            rejected: 1,
            upload_failed: 0,
            errored: 0,
            skipped: 1,
        }
    );
}

#[tokio::test]
async fn out_of_scope_rows_make_no_calls() {
    let rows = vec![
        row("a", None),
        row("b", Some("false")),
        row("c", Some("")),
        row("d", Some("maybe")),
    ];
    let mut factory = MockTokenFactory::new();
    let mut uploader = MockObjectUploader::new();
    factory.expect_create_token().never();
    factory.expect_download_token().never();
    uploader.expect_upload_object().never();

    let report = run_batch(rows, &factory, &uploader).await;
    assert_eq!(report.skipped, 4);
    assert_eq!(report.processed(), 0);
}

#[tokio::test]
async fn transport_error_on_one_row_does_not_stop_the_next() {
    let rows = vec![row("first.docx", Some("true")), row("second.docx", Some("true"))];

    let mut factory = MockTokenFactory::new();
    let mut uploader = MockObjectUploader::new();

    factory
        .expect_create_token()
        .times(1)
        .withf(|req| req.reminder.filename == "first.docx")
        .returning(|_| Ok(success("tok-1")));
    factory
        .expect_create_token()
        .times(1)
        .withf(|req| req.reminder.filename == "second.docx")
        .returning(|_| Ok(success("tok-2")));
    factory
        .expect_download_token()
        .times(1)
        .withf(|req| req.token_id == "tok-1")
        .returning(|_| Err(FactoryError::MissingTokenId));
    factory
        .expect_download_token()
        .times(1)
        .withf(|req| req.token_id == "tok-2")
        .returning(|_| Ok(vec![9]));
    uploader
        .expect_upload_object()
        .times(1)
        .withf(|req| req.key == "finance/second.docx")
        .returning(|_| Ok(()));

    let report = run_batch(rows, &factory, &uploader).await;
    assert_eq!(report.errored, 1);
    assert_eq!(report.staged, 1);
}

#[tokio::test]
async fn upload_failure_is_counted_and_batch_continues() {
    let rows = vec![row("first.docx", Some("true")), row("second.docx", Some("true"))];

    let mut factory = MockTokenFactory::new();
    let mut uploader = MockObjectUploader::new();

    factory
        .expect_create_token()
        .times(2)
        .returning(|req| Ok(success(&format!("tok-{}", req.reminder.filename))));
    factory
        .expect_download_token()
        .times(2)
        .returning(|_| Ok(vec![1]));
    uploader
        .expect_upload_object()
        .times(1)
        .withf(|req| req.key == "finance/first.docx")
        .returning(|req| {
            Err(UploadError::Put {
                bucket: req.bucket,
                key: req.key,
                profile: req.profile_name,
                message: "NoSuchBucket".to_string(),
            })
        });
    uploader
        .expect_upload_object()
        .times(1)
        .withf(|req| req.key == "finance/second.docx")
        .returning(|_| Ok(()));

    let report = run_batch(rows, &factory, &uploader).await;
    assert_eq!(report.upload_failed, 1);
    assert_eq!(report.staged, 1);
    assert_eq!(report.errored, 0);
}

#[tokio::test]
async fn unexpected_failure_is_logged_as_critical_without_secret() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCollector {
        events: events.clone(),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut factory = MockTokenFactory::new();
    let uploader = MockObjectUploader::new();
    factory
        .expect_create_token()
        .returning(|_| Err(FactoryError::MissingTokenId));

    let report = run_batch(vec![row("x.docx", Some("true"))], &factory, &uploader).await;
    assert_eq!(report.errored, 1);

    let events = events.lock().unwrap();
    assert!(
        events.iter().any(|e| e.contains("critical") && e.contains("Unexpected failure")),
        "expected a critical event, got: {events:?}"
    );
    assert!(events.iter().all(|e| !e.contains("factory-secret-0001")));
}

/// Creates succeed; downloads go through the real client to a console that is not listening.
struct UnreachableConsole {
    client: CanaryFactoryClient,
}

#[async_trait]
impl TokenFactory for UnreachableConsole {
    async fn create_token(&self, _request: CreateTokenRequest) -> Result<CreatedToken, FactoryError> {
        Ok(success("tok-unreachable"))
    }

    async fn download_token(&self, request: DownloadTokenRequest) -> Result<Vec<u8>, FactoryError> {
        self.client.download_token(request).await
    }
}

#[tokio::test]
async fn download_transport_error_never_logs_the_auth_token() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCollector {
        events: events.clone(),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    // Nothing listens on port 9 locally.
    let factory = UnreachableConsole {
        client: CanaryFactoryClient::with_base_url("http://127.0.0.1:9"),
    };
    let mut uploader = MockObjectUploader::new();
    uploader.expect_upload_object().never();

    let report = run_batch(vec![row("x.docx", Some("true"))], &factory, &uploader).await;
    assert_eq!(report.errored, 1);

    let events = events.lock().unwrap();
    assert!(
        events.iter().any(|e| e.contains("critical") && e.contains("transport error")),
        "expected a critical transport event, got: {events:?}"
    );
    assert!(
        events.iter().all(|e| !e.contains("factory-secret-0001")),
        "auth token leaked into logs: {events:?}"
    );
}
