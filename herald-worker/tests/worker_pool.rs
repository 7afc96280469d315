//! Worker pool delivery, retry and shutdown behaviour.

use std::sync::Arc;
use std::time::Duration;

use herald_core::{
    ContentFormat, ContentSource, ContentState, DocumentId, DocumentRecord, EditionId,
    EditionRecord, Locale, MemorySource, Publishable, QueueName, Translation, VisibilityPolicy,
};
use herald_sync::{
    ClientError, DispatchOptions, EnqueueError, JobExecutor, Publisher, RecordingClient, SyncError,
};
use herald_worker::{RetryPolicy, WorkerOptions, WorkerPool, WorkerStats};
use tokio::time::Instant;

const BASE_DELAY: Duration = Duration::from_millis(100);

struct Harness {
    source: Arc<MemorySource>,
    client: Arc<RecordingClient>,
    pool: WorkerPool,
    publisher: Publisher,
}

fn harness(max_attempts: u32) -> Harness {
    harness_with_grace(max_attempts, Duration::from_secs(30))
}

fn harness_with_grace(max_attempts: u32, shutdown_grace: Duration) -> Harness {
    let source = Arc::new(MemorySource::new());
    source.put_document(
        DocumentRecord::new(8, "coastal-erosion").with_edition(
            EditionRecord::new(80, ContentFormat::CaseStudy, "en")
                .with_state(ContentState::Published)
                .with_translation("en", Translation::new("Coastal erosion", "", ""))
                .with_translation("fr", Translation::new("Érosion côtière", "", "")),
        ),
    );
    let client = Arc::new(RecordingClient::new());
    let executor = Arc::new(JobExecutor::new(source.clone(), client.clone()));
    let pool = WorkerPool::start(
        executor,
        WorkerOptions {
            concurrency: 2,
            retry: RetryPolicy::new(max_attempts, BASE_DELAY, Duration::from_secs(1)),
            shutdown_grace,
        },
    );
    let publisher = Publisher::new(
        Arc::new(pool.queue()),
        client.clone(),
        VisibilityPolicy::default(),
        QueueName::default(),
    );
    Harness {
        source,
        client,
        pool,
        publisher,
    }
}

fn item(h: &Harness) -> Publishable {
    h.source
        .content_item(EditionId(80))
        .expect("read")
        .expect("edition")
        .into()
}

fn english_only(h: &Harness) {
    let mut doc = h.source.document(DocumentId(8)).expect("doc");
    doc.editions[0].translations.remove(&Locale::from("fr"));
    h.source.put_document(doc);
}

#[tokio::test]
async fn published_locales_are_delivered_by_workers() {
    let h = harness(3);
    h.publisher
        .publish_async(&item(&h), DispatchOptions::new())
        .expect("publish");

    h.pool.wait_idle().await;
    let stats = h.pool.shutdown().await.expect("shutdown");

    assert_eq!(
        stats,
        WorkerStats {
            delivered: 2,
            ..WorkerStats::default()
        }
    );
    let state = h.client.state();
    assert!(state.live.contains_key("/government/case-studies/coastal-erosion"));
    assert!(state.live.contains_key("/government/case-studies/coastal-erosion.fr"));
}

#[tokio::test(start_paused = true, flavor = "current_thread")]
async fn transient_failures_are_retried_with_backoff() {
    let h = harness(5);
    english_only(&h);
    for _ in 0..2 {
        h.client.fail_next(ClientError::Status {
            code: 503,
            body: "unavailable".into(),
        });
    }
    let started = Instant::now();

    h.publisher
        .publish_async(&item(&h), DispatchOptions::new().queue("retry"))
        .expect("publish");
    h.pool.wait_idle().await;

    // Two consecutive failures wait 100ms then 200ms.
    assert!(started.elapsed() >= BASE_DELAY * 3, "elapsed: {:?}", started.elapsed());
    let stats = h.pool.shutdown().await.expect("shutdown");
    assert_eq!(stats.retried, 2);
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(h.client.call_count(), 1);
}

#[tokio::test(start_paused = true, flavor = "current_thread")]
async fn retries_give_up_after_max_attempts() {
    let h = harness(3);
    english_only(&h);
    for _ in 0..5 {
        h.client.fail_next(ClientError::Transport("connection reset".into()));
    }

    h.publisher
        .publish_async(&item(&h), DispatchOptions::new())
        .expect("publish");
    h.pool.wait_idle().await;
    let stats = h.pool.shutdown().await.expect("shutdown");

    assert_eq!(stats.retried, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.delivered, 0);
    assert_eq!(h.client.call_count(), 0);
}

#[tokio::test]
async fn rejected_payloads_are_not_retried() {
    let h = harness(5);
    english_only(&h);
    h.client.fail_next(ClientError::Status {
        code: 422,
        body: "invalid".into(),
    });

    h.publisher
        .publish_async(&item(&h), DispatchOptions::new())
        .expect("publish");
    h.pool.wait_idle().await;
    let stats = h.pool.shutdown().await.expect("shutdown");

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.retried, 0);
}

#[tokio::test]
async fn deleted_content_is_counted_missing() {
    let h = harness(3);
    let entity = item(&h);
    h.source.remove_document(DocumentId(8));

    h.publisher
        .publish_async(&entity, DispatchOptions::new())
        .expect("publish");
    h.pool.wait_idle().await;
    let stats = h.pool.shutdown().await.expect("shutdown");

    assert_eq!(stats.missing, 2);
    assert_eq!(h.client.call_count(), 0);
}

#[tokio::test]
async fn enqueue_after_shutdown_is_rejected() {
    let h = harness(3);
    let entity = item(&h);
    let publisher = h.publisher.clone();
    h.pool.shutdown().await.expect("shutdown");

    let err = publisher
        .publish_async(&entity, DispatchOptions::new())
        .unwrap_err();
    assert!(matches!(err, SyncError::Enqueue(EnqueueError::QueueClosed)), "got: {err}");
}

async fn until_retried(h: &Harness) {
    while h.pool.stats().retried == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(start_paused = true, flavor = "current_thread")]
async fn shutdown_lets_a_retry_in_backoff_finish() {
    let h = harness(3);
    english_only(&h);
    h.client.fail_next(ClientError::Status {
        code: 503,
        body: "unavailable".into(),
    });

    h.publisher
        .publish_async(&item(&h), DispatchOptions::new())
        .expect("publish");
    until_retried(&h).await;
    assert_eq!(h.client.call_count(), 0);

    let stats = h.pool.shutdown().await.expect("shutdown");
    assert_eq!(
        stats,
        WorkerStats {
            delivered: 1,
            retried: 1,
            ..WorkerStats::default()
        }
    );
    assert!(h
        .client
        .state()
        .live
        .contains_key("/government/case-studies/coastal-erosion"));
}

#[tokio::test(start_paused = true, flavor = "current_thread")]
async fn retry_outliving_the_grace_period_is_counted_dropped() {
    let h = harness_with_grace(3, Duration::ZERO);
    english_only(&h);
    h.client.fail_next(ClientError::Status {
        code: 503,
        body: "unavailable".into(),
    });

    h.publisher
        .publish_async(&item(&h), DispatchOptions::new())
        .expect("publish");
    until_retried(&h).await;
    let queue = h.pool.queue();

    let stats = h.pool.shutdown().await.expect("shutdown");
    assert_eq!(
        stats,
        WorkerStats {
            retried: 1,
            dropped: 1,
            ..WorkerStats::default()
        }
    );
    assert_eq!(queue.pending(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.client.call_count(), 0);
}
