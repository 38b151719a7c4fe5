//! Periodic fetch → reconcile → publish driver.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    error::CoreError,
    publisher::{CycleOutcome, StatePublisher},
    reconcile::reconcile,
    source::TaskSource,
};

/// Summary of one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Records returned by the source.
    pub fetched: usize,
    /// Logical units published.
    pub units: usize,
}

/// Owns the collection loop. Cycles run strictly one after another.
pub struct Collector<S, P> {
    source: Arc<S>,
    publisher: Arc<P>,
    interval: Duration,
}

impl<S, P> Collector<S, P>
where
    S: TaskSource,
    P: StatePublisher,
{
    pub fn new(source: Arc<S>, publisher: Arc<P>, interval: Duration) -> Result<Self, CoreError> {
        if interval.is_zero() {
            return Err(CoreError::InvalidInterval);
        }
        Ok(Self {
            source,
            publisher,
            interval,
        })
    }

    /// Run a single cycle.
    ///
    /// A source failure returns before anything is published, leaving the
    /// previous snapshot in place.
    pub async fn run_cycle(&self) -> Result<CycleReport, CoreError> {
        let started = Instant::now();
        let result = self.pass().await;

        let outcome = match &result {
            Ok(_) => CycleOutcome::Success,
            Err(CoreError::Source(_)) => CycleOutcome::SourceError,
            Err(_) => CycleOutcome::PublishError,
        };
        self.publisher.record_cycle(outcome, started.elapsed());
        result
    }

    async fn pass(&self) -> Result<CycleReport, CoreError> {
        let records = self.source.list_tasks().await?;
        let fetched = records.len();

        let reconciled = reconcile(records);
        let unaliased = reconciled.keys().filter(|k| k.alias().is_empty()).count();
        if unaliased > 0 {
            debug!(units = unaliased, "tasks without network alias exported under empty alias");
        }
        self.publisher.publish(&reconciled)?;

        Ok(CycleReport {
            fetched,
            units: reconciled.len(),
        })
    }

    /// Loop until `token` is cancelled. The first cycle runs immediately.
    pub async fn run(self, token: CancellationToken) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            source = self.source.name(),
            interval_ms = self.interval.as_millis() as u64,
            "collector started"
        );
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            debug!("collection cycle starting");

            match self.run_cycle().await {
                Ok(report) => debug!(
                    tasks = report.fetched,
                    units = report.units,
                    "collection cycle completed"
                ),
                Err(CoreError::Source(e)) => {
                    warn!(error = %e, "task source failed; keeping previous snapshot")
                }
                Err(e) => error!(error = %e, "collection cycle failed"),
            }
        }
        info!("collector stopped");
    }

    /// Spawn [`Collector::run`] on the current runtime.
    pub fn spawn(self, token: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(token))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    use async_trait::async_trait;
    use swarm_model::{TaskRecord, TaskState, UnitKey};

    use super::*;
    use crate::{error::SourceError, reconcile::Reconciled};

    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<Vec<TaskRecord>, SourceError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedSource {
        fn push(&self, reply: Result<Vec<TaskRecord>, SourceError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TaskSource for ScriptedSource {
        async fn list_tasks(&self) -> Result<Vec<TaskRecord>, SourceError> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        snapshots: Mutex<Vec<Reconciled>>,
        outcomes: Mutex<Vec<CycleOutcome>>,
        fail: bool,
    }

    impl StatePublisher for RecordingPublisher {
        fn publish(&self, reconciled: &Reconciled) -> Result<(), CoreError> {
            if self.fail {
                return Err(CoreError::Publish("registry rejected update".into()));
            }
            self.snapshots.lock().unwrap().push(reconciled.clone());
            Ok(())
        }

        fn record_cycle(&self, outcome: CycleOutcome, _elapsed: Duration) {
            self.outcomes.lock().unwrap().push(outcome);
        }
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn task(id: &str, alias: &str, ts: u64) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            service_id: "svc".to_string(),
            alias: Some(alias.to_string()),
            slot: Some(0),
            state: TaskState::Running,
            desired_state: TaskState::Running,
            timestamp: at(ts),
            error: None,
        }
    }

    fn collector(
        source: &Arc<ScriptedSource>,
        publisher: &Arc<RecordingPublisher>,
    ) -> Collector<ScriptedSource, RecordingPublisher> {
        Collector::new(
            Arc::clone(source),
            Arc::clone(publisher),
            Duration::from_secs(30),
        )
        .unwrap()
    }

    #[test]
    fn zero_interval_is_rejected() {
        let res = Collector::new(
            Arc::new(ScriptedSource::default()),
            Arc::new(RecordingPublisher::default()),
            Duration::ZERO,
        );
        assert!(matches!(res, Err(CoreError::InvalidInterval)));
    }

    #[tokio::test]
    async fn cycle_publishes_reconciled_snapshot() {
        let source = Arc::new(ScriptedSource::default());
        let publisher = Arc::new(RecordingPublisher::default());
        source.push(Ok(vec![
            task("a", "web", 1),
            task("b", "web", 2),
            task("c", "db", 1),
        ]));

        let report = collector(&source, &publisher).run_cycle().await.unwrap();
        assert_eq!(
            report,
            CycleReport {
                fetched: 3,
                units: 2
            }
        );

        let snapshots = publisher.snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0][&UnitKey::new("web", 0)].id, "b");
        assert_eq!(
            *publisher.outcomes.lock().unwrap(),
            vec![CycleOutcome::Success]
        );
    }

    #[tokio::test]
    async fn source_failure_skips_publish() {
        let source = Arc::new(ScriptedSource::default());
        let publisher = Arc::new(RecordingPublisher::default());
        source.push(Ok(vec![task("a", "web", 1)]));
        source.push(Err(SourceError::Unavailable("connection refused".into())));

        let c = collector(&source, &publisher);
        c.run_cycle().await.unwrap();
        let err = c.run_cycle().await.unwrap_err();
        assert!(matches!(err, CoreError::Source(_)));

        assert_eq!(publisher.snapshots.lock().unwrap().len(), 1);
        assert_eq!(
            *publisher.outcomes.lock().unwrap(),
            vec![CycleOutcome::Success, CycleOutcome::SourceError]
        );
    }

    #[tokio::test]
    async fn publish_failure_is_reported() {
        let source = Arc::new(ScriptedSource::default());
        let publisher = Arc::new(RecordingPublisher {
            fail: true,
            ..Default::default()
        });
        source.push(Ok(vec![task("a", "web", 1)]));

        let err = collector(&source, &publisher).run_cycle().await.unwrap_err();
        assert!(matches!(err, CoreError::Publish(_)));
        assert_eq!(
            *publisher.outcomes.lock().unwrap(),
            vec![CycleOutcome::PublishError]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_fires_immediately_then_on_interval() {
        let source = Arc::new(ScriptedSource::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let token = CancellationToken::new();

        let handle = collector(&source, &publisher).spawn(token.clone());

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.calls(), 2);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn run_keeps_going_after_failures() {
        let source = Arc::new(ScriptedSource::default());
        let publisher = Arc::new(RecordingPublisher::default());
        source.push(Err(SourceError::Unavailable("down".into())));
        source.push(Ok(vec![task("a", "web", 1)]));
        let token = CancellationToken::new();

        let handle = collector(&source, &publisher).spawn(token.clone());
        time::sleep(Duration::from_secs(31)).await;

        token.cancel();
        handle.await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(publisher.snapshots.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_prevents_first_cycle() {
        let source = Arc::new(ScriptedSource::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let token = CancellationToken::new();
        token.cancel();

        collector(&source, &publisher).run(token).await;
        assert_eq!(source.calls(), 0);
    }
}
