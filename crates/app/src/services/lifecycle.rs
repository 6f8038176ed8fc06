//! Lifecycle coordinator: startup and shutdown sweeps over every
//! configured datasource.
//!
//! A sweep visits names in configuration order (default first) and never
//! stops early: each datasource succeeds or fails on its own, and all
//! failures are collected into a [`SweepReport`].

use std::fmt;
use std::sync::Arc;

use kvsource_domain::error::KvSourceError;
use kvsource_domain::name::DatasourceName;

use crate::ports::{ConfigResolver, EventPublisher, StorageEngine};
use crate::services::connection_handler::ConnectionHandler;

/// Which sweep produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Startup,
    Shutdown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup => f.write_str("startup"),
            Self::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// One datasource that failed during a sweep.
#[derive(Debug)]
pub struct SweepFailure {
    pub name: DatasourceName,
    pub error: KvSourceError,
}

/// Outcome of a full sweep.
#[derive(Debug)]
pub struct SweepReport {
    pub phase: Phase,
    /// Datasources the sweep acted on successfully.
    pub completed: Vec<DatasourceName>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            completed: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, name: DatasourceName, outcome: Result<(), KvSourceError>) {
        match outcome {
            Ok(()) => self.completed.push(name),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    datasource = %name,
                    phase = %self.phase,
                    "datasource failed during sweep"
                );
                self.failures.push(SweepFailure { name, error });
            }
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn the report into an error when anything failed.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] carrying every per-datasource failure.
    pub fn into_result(self) -> Result<Vec<DatasourceName>, SweepError> {
        if self.failures.is_empty() {
            Ok(self.completed)
        } else {
            Err(SweepError {
                phase: self.phase,
                failures: self.failures,
            })
        }
    }
}

/// Aggregated failures of one sweep.
#[derive(Debug, thiserror::Error)]
#[error("{} datasource(s) failed during {phase}: {}", .failures.len(), names(.failures))]
pub struct SweepError {
    pub phase: Phase,
    pub failures: Vec<SweepFailure>,
}

fn names(failures: &[SweepFailure]) -> String {
    failures
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reacts to the host's startup and shutdown signals.
pub struct LifecycleCoordinator<E: StorageEngine, P, C> {
    handler: Arc<ConnectionHandler<E, P, C>>,
}

impl<E, P, C> LifecycleCoordinator<E, P, C>
where
    E: StorageEngine,
    P: EventPublisher<E::Handle>,
    C: ConfigResolver,
{
    pub fn new(handler: Arc<ConnectionHandler<E, P, C>>) -> Self {
        Self { handler }
    }

    /// Open every datasource flagged `connect_on_startup`.
    #[tracing::instrument(skip(self))]
    pub async fn on_startup(&self) -> SweepReport {
        let mut report = SweepReport::new(Phase::Startup);
        let resolver = self.handler.resolver();
        for name in resolver.datasource_names() {
            let eager = resolver
                .configuration_for(&name)
                .is_some_and(|config| config.connect_on_startup());
            if !eager {
                continue;
            }
            let outcome = self.handler.with_connection(name.as_str(), |_, _| ()).await;
            report.record(name, outcome);
        }
        tracing::info!(
            opened = report.completed.len(),
            failed = report.failures.len(),
            "startup sweep finished"
        );
        report
    }

    /// Close every configured datasource, opened or not.
    #[tracing::instrument(skip(self))]
    pub async fn on_shutdown(&self) -> SweepReport {
        let mut report = SweepReport::new(Phase::Shutdown);
        for name in self.handler.resolver().datasource_names() {
            let outcome = self.handler.close(name.as_str()).await;
            report.record(name, outcome);
        }
        tracing::info!(
            visited = report.completed.len(),
            failed = report.failures.len(),
            "shutdown sweep finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfigResolver;
    use crate::deletion::DeleteOnExit;
    use crate::registry::ConnectionRegistry;
    use crate::services::connection_factory::ConnectionFactory;
    use crate::services::fakes::{FakeEngine, RecordingPublisher};
    use kvsource_domain::datasource::DatasourceConfig;
    use tempfile::TempDir;

    type Handler = ConnectionHandler<Arc<FakeEngine>, Arc<RecordingPublisher>, StaticConfigResolver>;

    struct Fixture {
        _dir: TempDir,
        engine: Arc<FakeEngine>,
        handler: Arc<Handler>,
        lifecycle: LifecycleCoordinator<Arc<FakeEngine>, Arc<RecordingPublisher>, StaticConfigResolver>,
    }

    fn fixture(resolver: StaticConfigResolver) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let factory = ConnectionFactory::new(
            Arc::clone(&engine),
            Arc::new(RecordingPublisher::default()),
            Arc::new(DeleteOnExit::new()),
            dir.path(),
        );
        let handler = Arc::new(ConnectionHandler::new(
            Arc::new(factory),
            Arc::new(ConnectionRegistry::new()),
            resolver,
        ));
        Fixture {
            _dir: dir,
            engine,
            lifecycle: LifecycleCoordinator::new(Arc::clone(&handler)),
            handler,
        }
    }

    fn name(s: &str) -> DatasourceName {
        DatasourceName::new(s).unwrap()
    }

    fn storage(file: &str, eager: bool) -> DatasourceConfig {
        DatasourceConfig::builder()
            .name(file)
            .connect_on_startup(eager)
            .build()
    }

    #[tokio::test]
    async fn should_open_only_datasources_flagged_for_startup() {
        let fx = fixture(
            StaticConfigResolver::new()
                .with_default(storage("default.bin", false))
                .with(name("alt"), storage("alt.bin", true)),
        );

        let report = fx.lifecycle.on_startup().await;

        assert!(report.is_success());
        assert_eq!(report.completed, vec![name("alt")]);
        assert_eq!(fx.engine.open_count(), 1);
        assert!(fx.handler.registry().contains("alt"));
        assert!(!fx.handler.registry().contains("default"));
    }

    #[tokio::test]
    async fn should_open_in_configuration_order() {
        let fx = fixture(
            StaticConfigResolver::new()
                .with_default(storage("default.bin", true))
                .with(name("zeta"), storage("zeta.bin", true))
                .with(name("alpha"), storage("alpha.bin", true)),
        );

        let report = fx.lifecycle.on_startup().await;

        assert_eq!(
            report.completed,
            vec![name("default"), name("zeta"), name("alpha")]
        );
    }

    #[tokio::test]
    async fn should_skip_unconfigured_default_on_startup() {
        let fx = fixture(StaticConfigResolver::new().with(name("alt"), storage("alt.bin", true)));

        let report = fx.lifecycle.on_startup().await;

        assert!(report.is_success());
        assert_eq!(report.completed, vec![name("alt")]);
    }

    #[tokio::test]
    async fn should_continue_startup_after_failure() {
        let fx = fixture(
            StaticConfigResolver::new()
                .with(name("broken"), storage("fail-open.bin", true))
                .with(name("alt"), storage("alt.bin", true)),
        );

        let report = fx.lifecycle.on_startup().await;

        assert_eq!(report.completed, vec![name("alt")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, name("broken"));
        assert!(matches!(report.failures[0].error, KvSourceError::Open { .. }));
    }

    #[tokio::test]
    async fn should_close_everything_on_shutdown() {
        let fx = fixture(
            StaticConfigResolver::new()
                .with_default(storage("default.bin", true))
                .with(name("alt"), storage("alt.bin", true)),
        );
        fx.lifecycle.on_startup().await;
        assert_eq!(fx.handler.registry().len(), 2);

        let report = fx.lifecycle.on_shutdown().await;

        assert!(report.is_success());
        assert!(fx.handler.registry().is_empty());
        assert_eq!(fx.engine.closed().len(), 2);
    }

    #[tokio::test]
    async fn should_treat_second_shutdown_as_noop() {
        let fx = fixture(
            StaticConfigResolver::new()
                .with_default(storage("default.bin", true))
                .with(name("alt"), storage("alt.bin", true)),
        );
        fx.lifecycle.on_startup().await;
        fx.lifecycle.on_shutdown().await;

        let report = fx.lifecycle.on_shutdown().await;

        assert!(report.is_success());
        assert_eq!(fx.engine.closed().len(), 2);
    }

    #[tokio::test]
    async fn should_close_lazily_opened_datasources_on_shutdown() {
        let fx = fixture(
            StaticConfigResolver::new()
                .with_default(storage("default.bin", false))
                .with(name("alt"), storage("alt.bin", false)),
        );
        fx.handler.get_or_create("alt").await.unwrap();

        fx.lifecycle.on_shutdown().await;

        assert!(fx.handler.registry().is_empty());
        assert_eq!(fx.engine.closed().len(), 1);
    }

    #[tokio::test]
    async fn should_aggregate_shutdown_failures_and_close_the_rest() {
        let fx = fixture(
            StaticConfigResolver::new()
                .with(name("sticky"), storage("fail-close.bin", true))
                .with(name("alt"), storage("alt.bin", true)),
        );
        fx.lifecycle.on_startup().await;

        let err = fx.lifecycle.on_shutdown().await.into_result().unwrap_err();

        assert_eq!(err.phase, Phase::Shutdown);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(
            err.to_string(),
            "1 datasource(s) failed during shutdown: sticky"
        );
        assert!(!fx.handler.registry().contains("alt"));
    }
}
