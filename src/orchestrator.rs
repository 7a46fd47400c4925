//! Edit-to-transform coordination.
//!
//! Source edits are debounced; a transform runs on the blocking pool once
//! the source has been quiet for the debounce window. A successful result
//! is forwarded at once. A failing one is held for the grace period and
//! only surfaced if the same source is still current when it expires.
//! Any result whose source is no longer current is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::modules::ImportTable;
use crate::transpile::{transpile, TranspileError, TranspileOptions, TranspileOutput};

#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    /// The debounce window elapsed and a transform started.
    Compiling,
    Compiled(TranspileOutput),
    /// A failure that outlived the grace period.
    Failed(TranspileError),
    /// The source became empty.
    Cleared,
}

#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl OrchestratorHandle {
    pub fn set_source(&self, source: impl Into<String>) -> EngineResult<()> {
        self.tx
            .send(source.into())
            .map_err(|_| EngineError::ChannelClosed("orchestrator"))
    }
}

pub struct Orchestrator {
    table: Arc<ImportTable>,
    options: TranspileOptions,
    debounce: Duration,
    grace: Duration,
}

struct PendingError {
    deadline: Instant,
    source: Arc<str>,
    error: TranspileError,
}

impl Orchestrator {
    pub fn new(table: Arc<ImportTable>, config: &EngineConfig) -> Self {
        Self {
            table,
            options: TranspileOptions::from(config),
            debounce: config.debounce(),
            grace: config.error_grace(),
        }
    }

    pub fn spawn(self) -> (OrchestratorHandle, mpsc::UnboundedReceiver<OrchestratorEvent>) {
        let (src_tx, src_rx) = mpsc::unbounded_channel();
        let (evt_tx, evt_rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(src_rx, evt_tx));
        (OrchestratorHandle { tx: src_tx }, evt_rx)
    }

    async fn run(
        self,
        mut sources: mpsc::UnboundedReceiver<String>,
        events: mpsc::UnboundedSender<OrchestratorEvent>,
    ) {
        let emit = |event: OrchestratorEvent| {
            let _ = events.send(event);
        };

        let mut current: Arc<str> = Arc::from("");
        let mut debounce_at: Option<Instant> = None;
        let mut pending_error: Option<PendingError> = None;
        let mut transforms: JoinSet<(Arc<str>, Result<TranspileOutput, TranspileError>)> =
            JoinSet::new();

        loop {
            let grace_at = pending_error.as_ref().map(|p| p.deadline);

            tokio::select! {
                received = sources.recv() => {
                    let Some(source) = received else { break };
                    current = Arc::from(source);
                    if current.trim().is_empty() {
                        debounce_at = None;
                        pending_error = None;
                        emit(OrchestratorEvent::Cleared);
                    } else {
                        debounce_at = Some(Instant::now() + self.debounce);
                    }
                }

                _ = sleep_until(debounce_at.unwrap_or_else(Instant::now)), if debounce_at.is_some() => {
                    debounce_at = None;
                    emit(OrchestratorEvent::Compiling);

                    let source = Arc::clone(&current);
                    let table = Arc::clone(&self.table);
                    let options = self.options;
                    transforms.spawn_blocking(move || {
                        let result = transpile(&source, &table, &options);
                        (source, result)
                    });
                }

                Some(joined) = transforms.join_next(), if !transforms.is_empty() => {
                    let (source, result) = match joined {
                        Ok(pair) => pair,
                        Err(err) => {
                            tracing::error!(error = %err, "transform task failed");
                            continue;
                        }
                    };
                    if source != current {
                        tracing::debug!("dropping transform result for superseded source");
                        continue;
                    }
                    match result {
                        Ok(output) => {
                            pending_error = None;
                            emit(OrchestratorEvent::Compiled(output));
                        }
                        Err(error) => {
                            pending_error = Some(PendingError {
                                deadline: Instant::now() + self.grace,
                                source,
                                error,
                            });
                        }
                    }
                }

                _ = sleep_until(grace_at.unwrap_or_else(Instant::now)), if grace_at.is_some() => {
                    if let Some(pending) = pending_error.take() {
                        if pending.source == current {
                            emit(OrchestratorEvent::Failed(pending.error));
                        } else {
                            tracing::debug!("transient transform error discarded");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> (OrchestratorHandle, mpsc::UnboundedReceiver<OrchestratorEvent>) {
        let config = EngineConfig::default();
        let table = Arc::new(ImportTable::standard(&config));
        Orchestrator::new(table, &config).spawn()
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    async fn next_event(
        rx: &mut mpsc::UnboundedReceiver<OrchestratorEvent>,
    ) -> OrchestratorEvent {
        match rx.recv().await {
            Some(event) => event,
            None => panic!("orchestrator stopped"),
        }
    }

    const GOOD: &str = "export default function App() { return <div className=\"p-4\">Hi</div>; }";
    const BAD_IMPORT: &str = "import pad from \"left-pad\";\nexport default () => null;";

    #[tokio::test(start_paused = true)]
    async fn debounces_rapid_edits() {
        let (handle, mut rx) = spawn();
        handle.set_source("export default () => <p>a</p>;").unwrap();
        advance(100).await;
        handle.set_source(GOOD).unwrap();
        advance(100).await;
        assert!(rx.try_recv().is_err());

        advance(60).await;
        assert_eq!(next_event(&mut rx).await, OrchestratorEvent::Compiling);
        match next_event(&mut rx).await {
            OrchestratorEvent::Compiled(output) => {
                assert!(output.class_candidates.contains(&"p-4".to_string()))
            }
            other => panic!("expected compiled, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_error_surfaces_after_grace() {
        let (handle, mut rx) = spawn();
        handle.set_source(BAD_IMPORT).unwrap();

        assert_eq!(next_event(&mut rx).await, OrchestratorEvent::Compiling);
        advance(400).await;
        assert!(rx.try_recv().is_err());

        match next_event(&mut rx).await {
            OrchestratorEvent::Failed(error) => {
                assert!(error.message.contains("left-pad"));
                assert_eq!(error.line, 1);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_error_never_surfaces() {
        let (handle, mut rx) = spawn();
        handle.set_source("import x from \"lef\";").unwrap();
        assert_eq!(next_event(&mut rx).await, OrchestratorEvent::Compiling);

        advance(200).await;
        handle.set_source(GOOD).unwrap();

        assert_eq!(next_event(&mut rx).await, OrchestratorEvent::Compiling);
        assert!(matches!(
            next_event(&mut rx).await,
            OrchestratorEvent::Compiled(_)
        ));

        advance(1_000).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_source_clears_immediately() {
        let (handle, mut rx) = spawn();
        handle.set_source(BAD_IMPORT).unwrap();
        assert_eq!(next_event(&mut rx).await, OrchestratorEvent::Compiling);

        handle.set_source("  \n").unwrap();
        assert_eq!(next_event(&mut rx).await, OrchestratorEvent::Cleared);

        advance(1_000).await;
        assert!(rx.try_recv().is_err());
    }
}
