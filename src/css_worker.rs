//! Background CSS compiler service.
//!
//! Owns one warmed [`UtilityCompiler`] and answers compile requests over a
//! channel. Initialization runs on the blocking pool; requests that arrive
//! before it finishes are answered with an error rather than queued. The
//! worker memoizes exactly one `(candidates, css)` pair.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::{EngineError, EngineResult};
use crate::tailwind::{TailwindCompiler, UtilityCompiler};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerRequest {
    Compile { candidates: Vec<String>, id: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerResponse {
    Ready,
    Css {
        css: Arc<str>,
        id: u64,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
    },
}

/// Sorted and deduplicated, the form both memo layers compare.
pub fn normalize_candidates(candidates: &[String]) -> Vec<String> {
    let mut sorted = candidates.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
}

#[derive(Debug, Clone)]
pub struct CssWorkerHandle {
    tx: mpsc::UnboundedSender<WorkerRequest>,
}

impl CssWorkerHandle {
    pub fn send(&self, request: WorkerRequest) -> EngineResult<()> {
        self.tx
            .send(request)
            .map_err(|_| EngineError::ChannelClosed("css-worker"))
    }
}

pub struct CssWorker<C> {
    compiler: Option<C>,
    cache: Option<(Vec<String>, Arc<str>)>,
    responses: mpsc::UnboundedSender<WorkerResponse>,
}

impl CssWorker<TailwindCompiler> {
    /// Worker over the default theme and built-in stylesheets.
    pub fn spawn_default() -> (CssWorkerHandle, mpsc::UnboundedReceiver<WorkerResponse>) {
        Self::spawn(TailwindCompiler::with_defaults)
    }
}

impl<C: UtilityCompiler + 'static> CssWorker<C> {
    /// Starts the worker task. Must be called inside a tokio runtime.
    pub fn spawn<F>(init: F) -> (CssWorkerHandle, mpsc::UnboundedReceiver<WorkerResponse>)
    where
        F: FnOnce() -> EngineResult<C> + Send + 'static,
    {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        let worker = CssWorker {
            compiler: None,
            cache: None,
            responses: resp_tx,
        };
        tokio::spawn(worker.run(init, req_rx));

        (CssWorkerHandle { tx: req_tx }, resp_rx)
    }

    fn reply(&self, response: WorkerResponse) {
        // Receiver gone means the session shut down; nothing left to notify.
        let _ = self.responses.send(response);
    }

    async fn run<F>(mut self, init: F, mut requests: mpsc::UnboundedReceiver<WorkerRequest>)
    where
        F: FnOnce() -> EngineResult<C> + Send + 'static,
    {
        let mut init_task = tokio::task::spawn_blocking(init);

        // ═══════════════════════════════════════════════════════════════
        // Phase 1: initializing
        // ═══════════════════════════════════════════════════════════════
        loop {
            tokio::select! {
                joined = &mut init_task => {
                    match joined {
                        Ok(Ok(compiler)) => {
                            tracing::info!("css compiler ready");
                            self.compiler = Some(compiler);
                            self.reply(WorkerResponse::Ready);
                        }
                        Ok(Err(err)) => {
                            tracing::warn!(error = %err, "css compiler failed to initialize");
                            self.reply(WorkerResponse::Error { message: err.to_string(), id: None });
                        }
                        Err(join) => {
                            let err = EngineError::WorkerInit(join.to_string());
                            tracing::warn!(error = %err, "css compiler init task aborted");
                            self.reply(WorkerResponse::Error { message: err.to_string(), id: None });
                        }
                    }
                    break;
                }
                request = requests.recv() => match request {
                    Some(WorkerRequest::Compile { id, .. }) => self.reply(not_initialized(id)),
                    None => return,
                },
            }
        }

        // ═══════════════════════════════════════════════════════════════
        // Phase 2: serving
        // ═══════════════════════════════════════════════════════════════
        while let Some(WorkerRequest::Compile { candidates, id }) = requests.recv().await {
            let response = self.compile(candidates, id).await;
            self.reply(response);
        }
        tracing::debug!("css worker channel closed");
    }

    async fn compile(&mut self, candidates: Vec<String>, id: u64) -> WorkerResponse {
        let key = normalize_candidates(&candidates);

        if let Some((cached_key, css)) = &self.cache {
            if *cached_key == key {
                tracing::debug!(id, "css served from cache");
                return WorkerResponse::Css {
                    css: Arc::clone(css),
                    id,
                };
            }
        }

        let Some(mut compiler) = self.compiler.take() else {
            return not_initialized(id);
        };

        let joined = tokio::task::spawn_blocking(move || {
            let result = compiler.build(&key);
            (compiler, key, result)
        })
        .await;

        match joined {
            Ok((compiler, key, Ok(css))) => {
                self.compiler = Some(compiler);
                let css: Arc<str> = Arc::from(css);
                tracing::debug!(id, candidates = key.len(), bytes = css.len(), "css compiled");
                self.cache = Some((key, Arc::clone(&css)));
                WorkerResponse::Css { css, id }
            }
            Ok((compiler, _, Err(err))) => {
                self.compiler = Some(compiler);
                tracing::warn!(id, error = %err, "css compilation failed");
                WorkerResponse::Error {
                    message: err.to_string(),
                    id: Some(id),
                }
            }
            Err(join) => {
                let err = EngineError::Compile(join.to_string());
                tracing::error!(id, error = %err, "css compiler panicked");
                WorkerResponse::Error {
                    message: err.to_string(),
                    id: Some(id),
                }
            }
        }
    }
}

fn not_initialized(id: u64) -> WorkerResponse {
    WorkerResponse::Error {
        message: EngineError::CompilerNotInitialized.to_string(),
        id: Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl UtilityCompiler for Counting {
        fn build(&mut self, candidates: &[String]) -> EngineResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if candidates.iter().any(|c| c == "boom") {
                return Err(EngineError::Compile("boom".into()));
            }
            Ok(candidates.join(","))
        }
    }

    fn compile(candidates: &[&str], id: u64) -> WorkerRequest {
        WorkerRequest::Compile {
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
            id,
        }
    }

    fn counting() -> (Arc<AtomicUsize>, impl FnOnce() -> EngineResult<Counting> + Send) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&calls);
        (calls, move || Ok(Counting { calls: inner }))
    }

    fn css(response: Option<WorkerResponse>) -> (Arc<str>, u64) {
        match response {
            Some(WorkerResponse::Css { css, id }) => (css, id),
            other => panic!("expected css, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn identical_sets_are_served_from_cache() {
        let (calls, init) = counting();
        let (handle, mut rx) = CssWorker::spawn(init);
        assert_eq!(rx.recv().await, Some(WorkerResponse::Ready));

        handle.send(compile(&["bg-red-500", "p-4"], 1)).unwrap();
        let (first, id) = css(rx.recv().await);
        assert_eq!(id, 1);

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.send(compile(&["p-4", "bg-red-500", "p-4"], 2)).unwrap();
        let (second, id) = css(rx.recv().await);
        assert_eq!(id, 2);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, "bg-red-500,p-4");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn changed_set_recompiles_and_replaces_cache() {
        let (calls, init) = counting();
        let (handle, mut rx) = CssWorker::spawn(init);
        rx.recv().await;

        handle.send(compile(&["a"], 1)).unwrap();
        handle.send(compile(&["b"], 2)).unwrap();
        handle.send(compile(&["a"], 3)).unwrap();
        for _ in 0..3 {
            css(rx.recv().await);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn requests_before_ready_are_rejected() {
        let (gate_tx, gate_rx) = std::sync::mpsc::channel::<()>();
        let (handle, mut rx) = CssWorker::spawn(move || {
            let _ = gate_rx.recv();
            Ok(Counting {
                calls: Arc::new(AtomicUsize::new(0)),
            })
        });

        handle.send(compile(&["p-4"], 7)).unwrap();
        assert_eq!(
            rx.recv().await,
            Some(WorkerResponse::Error {
                message: "Compiler not initialized".into(),
                id: Some(7)
            })
        );

        gate_tx.send(()).unwrap();
        assert_eq!(rx.recv().await, Some(WorkerResponse::Ready));
    }

    #[tokio::test]
    async fn init_failure_reports_error_without_id() {
        let (handle, mut rx) = CssWorker::<Counting>::spawn(|| {
            Err(EngineError::UnknownStylesheet {
                id: "missing.css".into(),
            })
        });

        match rx.recv().await {
            Some(WorkerResponse::Error { message, id }) => {
                assert_eq!(id, None);
                assert!(message.contains("missing.css"));
            }
            other => panic!("unexpected {other:?}"),
        }

        handle.send(compile(&["p-4"], 1)).unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(WorkerResponse::Error { id: Some(1), .. })
        ));
    }

    #[tokio::test]
    async fn compile_failure_echoes_id_and_keeps_serving() {
        let (_calls, init) = counting();
        let (handle, mut rx) = CssWorker::spawn(init);
        rx.recv().await;

        handle.send(compile(&["boom"], 4)).unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(WorkerResponse::Error { id: Some(4), .. })
        ));

        handle.send(compile(&["ok"], 5)).unwrap();
        assert_eq!(css(rx.recv().await).1, 5);
    }

    #[test]
    fn wire_format() {
        let json = serde_json::to_value(WorkerResponse::Css {
            css: Arc::from("a{}"),
            id: 3,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "css", "css": "a{}", "id": 3}));

        let json = serde_json::to_value(WorkerResponse::Error {
            message: "x".into(),
            id: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "error", "message": "x"}));

        let req: WorkerRequest =
            serde_json::from_str(r#"{"type":"compile","candidates":["p-4"],"id":1}"#).unwrap();
        assert_eq!(req, compile(&["p-4"], 1));
    }
}
