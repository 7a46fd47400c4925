//! Caller side of the CSS worker protocol.
//!
//! Merges the component library's baseline candidates into every request,
//! skips requests whose merged key did not change, holds the latest key
//! until the worker reports ready, and drops responses older than one
//! already applied.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::css_worker::{WorkerRequest, WorkerResponse};
use crate::staleness::RequestSequence;

#[derive(Debug, Clone, PartialEq)]
pub enum StyleEvent {
    /// Send this to the worker.
    Send(WorkerRequest),
    /// New stylesheet for the realm.
    Apply(Arc<str>),
    /// The compiler is unavailable for this session; render unstyled.
    Unstyled,
    CompileFailed(String),
    Ignored,
}

#[derive(Debug, Default)]
pub struct StyleClient {
    baseline: BTreeSet<String>,
    ready: bool,
    unavailable: bool,
    pending: Option<Vec<String>>,
    last_sent: Option<Vec<String>>,
    sequence: RequestSequence,
    current: Option<Arc<str>>,
}

impl StyleClient {
    pub fn new<I>(baseline: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            baseline: baseline.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn current_css(&self) -> Option<&Arc<str>> {
        self.current.as_ref()
    }

    fn merged_key(&self, candidates: &[String]) -> Vec<String> {
        let mut merged = self.baseline.clone();
        merged.extend(candidates.iter().cloned());
        merged.into_iter().collect()
    }

    /// Returns the request to send, or `None` when nothing changed or the
    /// worker is not ready yet (the key is then held for the ready flush).
    pub fn request(&mut self, candidates: &[String]) -> Option<WorkerRequest> {
        if self.unavailable {
            return None;
        }
        let key = self.merged_key(candidates);
        if key.is_empty() || self.last_sent.as_ref() == Some(&key) {
            return None;
        }
        if !self.ready {
            self.pending = Some(key);
            return None;
        }
        Some(self.issue(key))
    }

    fn issue(&mut self, key: Vec<String>) -> WorkerRequest {
        self.last_sent = Some(key.clone());
        WorkerRequest::Compile {
            candidates: key,
            id: self.sequence.next_id(),
        }
    }

    pub fn on_response(&mut self, response: WorkerResponse) -> StyleEvent {
        match response {
            WorkerResponse::Ready => {
                self.ready = true;
                match self.pending.take() {
                    Some(key) if self.last_sent.as_ref() != Some(&key) => {
                        StyleEvent::Send(self.issue(key))
                    }
                    _ => StyleEvent::Ignored,
                }
            }
            WorkerResponse::Css { css, id } => {
                if !self.sequence.try_apply(id) {
                    tracing::debug!(id, "dropping stale css response");
                    return StyleEvent::Ignored;
                }
                self.current = Some(Arc::clone(&css));
                StyleEvent::Apply(css)
            }
            WorkerResponse::Error { message, id: None } => {
                tracing::warn!(%message, "css worker unavailable, preview renders unstyled");
                self.unavailable = true;
                self.pending = None;
                StyleEvent::Unstyled
            }
            WorkerResponse::Error {
                message,
                id: Some(id),
            } => {
                if self.sequence.is_latest(id) {
                    // Allow the same set to be retried on the next edit.
                    self.last_sent = None;
                }
                tracing::warn!(id, %message, "css compile failed");
                StyleEvent::CompileFailed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ready_client(baseline: &[&str]) -> StyleClient {
        let mut client = StyleClient::new(strings(baseline));
        assert_eq!(client.on_response(WorkerResponse::Ready), StyleEvent::Ignored);
        client
    }

    #[test]
    fn baseline_is_merged_sorted() {
        let mut client = ready_client(&["rounded-md", "bg-primary"]);
        let request = client.request(&strings(&["p-4", "bg-primary"])).unwrap();
        assert_eq!(
            request,
            WorkerRequest::Compile {
                candidates: strings(&["bg-primary", "p-4", "rounded-md"]),
                id: 1
            }
        );
    }

    #[test]
    fn unchanged_key_is_not_resent() {
        let mut client = ready_client(&[]);
        assert!(client.request(&strings(&["p-4", "flex"])).is_some());
        assert!(client.request(&strings(&["flex", "p-4", "flex"])).is_none());
        assert!(client.request(&strings(&["flex"])).is_some());
    }

    #[test]
    fn empty_set_sends_nothing() {
        let mut client = ready_client(&[]);
        assert!(client.request(&[]).is_none());
    }

    #[test]
    fn held_until_ready_then_flushed() {
        let mut client = StyleClient::new(Vec::new());
        assert!(client.request(&strings(&["a"])).is_none());
        assert!(client.request(&strings(&["b"])).is_none());

        match client.on_response(WorkerResponse::Ready) {
            StyleEvent::Send(WorkerRequest::Compile { candidates, id }) => {
                assert_eq!(candidates, strings(&["b"]));
                assert_eq!(id, 1);
            }
            other => panic!("expected flush, got {other:?}"),
        }
    }

    #[test]
    fn newer_response_wins_regardless_of_arrival() {
        let mut client = ready_client(&[]);
        client.request(&strings(&["a"])).unwrap();
        client.request(&strings(&["b"])).unwrap();

        let two: Arc<str> = Arc::from("two");
        let one: Arc<str> = Arc::from("one");
        assert_eq!(
            client.on_response(WorkerResponse::Css {
                css: Arc::clone(&two),
                id: 2
            }),
            StyleEvent::Apply(Arc::clone(&two))
        );
        assert_eq!(
            client.on_response(WorkerResponse::Css { css: one, id: 1 }),
            StyleEvent::Ignored
        );
        assert_eq!(client.current_css().map(|c| &**c), Some("two"));
    }

    #[test]
    fn init_failure_goes_unstyled() {
        let mut client = StyleClient::new(Vec::new());
        client.request(&strings(&["a"]));
        let event = client.on_response(WorkerResponse::Error {
            message: "Unknown stylesheet: x".into(),
            id: None,
        });
        assert_eq!(event, StyleEvent::Unstyled);
        assert!(client.request(&strings(&["b"])).is_none());
    }

    #[test]
    fn failed_compile_can_be_retried() {
        let mut client = ready_client(&[]);
        client.request(&strings(&["a"])).unwrap();
        client.on_response(WorkerResponse::Error {
            message: "bad".into(),
            id: Some(1),
        });
        assert!(client.request(&strings(&["a"])).is_some());
    }
}
