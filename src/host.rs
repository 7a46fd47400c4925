//! Host-side view of the preview realm.
//!
//! Holds back payloads until the realm announces itself, keeps the latest
//! payload of each kind so a reloaded realm can be brought back up to date,
//! and derives [`PreviewStatus`] from the latest transform and render
//! outcomes instead of storing it.

use serde::{Deserialize, Serialize};

use crate::console::{ConsoleEntry, ConsoleLog};
use crate::realm::{ColorScheme, HostMessage, RealmMessage};
use crate::transpile::TranspileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStatus {
    Idle,
    Compiling,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Latest payload per kind. `code` and `clear` share the mount slot.
#[derive(Debug, Default, Clone)]
struct LatestPayloads {
    theme: Option<ColorScheme>,
    theme_css: Option<String>,
    tailwind_css: Option<String>,
    mount: Option<HostMessage>,
}

impl LatestPayloads {
    fn record(&mut self, message: &HostMessage) {
        match message {
            HostMessage::Theme { value } => self.theme = Some(*value),
            HostMessage::ThemeCss { css } => self.theme_css = Some(css.clone()),
            HostMessage::TailwindCss { css } => self.tailwind_css = Some(css.clone()),
            HostMessage::Code { .. } | HostMessage::Clear => self.mount = Some(message.clone()),
        }
    }

    /// Styles first so the first render is already styled.
    fn replay(&self) -> Vec<HostMessage> {
        let mut out = Vec::new();
        if let Some(value) = self.theme {
            out.push(HostMessage::Theme { value });
        }
        if let Some(css) = &self.theme_css {
            out.push(HostMessage::ThemeCss { css: css.clone() });
        }
        if let Some(css) = &self.tailwind_css {
            out.push(HostMessage::TailwindCss { css: css.clone() });
        }
        if let Some(mount) = &self.mount {
            out.push(mount.clone());
        }
        out
    }
}

#[derive(Debug)]
pub struct PreviewHost {
    realm_ready: bool,
    latest: LatestPayloads,
    compiling: bool,
    awaiting_render: bool,
    rendered: bool,
    compile_error: Option<TranspileError>,
    runtime_error: Option<RuntimeFailure>,
    console: ConsoleLog,
}

impl PreviewHost {
    pub fn new(console_capacity: usize) -> Self {
        Self {
            realm_ready: false,
            latest: LatestPayloads::default(),
            compiling: false,
            awaiting_render: false,
            rendered: false,
            compile_error: None,
            runtime_error: None,
            console: ConsoleLog::new(console_capacity),
        }
    }

    pub fn is_realm_ready(&self) -> bool {
        self.realm_ready
    }

    /// Records `message` and returns what should be delivered now: the
    /// message itself once the realm is ready, nothing before.
    pub fn post(&mut self, message: HostMessage) -> Vec<HostMessage> {
        self.latest.record(&message);
        if self.realm_ready {
            vec![message]
        } else {
            tracing::trace!(kind = message.kind(), "holding payload until realm is ready");
            Vec::new()
        }
    }

    /// The realm document is being replaced; hold payloads until it is back.
    pub fn realm_reloading(&mut self) {
        self.realm_ready = false;
        self.awaiting_render = false;
    }

    pub fn begin_compile(&mut self) {
        self.compiling = true;
    }

    pub fn compile_succeeded(&mut self, js: String) -> Vec<HostMessage> {
        self.compiling = false;
        self.compile_error = None;
        self.runtime_error = None;
        self.awaiting_render = true;
        self.post(HostMessage::Code { js })
    }

    /// The last good render stays mounted; only the status changes.
    pub fn compile_failed(&mut self, error: TranspileError) {
        self.compiling = false;
        self.compile_error = Some(error);
    }

    pub fn clear(&mut self) -> Vec<HostMessage> {
        self.compiling = false;
        self.awaiting_render = false;
        self.rendered = false;
        self.compile_error = None;
        self.runtime_error = None;
        self.post(HostMessage::Clear)
    }

    /// Applies a realm message; returns payloads to deliver in response.
    pub fn on_realm_message(&mut self, message: RealmMessage) -> Vec<HostMessage> {
        match message {
            RealmMessage::IframeReady => {
                self.realm_ready = true;
                let flush = self.latest.replay();
                self.awaiting_render = flush
                    .iter()
                    .any(|m| matches!(m, HostMessage::Code { .. }));
                tracing::debug!(payloads = flush.len(), "realm ready, flushing payloads");
                flush
            }
            RealmMessage::RenderComplete => {
                self.awaiting_render = false;
                self.rendered = true;
                Vec::new()
            }
            RealmMessage::RuntimeError { message, stack } => {
                tracing::debug!(%message, "runtime error reported by realm");
                self.awaiting_render = false;
                self.runtime_error = Some(RuntimeFailure {
                    message,
                    stack: stack.filter(|s| !s.is_empty()),
                });
                Vec::new()
            }
            RealmMessage::Console { method, args } => {
                self.console.push(method, args);
                Vec::new()
            }
        }
    }

    pub fn status(&self) -> PreviewStatus {
        if self.compile_error.is_some() || self.runtime_error.is_some() {
            PreviewStatus::Error
        } else if self.compiling || self.awaiting_render {
            PreviewStatus::Compiling
        } else if self.rendered {
            PreviewStatus::Ready
        } else {
            PreviewStatus::Idle
        }
    }

    pub fn compile_error(&self) -> Option<&TranspileError> {
        self.compile_error.as_ref()
    }

    pub fn runtime_error(&self) -> Option<&RuntimeFailure> {
        self.runtime_error.as_ref()
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn console_entries(&self) -> Vec<ConsoleEntry> {
        self.console.snapshot()
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }
}
