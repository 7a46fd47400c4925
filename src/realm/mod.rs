//! # Preview realm
//!
//! The isolated context that executes compiled component code. It receives
//! [`HostMessage`]s, loads code through a [`ModuleLoader`], drives a
//! [`Renderer`] and reports back with [`RealmMessage`]s. Inbound messages,
//! console calls and uncaught faults share one queue and are handled
//! strictly in arrival order.
//!
//! Mount identity: successive code payloads hot-swap the component under
//! the same root key. After any runtime error the next successful load
//! remounts under a fresh key so the tripped boundary is discarded.

pub mod bootstrap;
pub mod loader;
pub mod mount;
pub mod protocol;

use tokio::sync::mpsc;

use crate::console::{stringify_args, ConsoleArg, ConsoleMethod};
use crate::error::{EngineError, EngineResult};

pub use bootstrap::bootstrap_document;
pub use loader::{ExportBinding, ModuleHandle, ModuleLoader, ObjectUrls};
pub use mount::{MountMode, MountRequest, RenderFault, Renderer, StyleSlot};
pub use protocol::{ColorScheme, HostMessage, RealmMessage};

/// Log prefix for console calls mirrored into the realm's own log.
pub const CONSOLE_MIRROR_PREFIX: &str = "[preview]";

#[derive(Debug, Clone)]
pub enum RealmInput {
    Host(HostMessage),
    Console {
        method: ConsoleMethod,
        args: Vec<ConsoleArg>,
    },
    /// Uncaught error or unhandled rejection outside the boundary.
    Fault(RenderFault),
}

/// Host side of the realm's inbox.
#[derive(Debug, Clone)]
pub struct RealmSender {
    tx: mpsc::UnboundedSender<RealmInput>,
}

impl RealmSender {
    pub fn post(&self, message: HostMessage) -> EngineResult<()> {
        self.tx
            .send(RealmInput::Host(message))
            .map_err(|_| EngineError::ChannelClosed("realm"))
    }
}

/// Handle given to code running inside the realm.
#[derive(Debug, Clone)]
pub struct RealmContext {
    tx: mpsc::UnboundedSender<RealmInput>,
}

impl RealmContext {
    pub fn console(&self, method: ConsoleMethod, args: Vec<ConsoleArg>) {
        let _ = self.tx.send(RealmInput::Console { method, args });
    }

    pub fn uncaught_error(&self, message: impl Into<String>, stack: Option<String>) {
        let _ = self.tx.send(RealmInput::Fault(RenderFault {
            message: message.into(),
            stack,
        }));
    }

    /// Rejection reasons carry a message when they are errors; anything
    /// else is reported by its display form.
    pub fn unhandled_rejection(&self, reason: &ConsoleArg) {
        let message = match reason {
            ConsoleArg::Json(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| reason.stringify()),
            other => other.stringify(),
        };
        self.uncaught_error(message, None);
    }
}

pub struct RealmChannels {
    pub host: RealmSender,
    pub context: RealmContext,
    pub outbound: mpsc::UnboundedReceiver<RealmMessage>,
}

pub struct PreviewRealm<L, R> {
    loader: L,
    renderer: R,
    current: Option<ModuleHandle>,
    root_key: u64,
    mounted: bool,
    remount_next: bool,
    outbound: mpsc::UnboundedSender<RealmMessage>,
}

impl<L, R> PreviewRealm<L, R>
where
    L: ModuleLoader + 'static,
    R: Renderer + 'static,
{
    pub fn new(loader: L, renderer: R, outbound: mpsc::UnboundedSender<RealmMessage>) -> Self {
        Self {
            loader,
            renderer,
            current: None,
            root_key: 0,
            mounted: false,
            remount_next: false,
            outbound,
        }
    }

    /// Starts the realm task; it announces `iframe-ready` first.
    pub fn spawn(loader: L, renderer: R) -> RealmChannels {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let realm = Self::new(loader, renderer, out_tx);
        tokio::spawn(realm.run(in_rx));

        RealmChannels {
            host: RealmSender { tx: in_tx.clone() },
            context: RealmContext { tx: in_tx },
            outbound: out_rx,
        }
    }

    pub async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<RealmInput>) {
        self.post(RealmMessage::IframeReady);
        while let Some(input) = inbox.recv().await {
            self.handle(input).await;
        }
        if let Some(handle) = self.current.take() {
            self.loader.release(handle);
        }
    }

    fn post(&self, message: RealmMessage) {
        let _ = self.outbound.send(message);
    }

    pub fn root_key(&self) -> u64 {
        self.root_key
    }

    pub async fn handle(&mut self, input: RealmInput) {
        match input {
            RealmInput::Host(HostMessage::Code { js }) => self.load_and_render(js).await,
            RealmInput::Host(HostMessage::Clear) => self.clear(),
            RealmInput::Host(HostMessage::ThemeCss { css }) => {
                self.renderer.apply_stylesheet(StyleSlot::Theme, &css)
            }
            RealmInput::Host(HostMessage::TailwindCss { css }) => {
                self.renderer.apply_stylesheet(StyleSlot::Utilities, &css)
            }
            RealmInput::Host(HostMessage::Theme { value }) => {
                self.renderer.set_color_scheme(value)
            }
            RealmInput::Console { method, args } => {
                let args = stringify_args(&args);
                tracing::debug!(
                    target: "preview_realm",
                    "{} {}: {}",
                    CONSOLE_MIRROR_PREFIX,
                    method,
                    args.join(" ")
                );
                self.post(RealmMessage::Console { method, args });
            }
            RealmInput::Fault(fault) => {
                tracing::warn!(message = %fault.message, "uncaught error in preview realm");
                self.renderer.show_overlay(&fault.message);
                self.report(fault);
            }
        }
    }

    fn report(&mut self, fault: RenderFault) {
        self.remount_next = true;
        self.post(RealmMessage::RuntimeError {
            message: fault.message,
            stack: fault.stack,
        });
    }

    async fn load_and_render(&mut self, js: String) {
        self.renderer.hide_overlay();

        let handle = match self.loader.load_module(js).await {
            Ok(handle) => handle,
            Err(err) => {
                let message = match err {
                    EngineError::ModuleLoad(message) => message,
                    other => other.to_string(),
                };
                tracing::warn!(%message, "module load failed");
                self.renderer.show_overlay(&message);
                self.report(RenderFault::new(message));
                return;
            }
        };

        // The new module is live; the old one can go.
        if let Some(previous) = self.current.replace(handle.clone()) {
            self.loader.release(previous);
        }

        let export = match handle.component_export() {
            Some(binding) if binding.callable => binding.name.clone(),
            _ => {
                self.renderer.clear();
                self.mounted = false;
                self.post(RealmMessage::RenderComplete);
                return;
            }
        };

        let mode = if self.mounted && !self.remount_next {
            MountMode::HotSwap
        } else {
            self.root_key += 1;
            MountMode::Remount
        };

        let request = MountRequest {
            root_key: self.root_key,
            mode,
            module_url: handle.url,
            export_name: export,
        };

        match self.renderer.render(request) {
            Ok(()) => {
                self.mounted = true;
                self.remount_next = false;
                self.post(RealmMessage::RenderComplete);
            }
            Err(fault) => {
                self.mounted = true;
                tracing::debug!(message = %fault.message, "render caught by error boundary");
                self.report(fault);
            }
        }
    }

    fn clear(&mut self) {
        self.renderer.hide_overlay();
        self.renderer.clear();
        self.mounted = false;
        self.remount_next = false;
        if let Some(handle) = self.current.take() {
            self.loader.release(handle);
        }
    }
}
