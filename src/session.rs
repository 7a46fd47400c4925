//! # Preview session
//!
//! One long-lived owner for everything a preview needs: the orchestrator,
//! the CSS worker link, the style client, the host-side realm state and
//! the realm sender. All routing happens on a single task, so every piece
//! of derived state has exactly one writer. Observers read
//! [`SessionSnapshot`]s from a `watch` channel.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::config::EngineConfig;
use crate::console::ConsoleEntry;
use crate::css_worker::{CssWorkerHandle, WorkerRequest, WorkerResponse};
use crate::error::{EngineError, EngineResult};
use crate::host::{PreviewHost, PreviewStatus, RuntimeFailure};
use crate::modules::ImportTable;
use crate::orchestrator::{Orchestrator, OrchestratorEvent, OrchestratorHandle};
use crate::realm::{ColorScheme, HostMessage, RealmChannels, RealmMessage, RealmSender};
use crate::style_client::{StyleClient, StyleEvent};
use crate::transpile::TranspileError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: PreviewStatus,
    pub compile_error: Option<TranspileError>,
    pub runtime_error: Option<RuntimeFailure>,
    pub console: Vec<ConsoleEntry>,
    pub declared_imports: Vec<String>,
    /// The CSS compiler is unavailable; the preview renders without utilities.
    pub unstyled: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            status: PreviewStatus::Idle,
            compile_error: None,
            runtime_error: None,
            console: Vec::new(),
            declared_imports: Vec::new(),
            unstyled: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub config: EngineConfig,
    /// Candidates the pre-bundled component library always needs.
    pub baseline_candidates: Vec<String>,
    pub theme_css: Option<String>,
    pub color_scheme: ColorScheme,
}

pub struct WorkerLink {
    pub handle: CssWorkerHandle,
    pub responses: mpsc::UnboundedReceiver<WorkerResponse>,
}

pub struct RealmLink {
    pub sender: RealmSender,
    pub messages: mpsc::UnboundedReceiver<RealmMessage>,
}

impl From<RealmChannels> for RealmLink {
    fn from(channels: RealmChannels) -> Self {
        Self {
            sender: channels.host,
            messages: channels.outbound,
        }
    }
}

#[derive(Debug)]
enum SessionCommand {
    SetTheme(ColorScheme),
    RealmReloading,
    ClearConsole,
}

pub struct PreviewSession {
    orchestrator: OrchestratorHandle,
    commands: mpsc::UnboundedSender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl PreviewSession {
    pub fn start(
        options: SessionOptions,
        table: Arc<ImportTable>,
        worker: WorkerLink,
        realm: RealmLink,
    ) -> Self {
        let (orchestrator, events) = Orchestrator::new(table, &options.config).spawn();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snap_tx, snap_rx) = watch::channel(SessionSnapshot::default());

        let mut router = Router {
            host: PreviewHost::new(options.config.console_capacity),
            styles: StyleClient::new(options.baseline_candidates),
            worker: worker.handle,
            realm: realm.sender,
            declared_imports: Vec::new(),
            unstyled: false,
            snapshots: snap_tx,
        };
        router.deliver_post(HostMessage::Theme {
            value: options.color_scheme,
        });
        if let Some(css) = options.theme_css {
            router.deliver_post(HostMessage::ThemeCss { css });
        }

        tokio::spawn(router.run(events, worker.responses, realm.messages, cmd_rx));

        Self {
            orchestrator,
            commands: cmd_tx,
            snapshots: snap_rx,
        }
    }

    pub fn set_source(&self, source: impl Into<String>) -> EngineResult<()> {
        self.orchestrator.set_source(source)
    }

    pub fn set_theme(&self, scheme: ColorScheme) -> EngineResult<()> {
        self.command(SessionCommand::SetTheme(scheme))
    }

    /// The realm document is being reloaded; payloads are held until it
    /// announces itself again.
    pub fn realm_reloading(&self) -> EngineResult<()> {
        self.command(SessionCommand::RealmReloading)
    }

    pub fn clear_console(&self) -> EngineResult<()> {
        self.command(SessionCommand::ClearConsole)
    }

    fn command(&self, command: SessionCommand) -> EngineResult<()> {
        self.commands
            .send(command)
            .map_err(|_| EngineError::ChannelClosed("session"))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }
}

struct Router {
    host: PreviewHost,
    styles: StyleClient,
    worker: CssWorkerHandle,
    realm: RealmSender,
    declared_imports: Vec<String>,
    unstyled: bool,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Router {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<OrchestratorEvent>,
        mut worker: mpsc::UnboundedReceiver<WorkerResponse>,
        mut realm: mpsc::UnboundedReceiver<RealmMessage>,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    ) {
        loop {
            tokio::select! {
                Some(event) = events.recv() => self.on_orchestrator(event),
                Some(response) = worker.recv() => self.on_worker(response),
                Some(message) = realm.recv() => {
                    let flush = self.host.on_realm_message(message);
                    self.deliver(flush);
                }
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
            }
            self.publish();
        }
        tracing::debug!("preview session closed");
    }

    fn on_orchestrator(&mut self, event: OrchestratorEvent) {
        match event {
            OrchestratorEvent::Compiling => self.host.begin_compile(),
            OrchestratorEvent::Compiled(output) => {
                if let Some(request) = self.styles.request(&output.class_candidates) {
                    self.send_worker(request);
                }
                self.declared_imports = output.declared_imports;
                let flush = self.host.compile_succeeded(output.code);
                self.deliver(flush);
            }
            OrchestratorEvent::Failed(error) => self.host.compile_failed(error),
            OrchestratorEvent::Cleared => {
                self.declared_imports.clear();
                let flush = self.host.clear();
                self.deliver(flush);
            }
        }
    }

    fn on_worker(&mut self, response: WorkerResponse) {
        match self.styles.on_response(response) {
            StyleEvent::Send(request) => self.send_worker(request),
            StyleEvent::Apply(css) => self.deliver_post(HostMessage::TailwindCss {
                css: css.to_string(),
            }),
            StyleEvent::Unstyled => {
                self.unstyled = true;
                self.deliver_post(HostMessage::TailwindCss { css: String::new() });
            }
            StyleEvent::CompileFailed(_) | StyleEvent::Ignored => {}
        }
    }

    fn on_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetTheme(value) => self.deliver_post(HostMessage::Theme { value }),
            SessionCommand::RealmReloading => self.host.realm_reloading(),
            SessionCommand::ClearConsole => self.host.clear_console(),
        }
    }

    fn send_worker(&self, request: WorkerRequest) {
        if let Err(err) = self.worker.send(request) {
            tracing::warn!(error = %err, "css worker is gone");
        }
    }

    fn deliver_post(&mut self, message: HostMessage) {
        let flush = self.host.post(message);
        self.deliver(flush);
    }

    fn deliver(&self, messages: Vec<HostMessage>) {
        for message in messages {
            let kind = message.kind();
            if let Err(err) = self.realm.post(message) {
                tracing::warn!(kind, error = %err, "realm is gone");
            }
        }
    }

    fn publish(&self) {
        let snapshot = SessionSnapshot {
            status: self.host.status(),
            compile_error: self.host.compile_error().cloned(),
            runtime_error: self.host.runtime_error().cloned(),
            console: self.host.console_entries(),
            declared_imports: self.declared_imports.clone(),
            unstyled: self.unstyled,
        };
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}
