//! # Live Preview Engine
//!
//! Takes component source as the user types it and keeps an isolated
//! preview realm rendering it, styled, with failures reported back at
//! source positions.
//!
//! ## Pipeline
//!
//! 1. **Orchestration**: edits are debounced; a transform error is only
//!    surfaced if it outlives a grace period, so half-typed code never
//!    flashes an error.
//! 2. **Transform**: TSX is gated against the import table, stripped of
//!    types, lowered to the automatic JSX runtime, loop-guarded and
//!    rewritten so unknown bare packages load from the fallback CDN.
//! 3. **Styles**: class candidates from the source literals, merged with
//!    the component library baseline, go to the CSS worker, which keeps a
//!    warmed compiler and memoizes the last result.
//! 4. **Realm**: code and stylesheets are posted as typed messages. The
//!    realm hot-swaps successive modules under one root and remounts after
//!    a runtime error.
//!
//! ## Staleness
//!
//! Every async hop carries an id or the source it was computed from.
//! Results for anything but the current input are dropped: transform
//! results by source identity, CSS responses by monotonic id, example
//! index fetches by strict latest id.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod candidates;
pub mod config;
pub mod console;
pub mod css_worker;
pub mod error;
pub mod example_index;
pub mod host;
mod loop_guard;
pub mod modules;
pub mod orchestrator;
pub mod realm;
pub mod registry_import;
pub mod session;
pub mod snippets;
pub mod staleness;
pub mod style_client;
pub mod tailwind;
pub mod transpile;

#[cfg(test)]
mod transpile_tests;

pub use config::EngineConfig;
pub use css_worker::{CssWorker, CssWorkerHandle, WorkerRequest, WorkerResponse};
pub use error::{EngineError, EngineResult};
pub use host::{PreviewHost, PreviewStatus, RuntimeFailure};
pub use modules::{ImportMap, ImportTable, ImportTableBuilder};
pub use orchestrator::{Orchestrator, OrchestratorEvent, OrchestratorHandle};
pub use realm::{HostMessage, PreviewRealm, RealmMessage};
pub use session::{PreviewSession, SessionOptions, SessionSnapshot};
pub use staleness::RequestSequence;
pub use style_client::{StyleClient, StyleEvent};
pub use tailwind::{TailwindCompiler, UtilityCompiler};
pub use transpile::{
    extract_class_candidates, transpile, TranspileError, TranspileOptions, TranspileOutput,
    TranspileResult,
};

#[cfg(feature = "napi")]
pub use transpile::transpile_native;

/// The import map document the realm bootstrap embeds, for the default
/// configuration.
#[cfg(feature = "napi")]
#[napi]
pub fn import_map_native() -> String {
    let config = EngineConfig::default();
    ImportTable::standard(&config)
        .import_map()
        .to_json_pretty()
}

#[cfg(feature = "napi")]
#[napi]
pub fn preview_bridge() -> String {
    "Preview Engine Native Bridge Connected".to_string()
}
