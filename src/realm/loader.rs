//! Loading executable text as a module.
//!
//! The realm asks a [`ModuleLoader`] to turn compiled code into a
//! [`ModuleHandle`]; how that happens (object URL plus dynamic import in a
//! browser, an embedded engine elsewhere) is the loader's business. The
//! realm owns handle lifetimes: a handle is released only after its
//! successor has loaded.

use std::collections::HashMap;
use std::future::Future;

use uuid::Uuid;

use crate::error::EngineResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBinding {
    pub name: String,
    pub callable: bool,
}

impl ExportBinding {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            callable: true,
        }
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            callable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHandle {
    pub url: String,
    /// In module export order.
    pub exports: Vec<ExportBinding>,
}

impl ModuleHandle {
    /// `default` when present, otherwise the first callable export.
    pub fn component_export(&self) -> Option<&ExportBinding> {
        self.exports
            .iter()
            .find(|e| e.name == "default")
            .or_else(|| self.exports.iter().find(|e| e.callable))
    }
}

pub trait ModuleLoader: Send {
    fn load_module(
        &mut self,
        source: String,
    ) -> impl Future<Output = EngineResult<ModuleHandle>> + Send;

    /// Frees whatever backs `handle` (e.g. revokes its object URL).
    fn release(&mut self, handle: ModuleHandle);
}

/// Text-backed URLs in the `blob:` style, for loaders that import by URL.
#[derive(Debug, Default)]
pub struct ObjectUrls {
    live: HashMap<String, String>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, source: String) -> String {
        let url = format!("blob:preview/{}", Uuid::new_v4());
        self.live.insert(url.clone(), source);
        url
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.live.get(url).map(String::as_str)
    }

    pub fn revoke(&mut self, url: &str) -> bool {
        self.live.remove(url).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
