//! Shared snippet persistence.
//!
//! The engine only needs `create` and `get`; [`MemorySnippetStore`] is the
//! in-process implementation used by tests and single-node hosts.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnippetSource {
    #[default]
    Share,
    /// Created by opening a registry item.
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnippet {
    pub code: String,
    #[serde(default)]
    pub global_css: Option<String>,
    #[serde(default)]
    pub source: SnippetSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub code: String,
    pub global_css: Option<String>,
    pub source: SnippetSource,
    pub created_at: DateTime<Utc>,
}

pub trait SnippetStore: Send + Sync {
    /// Validates and stores `snippet`, returning its id.
    fn create(&self, snippet: NewSnippet) -> EngineResult<String>;

    fn get(&self, id: &str) -> EngineResult<Snippet>;
}

#[derive(Debug, Clone, Copy)]
pub struct SnippetLimits {
    pub max_code_bytes: usize,
    pub max_global_css_bytes: usize,
}

impl From<&EngineConfig> for SnippetLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_code_bytes: config.max_snippet_bytes,
            max_global_css_bytes: config.max_snippet_bytes,
        }
    }
}

impl SnippetLimits {
    /// Opened registry items may carry only a stylesheet, so their code
    /// may be empty.
    pub fn check(&self, snippet: &NewSnippet) -> EngineResult<()> {
        if snippet.source == SnippetSource::Share && snippet.code.trim().is_empty() {
            return Err(EngineError::Missing("Code"));
        }
        if snippet.code.len() > self.max_code_bytes {
            return Err(EngineError::TooLarge {
                what: "Code",
                limit: self.max_code_bytes,
            });
        }
        if let Some(css) = &snippet.global_css {
            if css.len() > self.max_global_css_bytes {
                return Err(EngineError::TooLarge {
                    what: "globalCss",
                    limit: self.max_global_css_bytes,
                });
            }
        }
        Ok(())
    }
}

/// Ten characters from the alphanumeric alphabet, drawn from a v4 uuid.
pub fn generate_snippet_id() -> String {
    let bytes = uuid::Uuid::new_v4().into_bytes();
    bytes
        .iter()
        .take(ID_LEN)
        .map(|b| ID_ALPHABET[*b as usize % ID_ALPHABET.len()] as char)
        .collect()
}

#[derive(Debug)]
pub struct MemorySnippetStore {
    limits: SnippetLimits,
    snippets: DashMap<String, Snippet>,
}

impl MemorySnippetStore {
    pub fn new(limits: SnippetLimits) -> Self {
        Self {
            limits,
            snippets: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

impl SnippetStore for MemorySnippetStore {
    fn create(&self, snippet: NewSnippet) -> EngineResult<String> {
        self.limits.check(&snippet)?;

        let created_at = Utc::now();
        let id = loop {
            let id = generate_snippet_id();
            if let Entry::Vacant(slot) = self.snippets.entry(id.clone()) {
                slot.insert(Snippet {
                    id: id.clone(),
                    code: snippet.code,
                    global_css: snippet.global_css,
                    source: snippet.source,
                    created_at,
                });
                break id;
            }
        };
        tracing::debug!(%id, "snippet stored");
        Ok(id)
    }

    fn get(&self, id: &str) -> EngineResult<Snippet> {
        self.snippets
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::SnippetNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> MemorySnippetStore {
        MemorySnippetStore::new(SnippetLimits {
            max_code_bytes: 32,
            max_global_css_bytes: 16,
        })
    }

    fn shared(code: &str) -> NewSnippet {
        NewSnippet {
            code: code.to_string(),
            global_css: None,
            source: SnippetSource::Share,
        }
    }

    #[test]
    fn ids_are_ten_alphanumerics() {
        let id = generate_snippet_id();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn create_then_get() {
        let store = store();
        let id = store
            .create(NewSnippet {
                global_css: Some(":root{}".into()),
                ..shared("export default () => null")
            })
            .unwrap();

        let snippet = store.get(&id).unwrap();
        assert_eq!(snippet.code, "export default () => null");
        assert_eq!(snippet.global_css.as_deref(), Some(":root{}"));
        assert_eq!(snippet.source, SnippetSource::Share);
    }

    #[test]
    fn rejects_blank_and_oversized() {
        let store = store();
        assert_eq!(store.create(shared("  \n")), Err(EngineError::Missing("Code")));
        assert!(matches!(
            store.create(shared(&"x".repeat(33))),
            Err(EngineError::TooLarge { what: "Code", .. })
        ));
        assert!(matches!(
            store.create(NewSnippet {
                global_css: Some("y".repeat(17)),
                ..shared("ok")
            }),
            Err(EngineError::TooLarge { what: "globalCss", .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn opened_items_may_be_stylesheet_only() {
        let store = store();
        let id = store
            .create(NewSnippet {
                code: String::new(),
                global_css: Some(".dark{}".into()),
                source: SnippetSource::Open,
            })
            .unwrap();
        assert_eq!(store.get(&id).unwrap().source, SnippetSource::Open);
    }

    #[test]
    fn missing_id_is_not_found() {
        assert_eq!(
            store().get("nope"),
            Err(EngineError::SnippetNotFound { id: "nope".into() })
        );
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.create(shared(&format!("code {i}"))).unwrap())
            })
            .collect();
        let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(store.len(), 8);
    }
}
