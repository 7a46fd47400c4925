//! Baseline utility candidates of the pre-bundled component library.
//!
//! The library's own class lists never pass through the transformer, so
//! the build step scans its sources once and ships the union as a JSON
//! array. Every CSS request merges that baseline in.

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{EngineError, EngineResult};
use crate::transpile::extract_class_candidates;

const SOURCE_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js"];

fn is_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Sorted union of the candidates found in every script file under `dir`.
pub fn scan_component_library(dir: &Path) -> EngineResult<Vec<String>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| EngineError::Read {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_source(entry.path()) {
            files.push(entry.into_path());
        }
    }

    let per_file: Vec<Vec<String>> = files
        .par_iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|source| extract_class_candidates(&source))
                .map_err(|e| EngineError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
        })
        .collect::<EngineResult<_>>()?;

    let union: BTreeSet<String> = per_file.into_iter().flatten().collect();
    tracing::debug!(
        files = files.len(),
        candidates = union.len(),
        "scanned component library"
    );
    Ok(union.into_iter().collect())
}

/// The document the build step writes next to the module bundles.
pub fn baseline_candidates_json(candidates: &[String]) -> EngineResult<String> {
    serde_json::to_string(candidates).map_err(EngineError::from)
}

pub fn load_baseline_candidates(json: &str) -> EngineResult<Vec<String>> {
    serde_json::from_str(json)
        .map_err(|e| EngineError::Config(format!("baseline candidates: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unions_candidates_across_nested_sources() {
        let dir = tempfile::tempdir().unwrap();
        let ui = dir.path().join("ui");
        std::fs::create_dir(&ui).unwrap();
        std::fs::write(
            ui.join("button.tsx"),
            r#"const base = "inline-flex items-center rounded-md";"#,
        )
        .unwrap();
        std::fs::write(
            ui.join("card.tsx"),
            r#"export const Card = () => <div className="rounded-md border p-6" />;"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.md"), r#""ignored-class""#).unwrap();

        let candidates = scan_component_library(dir.path()).unwrap();
        for expected in ["border", "inline-flex", "items-center", "p-6", "rounded-md"] {
            assert!(candidates.contains(&expected.to_string()), "missing {expected}");
        }
        assert!(!candidates.contains(&"ignored-class".to_string()));

        let mut sorted = candidates.clone();
        sorted.sort();
        assert_eq!(candidates, sorted);
        assert_eq!(
            candidates.iter().filter(|c| *c == "rounded-md").count(),
            1
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan_component_library(&dir.path().join("absent"));
        assert!(matches!(result, Err(EngineError::Read { .. })));
    }

    #[test]
    fn baseline_document_round_trips() {
        let candidates = vec!["flex".to_string(), "p-4".to_string()];
        let json = baseline_candidates_json(&candidates).unwrap();
        assert_eq!(json, r#"["flex","p-4"]"#);
        assert_eq!(load_baseline_candidates(&json).unwrap(), candidates);
        assert!(matches!(
            load_baseline_candidates(r#"{"not":"a list"}"#),
            Err(EngineError::Config(_))
        ));
    }
}
