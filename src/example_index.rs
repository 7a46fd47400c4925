//! Curated component examples.
//!
//! The build step turns a directory of example sources into an index
//! grouped by component; the editor fetches that index and inserts an
//! example's code on request. Both halves live here: building the index
//! from files and validating a fetched document.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{EngineError, EngineResult};
use crate::staleness::RequestSequence;

/// Component ids examples may be filed under.
pub const CANONICAL_COMPONENT_IDS: &[&str] = &[
    "accordion",
    "alert",
    "alert-dialog",
    "aspect-ratio",
    "avatar",
    "badge",
    "breadcrumb",
    "button",
    "button-group",
    "calendar",
    "card",
    "carousel",
    "chart",
    "checkbox",
    "collapsible",
    "combobox",
    "command",
    "context-menu",
    "data-table",
    "date-picker",
    "dialog",
    "direction",
    "drawer",
    "dropdown-menu",
    "empty",
    "field",
    "hover-card",
    "input",
    "input-group",
    "input-otp",
    "item",
    "kbd",
    "label",
    "menubar",
    "native-select",
    "navigation-menu",
    "pagination",
    "popover",
    "progress",
    "radio-group",
    "resizable",
    "scroll-area",
    "select",
    "separator",
    "sheet",
    "sidebar",
    "skeleton",
    "slider",
    "sonner",
    "spinner",
    "switch",
    "table",
    "tabs",
    "textarea",
    "toast",
    "toggle",
    "toggle-group",
    "tooltip",
    "typography",
];

const SOURCE_PATH_PREFIX: &str = "apps/v4/examples/base/";
const CENTERED_WRAPPER: &str = "export default function CenteredPreview()";
const DEFAULT_ALIAS: &str = "__PreviewDefaultComponent";

lazy_static! {
    static ref RTL_NAME: Regex = Regex::new(r"(?i)(^|-)rtl($|-)").unwrap();
    static ref RTL_CODE: Regex = Regex::new(r"(?i)\brtl\b").unwrap();
    static ref EXAMPLE_UI_IMPORT: Regex =
        Regex::new(r"@/examples/(?:base|radix)/ui(?:-rtl)?/").unwrap();
    static ref EXPORT_DEFAULT_FN: Regex =
        Regex::new(r"export\s+default\s+function\s+([A-Za-z_$][\w$]*)\s*\(").unwrap();
    static ref EXPORT_NAMED_FN: Regex =
        Regex::new(r"export\s+function\s+([A-Za-z_$][\w$]*)\s*\(").unwrap();
    static ref EXPORT_DEFAULT_IDENT: Regex =
        Regex::new(r"export\s+default\s+([A-Za-z_$][\w$]*)\s*;?").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub id: String,
    pub label: String,
    pub source_path: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentExamples {
    pub id: String,
    pub label: String,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleIndex {
    pub components: Vec<ComponentExamples>,
}

/// One example source as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExampleFile {
    pub file_name: String,
    pub source_path: String,
    pub code: String,
}

impl ExampleIndex {
    /// Parses and validates a fetched index document. Every id, label,
    /// source path and code must be a non-empty string.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| EngineError::MalformedIndex(e.to_string()))?;

        let Some(object) = value.as_object() else {
            return Err(EngineError::MalformedIndex("expected object".into()));
        };
        let Some(components) = object.get("components").and_then(|c| c.as_array()) else {
            return Err(EngineError::MalformedIndex(
                "components must be an array".into(),
            ));
        };
        if !components.iter().all(is_component) {
            return Err(EngineError::MalformedIndex(
                "malformed component or example entry".into(),
            ));
        }

        let components = serde_json::from_value(serde_json::Value::Array(components.clone()))
            .map_err(|e| EngineError::MalformedIndex(e.to_string()))?;
        Ok(Self { components })
    }

    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string(self).map_err(|e| EngineError::MalformedIndex(e.to_string()))
    }

    pub fn component(&self, id: &str) -> Option<&ComponentExamples> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn example(&self, id: &str) -> Option<&Example> {
        self.components
            .iter()
            .flat_map(|c| c.examples.iter())
            .find(|e| e.id == id)
    }
}

fn non_empty_str(value: &serde_json::Value, key: &str) -> bool {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty())
}

fn is_example(value: &serde_json::Value) -> bool {
    value.is_object()
        && ["id", "label", "sourcePath", "code"]
            .iter()
            .all(|key| non_empty_str(value, key))
}

fn is_component(value: &serde_json::Value) -> bool {
    value.is_object()
        && non_empty_str(value, "id")
        && non_empty_str(value, "label")
        && value
            .get("examples")
            .and_then(|e| e.as_array())
            .is_some_and(|examples| examples.iter().all(is_example))
}

fn title_case(value: &str) -> String {
    value
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn component_label(component_id: &str) -> String {
    match component_id {
        "kbd" => "Kbd".to_string(),
        "sonner" => "Sonner".to_string(),
        "typography" => "Typography".to_string(),
        other => title_case(other),
    }
}

pub fn example_label(slug: &str) -> String {
    title_case(if slug.is_empty() { "demo" } else { slug })
}

/// Longest canonical id that names the file. `data-picker-*` is a known
/// misspelling of `date-picker`.
pub fn infer_component_id(file_name: &str) -> Option<&'static str> {
    let base = file_name.strip_suffix(".tsx").unwrap_or(file_name);
    if base.starts_with("data-picker-") {
        return Some("date-picker");
    }

    let mut ids: Vec<&'static str> = CANONICAL_COMPONENT_IDS.to_vec();
    ids.sort_by_key(|id| std::cmp::Reverse(id.len()));
    ids.into_iter().find(|id| {
        base == *id
            || base
                .strip_prefix(id)
                .is_some_and(|rest| rest.starts_with('-'))
    })
}

/// Orders labels the way a person would: digit runs compare numerically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let mut ln = String::new();
                while let Some(c) = left.next_if(|c| c.is_ascii_digit()) {
                    ln.push(c);
                }
                let mut rn = String::new();
                while let Some(c) = right.next_if(|c| c.is_ascii_digit()) {
                    rn.push(c);
                }
                let by_value = ln
                    .trim_start_matches('0')
                    .len()
                    .cmp(&rn.trim_start_matches('0').len())
                    .then_with(|| ln.trim_start_matches('0').cmp(rn.trim_start_matches('0')));
                if by_value != Ordering::Equal {
                    return by_value;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Groups example files by component. Right-to-left variants are skipped;
/// files naming no known component produce a warning.
pub fn build_example_index(files: &[RawExampleFile]) -> (ExampleIndex, Vec<String>) {
    let mut warnings = Vec::new();
    let mut grouped: BTreeMap<&'static str, Vec<Example>> = BTreeMap::new();

    for file in files {
        let base = file.file_name.strip_suffix(".tsx").unwrap_or(&file.file_name);
        if RTL_NAME.is_match(base) || RTL_CODE.is_match(&file.code) {
            continue;
        }

        let Some(component_id) = infer_component_id(&file.file_name) else {
            warnings.push(format!(
                "Skipping {}: component id not recognized.",
                file.file_name
            ));
            continue;
        };

        let suffix = match base.get(component_id.len() + 1..) {
            Some(rest) if base != component_id && !rest.is_empty() => rest,
            _ => "demo",
        };

        grouped.entry(component_id).or_default().push(Example {
            id: format!("{component_id}-{suffix}"),
            label: example_label(suffix),
            source_path: file.source_path.clone(),
            code: file.code.clone(),
        });
    }

    let mut components: Vec<ComponentExamples> = grouped
        .into_iter()
        .map(|(id, mut examples)| {
            examples.sort_by(|a, b| natural_cmp(&a.label, &b.label));
            ComponentExamples {
                id: id.to_string(),
                label: component_label(id),
                examples,
            }
        })
        .collect();
    components.sort_by(|a, b| natural_cmp(&a.label, &b.label));

    (ExampleIndex { components }, warnings)
}

/// Points the examples' own UI imports at the preview's component namespace.
pub fn normalize_example_imports(code: &str) -> String {
    EXAMPLE_UI_IMPORT
        .replace_all(code, "@/components/ui/")
        .into_owned()
}

fn exported_component_name(code: &str) -> Option<String> {
    [&*EXPORT_DEFAULT_FN, &*EXPORT_NAMED_FN, &*EXPORT_DEFAULT_IDENT]
        .iter()
        .find_map(|re| re.captures(code))
        .map(|caps| caps[1].to_string())
}

/// Makes the example render centered: the original default export is
/// demoted and a wrapper becomes the new default.
pub fn wrap_with_centered_preview(code: &str) -> String {
    if code.contains(CENTERED_WRAPPER) {
        return code.to_string();
    }
    let Some(name) = exported_component_name(code) else {
        return code.to_string();
    };

    let demoted = EXPORT_DEFAULT_FN.replacen(code, 1, "function $1(");
    let demoted = EXPORT_DEFAULT_IDENT.replacen(&demoted, 1, format!("const {DEFAULT_ALIAS} = $1;"));
    let target = if demoted.contains(DEFAULT_ALIAS) {
        DEFAULT_ALIAS.to_string()
    } else {
        name
    };

    format!(
        "{demoted}\n\n{CENTERED_WRAPPER} {{\n  return (\n    <div className=\"flex min-h-svh w-full items-center justify-center p-6\">\n      <{target} />\n    </div>\n  );\n}}"
    )
}

/// Reads every `.tsx` directly inside `dir`, normalized and wrapped, in
/// file name order.
pub fn read_example_files(dir: &Path) -> EngineResult<Vec<RawExampleFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| EngineError::Read {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !entry.file_type().is_file() || !file_name.ends_with(".tsx") {
            continue;
        }
        let code = std::fs::read_to_string(entry.path()).map_err(|e| EngineError::Read {
            path: entry.path().display().to_string(),
            reason: e.to_string(),
        })?;
        let code = wrap_with_centered_preview(&normalize_example_imports(code.trim_end()));
        files.push(RawExampleFile {
            source_path: format!("{SOURCE_PATH_PREFIX}{file_name}"),
            file_name,
            code,
        });
    }
    Ok(files)
}

/// Inserting an example over non-empty, different code needs confirmation.
pub fn should_confirm_replace(current: &str, next: &str) -> bool {
    !current.trim().is_empty() && current != next
}

/// Tracks fetches of the index; only the most recent one may land.
#[derive(Debug, Default)]
pub struct ExampleIndexLoader {
    sequence: RequestSequence,
    loading: bool,
    data: Option<ExampleIndex>,
    error: Option<String>,
}

impl ExampleIndexLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch and returns its id.
    pub fn begin(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.sequence.next_id()
    }

    /// Abandons any fetch in flight.
    pub fn cancel(&mut self) {
        self.sequence.next_id();
        self.loading = false;
    }

    /// Applies a fetch outcome. `body` is the document text or a transport
    /// error message. Returns `false` when a newer fetch has started since.
    pub fn complete(&mut self, id: u64, body: Result<&str, String>) -> bool {
        if !self.sequence.is_latest(id) {
            tracing::debug!(id, "ignoring superseded example index response");
            return false;
        }
        self.loading = false;
        match body.and_then(|json| ExampleIndex::from_json(json).map_err(|e| e.to_string())) {
            Ok(index) => {
                self.data = Some(index);
                self.error = None;
            }
            Err(message) => {
                tracing::warn!(%message, "example index unavailable");
                self.data = None;
                self.error = Some(message);
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> Option<&ExampleIndex> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
