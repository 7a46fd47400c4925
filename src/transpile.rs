//! Source Transformer
//!
//! Turns TSX component source into a plain ES module:
//!
//! 1. Scan static and dynamic import specifiers and gate them against the
//!    import table (first disallowed specifier fails fast).
//! 2. Parse, strip TypeScript, lower JSX to the automatic React runtime.
//! 3. Inject loop guards and prefix the module counter.
//! 4. Point import sources the table cannot resolve at the fallback CDN.
//! 5. Extract class-name candidates from the *original* source literals.
//!
//! A transform is a pure function of its input and the (immutable) table.

#[cfg(feature = "napi")]
use napi_derive::napi;
use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast_visit::VisitMut;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{JsxOptions, JsxRuntime, TransformOptions, Transformer};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::config::EngineConfig;
use crate::loop_guard::{guard_prelude, LoopGuardInjector};
use crate::modules::{ImportTable, SpecifierRewriter};

lazy_static! {
    /// `import x from "m"`, `import "m"`, `export * from "m"`. The keyword
    /// must open a statement and the clause before `from` may only hold
    /// bindings, so prose such as `Data from "API"` never matches.
    static ref STATIC_IMPORT_RE: Regex = Regex::new(
        r#"(?m)(?:^|;)[ \t]*(?:import|export)\s+(?:[\w$\s{},*]*?\bfrom\s*)?['"]([^'"\n]+)['"]"#
    )
    .unwrap();
    static ref DYNAMIC_IMPORT_RE: Regex =
        Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap();

    static ref SINGLE_QUOTE_RE: Regex = Regex::new(r"(?s)'(?:[^'\\]|\\.)*'").unwrap();
    static ref DOUBLE_QUOTE_RE: Regex = Regex::new(r#"(?s)"(?:[^"\\]|\\.)*""#).unwrap();
    static ref TEMPLATE_LITERAL_RE: Regex = Regex::new(r"(?s)`(?:[^`\\]|\\.)*`").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESULT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct TranspileOutput {
    pub code: String,
    pub declared_imports: Vec<String>,
    pub class_candidates: Vec<String>,
}

/// Position points into the original source: 1-based line, 0-based column
/// (in characters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct TranspileError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl TranspileError {
    fn at(source: &str, message: String, offset: Option<usize>) -> Self {
        let (line, column) = match offset {
            Some(offset) => offset_to_position(source, offset),
            None => (1, 0),
        };
        Self {
            message,
            line,
            column,
        }
    }
}

impl std::fmt::Display for TranspileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

pub type TranspileResult = Result<TranspileOutput, TranspileError>;

/// `{ code, declaredImports, classCandidates }` or `{ error }`.
pub fn result_to_json(result: &TranspileResult) -> serde_json::Value {
    match result {
        Ok(output) => serde_json::to_value(output).unwrap_or(serde_json::Value::Null),
        Err(error) => serde_json::json!({ "error": error }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspileOptions {
    pub loop_guard_threshold: u32,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            loop_guard_threshold: 100_000,
        }
    }
}

impl From<&EngineConfig> for TranspileOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            loop_guard_threshold: config.loop_guard_threshold,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPORT SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Every static and dynamic import specifier, in source order, each once.
pub fn extract_import_specifiers(source: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = STATIC_IMPORT_RE
        .captures_iter(source)
        .chain(DYNAMIC_IMPORT_RE.captures_iter(source))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|(_, spec)| seen.insert(*spec))
        .map(|(_, spec)| spec.to_string())
        .collect()
}

/// First quoted occurrence of `specifier`; the column points at the
/// specifier itself, not the quote.
pub fn find_specifier_position(source: &str, specifier: &str) -> (u32, u32) {
    let double = format!("\"{}\"", specifier);
    let single = format!("'{}'", specifier);

    for (index, line) in source.split('\n').enumerate() {
        let hit = line.find(&double).or_else(|| line.find(&single));
        if let Some(byte_col) = hit {
            let column = line[..byte_col].chars().count() + 1;
            return ((index + 1) as u32, column as u32);
        }
    }

    match source.find(specifier) {
        Some(offset) => offset_to_position(source, offset),
        None => (1, 0),
    }
}

/// Byte offset to (1-based line, 0-based character column).
pub fn offset_to_position(source: &str, offset: usize) -> (u32, u32) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count();
    (line as u32, column as u32)
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASS CANDIDATES
// ═══════════════════════════════════════════════════════════════════════════════

/// Whitespace-separated tokens of every quoted and template literal.
///
/// Runs on the original source: class lists assembled from conditional
/// string pieces survive here but not in lowered output.
pub fn extract_class_candidates(source: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    let mut literals: Vec<regex::Match<'_>> = SINGLE_QUOTE_RE
        .find_iter(source)
        .chain(DOUBLE_QUOTE_RE.find_iter(source))
        .chain(TEMPLATE_LITERAL_RE.find_iter(source))
        .collect();
    literals.sort_by_key(|m| m.start());

    for literal in literals {
        let text = literal.as_str();
        let inner = &text[1..text.len() - 1];
        for token in inner.split_whitespace() {
            if seen.insert(token) {
                candidates.push(token.to_string());
            }
        }
    }

    candidates
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM
// ═══════════════════════════════════════════════════════════════════════════════

pub fn transpile(source: &str, table: &ImportTable, options: &TranspileOptions) -> TranspileResult {
    let declared_imports = extract_import_specifiers(source);

    if let Some(denied) = declared_imports.iter().find(|s| !table.is_allowed(s)) {
        let (line, column) = find_specifier_position(source, denied);
        return Err(TranspileError {
            message: format!(
                "Module \"{}\" is not available in the playground. Available modules: {}",
                denied,
                table.allowed_modules_list()
            ),
            line,
            column,
        });
    }

    let code = lower_module(source, table, options)?;

    Ok(TranspileOutput {
        code,
        declared_imports,
        class_candidates: extract_class_candidates(source),
    })
}

fn lower_module(
    source: &str,
    table: &ImportTable,
    options: &TranspileOptions,
) -> Result<String, TranspileError> {
    let allocator = Allocator::default();
    let source_type = SourceType::tsx();

    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(diagnostic) = ret.errors.first() {
        let offset = diagnostic
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset());
        return Err(TranspileError::at(
            source,
            diagnostic.message.to_string(),
            offset,
        ));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let transform_options = TransformOptions {
        jsx: JsxOptions {
            runtime: JsxRuntime::Automatic,
            ..JsxOptions::default()
        },
        ..TransformOptions::default()
    };
    let ret = Transformer::new(&allocator, Path::new("component.tsx"), &transform_options)
        .build_with_scoping(scoping, &mut program);
    if let Some(diagnostic) = ret.errors.first() {
        let offset = diagnostic
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset());
        return Err(TranspileError::at(
            source,
            diagnostic.message.to_string(),
            offset,
        ));
    }

    let mut injector = LoopGuardInjector::new(&allocator, options.loop_guard_threshold)
        .ok_or_else(|| TranspileError {
            message: "Failed to build loop guard".to_string(),
            line: 1,
            column: 0,
        })?;
    injector.visit_program(&mut program);

    let mut rewriter = SpecifierRewriter::new(table, &allocator);
    rewriter.visit_program(&mut program);

    let body = Codegen::new().build(&program).code;
    Ok(format!("{}{}", guard_prelude(), body))
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn transpile_native(source: String) -> serde_json::Value {
    let config = EngineConfig::default();
    let table = ImportTable::standard(&config);
    result_to_json(&transpile(&source, &table, &TranspileOptions::from(&config)))
}
