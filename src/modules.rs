//! Import Resolution Table
//!
//! Fixed mapping from allowed module specifiers to URLs, built once per
//! session. Two policies live here on purpose:
//!
//! - `is_allowed` is the strict gate the transformer checks user imports
//!   against. Only table keys and registered prefixes pass.
//! - `rewrite` is permissive: it walks the module's import sources and
//!   points any bare package the table cannot resolve at the fallback CDN
//!   template, so registry snippets that pull in an unlisted package still
//!   load.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::{walk_export_named_declaration, walk_import_expression};
use oxc_ast_visit::VisitMut;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EngineConfig;

const REACT_VERSION: &str = "19.1.0";
const RADIX_VERSION: &str = "1.4.3";
const REACT_EXTERNAL: &str = "?external=react,react-dom";

/// Every primitive shipped in the pre-bundled UI module.
pub const UI_COMPONENT_NAMES: &[&str] = &[
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
    "dialog",
    "direction",
    "drawer",
    "dropdown-menu",
    "empty",
    "example",
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
    "toggle",
    "toggle-group",
    "tooltip",
];

pub const UI_NAMESPACE: &str = "@/components/ui/";

lazy_static! {
    static ref BARE_PACKAGE_RE: Regex =
        Regex::new(r"^(?:@[a-z0-9][a-z0-9._-]*/)?[a-z0-9][a-z0-9._-]*(?:/.*)?$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPORT MAP DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// The `{ "imports": { specifier: url } }` document embedded in the realm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ImportMap {
    pub imports: BTreeMap<String, String>,
}

impl ImportMap {
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{\"imports\":{}}".to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TABLE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ImportTable {
    entries: BTreeMap<String, String>,
    prefixes: Vec<String>,
    summary: Vec<String>,
    fallback_template: String,
}

#[derive(Debug, Default)]
pub struct ImportTableBuilder {
    cdn_base: String,
    entries: BTreeMap<String, String>,
    prefixes: Vec<String>,
    summary: Vec<String>,
    fallback_template: String,
}

impl ImportTableBuilder {
    pub fn new(cdn_base: &str) -> Self {
        Self {
            cdn_base: cdn_base.trim_end_matches('/').to_string(),
            fallback_template: format!("{}/{{specifier}}", cdn_base.trim_end_matches('/')),
            ..Default::default()
        }
    }

    fn note(&mut self, name: &str) {
        if !self.summary.iter().any(|s| s == name) {
            self.summary.push(name.to_string());
        }
    }

    /// Pin `name@version` on the CDN. `react_external` keeps the package from
    /// bundling its own copy of React.
    pub fn package(mut self, name: &str, version: &str, react_external: bool) -> Self {
        let query = if react_external { REACT_EXTERNAL } else { "" };
        self.entries.insert(
            name.to_string(),
            format!("{}/{}@{}{}", self.cdn_base, name, version, query),
        );
        self.note(name);
        self
    }

    /// Like `package`, plus a `name/` entry so deep imports such as
    /// `react/jsx-runtime` resolve too.
    pub fn package_with_subpaths(mut self, name: &str, version: &str) -> Self {
        let base = format!("{}/{}@{}", self.cdn_base, name, version);
        self.entries.insert(format!("{}/", name), format!("{}/", base));
        self.entries.insert(name.to_string(), base);
        self.note(name);
        self
    }

    pub fn local(mut self, specifier: &str, url: &str) -> Self {
        self.entries.insert(specifier.to_string(), url.to_string());
        self.note(specifier);
        self
    }

    /// One entry per primitive, all served by the same bundle.
    pub fn ui_primitives(mut self, names: &[&str], bundle_url: &str) -> Self {
        for name in names {
            self.entries
                .insert(format!("{}{}", UI_NAMESPACE, name), bundle_url.to_string());
        }
        self.allow_prefix(UI_NAMESPACE)
    }

    pub fn allow_prefix(mut self, prefix: &str) -> Self {
        if !self.prefixes.iter().any(|p| p == prefix) {
            self.prefixes.push(prefix.to_string());
            if prefix.ends_with('/') {
                self.note(&format!("{}*", prefix));
            } else {
                self.note(prefix);
            }
        }
        self
    }

    pub fn fallback_template(mut self, template: &str) -> Self {
        self.fallback_template = template.to_string();
        self
    }

    pub fn build(self) -> ImportTable {
        ImportTable {
            entries: self.entries,
            prefixes: self.prefixes,
            summary: self.summary,
            fallback_template: self.fallback_template,
        }
    }
}

impl ImportTable {
    pub fn builder(cdn_base: &str) -> ImportTableBuilder {
        ImportTableBuilder::new(cdn_base)
    }

    /// The playground's table: pinned React stack, icon sets, helpers, and
    /// the pre-bundled UI primitives.
    pub fn standard(config: &EngineConfig) -> Self {
        Self::builder(&config.cdn_base)
            .package_with_subpaths("react", REACT_VERSION)
            .package_with_subpaths("react-dom", REACT_VERSION)
            .local("@/lib/utils", &config.utils_module_url)
            .ui_primitives(UI_COMPONENT_NAMES, &config.ui_bundle_url)
            .package("lucide-react", "0.469.0", true)
            .package("@tabler/icons-react", "3.30.0", true)
            .package("radix-ui", RADIX_VERSION, true)
            .package("class-variance-authority", "0.7.1", false)
            .package("clsx", "2.1.1", false)
            .package("tailwind-merge", "3.4.0", false)
            .package("recharts", "2.15.4", true)
            .package("sonner", "2.0.7", true)
            .package("cmdk", "1.1.1", true)
            .package("vaul", "1.1.2", true)
            .package("input-otp", "1.4.2", true)
            .package("embla-carousel-react", "8.6.0", true)
            .package("react-day-picker", "9.13.2", true)
            .package("react-resizable-panels", "4.6.2", true)
            .package("next-themes", "0.4.6", true)
            .package("@base-ui/react", "1.1.0", true)
            .fallback_template(&config.fallback_url_template)
            .build()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Strict gate: exact key, a `pkg/` key covering a deep import, or a
    /// registered namespace / local-path prefix.
    pub fn is_allowed(&self, specifier: &str) -> bool {
        if self.entries.contains_key(specifier) {
            return true;
        }
        if self.longest_prefix_entry(specifier).is_some() {
            return true;
        }
        self.prefixes.iter().any(|p| specifier.starts_with(p.as_str()))
    }

    /// Import-map resolution: exact key first, then the longest `…/` key.
    pub fn resolve(&self, specifier: &str) -> Option<String> {
        if let Some(url) = self.entries.get(specifier) {
            return Some(url.clone());
        }
        self.longest_prefix_entry(specifier)
            .map(|(key, url)| format!("{}{}", url, &specifier[key.len()..]))
    }

    fn longest_prefix_entry(&self, specifier: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .filter(|(key, _)| key.ends_with('/') && specifier.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Human-readable list used in disallowed-import diagnostics.
    pub fn allowed_modules_list(&self) -> String {
        self.summary.join(", ")
    }

    pub fn import_map(&self) -> ImportMap {
        ImportMap {
            imports: self.entries.clone(),
        }
    }

    pub fn fallback_url(&self, specifier: &str) -> String {
        self.fallback_template.replace("{specifier}", specifier)
    }

    /// Points every unresolvable bare package in an import, re-export or
    /// `import("…")` at the fallback URL. Relative, absolute, `@/` and URL
    /// specifiers are left alone, and so is text that merely reads like an
    /// import. Code that does not parse as a module comes back unchanged.
    pub fn rewrite(&self, code: &str) -> String {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, SourceType::mjs()).parse();
        if !ret.errors.is_empty() {
            tracing::warn!(errors = ret.errors.len(), "rewrite skipped, module does not parse");
            return code.to_string();
        }
        let mut program = ret.program;
        let mut rewriter = SpecifierRewriter::new(self, &allocator);
        rewriter.visit_program(&mut program);
        if rewriter.rewritten == 0 {
            return code.to_string();
        }
        Codegen::new().build(&program).code
    }

    /// The fallback URL for `specifier`, when the table cannot resolve it.
    pub fn fallback_for(&self, specifier: &str) -> Option<String> {
        if is_bare_package(specifier) && self.resolve(specifier).is_none() {
            Some(self.fallback_url(specifier))
        } else {
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPECIFIER REWRITING
// ═══════════════════════════════════════════════════════════════════════════════

/// Rewrites module specifiers in place: import and export-from sources and
/// string-literal `import()` arguments. Nothing else in the tree is read.
pub struct SpecifierRewriter<'t, 'a> {
    table: &'t ImportTable,
    ast: AstBuilder<'a>,
    pub rewritten: usize,
}

impl<'t, 'a> SpecifierRewriter<'t, 'a> {
    pub fn new(table: &'t ImportTable, allocator: &'a Allocator) -> Self {
        Self {
            table,
            ast: AstBuilder::new(allocator),
            rewritten: 0,
        }
    }

    fn rewrite_source(&mut self, source: &mut StringLiteral<'a>) {
        if let Some(url) = self.table.fallback_for(source.value.as_str()) {
            source.value = self.ast.atom(&url);
            source.raw = None;
            self.rewritten += 1;
        }
    }
}

impl<'t, 'a> VisitMut<'a> for SpecifierRewriter<'t, 'a> {
    fn visit_import_declaration(&mut self, it: &mut ImportDeclaration<'a>) {
        self.rewrite_source(&mut it.source);
    }

    fn visit_export_named_declaration(&mut self, it: &mut ExportNamedDeclaration<'a>) {
        if let Some(source) = it.source.as_mut() {
            self.rewrite_source(source);
        }
        walk_export_named_declaration(self, it);
    }

    fn visit_export_all_declaration(&mut self, it: &mut ExportAllDeclaration<'a>) {
        self.rewrite_source(&mut it.source);
    }

    fn visit_import_expression(&mut self, it: &mut ImportExpression<'a>) {
        if let Expression::StringLiteral(source) = &mut it.source {
            self.rewrite_source(source);
        }
        walk_import_expression(self, it);
    }
}

/// `lodash`, `@scope/pkg`, `pkg/deep/path`; not `./x`, `/x`, `@/x` or URLs.
pub fn is_bare_package(specifier: &str) -> bool {
    !specifier.contains("://") && BARE_PACKAGE_RE.is_match(specifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ImportTable {
        ImportTable::standard(&EngineConfig::default())
    }

    #[test]
    fn exact_and_subpath_resolution() {
        let t = table();
        assert_eq!(
            t.resolve("react").as_deref(),
            Some("https://esm.sh/react@19.1.0")
        );
        assert_eq!(
            t.resolve("react/jsx-runtime").as_deref(),
            Some("https://esm.sh/react@19.1.0/jsx-runtime")
        );
        assert_eq!(
            t.resolve("react-dom/client").as_deref(),
            Some("https://esm.sh/react-dom@19.1.0/client")
        );
        assert_eq!(
            t.resolve("@/components/ui/button").as_deref(),
            Some("/playground/modules/ui.js")
        );
        assert_eq!(t.resolve("left-pad"), None);
    }

    #[test]
    fn gate_accepts_namespace_prefix_but_not_lookalikes() {
        let t = table();
        assert!(t.is_allowed("@/components/ui/not-yet-bundled"));
        assert!(t.is_allowed("lucide-react"));
        assert!(!t.is_allowed("left-pad"));
        assert!(!t.is_allowed("react-router"));
        assert!(!t.is_allowed("@/lib/other"));
    }

    #[test]
    fn registered_local_prefix_is_allowed() {
        let t = ImportTable::builder("https://cdn.test")
            .package("clsx", "2.1.1", false)
            .allow_prefix("./")
            .build();
        assert!(t.is_allowed("./helpers"));
        assert!(!t.is_allowed("../helpers"));
    }

    #[test]
    fn allowed_list_collapses_ui_namespace() {
        let list = table().allowed_modules_list();
        assert!(list.starts_with("react, react-dom, @/lib/utils, @/components/ui/*"));
        assert!(!list.contains("@/components/ui/button"));
    }

    #[test]
    fn rewrite_only_touches_unresolvable_bare_packages() {
        let t = table();
        let code = r#"import { jsx } from "react/jsx-runtime";
import pad from 'left-pad';
import { Button } from "@/components/ui/button";
import local from "./local";
export { debounce } from "lodash-es";
export * from "nanoid";
const lazy = import("date-fns/format");"#;
        let out = t.rewrite(code);
        assert!(out.contains(r#"from "react/jsx-runtime""#));
        assert!(out.contains(r#"from "https://esm.sh/left-pad?external=react,react-dom""#));
        assert!(out.contains(r#"from "@/components/ui/button""#));
        assert!(out.contains(r#"from "./local""#));
        assert!(out.contains(r#"from "https://esm.sh/lodash-es?external=react,react-dom""#));
        assert!(out.contains(r#"from "https://esm.sh/nanoid?external=react,react-dom""#));
        assert!(out.contains(
            r#"import("https://esm.sh/date-fns/format?external=react,react-dom")"#
        ));
    }

    #[test]
    fn rewrite_leaves_lookalike_text_alone() {
        let t = table();
        let code = r#"import pad from "left-pad";
const note = "Copied from 'clipboard' ok";
const call = `import("left-pad")`;
export default () => pad(note + call);"#;
        let out = t.rewrite(code);
        assert!(out.contains(r#"from "https://esm.sh/left-pad?external=react,react-dom""#));
        assert!(out.contains("Copied from 'clipboard' ok"));
        assert!(out.contains(r#"`import("left-pad")`"#));
    }

    #[test]
    fn rewrite_without_fallbacks_returns_input() {
        let t = table();
        let code = "import React from 'react';\nexport default React;";
        assert_eq!(t.rewrite(code), code);
        assert_eq!(t.rewrite("import from from from;"), "import from from from;");
    }

    #[test]
    fn fallback_only_for_unresolved_bare_packages() {
        let t = table();
        assert_eq!(
            t.fallback_for("left-pad").as_deref(),
            Some("https://esm.sh/left-pad?external=react,react-dom")
        );
        assert_eq!(t.fallback_for("react/jsx-runtime"), None);
        assert_eq!(t.fallback_for("./local"), None);
    }

    #[test]
    fn import_map_document_shape() {
        let json = table().import_map().to_json_pretty();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["imports"]["react/"],
            serde_json::Value::String("https://esm.sh/react@19.1.0/".into())
        );
    }

    #[test]
    fn bare_package_detection() {
        assert!(is_bare_package("lodash"));
        assert!(is_bare_package("@scope/pkg/deep"));
        assert!(!is_bare_package("./x"));
        assert!(!is_bare_package("/x"));
        assert!(!is_bare_package("@/components/ui/button"));
        assert!(!is_bare_package("https://esm.sh/x"));
    }
}
