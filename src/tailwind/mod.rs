//! # Utility CSS compiler
//!
//! Turns a set of class candidates into a stylesheet: the theme preamble
//! (imported virtual sheets, design tokens, base layer) followed by an
//! `@layer utilities` block with one rule per recognised candidate.
//! Candidates that are not utilities (most string literals in a component)
//! are silently ignored.
//!
//! ## Usage
//! ```ignore
//! let mut compiler = TailwindCompiler::new(&ThemeConfig::default(), &VirtualStylesheets::builtin())?;
//! let css = compiler.build(&["flex".into(), "md:p-4".into()])?;
//! ```

pub mod colors;
pub mod registry;
pub mod theme;
pub mod variants;

use std::collections::BTreeSet;

use crate::error::EngineResult;

pub use registry::ThemeLookup;
pub use theme::{BaseRule, ThemeConfig, VirtualStylesheets, DARK_VARIANT_SELECTOR};

/// The seam the CSS worker compiles through.
pub trait UtilityCompiler: Send {
    fn build(&mut self, candidates: &[String]) -> EngineResult<String>;
}

/// A single rendered rule.
#[derive(Debug, Clone)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
    pub media: Vec<String>,
    rank: usize,
}

pub struct TailwindCompiler {
    preamble: String,
    lookup: ThemeLookup,
    dark_variant: String,
}

impl TailwindCompiler {
    /// Resolves every theme import up front; an unknown stylesheet id fails here.
    pub fn new(theme: &ThemeConfig, sheets: &VirtualStylesheets) -> EngineResult<Self> {
        Ok(Self {
            preamble: theme.render_preamble(sheets)?,
            lookup: ThemeLookup {
                colors: theme.color_names(),
                radii: theme.radius_names(),
            },
            dark_variant: theme.dark_variant.clone(),
        })
    }

    pub fn with_defaults() -> EngineResult<Self> {
        Self::new(&ThemeConfig::default(), &VirtualStylesheets::builtin())
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Resolves one candidate, variants included.
    pub fn resolve(&self, candidate: &str) -> Option<CssRule> {
        let parsed = variants::parse_candidate(candidate)?;
        let utility = registry::resolve_utility(parsed.base, &self.lookup)?;

        let element = format!(".{}", variants::escape_selector(candidate));
        let ctx = variants::apply_variants(element, &parsed.variants, &self.dark_variant)?;

        let mut selector = ctx.selector;
        if let Some(child) = utility.child_selector {
            selector.push_str(child);
        }

        let declarations = utility
            .declarations
            .into_iter()
            .map(|(prop, val)| {
                if parsed.important {
                    (prop, format!("{} !important", val))
                } else {
                    (prop, val)
                }
            })
            .collect();

        Some(CssRule {
            selector,
            declarations,
            media: ctx.media,
            rank: ctx.rank,
        })
    }

    fn render_utilities(rules: &[CssRule]) -> String {
        let mut css = String::from("@layer utilities {\n");
        for rule in rules {
            let body = render_rule(&rule.selector, &rule.declarations);
            if rule.media.is_empty() {
                css.push_str("  ");
                css.push_str(&body);
            } else {
                css.push_str(&format!("  @media {} {{ {} }}", rule.media.join(" and "), body));
            }
            css.push('\n');
        }
        css.push_str("}\n");
        css
    }
}

fn render_rule(selector: &str, declarations: &[(String, String)]) -> String {
    let mut out = format!("{} {{", selector);
    for (prop, val) in declarations {
        out.push_str(&format!(" {}: {};", prop, val));
    }
    out.push_str(" }");
    out
}

impl UtilityCompiler for TailwindCompiler {
    fn build(&mut self, candidates: &[String]) -> EngineResult<String> {
        let unique: BTreeSet<&str> = candidates.iter().map(String::as_str).collect();
        let mut rules: Vec<CssRule> = unique.into_iter().filter_map(|c| self.resolve(c)).collect();
        // Responsive rules follow their unconditioned counterparts.
        rules.sort_by_key(|r| r.rank);

        let mut css = self.preamble.clone();
        if !rules.is_empty() {
            css.push_str(&Self::render_utilities(&rules));
        }
        Ok(css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn compile(candidates: &[&str]) -> String {
        let mut compiler = TailwindCompiler::with_defaults().unwrap();
        let owned: Vec<String> = candidates.iter().map(|s| s.to_string()).collect();
        compiler.build(&owned).unwrap()
    }

    #[test]
    fn full_pipeline() {
        let css = compile(&["flex", "p-4", "bg-red-500", "hover:bg-primary/90", "Hi"]);

        assert!(css.contains(".flex { display: flex; }"));
        assert!(css.contains(".p-4 { padding: calc(var(--spacing) * 4); }"));
        assert!(css.contains(".bg-red-500 { background-color: #ef4444; }"));
        assert!(css.contains(
            ".hover\\:bg-primary\\/90:hover { background-color: color-mix(in oklab, var(--color-primary) 90%, transparent); }"
        ));
        assert!(!css.contains(".Hi"));
    }

    #[test]
    fn empty_set_still_has_preamble() {
        let css = compile(&[]);
        assert!(css.contains("--color-primary"));
        assert!(!css.contains("@layer utilities"));
    }

    #[test]
    fn order_independent() {
        assert_eq!(compile(&["p-4", "flex", "p-4"]), compile(&["flex", "p-4"]));
    }

    #[test]
    fn responsive_after_base() {
        let css = compile(&["md:p-2", "p-4"]);
        let base = css.find(".p-4 {").unwrap();
        let responsive = css.find("@media (min-width: 48rem) { .md\\:p-2 {").unwrap();
        assert!(base < responsive);
    }

    #[test]
    fn dark_and_important() {
        let css = compile(&["dark:text-white", "!mt-0"]);
        assert!(css.contains(".dark\\:text-white:is(.dark *) { color: #ffffff; }"));
        assert!(css.contains(".\\!mt-0 { margin-top: 0px !important; }"));
    }

    #[test]
    fn space_between_selector() {
        let css = compile(&["space-y-2"]);
        assert!(css.contains(".space-y-2 > :not(:last-child) { margin-block-end:"));
    }

    #[test]
    fn component_library_classes_compile() {
        let css = compile(&[
            "bg-sidebar",
            "bg-chart-1",
            "[&_svg]:pointer-events-none",
            "has-[>svg]:px-3",
            "data-[state=open]:animate-in",
            "-translate-x-1/2",
            "translate-y-[-50%]",
            "w-(--radix-select-trigger-width)",
            "backdrop-blur-sm",
            "line-clamp-2",
        ]);

        assert!(css.contains(".bg-sidebar { background-color: var(--color-sidebar); }"));
        assert!(css.contains(".bg-chart-1 { background-color: var(--color-chart-1); }"));
        assert!(css.contains(
            ".\\[\\&_svg\\]\\:pointer-events-none svg { pointer-events: none; }"
        ));
        assert!(css.contains(
            ".has-\\[\\>svg\\]\\:px-3:has(>svg) { padding-inline: calc(var(--spacing) * 3); }"
        ));
        assert!(css.contains(".data-\\[state\\=open\\]\\:animate-in[data-state=open] { animation: enter "));
        assert!(css.contains(
            ".-translate-x-1\\/2 { --tw-translate-x: calc(calc(1/2 * 100%) * -1); translate: var(--tw-translate-x, 0) var(--tw-translate-y, 0); }"
        ));
        assert!(css.contains(".translate-y-\\[-50\\%\\] { --tw-translate-y: -50%;"));
        assert!(css.contains(
            ".w-\\(--radix-select-trigger-width\\) { width: var(--radix-select-trigger-width); }"
        ));
        assert!(css.contains(".backdrop-blur-sm { backdrop-filter: blur(8px); }"));
        assert!(css.contains("-webkit-line-clamp: 2;"));
    }

    #[test]
    fn unknown_stylesheet_fails_init() {
        let mut theme = ThemeConfig::default();
        theme.imports.push("missing.css".into());
        let err = TailwindCompiler::new(&theme, &VirtualStylesheets::builtin())
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::UnknownStylesheet { .. }));
    }
}
