//! Theme configuration and the virtual stylesheets it imports.
//!
//! The compiler never touches the filesystem or network: every `@import`
//! in the theme is served from [`VirtualStylesheets`]. An id the map does
//! not know fails initialization with [`EngineError::UnknownStylesheet`].

use std::collections::{BTreeSet, HashMap};

use crate::error::{EngineError, EngineResult};

/// Dark mode is class-driven: anything under an element carrying `.dark`.
pub const DARK_VARIANT_SELECTOR: &str = "&:is(.dark *)";

#[derive(Debug, Clone)]
pub struct BaseRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl BaseRule {
    fn new(selector: &str, declarations: &[(&str, &str)]) -> Self {
        Self {
            selector: selector.to_string(),
            declarations: declarations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeConfig {
    /// Stylesheet ids, emitted in this order ahead of everything else.
    pub imports: Vec<String>,
    /// `&` is replaced by the utility's selector.
    pub dark_variant: String,
    /// Custom properties published under `:root`, e.g. `--color-primary`.
    pub tokens: Vec<(String, String)>,
    pub base_rules: Vec<BaseRule>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let tokens: &[(&str, &str)] = &[
            ("--color-background", "var(--background)"),
            ("--color-foreground", "var(--foreground)"),
            ("--color-card", "var(--card)"),
            ("--color-card-foreground", "var(--card-foreground)"),
            ("--color-popover", "var(--popover)"),
            ("--color-popover-foreground", "var(--popover-foreground)"),
            ("--color-primary", "var(--primary)"),
            ("--color-primary-foreground", "var(--primary-foreground)"),
            ("--color-secondary", "var(--secondary)"),
            ("--color-secondary-foreground", "var(--secondary-foreground)"),
            ("--color-muted", "var(--muted)"),
            ("--color-muted-foreground", "var(--muted-foreground)"),
            ("--color-accent", "var(--accent)"),
            ("--color-accent-foreground", "var(--accent-foreground)"),
            ("--color-destructive", "var(--destructive)"),
            ("--color-border", "var(--border)"),
            ("--color-input", "var(--input)"),
            ("--color-ring", "var(--ring)"),
            ("--color-chart-1", "var(--chart-1)"),
            ("--color-chart-2", "var(--chart-2)"),
            ("--color-chart-3", "var(--chart-3)"),
            ("--color-chart-4", "var(--chart-4)"),
            ("--color-chart-5", "var(--chart-5)"),
            ("--color-sidebar", "var(--sidebar)"),
            ("--color-sidebar-foreground", "var(--sidebar-foreground)"),
            ("--color-sidebar-primary", "var(--sidebar-primary)"),
            ("--color-sidebar-primary-foreground", "var(--sidebar-primary-foreground)"),
            ("--color-sidebar-accent", "var(--sidebar-accent)"),
            ("--color-sidebar-accent-foreground", "var(--sidebar-accent-foreground)"),
            ("--color-sidebar-border", "var(--sidebar-border)"),
            ("--color-sidebar-ring", "var(--sidebar-ring)"),
            ("--radius-sm", "calc(var(--radius) - 4px)"),
            ("--radius-md", "calc(var(--radius) - 2px)"),
            ("--radius-lg", "var(--radius)"),
            ("--radius-xl", "calc(var(--radius) + 4px)"),
            ("--radius-2xl", "calc(var(--radius) + 8px)"),
            ("--radius-3xl", "calc(var(--radius) + 12px)"),
            ("--radius-4xl", "calc(var(--radius) + 16px)"),
        ];

        Self {
            imports: vec![
                "tailwindcss/theme".to_string(),
                "tailwindcss/preflight".to_string(),
                "tw-animate-css".to_string(),
                "shadcn/tailwind.css".to_string(),
            ],
            dark_variant: DARK_VARIANT_SELECTOR.to_string(),
            tokens: tokens
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            base_rules: vec![
                BaseRule::new(
                    "*",
                    &[
                        ("border-color", "var(--color-border)"),
                        (
                            "outline-color",
                            "color-mix(in oklch, var(--color-ring) 50%, transparent)",
                        ),
                    ],
                ),
                BaseRule::new(
                    "body",
                    &[
                        ("background-color", "var(--color-background)"),
                        ("color", "var(--color-foreground)"),
                        (
                            "font-family",
                            "var(--font-sans, system-ui, -apple-system, sans-serif)",
                        ),
                    ],
                ),
            ],
        }
    }
}

impl ThemeConfig {
    /// Named theme colors: `--color-primary` → `primary`.
    pub fn color_names(&self) -> BTreeSet<String> {
        self.token_suffixes("--color-")
    }

    /// Named radii: `--radius-lg` → `lg`.
    pub fn radius_names(&self) -> BTreeSet<String> {
        self.token_suffixes("--radius-")
    }

    fn token_suffixes(&self, prefix: &str) -> BTreeSet<String> {
        self.tokens
            .iter()
            .filter_map(|(name, _)| name.strip_prefix(prefix))
            .map(str::to_string)
            .collect()
    }

    /// Everything emitted before the utilities layer.
    pub fn render_preamble(&self, sheets: &VirtualStylesheets) -> EngineResult<String> {
        let mut css = String::new();
        for id in &self.imports {
            css.push_str(&format!("/* {} */\n", id));
            css.push_str(sheets.load(id)?);
            if !css.ends_with('\n') {
                css.push('\n');
            }
        }

        if !self.tokens.is_empty() {
            css.push_str("@layer theme {\n  :root, :host {\n");
            for (name, value) in &self.tokens {
                css.push_str(&format!("    {}: {};\n", name, value));
            }
            css.push_str("  }\n}\n");
        }

        if !self.base_rules.is_empty() {
            css.push_str("@layer base {\n");
            for rule in &self.base_rules {
                css.push_str(&format!("  {} {{", rule.selector));
                for (prop, val) in &rule.declarations {
                    css.push_str(&format!(" {}: {};", prop, val));
                }
                css.push_str(" }\n");
            }
            css.push_str("}\n");
        }

        Ok(css)
    }
}

const THEME_SHEET: &str = "@layer theme {
  :root, :host {
    --spacing: 0.25rem;
    --radius: 0.625rem;
    --font-sans: ui-sans-serif, system-ui, sans-serif;
    --font-mono: ui-monospace, SFMono-Regular, Menlo, monospace;
    --default-transition-duration: 150ms;
    --default-transition-timing-function: cubic-bezier(0.4, 0, 0.2, 1);
    --background: #ffffff;
    --foreground: #0a0a0a;
    --card: #ffffff;
    --card-foreground: #0a0a0a;
    --popover: #ffffff;
    --popover-foreground: #0a0a0a;
    --primary: #171717;
    --primary-foreground: #fafafa;
    --secondary: #f5f5f5;
    --secondary-foreground: #171717;
    --muted: #f5f5f5;
    --muted-foreground: #737373;
    --accent: #f5f5f5;
    --accent-foreground: #171717;
    --destructive: #e7000b;
    --border: #e5e5e5;
    --input: #e5e5e5;
    --ring: #a1a1a1;
    --chart-1: oklch(0.646 0.222 41.116);
    --chart-2: oklch(0.6 0.118 184.704);
    --chart-3: oklch(0.398 0.07 227.392);
    --chart-4: oklch(0.828 0.189 84.429);
    --chart-5: oklch(0.769 0.188 70.08);
    --sidebar: #fafafa;
    --sidebar-foreground: #0a0a0a;
    --sidebar-primary: #171717;
    --sidebar-primary-foreground: #fafafa;
    --sidebar-accent: #f5f5f5;
    --sidebar-accent-foreground: #171717;
    --sidebar-border: #e5e5e5;
    --sidebar-ring: #a1a1a1;
  }
  .dark {
    --background: #0a0a0a;
    --foreground: #fafafa;
    --card: #171717;
    --card-foreground: #fafafa;
    --popover: #171717;
    --popover-foreground: #fafafa;
    --primary: #e5e5e5;
    --primary-foreground: #171717;
    --secondary: #262626;
    --secondary-foreground: #fafafa;
    --muted: #262626;
    --muted-foreground: #a1a1a1;
    --accent: #262626;
    --accent-foreground: #fafafa;
    --destructive: #ff6467;
    --border: #ffffff1a;
    --input: #ffffff26;
    --ring: #737373;
    --chart-1: oklch(0.488 0.243 264.376);
    --chart-2: oklch(0.696 0.17 162.48);
    --chart-3: oklch(0.769 0.188 70.08);
    --chart-4: oklch(0.627 0.265 303.9);
    --chart-5: oklch(0.645 0.246 16.439);
    --sidebar: #171717;
    --sidebar-foreground: #fafafa;
    --sidebar-primary: oklch(0.488 0.243 264.376);
    --sidebar-primary-foreground: #fafafa;
    --sidebar-accent: #262626;
    --sidebar-accent-foreground: #fafafa;
    --sidebar-border: #ffffff1a;
    --sidebar-ring: #737373;
  }
}
";

const PREFLIGHT_SHEET: &str = "@layer base {
  *, ::before, ::after { box-sizing: border-box; margin: 0; padding: 0; border: 0 solid; }
  html, :host { line-height: 1.5; font-family: var(--font-sans); -webkit-text-size-adjust: 100%; }
  img, svg, video, canvas { display: block; max-width: 100%; }
  button, input, select, textarea { font: inherit; color: inherit; background-color: transparent; }
  button { cursor: pointer; }
}
";

const ANIMATE_SHEET: &str = "@keyframes spin { to { transform: rotate(360deg); } }
@keyframes ping { 75%, 100% { transform: scale(2); opacity: 0; } }
@keyframes pulse { 50% { opacity: 0.5; } }
@keyframes bounce {
  0%, 100% { transform: translateY(-25%); animation-timing-function: cubic-bezier(0.8, 0, 1, 1); }
  50% { transform: none; animation-timing-function: cubic-bezier(0, 0, 0.2, 1); }
}
@keyframes enter {
  from {
    opacity: var(--tw-enter-opacity, 1);
    transform: translate3d(var(--tw-enter-translate-x, 0), var(--tw-enter-translate-y, 0), 0) scale3d(var(--tw-enter-scale, 1), var(--tw-enter-scale, 1), var(--tw-enter-scale, 1)) rotate(var(--tw-enter-rotate, 0));
  }
}
@keyframes exit {
  to {
    opacity: var(--tw-exit-opacity, 1);
    transform: translate3d(var(--tw-exit-translate-x, 0), var(--tw-exit-translate-y, 0), 0) scale3d(var(--tw-exit-scale, 1), var(--tw-exit-scale, 1), var(--tw-exit-scale, 1)) rotate(var(--tw-exit-rotate, 0));
  }
}
";

const SHADCN_SHEET: &str = "@layer base {
  [data-slot] { outline-color: var(--ring); }
  [data-disabled] { pointer-events: none; }
}
";

/// In-memory stylesheet table keyed by import id.
#[derive(Debug, Clone, Default)]
pub struct VirtualStylesheets {
    sheets: HashMap<String, String>,
}

impl VirtualStylesheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four sheets the default theme imports.
    pub fn builtin() -> Self {
        let mut sheets = Self::new();
        sheets.insert("tailwindcss/theme", THEME_SHEET);
        sheets.insert("tailwindcss/preflight", PREFLIGHT_SHEET);
        sheets.insert("tw-animate-css", ANIMATE_SHEET);
        sheets.insert("shadcn/tailwind.css", SHADCN_SHEET);
        sheets
    }

    pub fn insert(&mut self, id: impl Into<String>, css: impl Into<String>) {
        self.sheets.insert(id.into(), css.into());
    }

    pub fn load(&self, id: &str) -> EngineResult<&str> {
        self.sheets
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| EngineError::UnknownStylesheet { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_renders_with_builtin_sheets() {
        let theme = ThemeConfig::default();
        let css = theme.render_preamble(&VirtualStylesheets::builtin()).unwrap();

        assert!(css.contains("--spacing: 0.25rem"));
        assert!(css.contains("--color-primary: var(--primary);"));
        assert!(css.contains("@layer base {"));
        assert!(css.find("/* tailwindcss/theme */") < css.find("/* tw-animate-css */"));
    }

    #[test]
    fn unknown_import_fails() {
        let mut theme = ThemeConfig::default();
        theme.imports.push("nope.css".to_string());
        let err = theme
            .render_preamble(&VirtualStylesheets::builtin())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownStylesheet {
                id: "nope.css".to_string()
            }
        );
    }

    #[test]
    fn token_names() {
        let theme = ThemeConfig::default();
        assert!(theme.color_names().contains("muted-foreground"));
        assert!(theme.radius_names().contains("lg"));
        assert!(!theme.color_names().contains("lg"));
    }

    #[test]
    fn default_theme_covers_library_tokens() {
        let theme = ThemeConfig::default();
        let colors = theme.color_names();
        for name in ["chart-1", "chart-5", "sidebar", "sidebar-accent-foreground", "sidebar-ring"] {
            assert!(colors.contains(name), "missing {name}");
        }
        assert!(theme.radius_names().contains("4xl"));

        let css = theme.render_preamble(&VirtualStylesheets::builtin()).unwrap();
        assert!(css.contains("--chart-1: oklch(0.646 0.222 41.116);"));
        assert!(css.contains("--sidebar-border: #ffffff1a;"));
        assert!(css.contains(
            "outline-color: color-mix(in oklch, var(--color-ring) 50%, transparent);"
        ));
        assert!(css.contains("var(--tw-enter-translate-y, 0)"));
    }
}
