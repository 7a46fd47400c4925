//! Turning a component registry item into something the preview can open.
//!
//! The caller fetches the document; this module decides whether the URL may
//! be fetched at all, picks the one file worth previewing, points its
//! registry-internal imports at the preview's namespaces and, for theme
//! items, renders a global stylesheet from the item's CSS variables.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

use crate::error::{EngineError, EngineResult};

lazy_static! {
    static ref REGISTRY_UI_IMPORT: Regex = Regex::new(r"@/registry/[^/]+/ui/").unwrap();
    static ref REGISTRY_UTILS_IMPORT: Regex = Regex::new(r"@/registry/[^/]+/lib/utils").unwrap();
    static ref REGISTRY_INTERNAL_IMPORT: Regex =
        Regex::new(r"@/registry/[^/]+/(blocks|components|examples)/").unwrap();
    static ref PLAYABLE_PATH: Regex = Regex::new(r"\.(tsx|ts|jsx|js)$").unwrap();
}

/// Theme variables that become `--color-*` design tokens.
const COLOR_VARS: &[&str] = &[
    "background",
    "foreground",
    "card",
    "card-foreground",
    "popover",
    "popover-foreground",
    "primary",
    "primary-foreground",
    "secondary",
    "secondary-foreground",
    "muted",
    "muted-foreground",
    "accent",
    "accent-foreground",
    "destructive",
    "destructive-foreground",
    "border",
    "input",
    "ring",
    "chart-1",
    "chart-2",
    "chart-3",
    "chart-4",
    "chart-5",
    "sidebar",
    "sidebar-foreground",
    "sidebar-primary",
    "sidebar-primary-foreground",
    "sidebar-accent",
    "sidebar-accent-foreground",
    "sidebar-border",
    "sidebar-ring",
];

const RADIUS_SCALE: &[(&str, &str)] = &[
    ("--radius-sm", "calc(var(--radius) - 4px)"),
    ("--radius-md", "calc(var(--radius) - 2px)"),
    ("--radius-lg", "var(--radius)"),
    ("--radius-xl", "calc(var(--radius) + 4px)"),
    ("--radius-2xl", "calc(var(--radius) + 8px)"),
    ("--radius-3xl", "calc(var(--radius) + 12px)"),
    ("--radius-4xl", "calc(var(--radius) + 16px)"),
];

/// Accepts http(s) URLs whose host is not loopback, private or link-local.
pub fn validate_registry_url(raw: &str) -> EngineResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| EngineError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(EngineError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    let blocked = match url.host() {
        Some(Host::Domain(domain)) => is_private_domain(domain),
        Some(Host::Ipv4(addr)) => is_private_ipv4(addr),
        Some(Host::Ipv6(addr)) => is_private_ipv6(addr),
        None => {
            return Err(EngineError::InvalidUrl {
                url: raw.to_string(),
                reason: "missing host".into(),
            })
        }
    };
    if blocked {
        let host = url.host_str().unwrap_or_default().to_string();
        tracing::warn!(%host, "rejected registry url with private host");
        return Err(EngineError::PrivateHost { host });
    }
    Ok(url)
}

fn is_private_domain(domain: &str) -> bool {
    let domain = domain.trim().to_ascii_lowercase();
    domain == "localhost" || domain.ends_with(".local")
}

fn is_private_ipv4(addr: Ipv4Addr) -> bool {
    let [a, b, ..] = addr.octets();
    a == 0
        || a == 127
        || a == 10
        || (a == 192 && b == 168)
        || (a == 169 && b == 254)
        || (a == 172 && (16..=31).contains(&b))
}

/// Loopback, unique-local, link-local, and IPv4-mapped addresses judged by
/// the IPv4 rules.
fn is_private_ipv6(addr: Ipv6Addr) -> bool {
    if let Some(v4) = addr.to_ipv4_mapped() {
        return is_private_ipv4(v4);
    }
    let first = addr.segments()[0];
    addr.is_loopback()
        || addr.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryFile {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCssVars {
    #[serde(default)]
    pub theme: Option<Map<String, Value>>,
    #[serde(default)]
    pub light: Option<Map<String, Value>>,
    #[serde(default)]
    pub dark: Option<Map<String, Value>>,
}

/// A registry item: playable files, theme variables, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryItem {
    pub files: Option<Vec<RegistryFile>>,
    pub css_vars: Option<RegistryCssVars>,
    /// `selector -> property -> value` rules under `@layer base`.
    pub base_rules: Vec<(String, Vec<(String, String)>)>,
}

impl RegistryItem {
    /// Accepts documents with a valid `files` array or usable `cssVars`;
    /// anything else is malformed.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| EngineError::MalformedRegistry(e.to_string()))?;
        let Some(object) = value.as_object() else {
            return Err(EngineError::MalformedRegistry("expected object".into()));
        };

        let files = object
            .get("files")
            .and_then(|files| serde_json::from_value::<Vec<RegistryFile>>(files.clone()).ok());

        let css_vars = object
            .get("cssVars")
            .and_then(|vars| serde_json::from_value::<RegistryCssVars>(vars.clone()).ok())
            .filter(|vars| vars.light.is_some() || vars.dark.is_some());

        if files.is_none() && css_vars.is_none() {
            return Err(EngineError::MalformedRegistry(
                "expected files or theme variables".into(),
            ));
        }

        Ok(Self {
            files,
            css_vars,
            base_rules: object
                .get("css")
                .and_then(|css| css.get("@layer base"))
                .map(layer_rules)
                .unwrap_or_default(),
        })
    }

    pub fn has_theme(&self) -> bool {
        self.css_vars.is_some()
    }
}

fn layer_rules(layer: &Value) -> Vec<(String, Vec<(String, String)>)> {
    let Some(rules) = layer.as_object() else {
        return Vec::new();
    };
    rules
        .iter()
        .filter_map(|(selector, props)| {
            let props = props.as_object()?;
            let declarations = props
                .iter()
                .map(|(prop, value)| (prop.clone(), display_value(value)))
                .collect();
            Some((selector.clone(), declarations))
        })
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Higher is a better candidate for the file to preview.
pub fn score_registry_file(file: &RegistryFile) -> i64 {
    let content = file.content.as_deref().unwrap_or_default();
    let mut score = content.len() as i64;

    score += match file.kind.as_str() {
        "registry:component" => 100_000,
        "registry:ui" => 95_000,
        "registry:block" => 90_000,
        "registry:page" => 40_000,
        _ => 0,
    };
    if file.path.contains("/components/") {
        score += 25_000;
    }
    if file.path.ends_with("/page.tsx") {
        score -= 20_000;
    }
    if REGISTRY_INTERNAL_IMPORT.is_match(content) {
        score -= 80_000;
    }
    score
}

/// The highest scoring script file with content; ties keep document order.
pub fn select_best_file(files: &[RegistryFile]) -> Option<&RegistryFile> {
    files
        .iter()
        .filter(|file| {
            file.content.as_deref().is_some_and(|c| !c.trim().is_empty())
                && PLAYABLE_PATH.is_match(&file.path)
        })
        .fold(None, |best: Option<&RegistryFile>, file| match best {
            Some(current) if score_registry_file(current) >= score_registry_file(file) => {
                Some(current)
            }
            _ => Some(file),
        })
}

pub fn rewrite_registry_imports(source: &str) -> String {
    let source = REGISTRY_UI_IMPORT.replace_all(source, "@/components/ui/");
    REGISTRY_UTILS_IMPORT
        .replace_all(&source, "@/lib/utils")
        .into_owned()
}

/// Insertion-ordered property list where a repeated key keeps its slot.
#[derive(Default)]
struct Declarations(Vec<(String, String)>);

impl Declarations {
    fn set(&mut self, prop: String, value: String) {
        match self.0.iter_mut().find(|(p, _)| *p == prop) {
            Some(slot) => slot.1 = value,
            None => self.0.push((prop, value)),
        }
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(prop, value)| format!("  {prop}: {value};"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn var_block(vars: &Map<String, Value>) -> String {
    vars.iter()
        .map(|(key, value)| format!("  --{key}: {};", display_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Global stylesheet for a theme item: design token mapping, light and dark
/// variable blocks, base layer.
pub fn build_theme_css(
    vars: &RegistryCssVars,
    base_rules: &[(String, Vec<(String, String)>)],
) -> String {
    let empty = Map::new();
    let light = vars.light.as_ref().unwrap_or(&empty);
    let dark = vars.dark.as_ref().unwrap_or(&empty);
    let theme = vars.theme.as_ref().unwrap_or(&empty);

    let mut inline = Declarations::default();
    for key in light.keys().filter(|k| COLOR_VARS.contains(&k.as_str())) {
        inline.set(format!("--color-{key}"), format!("var(--{key})"));
    }
    for key in ["font-sans", "font-mono", "font-serif"] {
        if light.contains_key(key) || theme.contains_key(key) {
            inline.set(format!("--{key}"), format!("var(--{key})"));
        }
    }
    if light.contains_key("radius") || theme.contains_key("radius") {
        for (prop, value) in RADIUS_SCALE {
            inline.set(prop.to_string(), value.to_string());
        }
    }
    for key in light.keys() {
        if key == "shadow"
            || key == "spacing"
            || key.starts_with("shadow-")
            || key.starts_with("tracking-")
        {
            inline.set(format!("--{key}"), format!("var(--{key})"));
        }
    }
    for (key, value) in theme {
        if COLOR_VARS.contains(&key.as_str()) || key == "radius" || key.starts_with("font-") {
            continue;
        }
        inline.set(format!("--{key}"), display_value(value));
    }

    let mut extra = String::new();
    for (selector, declarations) in base_rules {
        extra.push_str(&format!("  {selector} {{\n"));
        for (prop, value) in declarations {
            extra.push_str(&format!("    {prop}: {value};\n"));
        }
        extra.push_str("  }\n");
    }

    format!(
        r#"@import "tailwindcss";
@import "tw-animate-css";
@import "shadcn/tailwind.css";

@custom-variant dark (&:is(.dark *));

@theme inline {{
{inline}
}}

:root {{
{light}
}}

.dark {{
{dark}
}}

@layer base {{
  * {{
    @apply border-border outline-ring/50;
  }}
  body {{
    @apply bg-background text-foreground;
    font-family: var(--font-sans, system-ui, -apple-system, sans-serif);
  }}
{extra}}}
"#,
        inline = inline.render(),
        light = var_block(light),
        dark = var_block(dark),
    )
}

/// What opening a registry item yields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryImport {
    pub code: Option<String>,
    pub global_css: Option<String>,
}

/// Shapes a fetched registry document into preview code and/or global CSS.
/// Both outputs are bounded by `max_bytes`.
pub fn prepare_registry_import(json: &str, max_bytes: usize) -> EngineResult<RegistryImport> {
    let item = RegistryItem::from_json(json)?;
    let mut import = RegistryImport::default();

    if let Some(files) = &item.files {
        match select_best_file(files).and_then(|f| f.content.as_deref()) {
            Some(content) => {
                let code = rewrite_registry_imports(content);
                if code.len() > max_bytes {
                    return Err(EngineError::TooLarge {
                        what: "Selected registry file",
                        limit: max_bytes,
                    });
                }
                import.code = Some(code);
            }
            None if !item.has_theme() => return Err(EngineError::NoUsableFile),
            None => {}
        }
    }

    if let Some(vars) = &item.css_vars {
        let css = build_theme_css(vars, &item.base_rules);
        if css.len() > max_bytes {
            return Err(EngineError::TooLarge {
                what: "Generated theme CSS",
                limit: max_bytes,
            });
        }
        import.global_css = Some(css);
    }

    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(path: &str, kind: &str, content: &str) -> RegistryFile {
        RegistryFile {
            path: path.into(),
            kind: kind.into(),
            content: Some(content.into()),
        }
    }

    #[test]
    fn accepts_public_http_urls() {
        assert!(validate_registry_url("https://ui.shadcn.com/r/styles/new-york/button.json").is_ok());
        assert!(validate_registry_url("http://example.com/item.json").is_ok());
        assert!(validate_registry_url("https://172.32.0.1/x.json").is_ok());
        assert!(validate_registry_url("https://fdroid.org/x.json").is_ok());
        assert!(validate_registry_url("https://[::ffff:8.8.8.8]/x.json").is_ok());
    }

    #[test]
    fn rejects_bad_schemes_and_private_hosts() {
        assert!(matches!(
            validate_registry_url("ftp://example.com/x"),
            Err(EngineError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_registry_url("not a url"),
            Err(EngineError::InvalidUrl { .. })
        ));
        for url in [
            "http://localhost:3000/r.json",
            "http://LOCALHOST/r.json",
            "http://127.0.0.1/r.json",
            "http://10.1.2.3/r.json",
            "http://192.168.0.10/r.json",
            "http://169.254.169.254/latest",
            "http://172.16.0.1/r.json",
            "http://172.31.255.255/r.json",
            "http://[::1]/r.json",
            "http://[fd00::1]/r.json",
            "http://[fc00::1]/r.json",
            "http://printer.local/r.json",
            "http://0.0.0.0:8080/r.json",
            "http://[::ffff:127.0.0.1]/r.json",
            "http://[::ffff:10.0.0.5]/r.json",
            "http://[::ffff:192.168.1.1]/r.json",
            "http://[fe80::1]/r.json",
        ] {
            assert!(
                matches!(validate_registry_url(url), Err(EngineError::PrivateHost { .. })),
                "{url} should be blocked"
            );
        }
    }

    #[test]
    fn scores_follow_file_role() {
        let component = file("registry/new-york/components/login.tsx", "registry:component", "x");
        let page = file("app/login/page.tsx", "registry:page", "x");
        let internal = file(
            "registry/new-york/blocks/login.tsx",
            "registry:block",
            "import { X } from \"@/registry/new-york/blocks/x\"",
        );
        assert_eq!(score_registry_file(&component), 1 + 100_000 + 25_000);
        assert_eq!(score_registry_file(&page), 1 + 40_000 - 20_000);
        assert!(score_registry_file(&internal) < score_registry_file(&page));
    }

    #[test]
    fn picks_best_playable_file() {
        let files = vec![
            file("app/page.tsx", "registry:page", "export default function Page() {}"),
            file("styles.css", "registry:style", "body {}"),
            file("components/empty.tsx", "registry:component", "   "),
            file("components/ui/button.tsx", "registry:ui", "export function Button() {}"),
        ];
        assert_eq!(
            select_best_file(&files).map(|f| f.path.as_str()),
            Some("components/ui/button.tsx")
        );
        assert!(select_best_file(&files[1..3]).is_none());
    }

    #[test]
    fn rewrites_registry_imports() {
        let source = "import { Button } from \"@/registry/new-york-v4/ui/button\"\nimport { cn } from \"@/registry/new-york-v4/lib/utils\"";
        assert_eq!(
            rewrite_registry_imports(source),
            "import { Button } from \"@/components/ui/button\"\nimport { cn } from \"@/lib/utils\""
        );
    }

    #[test]
    fn prepares_code_from_files() {
        let json = r#"{"files":[{"path":"registry/new-york/ui/card.tsx","type":"registry:ui","content":"import { cn } from \"@/registry/new-york/lib/utils\"\nexport function Card() {}"}]}"#;
        let import = prepare_registry_import(json, 100 * 1024).unwrap();
        assert!(import.code.unwrap().contains("\"@/lib/utils\""));
        assert!(import.global_css.is_none());
    }

    #[test]
    fn enforces_size_and_usability() {
        let json = r#"{"files":[{"path":"a.tsx","type":"registry:ui","content":"export const a = 1;"}]}"#;
        assert!(matches!(
            prepare_registry_import(json, 4),
            Err(EngineError::TooLarge { .. })
        ));
        assert_eq!(
            prepare_registry_import(r#"{"files":[{"path":"a.css","type":"registry:style","content":"x"}]}"#, 1024),
            Err(EngineError::NoUsableFile)
        );
        assert!(matches!(
            prepare_registry_import(r#"{"name":"x"}"#, 1024),
            Err(EngineError::MalformedRegistry(_))
        ));
    }

    #[test]
    fn renders_theme_css() {
        let json = r#"{
            "cssVars": {
                "theme": {"font-sans": "Inter", "shadow-color": "black"},
                "light": {"background": "oklch(1 0 0)", "radius": "0.625rem", "tracking-normal": "0em"},
                "dark": {"background": "oklch(0.145 0 0)"}
            },
            "css": {"@layer base": {"h1": {"font-weight": "700"}}}
        }"#;
        let import = prepare_registry_import(json, 100 * 1024).unwrap();
        assert!(import.code.is_none());
        let css = import.global_css.unwrap();

        assert!(css.contains("  --color-background: var(--background);"));
        assert!(css.contains("  --font-sans: var(--font-sans);"));
        assert!(css.contains("  --radius-lg: var(--radius);"));
        assert!(css.contains("  --tracking-normal: var(--tracking-normal);"));
        assert!(css.contains("  --shadow-color: black;"));
        assert!(css.contains(":root {\n  --background: oklch(1 0 0);"));
        assert!(css.contains(".dark {\n  --background: oklch(0.145 0 0);\n}"));
        assert!(css.contains("  h1 {\n    font-weight: 700;\n  }\n}"));
    }
}
