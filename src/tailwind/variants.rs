//! Variant prefixes (`hover:`, `md:`, `dark:`, `group-hover:`, `has-[…]:`,
//! `[&_svg]:` …).
//!
//! A candidate is split on top-level `:` into its variant stack and base
//! utility; each variant then rewrites the element selector or adds a
//! media condition. An unknown variant rejects the whole candidate.

const PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("hover", ":hover"),
    ("focus", ":focus"),
    ("focus-visible", ":focus-visible"),
    ("focus-within", ":focus-within"),
    ("active", ":active"),
    ("visited", ":visited"),
    ("disabled", ":disabled"),
    ("enabled", ":enabled"),
    ("checked", ":checked"),
    ("required", ":required"),
    ("invalid", ":invalid"),
    ("read-only", ":read-only"),
    ("first", ":first-child"),
    ("last", ":last-child"),
    ("only", ":only-child"),
    ("odd", ":nth-child(odd)"),
    ("even", ":nth-child(even)"),
    ("empty", ":empty"),
];

const PSEUDO_ELEMENTS: &[(&str, &str)] = &[
    ("before", "::before"),
    ("after", "::after"),
    ("placeholder", "::placeholder"),
    ("selection", "::selection"),
    ("marker", "::marker"),
    ("file", "::file-selector-button"),
];

/// Min-width breakpoints, in cascade order.
pub const BREAKPOINTS: &[(&str, &str)] = &[
    ("sm", "40rem"),
    ("md", "48rem"),
    ("lg", "64rem"),
    ("xl", "80rem"),
    ("2xl", "96rem"),
];

fn pseudo_class(name: &str) -> Option<&'static str> {
    PSEUDO_CLASSES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, p)| *p)
}

/// A candidate broken into its parts: `md:hover:!p-4` →
/// variants `["md", "hover"]`, base `p-4`, important.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCandidate<'a> {
    pub variants: Vec<&'a str>,
    pub base: &'a str,
    pub important: bool,
}

pub fn parse_candidate(candidate: &str) -> Option<ParsedCandidate<'_>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, ch) in candidate.char_indices() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ':' if depth == 0 => {
                parts.push(&candidate[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = &candidate[start..];
    if depth != 0 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let (base, important) = if let Some(b) = last.strip_prefix('!') {
        (b, true)
    } else if let Some(b) = last.strip_suffix('!') {
        (b, true)
    } else {
        (last, false)
    };
    if base.is_empty() {
        return None;
    }

    Some(ParsedCandidate {
        variants: parts,
        base,
        important,
    })
}

/// Selector and media conditions after applying a variant stack.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantContext {
    pub selector: String,
    pub media: Vec<String>,
    /// 0 for unconditioned rules, breakpoint index + 1 otherwise.
    pub rank: usize,
}

/// Applies `variants` left to right to `selector`. `dark_variant` uses `&`
/// for the element (`&:is(.dark *)`).
pub fn apply_variants(
    selector: String,
    variants: &[&str],
    dark_variant: &str,
) -> Option<VariantContext> {
    let mut ctx = VariantContext {
        selector,
        media: Vec::new(),
        rank: 0,
    };
    let mut pseudo_element: Option<&'static str> = None;

    for variant in variants {
        if let Some(state) = state_selector(variant) {
            ctx.selector.push_str(&state);
        } else if let Some((_, p)) = PSEUDO_ELEMENTS.iter().find(|(n, _)| n == variant) {
            pseudo_element = Some(p);
        } else if let Some(state) = variant.strip_prefix("group-") {
            ctx.selector = format!(".group{} {}", state_selector(state)?, ctx.selector);
        } else if let Some(state) = variant.strip_prefix("peer-") {
            ctx.selector = format!(".peer{} ~ {}", state_selector(state)?, ctx.selector);
        } else if *variant == "dark" {
            ctx.selector = dark_variant.replace('&', &ctx.selector);
        } else if let Some(idx) = BREAKPOINTS.iter().position(|(n, _)| n == variant) {
            ctx.media.push(format!("(min-width: {})", BREAKPOINTS[idx].1));
            ctx.rank = ctx.rank.max(idx + 1);
        } else if let Some(template) = bracketed(variant) {
            ctx.selector = arbitrary_variant(template, &ctx.selector)?;
        } else {
            return None;
        }
    }

    if let Some(p) = pseudo_element {
        ctx.selector.push_str(p);
    }
    Some(ctx)
}

/// Conditions on the element itself, also usable after `group-` / `peer-`:
/// pseudo-classes, `data-*`, `aria-*` and `has-*`.
fn state_selector(state: &str) -> Option<String> {
    if let Some(p) = pseudo_class(state) {
        return Some(p.to_string());
    }
    if let Some(attr) = state.strip_prefix("data-") {
        return attribute_selector("data", attr);
    }
    if let Some(attr) = state.strip_prefix("aria-") {
        return match attr.strip_prefix('[') {
            Some(_) => attribute_selector("aria", attr),
            None if !attr.is_empty() => Some(format!("[aria-{}=\"true\"]", attr)),
            None => None,
        };
    }
    if let Some(inner) = state.strip_prefix("has-") {
        let relative = match bracketed(inner) {
            Some(sel) => sel.replace('_', " "),
            None => format!("*{}", pseudo_class(inner)?),
        };
        return Some(format!(":has({})", relative));
    }
    None
}

fn bracketed(text: &str) -> Option<&str> {
    text.strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .filter(|inner| !inner.is_empty())
}

/// `[&_svg]` → `<sel> svg`, `[&>*]` → `<sel>>*`. The template must name
/// the element with `&`.
fn arbitrary_variant(template: &str, selector: &str) -> Option<String> {
    if !template.contains('&') {
        return None;
    }
    Some(template.replace('_', " ").replace('&', selector))
}

/// `data-[state=open]` → `[data-state=open]`, `data-disabled` → `[data-disabled]`.
fn attribute_selector(prefix: &str, attr: &str) -> Option<String> {
    if attr.is_empty() {
        return None;
    }
    match attr.strip_prefix('[').and_then(|a| a.strip_suffix(']')) {
        Some(inner) if !inner.is_empty() => Some(format!("[{}-{}]", prefix, inner)),
        Some(_) => None,
        None => Some(format!("[{}-{}]", prefix, attr)),
    }
}

/// Escapes CSS special characters so a candidate can be used as a class selector.
pub fn escape_selector(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 4);
    for (i, ch) in class.chars().enumerate() {
        match ch {
            '.' | '/' | '[' | ']' | '(' | ')' | '%' | '#' | ':' | '@' | '!' | ',' | '~'
            | '^' | '$' | '&' | '+' | '=' | '<' | '>' | '|' | '\'' | '"' | ';' | '{'
            | '}' | '\\' | '*' | '?' => {
                out.push('\\');
                out.push(ch);
            }
            '0'..='9' if i == 0 => out.push_str(&format!("\\3{} ", ch)),
            _ => out.push(ch),
        }
    }
    out
}
