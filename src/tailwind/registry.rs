//! Utility lookup: one bare class (variants already stripped) to its
//! declarations. Unknown classes resolve to `None` and emit nothing.

use std::collections::BTreeSet;

use super::colors;

/// Declarations for one utility plus an optional child combinator the
/// selector must carry (`space-x-*` styles children, not the element).
#[derive(Debug, Clone, PartialEq)]
pub struct Utility {
    pub declarations: Vec<(String, String)>,
    pub child_selector: Option<&'static str>,
}

impl Utility {
    fn new(props: &[(&str, &str)]) -> Self {
        Self {
            declarations: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            child_selector: None,
        }
    }

    fn dynamic(props: Vec<(String, String)>) -> Self {
        Self {
            declarations: props,
            child_selector: None,
        }
    }

    fn one(prop: &str, value: String) -> Self {
        Self::dynamic(vec![(prop.to_string(), value)])
    }
}

/// Names the active theme publishes as `--color-*` / `--radius-*` tokens.
#[derive(Debug, Clone, Default)]
pub struct ThemeLookup {
    pub colors: BTreeSet<String>,
    pub radii: BTreeSet<String>,
}

// ─── Public resolver ────────────────────────────────────────────────────────

pub fn resolve_utility(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    resolve_display(class)
        .or_else(|| resolve_position(class))
        .or_else(|| resolve_inset(class))
        .or_else(|| resolve_z_index(class))
        .or_else(|| resolve_overflow(class))
        .or_else(|| resolve_layout_misc(class))
        .or_else(|| resolve_flex(class))
        .or_else(|| resolve_grid(class))
        .or_else(|| resolve_alignment(class))
        .or_else(|| resolve_gap(class))
        .or_else(|| resolve_space_between(class))
        .or_else(|| resolve_spacing(class))
        .or_else(|| resolve_sizing(class))
        .or_else(|| resolve_typography(class))
        .or_else(|| resolve_text_color(class, theme))
        .or_else(|| resolve_bg_color(class, theme))
        .or_else(|| resolve_border(class, theme))
        .or_else(|| resolve_radius(class, theme))
        .or_else(|| resolve_ring(class, theme))
        .or_else(|| resolve_shadow(class))
        .or_else(|| resolve_opacity(class))
        .or_else(|| resolve_interactivity(class))
        .or_else(|| resolve_outline(class, theme))
        .or_else(|| resolve_transform(class))
        .or_else(|| resolve_filter(class))
        .or_else(|| resolve_transition(class))
        .or_else(|| resolve_animation(class))
        .or_else(|| resolve_enter_exit(class))
        .or_else(|| resolve_svg(class, theme))
}

// ─── Values ─────────────────────────────────────────────────────────────────

/// `[12px]` → `12px`, `[1fr_auto]` → `1fr auto`, `(--gap)` → `var(--gap)`.
fn arbitrary(val: &str) -> Option<String> {
    arbitrary_hinted(val).map(|(_, value)| value)
}

/// Like [`arbitrary`], also returning a leading type hint such as the
/// `length` of `[length:var(--x)]` or the `color` of `(color:--x)`.
fn arbitrary_hinted(val: &str) -> Option<(Option<&str>, String)> {
    if let Some(inner) = val.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        let (hint, name) = split_type_hint(inner);
        if name.len() < 3 || !name.starts_with("--") {
            return None;
        }
        return Some((hint, format!("var({})", name)));
    }
    let inner = val.strip_prefix('[')?.strip_suffix(']')?;
    let (hint, value) = split_type_hint(inner);
    if value.is_empty() {
        return None;
    }
    Some((hint, value.replace('_', " ")))
}

fn split_type_hint(inner: &str) -> (Option<&str>, &str) {
    match inner.split_once(':') {
        Some((hint, rest))
            if !hint.is_empty()
                && !rest.is_empty()
                && hint.bytes().all(|b| b.is_ascii_lowercase() || b == b'-') =>
        {
            (Some(hint), rest)
        }
        _ => (None, inner),
    }
}

/// For utilities that take either a color or a length (`text-`, `border-`,
/// `ring-`): whether an arbitrary value reads as a color. A bare `(--x)`
/// defaults to color.
fn arbitrary_is_color(val: &str) -> Option<bool> {
    let (hint, value) = arbitrary_hinted(val)?;
    Some(match hint {
        Some(h) => h == "color",
        None => val.starts_with('(') || looks_like_color(&value),
    })
}

/// Integers, plus halves and quarters (`0.5`, `2.5`, `0.25`).
fn is_scale_number(val: &str) -> bool {
    let (int, frac) = match val.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (val, None),
    };
    if int.is_empty() || !int.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac {
        None => true,
        Some(f) => matches!(f, "5" | "25" | "75"),
    }
}

fn spacing_value(val: &str) -> Option<String> {
    if let Some(v) = arbitrary(val) {
        return Some(v);
    }
    match val {
        "px" => Some("1px".to_string()),
        "0" => Some("0px".to_string()),
        _ if is_scale_number(val) => Some(format!("calc(var(--spacing) * {})", val)),
        _ => None,
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    Width,
    Height,
}

fn size_value(val: &str, axis: Axis) -> Option<String> {
    let keyword = match val {
        "auto" => Some("auto"),
        "full" => Some("100%"),
        "min" => Some("min-content"),
        "max" => Some("max-content"),
        "fit" => Some("fit-content"),
        "screen" if axis == Axis::Width => Some("100vw"),
        "screen" => Some("100vh"),
        "dvh" => Some("100dvh"),
        "svh" => Some("100svh"),
        _ => None,
    };
    if let Some(k) = keyword {
        return Some(k.to_string());
    }
    if let Some(v) = arbitrary(val) {
        return Some(v);
    }
    if let Some((num, den)) = val.split_once('/') {
        let n: u32 = num.parse().ok()?;
        let d: u32 = den.parse().ok()?;
        if d == 0 || n > d {
            return None;
        }
        return Some(format!("calc({}/{} * 100%)", n, d));
    }
    spacing_value(val)
}

/// Palette, theme tokens or arbitrary, with an optional `/NN` opacity.
fn color_value(val: &str, theme: &ThemeLookup) -> Option<String> {
    let (base, alpha) = match val.rsplit_once('/') {
        Some((b, a)) if !a.is_empty() && a.bytes().all(|c| c.is_ascii_digit()) => (b, Some(a)),
        _ => (val, None),
    };

    let color = if let Some(v) = arbitrary(base) {
        v
    } else if let Some(hex) = colors::palette_color(base) {
        hex.to_string()
    } else if theme.colors.contains(base) {
        format!("var(--color-{})", base)
    } else {
        return None;
    };

    match alpha {
        Some(a) => {
            let pct: u32 = a.parse().ok()?;
            if pct > 100 {
                return None;
            }
            Some(format!("color-mix(in oklab, {} {}%, transparent)", color, pct))
        }
        None => Some(color),
    }
}

fn looks_like_color(arbitrary_inner: &str) -> bool {
    arbitrary_inner.starts_with('#')
        || arbitrary_inner.starts_with("rgb")
        || arbitrary_inner.starts_with("hsl")
        || arbitrary_inner.starts_with("oklch")
        || arbitrary_inner.starts_with("var(--color")
}

// ─── Layout ─────────────────────────────────────────────────────────────────

fn resolve_display(class: &str) -> Option<Utility> {
    let val = match class {
        "block" => "block",
        "inline-block" => "inline-block",
        "inline" => "inline",
        "flex" => "flex",
        "inline-flex" => "inline-flex",
        "grid" => "grid",
        "inline-grid" => "inline-grid",
        "contents" => "contents",
        "flow-root" => "flow-root",
        "table" => "table",
        "hidden" => "none",
        _ => return None,
    };
    Some(Utility::new(&[("display", val)]))
}

fn resolve_position(class: &str) -> Option<Utility> {
    match class {
        "static" | "fixed" | "absolute" | "relative" | "sticky" => {
            Some(Utility::new(&[("position", class)]))
        }
        _ => None,
    }
}

fn resolve_inset(class: &str) -> Option<Utility> {
    let (neg, rest) = match class.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, class),
    };

    let (props, val): (&[&str], &str) = if let Some(v) = rest.strip_prefix("inset-x-") {
        (&["left", "right"], v)
    } else if let Some(v) = rest.strip_prefix("inset-y-") {
        (&["top", "bottom"], v)
    } else if let Some(v) = rest.strip_prefix("inset-") {
        (&["top", "right", "bottom", "left"], v)
    } else if let Some(v) = rest.strip_prefix("top-") {
        (&["top"], v)
    } else if let Some(v) = rest.strip_prefix("right-") {
        (&["right"], v)
    } else if let Some(v) = rest.strip_prefix("bottom-") {
        (&["bottom"], v)
    } else if let Some(v) = rest.strip_prefix("left-") {
        (&["left"], v)
    } else {
        return None;
    };

    let base = size_value(val, Axis::Width)?;
    let css_val = negate(base, neg);
    Some(Utility::dynamic(
        props
            .iter()
            .map(|p| (p.to_string(), css_val.clone()))
            .collect(),
    ))
}

fn negate(value: String, neg: bool) -> String {
    if !neg || value == "0px" {
        value
    } else {
        format!("calc({} * -1)", value)
    }
}

fn resolve_z_index(class: &str) -> Option<Utility> {
    let val = class.strip_prefix("z-")?;
    let css_val = match val {
        "auto" => "auto".to_string(),
        _ => match arbitrary(val) {
            Some(v) => v,
            None => {
                val.parse::<u32>().ok()?;
                val.to_string()
            }
        },
    };
    Some(Utility::one("z-index", css_val))
}

fn resolve_overflow(class: &str) -> Option<Utility> {
    let (prop, val) = if let Some(v) = class.strip_prefix("overflow-x-") {
        ("overflow-x", v)
    } else if let Some(v) = class.strip_prefix("overflow-y-") {
        ("overflow-y", v)
    } else if let Some(v) = class.strip_prefix("overflow-") {
        ("overflow", v)
    } else {
        return None;
    };
    match val {
        "auto" | "hidden" | "clip" | "visible" | "scroll" => Some(Utility::new(&[(prop, val)])),
        _ => None,
    }
}

fn resolve_layout_misc(class: &str) -> Option<Utility> {
    let utility = match class {
        "visible" => Utility::new(&[("visibility", "visible")]),
        "invisible" => Utility::new(&[("visibility", "hidden")]),
        "isolate" => Utility::new(&[("isolation", "isolate")]),
        "aspect-square" => Utility::new(&[("aspect-ratio", "1 / 1")]),
        "aspect-video" => Utility::new(&[("aspect-ratio", "16 / 9")]),
        "object-cover" => Utility::new(&[("object-fit", "cover")]),
        "object-contain" => Utility::new(&[("object-fit", "contain")]),
        "object-center" => Utility::new(&[("object-position", "center")]),
        "sr-only" => Utility::new(&[
            ("position", "absolute"),
            ("width", "1px"),
            ("height", "1px"),
            ("padding", "0"),
            ("margin", "-1px"),
            ("overflow", "hidden"),
            ("clip", "rect(0, 0, 0, 0)"),
            ("white-space", "nowrap"),
            ("border-width", "0"),
        ]),
        _ => return None,
    };
    Some(utility)
}

// ─── Flexbox & Grid ─────────────────────────────────────────────────────────

fn resolve_flex(class: &str) -> Option<Utility> {
    let fixed: Option<(&str, &str)> = match class {
        "flex-row" => Some(("flex-direction", "row")),
        "flex-row-reverse" => Some(("flex-direction", "row-reverse")),
        "flex-col" => Some(("flex-direction", "column")),
        "flex-col-reverse" => Some(("flex-direction", "column-reverse")),
        "flex-wrap" => Some(("flex-wrap", "wrap")),
        "flex-wrap-reverse" => Some(("flex-wrap", "wrap-reverse")),
        "flex-nowrap" => Some(("flex-wrap", "nowrap")),
        "flex-1" => Some(("flex", "1 1 0%")),
        "flex-auto" => Some(("flex", "1 1 auto")),
        "flex-initial" => Some(("flex", "0 1 auto")),
        "flex-none" => Some(("flex", "none")),
        "grow" => Some(("flex-grow", "1")),
        "grow-0" => Some(("flex-grow", "0")),
        "shrink" => Some(("flex-shrink", "1")),
        "shrink-0" => Some(("flex-shrink", "0")),
        _ => None,
    };
    if let Some((prop, val)) = fixed {
        return Some(Utility::new(&[(prop, val)]));
    }
    if let Some(val) = class.strip_prefix("basis-") {
        return Some(Utility::one("flex-basis", size_value(val, Axis::Width)?));
    }
    if let Some(val) = class.strip_prefix("order-") {
        let css_val = match val {
            "first" => "-9999".to_string(),
            "last" => "9999".to_string(),
            "none" => "0".to_string(),
            _ => {
                val.parse::<u32>().ok()?;
                val.to_string()
            }
        };
        return Some(Utility::one("order", css_val));
    }
    None
}

fn track_count(val: &str) -> Option<String> {
    if val == "none" {
        return Some("none".to_string());
    }
    if let Some(v) = arbitrary(val) {
        return Some(v);
    }
    let n: u32 = val.parse().ok()?;
    if !(1..=12).contains(&n) {
        return None;
    }
    Some(format!("repeat({}, minmax(0, 1fr))", n))
}

fn span(val: &str) -> Option<String> {
    if val == "full" {
        return Some("1 / -1".to_string());
    }
    let n: u32 = val.parse().ok()?;
    if !(1..=12).contains(&n) {
        return None;
    }
    Some(format!("span {} / span {}", n, n))
}

fn resolve_grid(class: &str) -> Option<Utility> {
    if let Some(val) = class.strip_prefix("grid-cols-") {
        return Some(Utility::one("grid-template-columns", track_count(val)?));
    }
    if let Some(val) = class.strip_prefix("grid-rows-") {
        return Some(Utility::one("grid-template-rows", track_count(val)?));
    }
    if let Some(val) = class.strip_prefix("col-span-") {
        return Some(Utility::one("grid-column", span(val)?));
    }
    if let Some(val) = class.strip_prefix("row-span-") {
        return Some(Utility::one("grid-row", span(val)?));
    }
    None
}

fn resolve_alignment(class: &str) -> Option<Utility> {
    let (prop, val) = if let Some(v) = class.strip_prefix("items-") {
        ("align-items", v)
    } else if let Some(v) = class.strip_prefix("justify-items-") {
        ("justify-items", v)
    } else if let Some(v) = class.strip_prefix("justify-self-") {
        ("justify-self", v)
    } else if let Some(v) = class.strip_prefix("justify-") {
        ("justify-content", v)
    } else if let Some(v) = class.strip_prefix("self-") {
        ("align-self", v)
    } else if let Some(v) = class.strip_prefix("content-") {
        ("align-content", v)
    } else if let Some(v) = class.strip_prefix("place-items-") {
        ("place-items", v)
    } else if let Some(v) = class.strip_prefix("place-content-") {
        ("place-content", v)
    } else {
        return None;
    };

    let css_val = match val {
        "start" if prop == "justify-content" || prop == "align-items" || prop == "align-content" => {
            "flex-start"
        }
        "end" if prop == "justify-content" || prop == "align-items" || prop == "align-content" => {
            "flex-end"
        }
        "start" => "start",
        "end" => "end",
        "center" => "center",
        "stretch" => "stretch",
        "baseline" => "baseline",
        "auto" => "auto",
        "between" => "space-between",
        "around" => "space-around",
        "evenly" => "space-evenly",
        _ => return None,
    };
    Some(Utility::new(&[(prop, css_val)]))
}

fn resolve_gap(class: &str) -> Option<Utility> {
    let (prop, val) = if let Some(v) = class.strip_prefix("gap-x-") {
        ("column-gap", v)
    } else if let Some(v) = class.strip_prefix("gap-y-") {
        ("row-gap", v)
    } else if let Some(v) = class.strip_prefix("gap-") {
        ("gap", v)
    } else {
        return None;
    };
    Some(Utility::one(prop, spacing_value(val)?))
}

fn resolve_space_between(class: &str) -> Option<Utility> {
    let (prop, val) = if let Some(v) = class.strip_prefix("space-x-") {
        ("margin-inline-end", v)
    } else if let Some(v) = class.strip_prefix("space-y-") {
        ("margin-block-end", v)
    } else {
        return None;
    };
    let mut utility = Utility::one(prop, spacing_value(val)?);
    utility.child_selector = Some(" > :not(:last-child)");
    Some(utility)
}

// ─── Spacing ────────────────────────────────────────────────────────────────

fn resolve_spacing(class: &str) -> Option<Utility> {
    let (neg, rest) = match class.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, class),
    };

    let (key, val) = rest.split_once('-')?;
    let props: &[&str] = match key {
        "p" => &["padding"],
        "px" => &["padding-inline"],
        "py" => &["padding-block"],
        "pt" => &["padding-top"],
        "pr" => &["padding-right"],
        "pb" => &["padding-bottom"],
        "pl" => &["padding-left"],
        "m" => &["margin"],
        "mx" => &["margin-inline"],
        "my" => &["margin-block"],
        "mt" => &["margin-top"],
        "mr" => &["margin-right"],
        "mb" => &["margin-bottom"],
        "ml" => &["margin-left"],
        _ => return None,
    };
    let is_margin = key.starts_with('m');
    if neg && !is_margin {
        return None;
    }

    let css_val = if is_margin && val == "auto" {
        if neg {
            return None;
        }
        "auto".to_string()
    } else {
        negate(spacing_value(val)?, neg)
    };

    Some(Utility::dynamic(
        props
            .iter()
            .map(|p| (p.to_string(), css_val.clone()))
            .collect(),
    ))
}

// ─── Sizing ─────────────────────────────────────────────────────────────────

fn container_width(val: &str) -> Option<&'static str> {
    let width = match val {
        "3xs" => "16rem",
        "2xs" => "18rem",
        "xs" => "20rem",
        "sm" => "24rem",
        "md" => "28rem",
        "lg" => "32rem",
        "xl" => "36rem",
        "2xl" => "42rem",
        "3xl" => "48rem",
        "4xl" => "56rem",
        "5xl" => "64rem",
        "6xl" => "72rem",
        "7xl" => "80rem",
        "prose" => "65ch",
        "none" => "none",
        _ => return None,
    };
    Some(width)
}

fn resolve_sizing(class: &str) -> Option<Utility> {
    if let Some(val) = class.strip_prefix("size-") {
        let v = size_value(val, Axis::Width)?;
        return Some(Utility::dynamic(vec![
            ("width".to_string(), v.clone()),
            ("height".to_string(), v),
        ]));
    }
    if let Some(val) = class.strip_prefix("max-w-") {
        let v = match container_width(val) {
            Some(w) => w.to_string(),
            None => size_value(val, Axis::Width)?,
        };
        return Some(Utility::one("max-width", v));
    }

    let (prop, axis, val) = if let Some(v) = class.strip_prefix("min-w-") {
        ("min-width", Axis::Width, v)
    } else if let Some(v) = class.strip_prefix("min-h-") {
        ("min-height", Axis::Height, v)
    } else if let Some(v) = class.strip_prefix("max-h-") {
        ("max-height", Axis::Height, v)
    } else if let Some(v) = class.strip_prefix("w-") {
        ("width", Axis::Width, v)
    } else if let Some(v) = class.strip_prefix("h-") {
        ("height", Axis::Height, v)
    } else {
        return None;
    };
    Some(Utility::one(prop, size_value(val, axis)?))
}

// ─── Typography ─────────────────────────────────────────────────────────────

fn font_size(val: &str) -> Option<(&'static str, &'static str)> {
    let pair = match val {
        "xs" => ("0.75rem", "1rem"),
        "sm" => ("0.875rem", "1.25rem"),
        "base" => ("1rem", "1.5rem"),
        "lg" => ("1.125rem", "1.75rem"),
        "xl" => ("1.25rem", "1.75rem"),
        "2xl" => ("1.5rem", "2rem"),
        "3xl" => ("1.875rem", "2.25rem"),
        "4xl" => ("2.25rem", "2.5rem"),
        "5xl" => ("3rem", "1"),
        "6xl" => ("3.75rem", "1"),
        "7xl" => ("4.5rem", "1"),
        "8xl" => ("6rem", "1"),
        "9xl" => ("8rem", "1"),
        _ => return None,
    };
    Some(pair)
}

fn resolve_typography(class: &str) -> Option<Utility> {
    let fixed: Option<&[(&str, &str)]> = match class {
        "text-left" => Some(&[("text-align", "left")]),
        "text-center" => Some(&[("text-align", "center")]),
        "text-right" => Some(&[("text-align", "right")]),
        "text-justify" => Some(&[("text-align", "justify")]),
        "font-sans" => Some(&[("font-family", "var(--font-sans)")]),
        "font-mono" => Some(&[("font-family", "var(--font-mono)")]),
        "uppercase" => Some(&[("text-transform", "uppercase")]),
        "lowercase" => Some(&[("text-transform", "lowercase")]),
        "capitalize" => Some(&[("text-transform", "capitalize")]),
        "normal-case" => Some(&[("text-transform", "none")]),
        "italic" => Some(&[("font-style", "italic")]),
        "not-italic" => Some(&[("font-style", "normal")]),
        "underline" => Some(&[("text-decoration-line", "underline")]),
        "line-through" => Some(&[("text-decoration-line", "line-through")]),
        "no-underline" => Some(&[("text-decoration-line", "none")]),
        "underline-offset-4" => Some(&[("text-underline-offset", "4px")]),
        "truncate" => Some(&[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ]),
        "whitespace-nowrap" => Some(&[("white-space", "nowrap")]),
        "whitespace-normal" => Some(&[("white-space", "normal")]),
        "whitespace-pre" => Some(&[("white-space", "pre")]),
        "whitespace-pre-wrap" => Some(&[("white-space", "pre-wrap")]),
        "break-words" => Some(&[("overflow-wrap", "break-word")]),
        "break-all" => Some(&[("word-break", "break-all")]),
        "antialiased" => Some(&[
            ("-webkit-font-smoothing", "antialiased"),
            ("-moz-osx-font-smoothing", "grayscale"),
        ]),
        _ => None,
    };
    if let Some(props) = fixed {
        return Some(Utility::new(props));
    }

    if let Some(val) = class.strip_prefix("line-clamp-") {
        if val == "none" {
            return Some(Utility::new(&[
                ("overflow", "visible"),
                ("display", "block"),
                ("-webkit-box-orient", "horizontal"),
                ("-webkit-line-clamp", "unset"),
            ]));
        }
        let lines = match arbitrary(val) {
            Some(v) => v,
            None => val.parse::<u32>().ok()?.to_string(),
        };
        return Some(Utility::dynamic(vec![
            ("overflow".to_string(), "hidden".to_string()),
            ("display".to_string(), "-webkit-box".to_string()),
            ("-webkit-box-orient".to_string(), "vertical".to_string()),
            ("-webkit-line-clamp".to_string(), lines),
        ]));
    }

    if let Some(val) = class.strip_prefix("text-") {
        if let Some((size, line_height)) = font_size(val) {
            return Some(Utility::new(&[
                ("font-size", size),
                ("line-height", line_height),
            ]));
        }
        if arbitrary_is_color(val) == Some(false) {
            return Some(Utility::one("font-size", arbitrary(val)?));
        }
        return None;
    }

    if let Some(val) = class.strip_prefix("font-") {
        let weight = match val {
            "thin" => "100",
            "extralight" => "200",
            "light" => "300",
            "normal" => "400",
            "medium" => "500",
            "semibold" => "600",
            "bold" => "700",
            "extrabold" => "800",
            "black" => "900",
            _ => return None,
        };
        return Some(Utility::new(&[("font-weight", weight)]));
    }

    if let Some(val) = class.strip_prefix("leading-") {
        let v = match val {
            "none" => "1".to_string(),
            "tight" => "1.25".to_string(),
            "snug" => "1.375".to_string(),
            "normal" => "1.5".to_string(),
            "relaxed" => "1.625".to_string(),
            "loose" => "2".to_string(),
            _ => spacing_value(val)?,
        };
        return Some(Utility::one("line-height", v));
    }

    if let Some(val) = class.strip_prefix("tracking-") {
        let v = match val {
            "tighter" => "-0.05em",
            "tight" => "-0.025em",
            "normal" => "0em",
            "wide" => "0.025em",
            "wider" => "0.05em",
            "widest" => "0.1em",
            _ => return None,
        };
        return Some(Utility::new(&[("letter-spacing", v)]));
    }

    None
}

// ─── Colors ─────────────────────────────────────────────────────────────────

fn resolve_text_color(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    let val = class.strip_prefix("text-")?;
    Some(Utility::one("color", color_value(val, theme)?))
}

fn resolve_bg_color(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    let val = class.strip_prefix("bg-")?;
    Some(Utility::one("background-color", color_value(val, theme)?))
}

// ─── Borders ────────────────────────────────────────────────────────────────

fn border_width(val: &str) -> Option<String> {
    if val.is_empty() {
        return Some("1px".to_string());
    }
    if let Some(is_color) = arbitrary_is_color(val) {
        return if is_color { None } else { arbitrary(val) };
    }
    let n: u32 = val.parse().ok()?;
    Some(format!("{}px", n))
}

fn resolve_border(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    let rest = class.strip_prefix("border")?;
    if !rest.is_empty() && !rest.starts_with('-') {
        return None;
    }
    let rest = rest.strip_prefix('-').unwrap_or(rest);

    if matches!(rest, "solid" | "dashed" | "dotted" | "double" | "none" | "hidden") {
        return Some(Utility::new(&[("border-style", rest)]));
    }

    let (side, val) = match rest.split_once('-') {
        Some((s, v)) if is_border_side(s) => (Some(s), v),
        _ if is_border_side(rest) => (Some(rest), ""),
        _ => (None, rest),
    };

    if let Some(width) = border_width(val) {
        let props: &[&str] = match side {
            None => &["border-width"],
            Some("t") => &["border-top-width"],
            Some("r") => &["border-right-width"],
            Some("b") => &["border-bottom-width"],
            Some("l") => &["border-left-width"],
            Some("x") => &["border-inline-width"],
            Some("y") => &["border-block-width"],
            Some(_) => return None,
        };
        let mut decls = vec![("border-style".to_string(), "solid".to_string())];
        decls.extend(props.iter().map(|p| (p.to_string(), width.clone())));
        return Some(Utility::dynamic(decls));
    }

    if side.is_none() {
        return Some(Utility::one("border-color", color_value(val, theme)?));
    }
    None
}

fn is_border_side(s: &str) -> bool {
    matches!(s, "t" | "r" | "b" | "l" | "x" | "y")
}

fn radius_value(val: &str, theme: &ThemeLookup) -> Option<String> {
    if let Some(v) = arbitrary(val) {
        return Some(v);
    }
    if theme.radii.contains(val) {
        return Some(format!("var(--radius-{})", val));
    }
    let v = match val {
        "" => "0.25rem",
        "none" => "0",
        "xs" => "0.125rem",
        "sm" => "0.25rem",
        "md" => "0.375rem",
        "lg" => "0.5rem",
        "xl" => "0.75rem",
        "2xl" => "1rem",
        "3xl" => "1.5rem",
        "4xl" => "2rem",
        "full" => "calc(infinity * 1px)",
        _ => return None,
    };
    Some(v.to_string())
}

fn resolve_radius(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    let rest = class.strip_prefix("rounded")?;
    if !rest.is_empty() && !rest.starts_with('-') {
        return None;
    }
    let rest = rest.strip_prefix('-').unwrap_or(rest);

    let corners = |side: &str| -> Option<&'static [&'static str]> {
        let c: &'static [&'static str] = match side {
            "t" => &["border-top-left-radius", "border-top-right-radius"],
            "r" => &["border-top-right-radius", "border-bottom-right-radius"],
            "b" => &["border-bottom-right-radius", "border-bottom-left-radius"],
            "l" => &["border-top-left-radius", "border-bottom-left-radius"],
            "tl" => &["border-top-left-radius"],
            "tr" => &["border-top-right-radius"],
            "br" => &["border-bottom-right-radius"],
            "bl" => &["border-bottom-left-radius"],
            _ => return None,
        };
        Some(c)
    };

    let (props, val): (&[&str], &str) = match rest.split_once('-') {
        Some((side, v)) if corners(side).is_some() => (corners(side)?, v),
        _ => match corners(rest) {
            Some(c) => (c, ""),
            None => (&["border-radius"], rest),
        },
    };

    let radius = radius_value(val, theme)?;
    Some(Utility::dynamic(
        props
            .iter()
            .map(|p| (p.to_string(), radius.clone()))
            .collect(),
    ))
}

fn resolve_ring(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    let rest = class.strip_prefix("ring")?;
    let width = match rest {
        "" => Some("1px".to_string()),
        _ => rest.strip_prefix('-').and_then(|v| match arbitrary_is_color(v) {
            Some(false) => arbitrary(v),
            Some(true) => None,
            None => v.parse::<u32>().ok().map(|n| format!("{}px", n)),
        }),
    };
    if let Some(w) = width {
        return Some(Utility::one(
            "box-shadow",
            format!("0 0 0 {} var(--tw-ring-color, currentcolor)", w),
        ));
    }
    let val = rest.strip_prefix('-')?;
    Some(Utility::one("--tw-ring-color", color_value(val, theme)?))
}

fn resolve_shadow(class: &str) -> Option<Utility> {
    let val = match class {
        "shadow-2xs" => "0 1px rgb(0 0 0 / 0.05)",
        "shadow-xs" => "0 1px 2px 0 rgb(0 0 0 / 0.05)",
        "shadow" | "shadow-sm" => "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)",
        "shadow-md" => "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
        "shadow-lg" => "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
        "shadow-xl" => "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)",
        "shadow-2xl" => "0 25px 50px -12px rgb(0 0 0 / 0.25)",
        "shadow-none" => "0 0 #0000",
        _ => return None,
    };
    Some(Utility::new(&[("box-shadow", val)]))
}

fn resolve_opacity(class: &str) -> Option<Utility> {
    let val = class.strip_prefix("opacity-")?;
    if let Some(v) = arbitrary(val) {
        return Some(Utility::one("opacity", v));
    }
    let n: u32 = val.parse().ok()?;
    if n > 100 {
        return None;
    }
    Some(Utility::one("opacity", format!("{}%", n)))
}

// ─── Interactivity & Motion ─────────────────────────────────────────────────

fn resolve_interactivity(class: &str) -> Option<Utility> {
    if let Some(val) = class.strip_prefix("cursor-") {
        return match val {
            "auto" | "default" | "pointer" | "wait" | "text" | "move" | "help"
            | "not-allowed" | "grab" | "grabbing" => Some(Utility::new(&[("cursor", val)])),
            _ => None,
        };
    }
    if let Some(val) = class.strip_prefix("select-") {
        return match val {
            "none" | "text" | "all" | "auto" => Some(Utility::new(&[("user-select", val)])),
            _ => None,
        };
    }
    match class {
        "pointer-events-none" => Some(Utility::new(&[("pointer-events", "none")])),
        "pointer-events-auto" => Some(Utility::new(&[("pointer-events", "auto")])),
        "outline-hidden" => Some(Utility::new(&[
            ("outline", "2px solid transparent"),
            ("outline-offset", "2px"),
        ])),
        "outline-none" => Some(Utility::new(&[("outline-style", "none")])),
        _ => None,
    }
}

fn resolve_outline(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    let rest = class.strip_prefix("outline")?;
    if rest.is_empty() {
        return Some(Utility::new(&[("outline-style", "solid"), ("outline-width", "1px")]));
    }
    let val = rest.strip_prefix('-')?;
    if let Some(offset) = val.strip_prefix("offset-") {
        let n: u32 = offset.parse().ok()?;
        return Some(Utility::one("outline-offset", format!("{}px", n)));
    }
    if let Ok(n) = val.parse::<u32>() {
        return Some(Utility::dynamic(vec![
            ("outline-style".to_string(), "solid".to_string()),
            ("outline-width".to_string(), format!("{}px", n)),
        ]));
    }
    Some(Utility::one("outline-color", color_value(val, theme)?))
}

fn resolve_transition(class: &str) -> Option<Utility> {
    let property = match class {
        "transition" => Some(
            "color, background-color, border-color, text-decoration-color, fill, stroke, opacity, box-shadow, transform, filter",
        ),
        "transition-all" => Some("all"),
        "transition-colors" => Some(
            "color, background-color, border-color, text-decoration-color, fill, stroke",
        ),
        "transition-opacity" => Some("opacity"),
        "transition-shadow" => Some("box-shadow"),
        "transition-transform" => Some("transform, translate, scale, rotate"),
        "transition-none" => return Some(Utility::new(&[("transition-property", "none")])),
        _ => None,
    };
    if let Some(p) = property {
        return Some(Utility::new(&[
            ("transition-property", p),
            (
                "transition-timing-function",
                "var(--default-transition-timing-function)",
            ),
            ("transition-duration", "var(--default-transition-duration)"),
        ]));
    }

    if let Some(val) = class.strip_prefix("duration-") {
        let ms: u32 = val.parse().ok()?;
        return Some(Utility::dynamic(vec![
            ("--tw-duration".to_string(), format!("{}ms", ms)),
            ("transition-duration".to_string(), format!("{}ms", ms)),
        ]));
    }
    if let Some(val) = class.strip_prefix("ease-") {
        let timing = match val {
            "linear" => "linear",
            "in" => "cubic-bezier(0.4, 0, 1, 1)",
            "out" => "cubic-bezier(0, 0, 0.2, 1)",
            "in-out" => "cubic-bezier(0.4, 0, 0.2, 1)",
            _ => return None,
        };
        return Some(Utility::new(&[("transition-timing-function", timing)]));
    }
    None
}

fn resolve_animation(class: &str) -> Option<Utility> {
    let val = match class {
        "animate-spin" => "spin 1s linear infinite",
        "animate-ping" => "ping 1s cubic-bezier(0, 0, 0.2, 1) infinite",
        "animate-pulse" => "pulse 2s cubic-bezier(0.4, 0, 0.6, 1) infinite",
        "animate-bounce" => "bounce 1s infinite",
        "animate-none" => "none",
        _ => return None,
    };
    Some(Utility::new(&[("animation", val)]))
}

/// `animate-in` / `animate-out` and the `fade-`, `zoom-`, `spin-` and
/// `slide-` modifiers that feed the `enter` / `exit` keyframes.
fn resolve_enter_exit(class: &str) -> Option<Utility> {
    const TIMING: &str = "var(--tw-duration, 150ms) var(--tw-ease, ease) var(--tw-animation-delay, 0s) var(--tw-animation-iteration-count, 1) var(--tw-animation-direction, normal) var(--tw-animation-fill-mode, none)";
    match class {
        "animate-in" => return Some(Utility::one("animation", format!("enter {}", TIMING))),
        "animate-out" => return Some(Utility::one("animation", format!("exit {}", TIMING))),
        _ => {}
    }

    let (phase, kind, amount) = if let Some(r) = class.strip_prefix("fade-in") {
        ("enter", "opacity", r)
    } else if let Some(r) = class.strip_prefix("fade-out") {
        ("exit", "opacity", r)
    } else if let Some(r) = class.strip_prefix("zoom-in") {
        ("enter", "scale", r)
    } else if let Some(r) = class.strip_prefix("zoom-out") {
        ("exit", "scale", r)
    } else if let Some(r) = class.strip_prefix("spin-in") {
        ("enter", "rotate", r)
    } else if let Some(r) = class.strip_prefix("spin-out") {
        ("exit", "rotate", r)
    } else if let Some(r) = class.strip_prefix("slide-in-from-") {
        return slide("enter", r);
    } else if let Some(r) = class.strip_prefix("slide-out-to-") {
        return slide("exit", r);
    } else {
        return None;
    };

    let value = match amount {
        "" if kind == "rotate" => "30deg".to_string(),
        "" => "0".to_string(),
        _ => {
            let v = amount.strip_prefix('-')?;
            match arbitrary(v) {
                Some(a) => a,
                None => {
                    let n: u32 = v.parse().ok()?;
                    match kind {
                        "rotate" => format!("{}deg", n),
                        _ => format!("{}%", n),
                    }
                }
            }
        }
    };
    Some(Utility::one(&format!("--tw-{}-{}", phase, kind), value))
}

fn slide(phase: &str, rest: &str) -> Option<Utility> {
    let (side, amount) = match rest.split_once('-') {
        Some((s, a)) => (s, Some(a)),
        None => (rest, None),
    };
    let (axis, negative) = match side {
        "top" => ("y", true),
        "bottom" => ("y", false),
        "left" | "start" => ("x", true),
        "right" | "end" => ("x", false),
        _ => return None,
    };
    let distance = match amount {
        None => "100%".to_string(),
        Some(a) => size_value(a, Axis::Width)?,
    };
    Some(Utility::one(
        &format!("--tw-{}-translate-{}", phase, axis),
        negate(distance, negative),
    ))
}

// ─── Transforms & Filters ───────────────────────────────────────────────────

fn resolve_transform(class: &str) -> Option<Utility> {
    let (neg, rest) = match class.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, class),
    };

    if let Some(val) = rest.strip_prefix("translate-") {
        let (axes, val): (&[&str], &str) = if let Some(v) = val.strip_prefix("x-") {
            (&["x"], v)
        } else if let Some(v) = val.strip_prefix("y-") {
            (&["y"], v)
        } else {
            (&["x", "y"], val)
        };
        let distance = negate(size_value(val, Axis::Width)?, neg);
        let mut decls: Vec<(String, String)> = axes
            .iter()
            .map(|a| (format!("--tw-translate-{}", a), distance.clone()))
            .collect();
        decls.push((
            "translate".to_string(),
            "var(--tw-translate-x, 0) var(--tw-translate-y, 0)".to_string(),
        ));
        return Some(Utility::dynamic(decls));
    }

    if let Some(val) = rest.strip_prefix("scale-") {
        let (axes, val): (&[&str], &str) = if let Some(v) = val.strip_prefix("x-") {
            (&["x"], v)
        } else if let Some(v) = val.strip_prefix("y-") {
            (&["y"], v)
        } else {
            (&["x", "y"], val)
        };
        let factor = match arbitrary(val) {
            Some(v) => v,
            None => format!("{}%", val.parse::<u32>().ok()?),
        };
        let factor = negate(factor, neg);
        let mut decls: Vec<(String, String)> = axes
            .iter()
            .map(|a| (format!("--tw-scale-{}", a), factor.clone()))
            .collect();
        decls.push((
            "scale".to_string(),
            "var(--tw-scale-x, 1) var(--tw-scale-y, 1)".to_string(),
        ));
        return Some(Utility::dynamic(decls));
    }

    if let Some(val) = rest.strip_prefix("rotate-") {
        let angle = match arbitrary(val) {
            Some(v) => v,
            None => format!("{}deg", val.parse::<u32>().ok()?),
        };
        return Some(Utility::one("rotate", negate(angle, neg)));
    }

    if neg {
        return None;
    }
    match class {
        "transform-none" => Some(Utility::new(&[("transform", "none")])),
        "transform-gpu" => Some(Utility::new(&[("transform", "translateZ(0)")])),
        "origin-center" => Some(Utility::new(&[("transform-origin", "center")])),
        "origin-top" => Some(Utility::new(&[("transform-origin", "top")])),
        "origin-top-left" => Some(Utility::new(&[("transform-origin", "top left")])),
        _ => None,
    }
}

fn blur_radius(val: &str) -> Option<String> {
    let radius = match val {
        "" => "8px",
        "none" => return Some(String::new()),
        "xs" => "4px",
        "sm" => "8px",
        "md" => "12px",
        "lg" => "16px",
        "xl" => "24px",
        "2xl" => "40px",
        "3xl" => "64px",
        _ => return arbitrary(val),
    };
    Some(radius.to_string())
}

fn resolve_filter(class: &str) -> Option<Utility> {
    let (prop, rest) = if let Some(r) = class.strip_prefix("backdrop-blur") {
        ("backdrop-filter", r)
    } else if let Some(r) = class.strip_prefix("blur") {
        ("filter", r)
    } else {
        return None;
    };
    let val = match rest {
        "" => "",
        _ => rest.strip_prefix('-')?,
    };
    let radius = blur_radius(val)?;
    let css_val = if radius.is_empty() {
        "none".to_string()
    } else {
        format!("blur({})", radius)
    };
    Some(Utility::one(prop, css_val))
}

fn resolve_svg(class: &str, theme: &ThemeLookup) -> Option<Utility> {
    if let Some(val) = class.strip_prefix("fill-") {
        return Some(Utility::one("fill", color_value(val, theme)?));
    }
    if let Some(val) = class.strip_prefix("stroke-") {
        if let Ok(n) = val.parse::<u32>() {
            return Some(Utility::one("stroke-width", n.to_string()));
        }
        return Some(Utility::one("stroke", color_value(val, theme)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup() -> ThemeLookup {
        ThemeLookup {
            colors: ["primary", "muted-foreground"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            radii: ["lg"].iter().map(|s| s.to_string()).collect(),
        }
    }

    fn decls(class: &str) -> Vec<(String, String)> {
        resolve_utility(class, &lookup())
            .unwrap_or_else(|| panic!("{class} should resolve"))
            .declarations
    }

    fn one(prop: &str, val: &str) -> Vec<(String, String)> {
        vec![(prop.to_string(), val.to_string())]
    }

    #[test]
    fn spacing_scale() {
        assert_eq!(decls("p-4"), one("padding", "calc(var(--spacing) * 4)"));
        assert_eq!(decls("px-0.5"), one("padding-inline", "calc(var(--spacing) * 0.5)"));
        assert_eq!(decls("mx-auto"), one("margin-inline", "auto"));
        assert_eq!(decls("-mt-2"), one("margin-top", "calc(calc(var(--spacing) * 2) * -1)"));
        assert_eq!(decls("m-[3px]"), one("margin", "3px"));
        assert!(resolve_utility("-p-2", &lookup()).is_none());
        assert!(resolve_utility("p-1.3", &lookup()).is_none());
    }

    #[test]
    fn sizing() {
        assert_eq!(decls("w-full"), one("width", "100%"));
        assert_eq!(decls("h-screen"), one("height", "100vh"));
        assert_eq!(decls("w-1/2"), one("width", "calc(1/2 * 100%)"));
        assert_eq!(decls("max-w-md"), one("max-width", "28rem"));
        assert_eq!(decls("size-8").len(), 2);
    }

    #[test]
    fn colors_with_opacity() {
        assert_eq!(decls("bg-red-500"), one("background-color", "#ef4444"));
        assert_eq!(
            decls("bg-primary/50"),
            one(
                "background-color",
                "color-mix(in oklab, var(--color-primary) 50%, transparent)"
            )
        );
        assert_eq!(decls("text-muted-foreground"), one("color", "var(--color-muted-foreground)"));
        assert_eq!(decls("text-[#123456]"), one("color", "#123456"));
        assert!(resolve_utility("bg-unknown", &lookup()).is_none());
    }

    #[test]
    fn text_sizes_win_over_colors() {
        assert_eq!(
            decls("text-sm"),
            vec![
                ("font-size".to_string(), "0.875rem".to_string()),
                ("line-height".to_string(), "1.25rem".to_string()),
            ]
        );
        assert_eq!(decls("text-[13px]"), one("font-size", "13px"));
        assert_eq!(decls("text-center"), one("text-align", "center"));
    }

    #[test]
    fn borders_and_radius() {
        assert_eq!(
            decls("border"),
            vec![
                ("border-style".to_string(), "solid".to_string()),
                ("border-width".to_string(), "1px".to_string()),
            ]
        );
        assert_eq!(decls("border-t-2")[1], ("border-top-width".to_string(), "2px".to_string()));
        assert_eq!(decls("border-red-500"), one("border-color", "#ef4444"));
        assert_eq!(decls("rounded-lg"), one("border-radius", "var(--radius-lg)"));
        assert_eq!(decls("rounded-md"), one("border-radius", "0.375rem"));
        assert_eq!(decls("rounded-t-2xl").len(), 2);
        assert!(resolve_utility("bordered", &lookup()).is_none());
    }

    #[test]
    fn space_between_targets_children() {
        let u = resolve_utility("space-y-2", &lookup()).unwrap();
        assert_eq!(u.child_selector, Some(" > :not(:last-child)"));
    }

    #[test]
    fn translate_centers_with_fractions_and_arbitrary() {
        let centered = decls("-translate-x-1/2");
        assert_eq!(
            centered[0],
            (
                "--tw-translate-x".to_string(),
                "calc(calc(1/2 * 100%) * -1)".to_string()
            )
        );
        assert_eq!(
            centered[1],
            (
                "translate".to_string(),
                "var(--tw-translate-x, 0) var(--tw-translate-y, 0)".to_string()
            )
        );
        assert_eq!(decls("translate-y-[-50%]")[0].1, "-50%");
        assert_eq!(decls("scale-95")[0], ("--tw-scale-x".to_string(), "95%".to_string()));
        assert_eq!(decls("rotate-180"), one("rotate", "180deg"));
        assert_eq!(decls("-rotate-90"), one("rotate", "calc(90deg * -1)"));
    }

    #[test]
    fn css_variable_shorthand() {
        assert_eq!(
            decls("w-(--radix-select-trigger-width)"),
            one("width", "var(--radix-select-trigger-width)")
        );
        assert_eq!(decls("bg-(--brand)"), one("background-color", "var(--brand)"));
        assert_eq!(decls("text-(--ink)"), one("color", "var(--ink)"));
        assert_eq!(decls("text-(length:--step)"), one("font-size", "var(--step)"));
        assert_eq!(decls("max-h-(--radix-select-content-available-height)").len(), 1);
        assert!(resolve_utility("w-(oops)", &lookup()).is_none());
    }

    #[test]
    fn ring_accepts_arbitrary_width() {
        assert_eq!(
            decls("ring-[3px]"),
            one("box-shadow", "0 0 0 3px var(--tw-ring-color, currentcolor)")
        );
        assert_eq!(
            decls("ring-primary/50"),
            one(
                "--tw-ring-color",
                "color-mix(in oklab, var(--color-primary) 50%, transparent)"
            )
        );
    }

    #[test]
    fn enter_exit_animations() {
        assert!(decls("animate-in")[0].1.starts_with("enter "));
        assert!(decls("animate-out")[0].1.starts_with("exit "));
        assert_eq!(decls("fade-in-0"), one("--tw-enter-opacity", "0%"));
        assert_eq!(decls("fade-out"), one("--tw-exit-opacity", "0"));
        assert_eq!(decls("zoom-in-95"), one("--tw-enter-scale", "95%"));
        assert_eq!(
            decls("slide-in-from-top-2"),
            one(
                "--tw-enter-translate-y",
                "calc(calc(var(--spacing) * 2) * -1)"
            )
        );
        assert_eq!(
            decls("slide-out-to-right"),
            one("--tw-exit-translate-x", "100%")
        );
        assert!(resolve_utility("fade-input", &lookup()).is_none());
    }

    #[test]
    fn filters_and_line_clamp() {
        assert_eq!(decls("backdrop-blur-sm"), one("backdrop-filter", "blur(8px)"));
        assert_eq!(decls("backdrop-blur"), one("backdrop-filter", "blur(8px)"));
        assert_eq!(decls("blur-none"), one("filter", "none"));
        let clamp = decls("line-clamp-2");
        assert!(clamp.contains(&("-webkit-line-clamp".to_string(), "2".to_string())));
        assert!(clamp.contains(&("display".to_string(), "-webkit-box".to_string())));
    }

    #[test]
    fn outline_utilities() {
        assert_eq!(decls("outline-none"), one("outline-style", "none"));
        assert_eq!(decls("outline-hidden").len(), 2);
        assert_eq!(
            decls("outline-primary/50"),
            one(
                "outline-color",
                "color-mix(in oklab, var(--color-primary) 50%, transparent)"
            )
        );
    }

    #[test]
    fn unknown_classes_are_ignored() {
        for class in ["hello", "Hi", "data-foo", "flex-", "grid-cols-13", "opacity-150"] {
            assert!(resolve_utility(class, &lookup()).is_none(), "{class}");
        }
    }
}
