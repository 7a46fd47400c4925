//! Typed messages crossing the host ↔ realm boundary.
//!
//! Wire shape is `{"type": "<kebab-case tag>", ...fields}` in both
//! directions.

use serde::{Deserialize, Serialize};

use crate::console::ConsoleMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn is_dark(self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

/// Host → realm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostMessage {
    Code { js: String },
    ThemeCss { css: String },
    TailwindCss { css: String },
    Theme { value: ColorScheme },
    Clear,
}

impl HostMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            HostMessage::Code { .. } => "code",
            HostMessage::ThemeCss { .. } => "theme-css",
            HostMessage::TailwindCss { .. } => "tailwind-css",
            HostMessage::Theme { .. } => "theme",
            HostMessage::Clear => "clear",
        }
    }
}

/// Realm → host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RealmMessage {
    IframeReady,
    RenderComplete,
    RuntimeError {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    Console {
        method: ConsoleMethod,
        args: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn host_tags() {
        let cases = [
            (HostMessage::Code { js: "x".into() }, json!({"type": "code", "js": "x"})),
            (
                HostMessage::TailwindCss { css: "a{}".into() },
                json!({"type": "tailwind-css", "css": "a{}"}),
            ),
            (
                HostMessage::Theme {
                    value: ColorScheme::Dark,
                },
                json!({"type": "theme", "value": "dark"}),
            ),
            (HostMessage::Clear, json!({"type": "clear"})),
        ];
        for (message, expected) in cases {
            assert_eq!(serde_json::to_value(&message).unwrap(), expected);
            assert_eq!(expected["type"], message.kind());
        }
    }

    #[test]
    fn realm_messages_parse() {
        let msg: RealmMessage = serde_json::from_value(json!({
            "type": "runtime-error", "message": "boom", "stack": ""
        }))
        .unwrap();
        assert_eq!(
            msg,
            RealmMessage::RuntimeError {
                message: "boom".into(),
                stack: Some(String::new())
            }
        );

        let msg: RealmMessage = serde_json::from_value(json!({"type": "iframe-ready"})).unwrap();
        assert_eq!(msg, RealmMessage::IframeReady);

        let msg: RealmMessage = serde_json::from_value(json!({
            "type": "console", "method": "warn", "args": ["a", "1"]
        }))
        .unwrap();
        assert!(matches!(
            msg,
            RealmMessage::Console {
                method: ConsoleMethod::Warn,
                ..
            }
        ));
    }
}
