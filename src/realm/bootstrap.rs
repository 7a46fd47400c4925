//! The realm's bootstrap document: import map, theme styles, mount point
//! and the module script that speaks the realm protocol.

use crate::modules::ImportTable;

use super::protocol::ColorScheme;
use super::CONSOLE_MIRROR_PREFIX;

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en"__HTML_CLASS__>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<script type="importmap">
__IMPORT_MAP__
</script>
<style id="__theme">__THEME_CSS__</style>
<style id="__utilities"></style>
<style>
  #__error { position: fixed; inset: 0; z-index: 9999; display: none; align-items: flex-end; padding: 16px; background: rgba(0,0,0,0.15); font-family: ui-monospace, monospace; }
  #__error.visible { display: flex; }
  #__error-content { width: 100%; max-height: 40%; overflow: auto; padding: 12px 16px; border-radius: 8px; background: #1c1917; color: #fecaca; font-size: 13px; line-height: 1.5; white-space: pre-wrap; word-break: break-word; }
</style>
</head>
<body style="margin:0">
<div id="root"></div>
<div id="__error"><div id="__error-content"></div></div>
<script type="module">
__REALM_SCRIPT__
</script>
</body>
</html>
"#;

const REALM_SCRIPT: &str = r#"import React from "react";
import { createRoot } from "react-dom/client";

const root = createRoot(document.getElementById("root"));
const post = (msg) => window.parent.postMessage(msg, "*");
let rootKey = 0;
let mounted = false;
let remountNext = false;
let currentUrl = null;
let pending = Promise.resolve();

// Loads and clears run one at a time in arrival order, so a slow import can
// never land on top of a newer module.
function enqueue(task) {
  pending = pending.then(task).catch((err) => reportFault(err.message, err.stack));
}

function showError(message) {
  document.getElementById("__error-content").textContent = message;
  document.getElementById("__error").classList.add("visible");
}

function hideError() {
  document.getElementById("__error").classList.remove("visible");
}

function reportFault(message, stack) {
  remountNext = true;
  post({ type: "runtime-error", message, stack: stack || "" });
}

class ErrorBoundary extends React.Component {
  constructor(props) { super(props); this.state = { error: null }; }
  static getDerivedStateFromError(error) { return { error }; }
  componentDidCatch(error) { reportFault(error.message, error.stack); }
  render() {
    if (this.state.error) {
      return React.createElement("div", { style: { padding: 24, fontFamily: "ui-monospace, monospace", fontSize: 13 } }, this.state.error.message);
    }
    return this.props.children;
  }
}

function stringify(value) {
  if (typeof value === "string") return value;
  try { return JSON.stringify(value); } catch { return String(value); }
}

for (const method of ["log", "warn", "error", "info"]) {
  const original = console[method].bind(console);
  console[method] = (...args) => {
    original("__MIRROR_PREFIX__", ...args);
    post({ type: "console", method, args: args.map(stringify) });
  };
}

async function loadAndRender(js) {
  hideError();
  const url = URL.createObjectURL(new Blob([js], { type: "application/javascript" }));
  let mod;
  try {
    mod = await import(url);
  } catch (err) {
    URL.revokeObjectURL(url);
    showError(err.message);
    reportFault(err.message, err.stack);
    return;
  }
  if (currentUrl) URL.revokeObjectURL(currentUrl);
  currentUrl = url;

  const Comp = "default" in mod ? mod.default : Object.values(mod).find((v) => typeof v === "function");
  if (typeof Comp !== "function") {
    root.render(null);
    mounted = false;
    post({ type: "render-complete" });
    return;
  }
  if (!mounted || remountNext) {
    rootKey += 1;
    remountNext = false;
  }
  root.render(React.createElement(ErrorBoundary, { key: rootKey }, React.createElement(Comp)));
  mounted = true;
  post({ type: "render-complete" });
}

function clearMount() {
  hideError();
  root.render(null);
  mounted = false;
  remountNext = false;
  if (currentUrl) { URL.revokeObjectURL(currentUrl); currentUrl = null; }
}

window.addEventListener("message", (e) => {
  const msg = e.data || {};
  switch (msg.type) {
    case "code":
      enqueue(() => loadAndRender(msg.js));
      break;
    case "clear":
      enqueue(clearMount);
      break;
    case "theme-css":
      document.getElementById("__theme").textContent = msg.css;
      break;
    case "tailwind-css":
      document.getElementById("__utilities").textContent = msg.css;
      break;
    case "theme":
      document.documentElement.classList.toggle("dark", msg.value === "dark");
      break;
  }
});

window.onerror = (message, _source, _line, _col, error) => {
  showError(String(message));
  reportFault(String(message), error && error.stack);
};

window.onunhandledrejection = (e) => {
  const message = (e.reason && e.reason.message) || String(e.reason);
  showError(message);
  reportFault(message, e.reason && e.reason.stack);
};

post({ type: "iframe-ready" });"#;

/// `</` would end the surrounding `<script>` / `<style>` element early.
fn escape_raw_text(text: &str) -> String {
    text.replace("</", "<\\/")
}

pub fn bootstrap_document(table: &ImportTable, theme_css: &str, scheme: ColorScheme) -> String {
    let html_class = if scheme.is_dark() { " class=\"dark\"" } else { "" };
    let script = REALM_SCRIPT.replace("__MIRROR_PREFIX__", CONSOLE_MIRROR_PREFIX);

    DOCUMENT_TEMPLATE
        .replace("__HTML_CLASS__", html_class)
        .replace("__IMPORT_MAP__", &escape_raw_text(&table.import_map().to_json_pretty()))
        .replace("__THEME_CSS__", &escape_raw_text(theme_css))
        .replace("__REALM_SCRIPT__", &script)
}
