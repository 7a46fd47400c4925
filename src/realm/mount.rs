//! The rendering surface a realm drives.

use super::protocol::ColorScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountMode {
    /// Keep the mounted tree and swap the component in place.
    HotSwap,
    /// Discard the tree and mount fresh under a new root key.
    Remount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    /// Identity of the top-level tree; changes only on remount.
    pub root_key: u64,
    pub mode: MountMode,
    pub module_url: String,
    pub export_name: String,
}

/// An error thrown while composing or rendering, caught by the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFault {
    pub message: String,
    pub stack: Option<String>,
}

impl RenderFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    Theme,
    Utilities,
}

pub trait Renderer: Send {
    /// `Err` means the boundary caught a fault and now shows it in place.
    fn render(&mut self, request: MountRequest) -> Result<(), RenderFault>;

    fn clear(&mut self);

    fn apply_stylesheet(&mut self, slot: StyleSlot, css: &str);

    fn set_color_scheme(&mut self, scheme: ColorScheme);

    fn show_overlay(&mut self, _message: &str) {}

    fn hide_overlay(&mut self) {}
}
