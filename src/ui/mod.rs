use std::fmt;

use tracing::error;

use crate::render::script::ScriptWriter;

pub mod button;
pub mod collection;
pub mod identity;
pub mod label;
pub mod panel;
pub mod tree;
pub mod window;

pub use button::Button;
pub use collection::ControlCollection;
pub use label::Label;
pub use panel::Panel;
pub use tree::{ControlArena, RenderStats};
pub use window::{Snapshot, Window};

use tree::RenderCx;

/// Index of a control in its window's arena.
/// Keys stay valid for the window's lifetime and are shared by its snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlKey(usize);

impl ControlKey {
    pub(crate) const ROOT: ControlKey = ControlKey(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Creation vs update rendering of one control.
///
/// `previous` is the snapshot state of this same control (same client id). `None` means the
/// control does not exist on the client yet.
pub(crate) trait Render {
    fn render(
        &self,
        cx: &RenderCx<'_>,
        key: ControlKey,
        writer: &mut ScriptWriter,
        previous: Option<&Self>,
    );
}

/// All possible control types in the arena
#[derive(Debug, Clone)]
pub enum ControlNode {
    Panel(Panel),
    Label(Label),
    Button(Button),
}

impl ControlNode {
    pub fn kind(&self) -> &'static str {
        match self {
            ControlNode::Panel(_) => "Panel",
            ControlNode::Label(_) => "Label",
            ControlNode::Button(_) => "Button",
        }
    }

    pub fn children(&self) -> Option<&ControlCollection> {
        match self {
            ControlNode::Panel(panel) => Some(panel.children()),
            _ => None,
        }
    }

    pub(crate) fn render(
        &self,
        cx: &RenderCx<'_>,
        key: ControlKey,
        writer: &mut ScriptWriter,
        previous: Option<&ControlNode>,
    ) {
        match (self, previous) {
            (ControlNode::Panel(panel), None) => panel.render(cx, key, writer, None),
            (ControlNode::Label(label), None) => label.render(cx, key, writer, None),
            (ControlNode::Button(button), None) => button.render(cx, key, writer, None),
            (ControlNode::Panel(panel), Some(ControlNode::Panel(previous))) => {
                panel.render(cx, key, writer, Some(previous))
            }
            (ControlNode::Label(label), Some(ControlNode::Label(previous))) => {
                label.render(cx, key, writer, Some(previous))
            }
            (ControlNode::Button(button), Some(ControlNode::Button(previous))) => {
                button.render(cx, key, writer, Some(previous))
            }
            (current, Some(previous)) => {
                // A key never changes its control type, so the snapshot must agree
                error!(
                    "control {:?} is a {} but its snapshot is a {}; skipping",
                    key,
                    current.kind(),
                    previous.kind()
                );
            }
        }
    }
}

impl fmt::Display for ControlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlNode::Panel(panel) => write!(f, "Panel, Controls: {}", panel.children().len()),
            ControlNode::Label(label) => write!(f, "Label, Text: '{}'", label.text()),
            ControlNode::Button(button) => write!(f, "Button, Text: '{}'", button.text()),
        }
    }
}

impl From<Panel> for ControlNode {
    fn from(panel: Panel) -> Self {
        ControlNode::Panel(panel)
    }
}

impl From<Label> for ControlNode {
    fn from(label: Label) -> Self {
        ControlNode::Label(label)
    }
}

impl From<Button> for ControlNode {
    fn from(button: Button) -> Self {
        ControlNode::Button(button)
    }
}
