use crate::render::script::ScriptWriter;
use crate::ui::tree::RenderCx;
use crate::ui::{ControlKey, Render};

/// A `<span>` displaying plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    text: Option<String>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Missing text reads as the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn clear_text(&mut self) {
        self.text = None;
    }
}

impl Render for Label {
    fn render(
        &self,
        cx: &RenderCx<'_>,
        key: ControlKey,
        writer: &mut ScriptWriter,
        previous: Option<&Self>,
    ) {
        let id = cx.id(key);
        match previous {
            None => {
                writer.create(id, "span");
                // textContent inserts raw text, never markup
                if !self.text().is_empty() {
                    writer.set_text(id, self.text());
                }
            }
            Some(previous) => {
                if self.text() != previous.text() {
                    writer.select(id).set_text(id, self.text());
                }
            }
        }
    }
}
