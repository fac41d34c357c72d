use crate::event::{EventHandler, HandlerList};
use crate::render::script::{DomCommand, ModuleImport, ScriptWriter};
use crate::ui::tree::RenderCx;
use crate::ui::{ControlKey, Render};

pub(crate) const MODULE: ModuleImport = ModuleImport {
    name: "Button",
    path: "button/button.mjs",
};
const CLICK_HANDLER: &str = "onClickHandler";

/// A `<button>` that forwards clicks to the server.
///
/// The browser listener is only wired while at least one click handler is registered.
#[derive(Debug, Clone, Default)]
pub struct Button {
    text: Option<String>,
    click_handlers: HandlerList,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            click_handlers: HandlerList::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn clear_text(&mut self) {
        self.text = None;
    }

    /// Builder form of [`Button::add_click_handler`].
    pub fn on_click(mut self, handler: EventHandler) -> Self {
        self.add_click_handler(handler);
        self
    }

    /// Returns false when this exact handler is already registered.
    pub fn add_click_handler(&mut self, handler: EventHandler) -> bool {
        self.click_handlers.add(handler)
    }

    pub fn remove_click_handler(&mut self, handler: &EventHandler) -> bool {
        self.click_handlers.remove(handler)
    }

    pub fn click_handlers(&self) -> &HandlerList {
        &self.click_handlers
    }

    fn listener(&self, id: &str, attach: bool) -> DomCommand {
        let id = id.to_string();
        if attach {
            DomCommand::AddListener {
                id,
                event: "click",
                module: MODULE.name,
                handler: CLICK_HANDLER,
            }
        } else {
            DomCommand::RemoveListener {
                id,
                event: "click",
                module: MODULE.name,
                handler: CLICK_HANDLER,
            }
        }
    }
}

impl Render for Button {
    fn render(
        &self,
        cx: &RenderCx<'_>,
        key: ControlKey,
        writer: &mut ScriptWriter,
        previous: Option<&Self>,
    ) {
        let id = cx.id(key);
        let Some(previous) = previous else {
            writer.create(id, "button");
            if !self.text().is_empty() {
                writer.set_text(id, self.text());
            }
            if !self.click_handlers.is_empty() {
                writer.push(self.listener(id, true)).import_module(MODULE);
            }
            return;
        };

        let mut local = ScriptWriter::new();
        if self.text() != previous.text() {
            local.set_text(id, self.text());
        }

        // Only the empty/non-empty transition touches the browser listener
        let module_needed = match (previous.click_handlers.is_empty(), self.click_handlers.is_empty()) {
            (true, false) => {
                local.push(self.listener(id, true));
                true
            }
            (false, true) => {
                local.push(self.listener(id, false));
                true
            }
            _ => false,
        };

        if !local.is_empty() {
            if module_needed {
                writer.import_module(MODULE);
            }
            writer.select(id);
            writer.append(local);
        }
    }
}
