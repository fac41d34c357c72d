use tracing::{debug, warn};

use crate::error::Result;
use crate::event::UiEvent;
use crate::render::script::ImportStyle;
use crate::ui::Window;

const STRICT_PROLOGUE: &str = "'use strict';\n\n";

/// One browser view: its window and the payloads sent back for each event.
///
/// Sessions do not share state, so each one can live on whatever task serves its view.
#[derive(Debug)]
pub struct Session {
    window: Window,
}

impl Session {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// The script that builds the view on page load. Wrapped in an async function so its
    /// variables stay local and dynamic imports can be awaited. Static imports are hoisted
    /// above the function, the only place a module allows them.
    pub fn initial_payload(&mut self) -> String {
        let writer = self.window.initial_writer();
        let options = self.window.render_options();
        debug!("initial script has {} statements", writer.len());
        let (imports, body) = match options.import_style {
            ImportStyle::Static => (writer.imports_script(options), writer.statements_script()),
            ImportStyle::Dynamic => (String::new(), writer.to_script(options)),
        };
        format!("{STRICT_PROLOGUE}{imports}(async function() {{\n{body}}})();")
    }

    /// The payload answering one event, or an empty string when nothing changed.
    pub fn handle(&mut self, event: &UiEvent) -> Result<String> {
        let script = self.window.process_event(event).inspect_err(|err| {
            warn!("{}", err);
        })?;
        if script.is_empty() {
            return Ok(script);
        }
        Ok(format!("{STRICT_PROLOGUE}{script}"))
    }

    /// Like [`Session::handle`], parsing a `{"controlId": .., "eventName": ..}` body first.
    pub fn handle_json(&mut self, body: &str) -> Result<String> {
        let event: UiEvent = serde_json::from_str(body)?;
        self.handle(&event)
    }
}
