use std::collections::HashSet;
use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

/// The token a script uses to reach a DOM node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// `document.body`, the mount point of the root window
    Body,
    /// A variable named after the control's client id
    Control(String),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Body => f.write_str("document.body"),
            NodeRef::Control(id) => f.write_str(id),
        }
    }
}

/// A client side module the generated statements depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleImport {
    /// Binding name used by the statements, e.g. `Button`
    pub name: &'static str,
    /// Path relative to the configured module root
    pub path: &'static str,
}

/// A single DOM mutation statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomCommand {
    SetTitle(String),
    Create {
        id: String,
        tag: &'static str,
    },
    Select(String),
    SetText {
        id: String,
        text: String,
    },
    AppendChild {
        parent: NodeRef,
        child: String,
    },
    /// `reference: None` inserts at the end of the parent's child list
    InsertBefore {
        parent: NodeRef,
        child: String,
        reference: Option<String>,
    },
    Remove(String),
    AddListener {
        id: String,
        event: &'static str,
        module: &'static str,
        handler: &'static str,
    },
    RemoveListener {
        id: String,
        event: &'static str,
        module: &'static str,
        handler: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportStyle {
    /// `import * as Name from 'path';`
    Static,
    /// `let Name = await import('path');`, usable inside an async function body
    #[default]
    Dynamic,
}

/// Options that only matter when the command list is turned into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub import_style: ImportStyle,
    pub module_root: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            import_style: ImportStyle::default(),
            module_root: String::from("."),
        }
    }
}

/// Accumulates DOM commands and the modules they need.
/// Controls render into this instead of producing text directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptWriter {
    commands: Vec<DomCommand>,
    imports: Vec<ModuleImport>,
}

impl ScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DomCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.push(DomCommand::SetTitle(title.to_string()))
    }

    pub fn create(&mut self, id: &str, tag: &'static str) -> &mut Self {
        self.push(DomCommand::Create {
            id: id.to_string(),
            tag,
        })
    }

    pub fn select(&mut self, id: &str) -> &mut Self {
        self.push(DomCommand::Select(id.to_string()))
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> &mut Self {
        self.push(DomCommand::SetText {
            id: id.to_string(),
            text: text.to_string(),
        })
    }

    pub fn append_child(&mut self, parent: &NodeRef, child: &str) -> &mut Self {
        self.push(DomCommand::AppendChild {
            parent: parent.clone(),
            child: child.to_string(),
        })
    }

    pub fn insert_before(
        &mut self,
        parent: &NodeRef,
        child: &str,
        reference: Option<&str>,
    ) -> &mut Self {
        self.push(DomCommand::InsertBefore {
            parent: parent.clone(),
            child: child.to_string(),
            reference: reference.map(str::to_string),
        })
    }

    pub fn remove(&mut self, id: &str) -> &mut Self {
        self.push(DomCommand::Remove(id.to_string()))
    }

    /// Records a module import. The first import of a given name wins and keeps its position.
    pub fn import_module(&mut self, module: ModuleImport) -> &mut Self {
        if !self.imports.iter().any(|import| import.name == module.name) {
            self.imports.push(module);
        }
        self
    }

    /// Moves the statements of `other` to the end of this writer, merging its imports.
    pub fn append(&mut self, other: ScriptWriter) -> &mut Self {
        for import in other.imports {
            self.import_module(import);
        }
        self.commands.extend(other.commands);
        self
    }

    /// True when no statement was written. Imports alone do not count.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when some statement binds a script variable for `id`.
    pub fn binds(&self, id: &str) -> bool {
        self.commands.iter().any(|command| match command {
            DomCommand::Create { id: bound, .. } | DomCommand::Select(bound) => bound == id,
            _ => false,
        })
    }

    pub fn commands(&self) -> &[DomCommand] {
        &self.commands
    }

    pub fn imports(&self) -> &[ModuleImport] {
        &self.imports
    }

    /// Generates the script text: imports first, then every statement in order.
    pub fn to_script(&self, options: &RenderOptions) -> String {
        if self.commands.is_empty() {
            return String::new();
        }
        let mut script = self.imports_script(options);
        script.push_str(&self.statements_script());
        script
    }

    /// Import declarations only, one per line.
    pub fn imports_script(&self, options: &RenderOptions) -> String {
        let mut script = String::new();
        for import in &self.imports {
            let path = escape_js(&module_path(&options.module_root, import.path));
            // Writing into a String cannot fail
            let _ = match options.import_style {
                ImportStyle::Static => {
                    writeln!(script, "import * as {} from '{}';", import.name, path)
                }
                ImportStyle::Dynamic => {
                    writeln!(script, "let {} = await import('{}');", import.name, path)
                }
            };
        }
        script
    }

    /// Statements only, without the imports they depend on.
    pub fn statements_script(&self) -> String {
        let mut script = String::new();
        // A create of an already bound id re-assigns the variable instead of re-declaring it
        let mut declared: HashSet<&str> = HashSet::new();
        for command in &self.commands {
            let _ = write_command(&mut script, command, &mut declared);
        }
        script
    }
}

fn write_command<'a>(
    out: &mut String,
    command: &'a DomCommand,
    declared: &mut HashSet<&'a str>,
) -> fmt::Result {
    match command {
        DomCommand::SetTitle(title) => writeln!(out, "document.title = '{}';", escape_js(title)),
        DomCommand::Create { id, tag } => {
            let binding = binding(declared, id);
            writeln!(out, "{binding}{id} = document.createElement('{tag}');")?;
            writeln!(out, "{id}.id = '{id}';")
        }
        // An id names one element for the whole script, so a bound variable is never re-queried.
        // The element may be detached by then and getElementById would miss it.
        DomCommand::Select(id) if declared.contains(id.as_str()) => Ok(()),
        DomCommand::Select(id) => {
            declared.insert(id);
            writeln!(out, "let {id} = document.getElementById('{id}');")
        }
        DomCommand::SetText { id, text } => {
            writeln!(out, "{id}.textContent = '{}';", escape_js(text))
        }
        DomCommand::AppendChild { parent, child } => writeln!(out, "{parent}.appendChild({child});"),
        DomCommand::InsertBefore {
            parent,
            child,
            reference,
        } => writeln!(
            out,
            "{parent}.insertBefore({child}, {});",
            reference.as_deref().unwrap_or("null")
        ),
        DomCommand::Remove(id) => writeln!(out, "{id}.remove();"),
        DomCommand::AddListener {
            id,
            event,
            module,
            handler,
        } => write_listener(out, "addEventListener", id, event, module, handler),
        DomCommand::RemoveListener {
            id,
            event,
            module,
            handler,
        } => write_listener(out, "removeEventListener", id, event, module, handler),
    }
}

fn write_listener(
    out: &mut String,
    method: &str,
    id: &str,
    event: &str,
    module: &str,
    handler: &str,
) -> fmt::Result {
    writeln!(out, "{id}.{method}('{event}', {module}.{handler}, {{")?;
    out.push_str("    capture: false,\n");
    out.push_str("    passive: true\n");
    out.push_str("});\n");
    Ok(())
}

fn binding<'a>(declared: &mut HashSet<&'a str>, id: &'a str) -> &'static str {
    if declared.insert(id) { "let " } else { "" }
}

fn module_path(root: &str, path: &str) -> String {
    if root.is_empty() {
        return path.to_string();
    }
    format!("{}/{path}", root.trim_end_matches('/'))
}

/// Escapes text for a single quoted JavaScript string literal.
pub fn escape_js(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            // Keeps `</script>` from closing an inline script element
            '<' => escaped.push_str("\\x3C"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            ch if (ch as u32) < 0x20 => {
                let _ = write!(escaped, "\\u{:04X}", ch as u32);
            }
            ch => escaped.push(ch),
        }
    }
    escaped
}
