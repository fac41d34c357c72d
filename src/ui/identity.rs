use std::collections::HashSet;

use tracing::trace;

use crate::error::{Error, Result};

/// Client id of the window's root container. It maps to `document.body`.
pub const ROOT_ID: &str = "body";

/// Names the generated scripts already bind, so controls cannot take them.
const RESERVED: &[&str] = &[ROOT_ID, "document", "window", "Button"];

/// Words a strict mode async function body cannot use as a variable name.
const KEYWORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

/// Hands out `ctl01`, `ctl02`, ... for one window.
/// Ids double as HTML ids and script variable names, so they are unique per window.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    counter: u32,
    taken: HashSet<String>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            counter: 0,
            taken: HashSet::from([ROOT_ID.to_string()]),
        }
    }

    /// Next automatic id, skipping any id that was claimed explicitly.
    pub fn next_id(&mut self) -> String {
        loop {
            self.counter += 1;
            let id = format!("ctl{:02}", self.counter);
            if self.taken.insert(id.clone()) {
                trace!("generated control id {}", id);
                return id;
            }
        }
    }

    /// Reserves an application supplied id.
    pub fn claim(&mut self, id: &str) -> Result<()> {
        validate(id)?;
        if !self.taken.insert(id.to_string()) {
            return Err(Error::DuplicateControlId(id.to_string()));
        }
        Ok(())
    }
}

/// Ids must be usable as JavaScript identifiers.
pub fn validate(id: &str) -> Result<()> {
    if RESERVED.contains(&id) || KEYWORDS.contains(&id) {
        return Err(Error::ReservedControlId(id.to_string()));
    }
    let mut chars = id.chars();
    let valid_start = chars
        .next()
        .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_' || ch == '$');
    if !valid_start || !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$') {
        return Err(Error::InvalidControlId(id.to_string()));
    }
    Ok(())
}
