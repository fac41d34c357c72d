use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ui::{ControlKey, Window};

/// An event raised in the browser, as posted by the client runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEvent {
    pub control_id: String,
    pub event_name: String,
}

impl UiEvent {
    pub fn new(control_id: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
            event_name: event_name.into(),
        }
    }

    pub fn click(control_id: impl Into<String>) -> Self {
        Self::new(control_id, EventName::Click.as_str())
    }
}

/// Event names a control can register handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    Click,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Click => "Click",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownEventName;

impl FromStr for EventName {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Click" => Ok(EventName::Click),
            _ => Err(UnknownEventName),
        }
    }
}

/// Passed to every handler invoked for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventArgs {
    pub source: ControlKey,
    pub control_id: String,
    pub event: EventName,
}

type HandlerFn = dyn Fn(&mut Window, &EventArgs) -> anyhow::Result<()>;

/// A shared handler closure. Two handlers are equal when they are the same allocation,
/// so registering a clone of an already registered handler is a no-op.
#[derive(Clone)]
pub struct EventHandler(Rc<HandlerFn>);

impl EventHandler {
    pub fn new(handler: impl Fn(&mut Window, &EventArgs) -> anyhow::Result<()> + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn call(&self, window: &mut Window, args: &EventArgs) -> anyhow::Result<()> {
        (self.0)(window, args)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl Eq for EventHandler {}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Handlers in registration order, without duplicates.
/// Cloning copies the list but shares the closures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerList(Vec<EventHandler>);

impl HandlerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the handler was already registered.
    pub fn add(&mut self, handler: EventHandler) -> bool {
        if self.0.contains(&handler) {
            return false;
        }
        self.0.push(handler);
        true
    }

    pub fn remove(&mut self, handler: &EventHandler) -> bool {
        match self.0.iter().position(|registered| registered == handler) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventHandler> {
        self.0.iter()
    }
}
