use thiserror::Error;

use crate::ui::ControlKey;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not process event '{event}': Control Id '{control_id}' not found")]
    ControlNotFound { event: String, control_id: String },

    #[error("Unexpected error processing event '{event}' on control '{control}'")]
    HandlerFailed {
        event: String,
        control: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Control '{control}' does not handle event '{event}'")]
    UnsupportedEvent { event: String, control: String },

    #[error("Malformed UI event: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    #[error("A window title must contain at least one non-whitespace character")]
    BlankTitle,

    #[error("'{0}' is not a valid control id, ids must be JavaScript identifiers")]
    InvalidControlId(String),

    #[error("Control id '{0}' is already in use")]
    DuplicateControlId(String),

    #[error("Control id '{0}' is reserved")]
    ReservedControlId(String),

    #[error("No control with key {0:?} exists in this window")]
    UnknownControl(ControlKey),

    #[error("Control {0:?} is not a container")]
    NotAContainer(ControlKey),

    #[error("Control {0:?} does not have the requested type")]
    WrongControlType(ControlKey),

    #[error("Cannot attach {child:?} under {parent:?}, it is the parent itself or one of its ancestors")]
    CyclicAttach {
        parent: ControlKey,
        child: ControlKey,
    },

    #[error("The window's root container cannot be attached to another container")]
    RootNotAttachable,

    #[error("Index {index} is out of bounds for a collection of {len} controls")]
    IndexOutOfBounds { index: usize, len: usize },
}
