//! Server side stateful UI controls.
//!
//! A [`Window`] holds a tree of controls. Every browser event is dispatched to the tree, which
//! handlers mutate freely; the window then diffs itself against the snapshot taken before the
//! event and emits the DOM mutation script that brings the browser up to date.

pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod render;
pub mod session;
pub mod ui;

pub use config::{Config, ConfigError, LogConfig};
pub use error::{Error, Result};
pub use event::{EventArgs, EventHandler, EventName, HandlerList, UiEvent};
pub use render::{ImportStyle, RenderOptions, ScriptWriter};
pub use session::Session;
pub use ui::{
    Button, ControlCollection, ControlKey, ControlNode, Label, Panel, RenderStats, Snapshot, Window,
};
