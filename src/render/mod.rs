//! Script generation: typed DOM commands and the subsequence diff they are computed with.

pub mod lcs;
pub mod script;

pub use lcs::longest_common_subsequence;
pub use script::{
    DomCommand, ImportStyle, ModuleImport, NodeRef, RenderOptions, ScriptWriter, escape_js,
};
