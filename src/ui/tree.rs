use std::cell::Cell;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::render::script::NodeRef;
use crate::ui::{ControlKey, ControlNode, Panel};

/// Arena-based control storage.
/// Stores all controls of one window in flat vectors and references them by key.
#[derive(Debug, Clone)]
pub struct ControlArena {
    controls: Vec<ControlNode>,
    /// parent[i] is the container control i is attached to
    parent: Vec<Option<ControlKey>>,
    /// client_id[i] is assigned on first attach unless supplied at creation
    client_id: Vec<Option<String>>,
}

impl ControlArena {
    /// An arena holding only the root container.
    pub(crate) fn with_root(root_id: &str) -> Self {
        Self {
            controls: vec![ControlNode::Panel(Panel::new())],
            parent: vec![None],
            client_id: vec![Some(root_id.to_string())],
        }
    }

    pub(crate) fn insert(&mut self, control: ControlNode, client_id: Option<String>) -> ControlKey {
        let key = ControlKey(self.controls.len());
        self.controls.push(control);
        self.parent.push(None);
        self.client_id.push(client_id);
        key
    }

    pub fn get(&self, key: ControlKey) -> Option<&ControlNode> {
        self.controls.get(key.0)
    }

    pub(crate) fn get_mut(&mut self, key: ControlKey) -> Option<&mut ControlNode> {
        self.controls.get_mut(key.0)
    }

    pub(crate) fn node(&self, key: ControlKey) -> Result<&ControlNode> {
        self.get(key).ok_or(Error::UnknownControl(key))
    }

    pub(crate) fn node_mut(&mut self, key: ControlKey) -> Result<&mut ControlNode> {
        self.get_mut(key).ok_or(Error::UnknownControl(key))
    }

    pub(crate) fn panel(&self, key: ControlKey) -> Result<&Panel> {
        match self.node(key)? {
            ControlNode::Panel(panel) => Ok(panel),
            _ => Err(Error::NotAContainer(key)),
        }
    }

    pub(crate) fn panel_mut(&mut self, key: ControlKey) -> Result<&mut Panel> {
        match self.node_mut(key)? {
            ControlNode::Panel(panel) => Ok(panel),
            _ => Err(Error::NotAContainer(key)),
        }
    }

    pub fn parent(&self, key: ControlKey) -> Option<ControlKey> {
        self.parent.get(key.0).copied().flatten()
    }

    pub(crate) fn set_parent(&mut self, key: ControlKey, parent: Option<ControlKey>) {
        if let Some(slot) = self.parent.get_mut(key.0) {
            *slot = parent;
        }
    }

    pub fn client_id(&self, key: ControlKey) -> Option<&str> {
        self.client_id.get(key.0).and_then(|id| id.as_deref())
    }

    pub(crate) fn set_client_id(&mut self, key: ControlKey, id: String) {
        if let Some(slot) = self.client_id.get_mut(key.0) {
            *slot = Some(id);
        }
    }

    /// True when `key` hangs below the root.
    pub(crate) fn is_attached(&self, key: ControlKey) -> bool {
        self.is_within(key, ControlKey::ROOT)
    }

    /// True when `key` is `ancestor` or sits anywhere below it.
    pub(crate) fn is_within(&self, key: ControlKey, ancestor: ControlKey) -> bool {
        let mut current = Some(key);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Depth-first search below `ancestor`, in child order.
    pub(crate) fn find_descendant(&self, ancestor: ControlKey, control_id: &str) -> Option<ControlKey> {
        let children = self.get(ancestor)?.children()?;
        for &child in children.iter() {
            if self.client_id(child) == Some(control_id) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, control_id) {
                return Some(found);
            }
        }
        None
    }
}

/// Counters for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Containers whose children kept their ids position for position
    pub fast_paths: usize,
    /// Containers that needed a longest common subsequence table
    pub structural_diffs: usize,
}

/// Everything a control needs to render itself: the live arena and, on updates, the snapshot arena.
pub(crate) struct RenderCx<'a> {
    pub(crate) current: &'a ControlArena,
    pub(crate) previous: Option<&'a ControlArena>,
    /// Controls attached in both states but under a different parent
    relocated: HashSet<ControlKey>,
    fast_paths: Cell<usize>,
    structural_diffs: Cell<usize>,
}

impl<'a> RenderCx<'a> {
    pub(crate) fn new(current: &'a ControlArena, previous: Option<&'a ControlArena>) -> Self {
        let relocated = match previous {
            Some(previous) => (1..current.controls.len())
                .map(ControlKey)
                .filter(|&key| {
                    current.parent(key) != previous.parent(key)
                        && current.is_attached(key)
                        && previous.is_attached(key)
                })
                .collect(),
            None => HashSet::new(),
        };
        Self {
            current,
            previous,
            relocated,
            fast_paths: Cell::new(0),
            structural_diffs: Cell::new(0),
        }
    }

    /// Client id of an attached control. Every control reachable from the root has one.
    pub(crate) fn id(&self, key: ControlKey) -> &'a str {
        self.current.client_id(key).unwrap_or_default()
    }

    pub(crate) fn previous_id(&self, key: ControlKey) -> &'a str {
        self.previous
            .and_then(|arena| arena.client_id(key))
            .unwrap_or_default()
    }

    /// How scripts reach the DOM node of a control.
    pub(crate) fn node_ref(&self, key: ControlKey) -> NodeRef {
        if key == ControlKey::ROOT {
            NodeRef::Body
        } else {
            NodeRef::Control(self.id(key).to_string())
        }
    }

    /// A relocated control keeps its client element: the old container leaves it alone and
    /// the new one moves it in.
    pub(crate) fn is_relocated(&self, key: ControlKey) -> bool {
        self.relocated.contains(&key)
    }

    /// Relocated controls and everything below them in the previous state, in document order.
    ///
    /// These are bound up front, while the previous document is still intact, so later
    /// statements can reach them even after an old ancestor was removed.
    pub(crate) fn relocation_bindings(&self) -> Vec<ControlKey> {
        let Some(previous) = self.previous else {
            return Vec::new();
        };
        if self.relocated.is_empty() {
            return Vec::new();
        }

        let mut bindings = Vec::new();
        let mut pending = vec![(ControlKey::ROOT, false)];
        while let Some((key, inside)) = pending.pop() {
            let inside = inside || self.relocated.contains(&key);
            if inside {
                bindings.push(key);
            }
            if let Some(children) = previous.get(key).and_then(ControlNode::children) {
                pending.extend(children.iter().rev().map(|&child| (child, inside)));
            }
        }
        bindings
    }

    pub(crate) fn record_fast_path(&self) {
        self.fast_paths.set(self.fast_paths.get() + 1);
    }

    pub(crate) fn record_structural_diff(&self) {
        self.structural_diffs.set(self.structural_diffs.get() + 1);
    }

    pub(crate) fn stats(&self) -> RenderStats {
        RenderStats {
            fast_paths: self.fast_paths.get(),
            structural_diffs: self.structural_diffs.get(),
        }
    }
}
