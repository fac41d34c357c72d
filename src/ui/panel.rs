use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::render::lcs::longest_common_subsequence;
use crate::render::script::ScriptWriter;
use crate::ui::collection::ControlCollection;
use crate::ui::tree::RenderCx;
use crate::ui::{ControlKey, Render};

/// A container control. Rendered as a `<div>`, or as `document.body` for the window root.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    children: ControlCollection,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &ControlCollection {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut ControlCollection {
        &mut self.children
    }

    fn render_creation(&self, cx: &RenderCx<'_>, key: ControlKey, writer: &mut ScriptWriter) {
        // The root reuses document.body, so there is nothing to create for it
        if key != ControlKey::ROOT {
            writer.create(cx.id(key), "div");
        }

        let parent = cx.node_ref(key);
        for &child in self.children.iter() {
            if cx.is_relocated(child) {
                // Already on the client, only its content may have changed
                render_child(cx, child, child, writer);
            } else if let Some(node) = cx.current.get(child) {
                node.render(cx, child, writer, None);
            } else {
                continue;
            }
            writer.append_child(&parent, cx.id(child));
        }
    }

    fn render_update(
        &self,
        cx: &RenderCx<'_>,
        key: ControlKey,
        writer: &mut ScriptWriter,
        previous: &Panel,
    ) {
        if cx.previous.is_none() {
            return self.render_creation(cx, key, writer);
        }

        let current_ids: Vec<&str> = self.children.iter().map(|&child| cx.id(child)).collect();
        let previous_ids: Vec<&str> = previous
            .children
            .iter()
            .map(|&child| cx.previous_id(child))
            .collect();

        // Adding, removing and reordering children is rare, so check for the plain update case
        // before paying for the subsequence table
        if current_ids == previous_ids {
            cx.record_fast_path();
            for (&child, &previous_child) in self.children.iter().zip(previous.children.iter()) {
                render_child(cx, child, previous_child, writer);
            }
            return;
        }

        cx.record_structural_diff();
        let lcs = longest_common_subsequence(&current_ids, &previous_ids, |a, b| a == b);

        // Lookups by id for the phases below, avoiding quadratic rescans
        let unmoved: HashSet<&str> = lcs.iter().map(|&(row, _)| current_ids[row]).collect();
        let current_set: HashSet<&str> = current_ids.iter().copied().collect();
        let previous_by_id: HashMap<&str, ControlKey> = previous_ids
            .iter()
            .copied()
            .zip(previous.children.iter().copied())
            .collect();

        debug!(
            "structural diff of {:?}: {} -> {} children, {} unmoved",
            key,
            previous_ids.len(),
            current_ids.len(),
            unmoved.len()
        );

        // 1. Remove
        let mut removals = ScriptWriter::new();
        for (&id, &previous_child) in previous_ids.iter().zip(previous.children.iter()) {
            if current_set.contains(id) {
                continue;
            }
            if cx.is_relocated(previous_child) {
                trace!("{} moved to another container", id);
                continue;
            }
            trace!("removing {}", id);
            removals.select(id).remove(id);
        }

        // 2. Update and 3. add / reorder.
        // Walking backwards lets every placement use insertBefore with an already placed
        // right-hand sibling as the reference node.
        let mut updates = ScriptWriter::new();
        let mut placements = ScriptWriter::new();
        let parent = cx.node_ref(key);
        // Closest already processed sibling and whether a script variable was bound for it
        let mut right_sibling: Option<(&str, bool)> = None;

        for (&child, &id) in self.children.iter().zip(current_ids.iter()).rev() {
            let mut bound = false;
            let relocated = cx.is_relocated(child);
            let previous_child = match previous_by_id.get(id) {
                Some(&previous_child) => Some(previous_child),
                // Came from another container, its previous state lives under the same key
                None if relocated => Some(child),
                None => None,
            };

            if let Some(previous_child) = previous_child {
                let mut local = ScriptWriter::new();
                render_child(cx, child, previous_child, &mut local);
                // A nested container may update its children without selecting itself.
                // Relocated controls were bound before anything else ran.
                bound = relocated || local.binds(id);
                updates.append(local);
            }

            if !unmoved.contains(id) {
                match previous_child {
                    // Moved
                    Some(_) => {
                        if !bound {
                            placements.select(id);
                            bound = true;
                        }
                    }
                    // Added
                    None => {
                        if let Some(node) = cx.current.get(child) {
                            node.render(cx, child, &mut placements, None);
                        }
                        bound = true;
                    }
                }

                let reference = match right_sibling {
                    Some((sibling, sibling_bound)) => {
                        if !sibling_bound {
                            placements.select(sibling);
                        }
                        Some(sibling)
                    }
                    None => None,
                };
                placements.insert_before(&parent, id, reference);
            }

            right_sibling = Some((id, bound));
        }

        writer.append(removals);
        writer.append(updates);
        if !placements.is_empty() {
            if key != ControlKey::ROOT {
                writer.select(cx.id(key));
            }
            writer.append(placements);
        }
    }
}

fn render_child(
    cx: &RenderCx<'_>,
    child: ControlKey,
    previous_child: ControlKey,
    writer: &mut ScriptWriter,
) {
    let current = cx.current.get(child);
    let previous = cx.previous.and_then(|arena| arena.get(previous_child));
    if let (Some(current), Some(previous)) = (current, previous) {
        current.render(cx, child, writer, Some(previous));
    }
}

impl Render for Panel {
    fn render(
        &self,
        cx: &RenderCx<'_>,
        key: ControlKey,
        writer: &mut ScriptWriter,
        previous: Option<&Self>,
    ) {
        match previous {
            None => self.render_creation(cx, key, writer),
            Some(previous) => self.render_update(cx, key, writer, previous),
        }
    }
}
