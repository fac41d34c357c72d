use std::ops::Range;

use tracing::{debug, info, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::{EventArgs, EventName, UiEvent};
use crate::render::script::{ImportStyle, RenderOptions, ScriptWriter};
use crate::ui::collection::{ControlCollection, MembershipObserver};
use crate::ui::identity::{IdGenerator, ROOT_ID};
use crate::ui::tree::{ControlArena, RenderCx, RenderStats};
use crate::ui::{Button, ControlKey, ControlNode, Label, Panel};

/// The root of one browser view.
///
/// Owns every control of the view in an arena. The root container is mounted on
/// `document.body`; everything else is reachable from it through container children.
#[derive(Debug, Clone)]
pub struct Window {
    arena: ControlArena,
    ids: IdGenerator,
    title: Option<String>,
    default_title: String,
    options: RenderOptions,
}

/// Immutable copy of a window taken before an event is dispatched.
#[derive(Debug, Clone)]
pub struct Snapshot {
    arena: ControlArena,
    title: Option<String>,
}

impl Snapshot {
    pub fn arena(&self) -> &ControlArena {
        &self.arena
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Window {
    pub fn new(config: &Config) -> Self {
        Self {
            arena: ControlArena::with_root(ROOT_ID),
            ids: IdGenerator::new(),
            title: None,
            default_title: config.default_title.clone(),
            options: config.render_options(),
        }
    }

    pub fn with_title(config: &Config, title: impl Into<String>) -> Result<Self> {
        let mut window = Self::new(config);
        window.set_title(title)?;
        Ok(window)
    }

    /// Key of the container mounted on `document.body`.
    pub fn root(&self) -> ControlKey {
        ControlKey::ROOT
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Rejects titles without a single non-whitespace character.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::BlankTitle);
        }
        self.title = Some(title);
        Ok(())
    }

    pub fn arena(&self) -> &ControlArena {
        &self.arena
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.options
    }

    /// Puts a detached control into the window. It receives a generated id on first attach.
    pub fn create(&mut self, node: impl Into<ControlNode>) -> ControlKey {
        let node = node.into();
        let key = self.arena.insert(node, None);
        trace!("created {:?}", key);
        key
    }

    /// Like [`Window::create`] with an application supplied client id.
    pub fn create_with_id(&mut self, id: &str, node: impl Into<ControlNode>) -> Result<ControlKey> {
        self.ids.claim(id)?;
        let key = self.arena.insert(node.into(), Some(id.to_string()));
        trace!("created {:?} as {}", key, id);
        Ok(key)
    }

    /// Creates a control and appends it to `parent` in one step.
    pub fn append(&mut self, parent: ControlKey, node: impl Into<ControlNode>) -> Result<ControlKey> {
        self.arena.panel(parent)?;
        let key = self.create(node);
        self.add_child(parent, key)?;
        Ok(key)
    }

    pub fn node(&self, key: ControlKey) -> Result<&ControlNode> {
        self.arena.node(key)
    }

    pub fn label(&self, key: ControlKey) -> Result<&Label> {
        match self.arena.node(key)? {
            ControlNode::Label(label) => Ok(label),
            _ => Err(Error::WrongControlType(key)),
        }
    }

    pub fn label_mut(&mut self, key: ControlKey) -> Result<&mut Label> {
        match self.arena.node_mut(key)? {
            ControlNode::Label(label) => Ok(label),
            _ => Err(Error::WrongControlType(key)),
        }
    }

    pub fn button(&self, key: ControlKey) -> Result<&Button> {
        match self.arena.node(key)? {
            ControlNode::Button(button) => Ok(button),
            _ => Err(Error::WrongControlType(key)),
        }
    }

    pub fn button_mut(&mut self, key: ControlKey) -> Result<&mut Button> {
        match self.arena.node_mut(key)? {
            ControlNode::Button(button) => Ok(button),
            _ => Err(Error::WrongControlType(key)),
        }
    }

    pub fn panel(&self, key: ControlKey) -> Result<&Panel> {
        self.arena.panel(key)
    }

    pub fn client_id(&self, key: ControlKey) -> Option<&str> {
        self.arena.client_id(key)
    }

    pub fn parent(&self, key: ControlKey) -> Option<ControlKey> {
        self.arena.parent(key)
    }

    pub fn children(&self, parent: ControlKey) -> Result<&[ControlKey]> {
        Ok(self.arena.panel(parent)?.children().as_slice())
    }

    pub fn child_at(&self, parent: ControlKey, index: usize) -> Result<Option<ControlKey>> {
        Ok(self.arena.panel(parent)?.children().get(index))
    }

    pub fn position(&self, parent: ControlKey, child: ControlKey) -> Result<Option<usize>> {
        Ok(self.arena.panel(parent)?.children().position(child))
    }

    /// Looks a control up by client id among the controls attached to the tree.
    pub fn find(&self, control_id: &str) -> Option<ControlKey> {
        if control_id == ROOT_ID {
            return Some(ControlKey::ROOT);
        }
        self.arena.find_descendant(ControlKey::ROOT, control_id)
    }

    pub fn add_child(&mut self, parent: ControlKey, child: ControlKey) -> Result<()> {
        self.prepare_attach(parent, &[child])?;
        self.with_children(parent, |children, membership| children.add(child, membership))
    }

    pub fn insert_child(&mut self, parent: ControlKey, index: usize, child: ControlKey) -> Result<()> {
        // Checked before the child leaves its old container
        self.arena.panel(parent)?.children().check_insert(index, child)?;
        self.prepare_attach(parent, &[child])?;
        self.with_children(parent, |children, membership| {
            children.insert(index, child, membership)
        })?
    }

    pub fn extend_children(
        &mut self,
        parent: ControlKey,
        children: impl IntoIterator<Item = ControlKey>,
    ) -> Result<()> {
        let keys: Vec<ControlKey> = children.into_iter().collect();
        self.prepare_attach(parent, &keys)?;
        self.with_children(parent, |children, membership| children.extend(keys, membership))
    }

    pub fn insert_children(
        &mut self,
        parent: ControlKey,
        index: usize,
        children: impl IntoIterator<Item = ControlKey>,
    ) -> Result<()> {
        let keys: Vec<ControlKey> = children.into_iter().collect();
        self.arena
            .panel(parent)?
            .children()
            .check_insert_all(index, &keys)?;
        self.prepare_attach(parent, &keys)?;
        self.with_children(parent, |children, membership| {
            children.insert_all(index, keys, membership)
        })?
    }

    /// Puts `child` at `index` and returns the control previously there.
    pub fn set_child(
        &mut self,
        parent: ControlKey,
        index: usize,
        child: ControlKey,
    ) -> Result<ControlKey> {
        self.arena.panel(parent)?.children().check_set(index)?;
        self.prepare_attach(parent, &[child])?;
        self.with_children(parent, |children, membership| {
            children.set(index, child, membership)
        })?
    }

    /// Returns false when `child` was not a child of `parent`.
    pub fn remove_child(&mut self, parent: ControlKey, child: ControlKey) -> Result<bool> {
        self.with_children(parent, |children, membership| children.remove(child, membership))
    }

    pub fn remove_child_at(&mut self, parent: ControlKey, index: usize) -> Result<ControlKey> {
        self.with_children(parent, |children, membership| {
            children.remove_at(index, membership)
        })?
    }

    pub fn remove_children(
        &mut self,
        parent: ControlKey,
        range: Range<usize>,
    ) -> Result<Vec<ControlKey>> {
        self.with_children(parent, |children, membership| {
            children.remove_range(range, membership)
        })?
    }

    /// Removes every listed child of `parent` and returns how many were there.
    pub fn remove_all(
        &mut self,
        parent: ControlKey,
        children: impl IntoIterator<Item = ControlKey>,
    ) -> Result<usize> {
        self.with_children(parent, |siblings, membership| {
            siblings.remove_all(children, membership)
        })
    }

    /// Keeps the children for which `keep` holds and returns how many were removed.
    pub fn retain_children(
        &mut self,
        parent: ControlKey,
        keep: impl FnMut(ControlKey) -> bool,
    ) -> Result<usize> {
        self.with_children(parent, |children, membership| children.retain(keep, membership))
    }

    pub fn clear_children(&mut self, parent: ControlKey) -> Result<()> {
        self.with_children(parent, |children, membership| children.clear(membership))
    }

    /// Validates an attach of `children` under `parent` and detaches each of them from any
    /// other container they currently belong to.
    fn prepare_attach(&mut self, parent: ControlKey, children: &[ControlKey]) -> Result<()> {
        self.arena.panel(parent)?;
        for &child in children {
            self.arena.node(child)?;
            if child == ControlKey::ROOT {
                return Err(Error::RootNotAttachable);
            }
            if self.arena.is_within(parent, child) {
                return Err(Error::CyclicAttach { parent, child });
            }
        }

        for &child in children {
            match self.arena.parent(child) {
                Some(previous) if previous != parent => {
                    debug!("moving {:?} from {:?} to {:?}", child, previous, parent);
                    self.with_children(previous, |siblings, membership| {
                        siblings.remove(child, membership)
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Runs a collection operation on the children of `parent` while attach and detach
    /// notifications keep the arena's parent links and ids in step.
    fn with_children<R>(
        &mut self,
        parent: ControlKey,
        op: impl FnOnce(&mut ControlCollection, &mut Membership<'_>) -> R,
    ) -> Result<R> {
        let mut children = std::mem::take(self.arena.panel_mut(parent)?.children_mut());
        let mut membership = Membership {
            arena: &mut self.arena,
            ids: &mut self.ids,
            owner: parent,
        };
        let result = op(&mut children, &mut membership);
        *self.arena.panel_mut(parent)?.children_mut() = children;
        Ok(result)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            arena: self.arena.clone(),
            title: self.title.clone(),
        }
    }

    fn effective_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.default_title)
    }

    /// Writes the creation script when `previous` is `None`, otherwise the statements that turn
    /// the `previous` state into the current one.
    pub fn render(&self, writer: &mut ScriptWriter, previous: Option<&Snapshot>) -> RenderStats {
        let cx = RenderCx::new(&self.arena, previous.map(Snapshot::arena));
        let title = self.effective_title();
        match previous {
            None => {
                writer.set_title(title);
            }
            Some(previous) => {
                let previous_title = previous.title().unwrap_or(&self.default_title);
                if previous_title != title {
                    writer.set_title(title);
                }
            }
        }

        for key in cx.relocation_bindings() {
            writer.select(cx.previous_id(key));
        }

        let previous_root = previous.and_then(|snapshot| snapshot.arena.get(ControlKey::ROOT));
        if let Some(root) = self.arena.get(ControlKey::ROOT) {
            root.render(&cx, ControlKey::ROOT, writer, previous_root);
        }

        let stats = cx.stats();
        debug!(
            "rendered {} statements, {} fast paths, {} structural diffs",
            writer.len(),
            stats.fast_paths,
            stats.structural_diffs
        );
        stats
    }

    /// Statements that build the whole view in an empty document.
    pub fn initial_writer(&mut self) -> ScriptWriter {
        if self.title.is_none() {
            self.title = Some(self.default_title.clone());
        }
        let mut writer = ScriptWriter::new();
        self.render(&mut writer, None);
        writer
    }

    pub fn initial_script(&mut self) -> String {
        self.initial_writer().to_script(&self.options)
    }

    /// Script reconciling the client from `previous` to the current state. Empty when nothing
    /// changed.
    ///
    /// The client runs update scripts as an async function body, where only dynamic imports
    /// are valid, so the configured import style does not apply here.
    pub fn update_script(&self, previous: &Snapshot) -> String {
        let mut writer = ScriptWriter::new();
        self.render(&mut writer, Some(previous));
        let options = RenderOptions {
            import_style: ImportStyle::Dynamic,
            module_root: self.options.module_root.clone(),
        };
        writer.to_script(&options)
    }

    /// Invokes the handlers registered for `event_name` on the control with `control_id`.
    pub fn dispatch(&mut self, control_id: &str, event_name: &str) -> Result<()> {
        let key = self.find(control_id).ok_or_else(|| Error::ControlNotFound {
            event: event_name.to_string(),
            control_id: control_id.to_string(),
        })?;

        let unsupported = || Error::UnsupportedEvent {
            event: event_name.to_string(),
            control: self.describe(key),
        };
        let event: EventName = event_name.parse().map_err(|_| unsupported())?;
        let handlers = match (self.arena.node(key)?, event) {
            (ControlNode::Button(button), EventName::Click) => button.click_handlers().clone(),
            _ => return Err(unsupported()),
        };

        debug!(
            "dispatching {} to {} with {} handlers",
            event,
            control_id,
            handlers.len()
        );
        let args = EventArgs {
            source: key,
            control_id: control_id.to_string(),
            event,
        };
        for handler in handlers.iter() {
            handler
                .call(self, &args)
                .map_err(|source| Error::HandlerFailed {
                    event: event_name.to_string(),
                    control: self.describe(key),
                    source,
                })?;
        }
        Ok(())
    }

    /// One event cycle: snapshot, dispatch, then diff against the snapshot.
    pub fn process_event(&mut self, event: &UiEvent) -> Result<String> {
        let snapshot = self.snapshot();
        self.dispatch(&event.control_id, &event.event_name)?;
        let script = self.update_script(&snapshot);
        info!(
            "processed {} on {}, {} bytes of script",
            event.event_name,
            event.control_id,
            script.len()
        );
        Ok(script)
    }

    fn describe(&self, key: ControlKey) -> String {
        let id = self.arena.client_id(key).unwrap_or_default();
        match self.arena.get(key) {
            Some(node) => format!("{node}, Id: '{id}'"),
            None => format!("{key:?}"),
        }
    }
}

/// Keeps a container's arena bookkeeping in step with its collection.
pub(crate) struct Membership<'w> {
    arena: &'w mut ControlArena,
    ids: &'w mut IdGenerator,
    owner: ControlKey,
}

impl MembershipObserver for Membership<'_> {
    fn attached(&mut self, key: ControlKey) {
        self.arena.set_parent(key, Some(self.owner));
        if self.arena.client_id(key).is_none() {
            let id = self.ids.next_id();
            debug!("assigned id {} to {:?}", id, key);
            self.arena.set_client_id(key, id);
        }
        trace!("attached {:?} to {:?}", key, self.owner);
    }

    fn detached(&mut self, key: ControlKey) {
        self.arena.set_parent(key, None);
        trace!("detached {:?} from {:?}", key, self.owner);
    }
}
