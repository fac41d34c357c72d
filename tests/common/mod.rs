//! A minimal in-memory DOM that executes rendered commands, so tests can check that a
//! script really turns the previous page into the current one.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use gazeui::render::{DomCommand, NodeRef};
use gazeui::{Config, ControlKey, ControlNode, Window};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub tag: &'static str,
    pub id: String,
    pub text: String,
    pub clickable: bool,
    pub children: Vec<Shape>,
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: &'static str,
    text: String,
    clickable: bool,
    children: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeDom {
    pub title: Option<String>,
    body: Vec<String>,
    elements: HashMap<String, Element>,
}

impl FakeDom {
    /// Runs one script. Like the generated text, a select only queries the document the first
    /// time an id is bound.
    pub fn apply(&mut self, commands: &[DomCommand]) {
        let mut bound: HashSet<&str> = HashSet::new();
        for command in commands {
            match command {
                DomCommand::SetTitle(title) => self.title = Some(title.clone()),
                DomCommand::Create { id, tag } => {
                    assert!(!self.is_attached(id), "{id} created twice");
                    bound.insert(id);
                    self.elements.insert(
                        id.clone(),
                        Element {
                            tag: *tag,
                            ..Element::default()
                        },
                    );
                }
                DomCommand::Select(id) => {
                    if bound.insert(id) {
                        assert!(self.is_attached(id), "{id} selected while not in the document");
                    }
                }
                DomCommand::SetText { id, text } => self.element(id).text = text.clone(),
                DomCommand::AppendChild { parent, child } => {
                    self.detach(child);
                    self.children(parent).push(child.clone());
                }
                DomCommand::InsertBefore {
                    parent,
                    child,
                    reference,
                } => {
                    self.detach(child);
                    let children = self.children(parent);
                    let index = match reference {
                        Some(reference) => children
                            .iter()
                            .position(|id| id == reference)
                            .expect("reference node is a child of the parent"),
                        None => children.len(),
                    };
                    children.insert(index, child.clone());
                }
                DomCommand::Remove(id) => self.detach(id),
                DomCommand::AddListener { id, .. } => self.element(id).clickable = true,
                DomCommand::RemoveListener { id, .. } => self.element(id).clickable = false,
            }
        }
    }

    pub fn shape(&self) -> Vec<Shape> {
        self.body.iter().map(|id| self.element_shape(id)).collect()
    }

    fn element_shape(&self, id: &str) -> Shape {
        let element = &self.elements[id];
        Shape {
            tag: element.tag,
            id: id.to_string(),
            text: element.text.clone(),
            clickable: element.clickable,
            children: element
                .children
                .iter()
                .map(|child| self.element_shape(child))
                .collect(),
        }
    }

    fn element(&mut self, id: &str) -> &mut Element {
        self.elements
            .get_mut(id)
            .unwrap_or_else(|| panic!("no element {id}"))
    }

    fn children(&mut self, parent: &NodeRef) -> &mut Vec<String> {
        match parent {
            NodeRef::Body => &mut self.body,
            NodeRef::Control(id) => &mut self.element(id).children,
        }
    }

    fn detach(&mut self, id: &str) {
        self.body.retain(|child| child != id);
        for element in self.elements.values_mut() {
            element.children.retain(|child| child != id);
        }
    }

    fn is_attached(&self, id: &str) -> bool {
        let mut pending: Vec<&String> = self.body.iter().collect();
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if current == id {
                return true;
            }
            if seen.insert(current) {
                if let Some(element) = self.elements.get(current) {
                    pending.extend(element.children.iter());
                }
            }
        }
        false
    }
}

/// What the browser should show for the window's current tree.
pub fn window_shape(window: &Window) -> Vec<Shape> {
    children_shape(window, window.root())
}

fn children_shape(window: &Window, key: ControlKey) -> Vec<Shape> {
    window
        .children(key)
        .unwrap()
        .iter()
        .map(|&child| control_shape(window, child))
        .collect()
}

fn control_shape(window: &Window, key: ControlKey) -> Shape {
    let id = window.client_id(key).unwrap().to_string();
    match window.node(key).unwrap() {
        ControlNode::Label(label) => Shape {
            tag: "span",
            id,
            text: label.text().to_string(),
            clickable: false,
            children: Vec::new(),
        },
        ControlNode::Button(button) => Shape {
            tag: "button",
            id,
            text: button.text().to_string(),
            clickable: !button.click_handlers().is_empty(),
            children: Vec::new(),
        },
        ControlNode::Panel(_) => Shape {
            tag: "div",
            id,
            text: String::new(),
            clickable: false,
            children: children_shape(window, key),
        },
    }
}

pub fn window() -> Window {
    Window::new(&Config::default())
}

/// Names declared with `let` more than once in one script.
pub fn redeclared(script: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    script
        .lines()
        .filter_map(|line| line.strip_prefix("let "))
        .filter_map(|rest| rest.split(" =").next())
        .filter(|name| !seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}
