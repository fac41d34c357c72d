mod common;

use common::{FakeDom, redeclared, window, window_shape};
use gazeui::render::DomCommand;
use gazeui::{ControlKey, Label, Panel, RenderStats, ScriptWriter, Window};

fn labels(window: &mut Window, parent: ControlKey, texts: &[&str]) -> Vec<ControlKey> {
    texts
        .iter()
        .map(|text| window.append(parent, Label::new(*text)).unwrap())
        .collect()
}

fn diff(window: &Window, snapshot: &gazeui::Snapshot) -> (ScriptWriter, RenderStats) {
    let mut writer = ScriptWriter::new();
    let stats = window.render(&mut writer, Some(snapshot));
    (writer, stats)
}

#[test]
fn unchanged_children_take_the_fast_path() {
    let mut window = window();
    let root = window.root();
    labels(&mut window, root, &["a", "b", "c"]);
    let snapshot = window.snapshot();

    let (writer, stats) = diff(&window, &snapshot);
    assert!(writer.is_empty());
    assert_eq!(
        stats,
        RenderStats {
            fast_paths: 1,
            structural_diffs: 0
        }
    );
    assert_eq!(window.update_script(&snapshot), "");
}

#[test]
fn removed_child_gets_one_remove() {
    let mut window = window();
    let root = window.root();
    let keys = labels(&mut window, root, &["a", "b", "c"]);
    let snapshot = window.snapshot();

    window.remove_child(root, keys[0]).unwrap();
    assert_eq!(
        window.update_script(&snapshot),
        "let ctl01 = document.getElementById('ctl01');\n\
         ctl01.remove();\n"
    );
}

#[test]
fn swapped_children_move_the_one_outside_the_subsequence() {
    let mut window = window();
    let root = window.root();
    let keys = labels(&mut window, root, &["a", "b"]);
    let snapshot = window.snapshot();

    window.set_child(root, 0, keys[1]).unwrap();
    assert_eq!(window.children(root).unwrap(), &[keys[1], keys[0]]);

    let (writer, stats) = diff(&window, &snapshot);
    assert_eq!(stats.structural_diffs, 1);
    assert!(
        !writer
            .commands()
            .iter()
            .any(|command| matches!(command, DomCommand::Remove(_) | DomCommand::Create { .. }))
    );
    assert_eq!(
        window.update_script(&snapshot),
        "let ctl02 = document.getElementById('ctl02');\n\
         let ctl01 = document.getElementById('ctl01');\n\
         document.body.insertBefore(ctl02, ctl01);\n"
    );
}

#[test]
fn appended_child_is_created_and_placed_last() {
    let mut window = window();
    let root = window.root();
    labels(&mut window, root, &["a", "b"]);
    let snapshot = window.snapshot();

    window.append(root, Label::new("c")).unwrap();
    assert_eq!(
        window.update_script(&snapshot),
        "let ctl03 = document.createElement('span');\n\
         ctl03.id = 'ctl03';\n\
         ctl03.textContent = 'c';\n\
         document.body.insertBefore(ctl03, null);\n"
    );
}

#[test]
fn text_change_is_a_single_content_update() {
    let mut window = window();
    let root = window.root();
    let keys = labels(&mut window, root, &["old"]);
    let snapshot = window.snapshot();

    window.label_mut(keys[0]).unwrap().set_text("new");
    let (writer, stats) = diff(&window, &snapshot);
    assert_eq!(stats.structural_diffs, 0);
    let updates: Vec<_> = writer
        .commands()
        .iter()
        .filter(|command| matches!(command, DomCommand::SetText { .. }))
        .collect();
    assert_eq!(
        updates,
        [&DomCommand::SetText {
            id: String::from("ctl01"),
            text: String::from("new"),
        }]
    );
    assert_eq!(
        window.update_script(&snapshot),
        "let ctl01 = document.getElementById('ctl01');\n\
         ctl01.textContent = 'new';\n"
    );
}

#[test]
fn rendering_against_the_current_state_is_empty() {
    let mut window = window();
    let root = window.root();
    let keys = labels(&mut window, root, &["a", "b", "c"]);
    let snapshot = window.snapshot();
    window.remove_child(root, keys[1]).unwrap();
    window.label_mut(keys[2]).unwrap().set_text("z");
    assert!(!window.update_script(&snapshot).is_empty());

    let snapshot = window.snapshot();
    assert_eq!(window.update_script(&snapshot), "");
}

#[test]
fn removals_come_before_placements() {
    let mut window = window();
    let root = window.root();
    let keys = labels(&mut window, root, &["a", "b", "c", "d"]);
    let snapshot = window.snapshot();

    window.remove_child(root, keys[1]).unwrap();
    window.insert_child(root, 0, keys[3]).unwrap();
    window.append(root, Label::new("e")).unwrap();

    let (writer, _) = diff(&window, &snapshot);
    let commands = writer.commands();
    let last_remove = commands
        .iter()
        .rposition(|command| matches!(command, DomCommand::Remove(_)))
        .unwrap();
    let first_insert = commands
        .iter()
        .position(|command| matches!(command, DomCommand::InsertBefore { .. }))
        .unwrap();
    assert!(last_remove < first_insert);

    let removed: Vec<_> = commands
        .iter()
        .filter_map(|command| match command {
            DomCommand::Remove(id) => Some(id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(removed, ["ctl02"]);
}

#[test]
fn disjoint_children_remove_everything_in_previous_order() {
    let mut window = window();
    let root = window.root();
    labels(&mut window, root, &["a", "b", "c"]);
    let before = window.clone();
    let snapshot = window.snapshot();

    window.clear_children(root).unwrap();
    labels(&mut window, root, &["d", "e"]);

    let (writer, _) = diff(&window, &snapshot);
    let commands = writer.commands();
    let removed: Vec<_> = commands
        .iter()
        .filter_map(|command| match command {
            DomCommand::Remove(id) => Some(id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(removed, ["ctl01", "ctl02", "ctl03"]);

    // Every removal precedes the first creation
    let last_remove = commands
        .iter()
        .rposition(|command| matches!(command, DomCommand::Remove(_)))
        .unwrap();
    let first_create = commands
        .iter()
        .position(|command| matches!(command, DomCommand::Create { .. }))
        .unwrap();
    assert!(last_remove < first_create);

    assert_eq!(
        window.update_script(&snapshot),
        "let ctl01 = document.getElementById('ctl01');\n\
         ctl01.remove();\n\
         let ctl02 = document.getElementById('ctl02');\n\
         ctl02.remove();\n\
         let ctl03 = document.getElementById('ctl03');\n\
         ctl03.remove();\n\
         let ctl05 = document.createElement('span');\n\
         ctl05.id = 'ctl05';\n\
         ctl05.textContent = 'e';\n\
         document.body.insertBefore(ctl05, null);\n\
         let ctl04 = document.createElement('span');\n\
         ctl04.id = 'ctl04';\n\
         ctl04.textContent = 'd';\n\
         document.body.insertBefore(ctl04, ctl05);\n"
    );
    assert_eq!(replay(&before, &window, &snapshot).shape(), window_shape(&window));
}

#[test]
fn nested_container_diffs_independently() {
    let mut window = window();
    let root = window.root();
    let panel = window.append(root, Panel::new()).unwrap();
    let keys = labels(&mut window, panel, &["x", "y"]);
    let snapshot = window.snapshot();

    window.remove_child(panel, keys[0]).unwrap();
    window.append(panel, Label::new("z")).unwrap();

    let (_, stats) = diff(&window, &snapshot);
    assert_eq!(
        stats,
        RenderStats {
            fast_paths: 1,
            structural_diffs: 1
        }
    );
    assert_eq!(
        window.update_script(&snapshot),
        "let ctl02 = document.getElementById('ctl02');\n\
         ctl02.remove();\n\
         let ctl01 = document.getElementById('ctl01');\n\
         let ctl04 = document.createElement('span');\n\
         ctl04.id = 'ctl04';\n\
         ctl04.textContent = 'z';\n\
         ctl01.insertBefore(ctl04, null);\n"
    );
}

#[test]
fn a_container_that_only_updated_its_children_is_selected_before_use() {
    let mut window = window();
    let root = window.root();
    let panel = window.append(root, Panel::new()).unwrap();
    let sibling = window.append(root, Label::new("z")).unwrap();
    let inner = window.append(panel, Label::new("x")).unwrap();
    let snapshot = window.snapshot();

    window.remove_child(panel, inner).unwrap();
    window.set_child(root, 0, sibling).unwrap();
    assert_eq!(
        window.update_script(&snapshot),
        "let ctl03 = document.getElementById('ctl03');\n\
         ctl03.remove();\n\
         let ctl02 = document.getElementById('ctl02');\n\
         let ctl01 = document.getElementById('ctl01');\n\
         document.body.insertBefore(ctl02, ctl01);\n"
    );
}

#[test]
fn updated_and_moved_child_is_selected_once() {
    let mut window = window();
    let root = window.root();
    let keys = labels(&mut window, root, &["a", "b", "c"]);
    let snapshot = window.snapshot();

    window.insert_child(root, 0, keys[2]).unwrap();
    window.label_mut(keys[2]).unwrap().set_text("c!");
    let script = window.update_script(&snapshot);
    assert_eq!(redeclared(&script), Vec::<String>::new());
    assert_eq!(script.matches("getElementById('ctl03')").count(), 1);
    assert!(script.contains("ctl03.textContent = 'c!';\n"));
    assert!(script.contains("document.body.insertBefore(ctl03, ctl01);\n"));
}

#[test]
fn title_is_only_written_when_it_changes() {
    let mut window = window();
    window.initial_script();
    let snapshot = window.snapshot();
    assert_eq!(window.update_script(&snapshot), "");

    window.set_title("Renamed").unwrap();
    assert_eq!(
        window.update_script(&snapshot),
        "document.title = 'Renamed';\n"
    );
}

#[test]
fn initial_script_builds_the_whole_tree() {
    let mut window = window();
    let root = window.root();
    let panel = window.append(root, Panel::new()).unwrap();
    window.append(panel, Label::new("it's <b>")).unwrap();

    assert_eq!(
        window.initial_script(),
        "document.title = 'GazeUI';\n\
         let ctl01 = document.createElement('div');\n\
         ctl01.id = 'ctl01';\n\
         let ctl02 = document.createElement('span');\n\
         ctl02.id = 'ctl02';\n\
         ctl02.textContent = 'it\\'s \\x3Cb>';\n\
         ctl01.appendChild(ctl02);\n\
         document.body.appendChild(ctl01);\n"
    );
}

/// Builds the page `before` described, then applies the diff from `snapshot` to `window`.
fn replay(before: &Window, window: &Window, snapshot: &gazeui::Snapshot) -> FakeDom {
    let mut dom = FakeDom::default();
    let mut writer = ScriptWriter::new();
    before.render(&mut writer, None);
    dom.apply(writer.commands());
    let (writer, _) = diff(window, snapshot);
    dom.apply(writer.commands());
    dom
}

#[test]
fn moving_into_an_earlier_container_keeps_the_element() {
    let mut window = window();
    let root = window.root();
    let first = window.append(root, Panel::new()).unwrap();
    let second = window.append(root, Panel::new()).unwrap();
    let moved = window.append(second, Label::new("x")).unwrap();
    let before = window.clone();
    let snapshot = window.snapshot();

    window.add_child(first, moved).unwrap();
    assert_eq!(window.parent(moved), Some(first));

    let dom = replay(&before, &window, &snapshot);
    assert_eq!(dom.shape(), window_shape(&window));

    assert_eq!(
        window.update_script(&snapshot),
        "let ctl03 = document.getElementById('ctl03');\n\
         let ctl01 = document.getElementById('ctl01');\n\
         ctl01.insertBefore(ctl03, null);\n"
    );
}

#[test]
fn moving_out_of_a_removed_container_binds_first() {
    let mut window = window();
    let root = window.root();
    let doomed = window.append(root, Panel::new()).unwrap();
    let kept = window.append(doomed, Panel::new()).unwrap();
    let dropped = window.append(kept, Label::new("y")).unwrap();
    let target = window.append(root, Panel::new()).unwrap();
    let before = window.clone();
    let snapshot = window.snapshot();

    window.remove_child(kept, dropped).unwrap();
    window.add_child(target, kept).unwrap();
    window.remove_child(root, doomed).unwrap();

    let dom = replay(&before, &window, &snapshot);
    assert_eq!(dom.shape(), window_shape(&window));

    assert_eq!(
        window.update_script(&snapshot),
        "let ctl02 = document.getElementById('ctl02');\n\
         let ctl03 = document.getElementById('ctl03');\n\
         let ctl01 = document.getElementById('ctl01');\n\
         ctl01.remove();\n\
         ctl03.remove();\n\
         let ctl04 = document.getElementById('ctl04');\n\
         ctl04.insertBefore(ctl02, null);\n"
    );
}

#[test]
fn moved_control_carries_its_content_changes() {
    let mut window = window();
    let root = window.root();
    let list = window.append(root, Panel::new()).unwrap();
    let moved = window.append(list, Label::new("old")).unwrap();
    let before = window.clone();
    let snapshot = window.snapshot();

    window.add_child(root, moved).unwrap();
    window.label_mut(moved).unwrap().set_text("new");

    let dom = replay(&before, &window, &snapshot);
    assert_eq!(dom.shape(), window_shape(&window));

    let script = window.update_script(&snapshot);
    assert!(!script.contains("createElement"));
    assert!(!script.contains("remove()"));
    assert!(script.contains("ctl02.textContent = 'new';\n"));
}

/// Deterministic pseudo random numbers for the scripted mutation run.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

#[test]
fn scripts_reproduce_every_mutation_sequence() {
    let mut window = window();
    let root = window.root();
    let inner = window.append(root, Panel::new()).unwrap();
    labels(&mut window, root, &["a", "b", "c"]);
    labels(&mut window, inner, &["x", "y"]);

    let mut dom = FakeDom::default();
    let mut writer = ScriptWriter::new();
    window.render(&mut writer, None);
    dom.apply(writer.commands());
    assert_eq!(dom.shape(), window_shape(&window));

    let mut rng = Lcg(7);
    let mut created = 0;
    for cycle in 0..300 {
        let snapshot = window.snapshot();
        for _ in 0..=rng.below(3) {
            let parent = if rng.below(3) == 0 { inner } else { root };
            let children = window.children(parent).unwrap().to_vec();
            match rng.below(6) {
                0 => {
                    created += 1;
                    let key = window.create(Label::new(format!("new {created}")));
                    let index = rng.below(children.len() + 1);
                    window.insert_child(parent, index, key).unwrap();
                }
                1 if !children.is_empty() => {
                    let victim = children[rng.below(children.len())];
                    if victim != inner {
                        window.remove_child(parent, victim).unwrap();
                    }
                }
                2 if !children.is_empty() => {
                    let moved = children[rng.below(children.len())];
                    let index = rng.below(children.len());
                    window.insert_child(parent, index, moved).unwrap();
                }
                3 if !children.is_empty() => {
                    let target = children[rng.below(children.len())];
                    if let Ok(label) = window.label_mut(target) {
                        label.set_text(format!("edit {cycle}"));
                    }
                }
                5 if !children.is_empty() => {
                    let other = if parent == inner { root } else { inner };
                    let moved = children[rng.below(children.len())];
                    if moved != inner {
                        let len = window.children(other).unwrap().len();
                        window.insert_child(other, rng.below(len + 1), moved).unwrap();
                    }
                }
                4 => {
                    let mut reversed = children;
                    reversed.reverse();
                    window.clear_children(parent).unwrap();
                    window.extend_children(parent, reversed).unwrap();
                }
                _ => {}
            }
        }

        let mut writer = ScriptWriter::new();
        window.render(&mut writer, Some(&snapshot));
        dom.apply(writer.commands());
        assert_eq!(dom.shape(), window_shape(&window), "cycle {cycle}");

        let script = window.update_script(&snapshot);
        assert_eq!(redeclared(&script), Vec::<String>::new(), "cycle {cycle}");
    }
}
