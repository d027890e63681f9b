//! The editing session: tool dispatch over the scene, view and history.
//!
//! Every handler is total. Misses, self-connections and undo at the start of
//! history are silent no-ops. Each discrete change commits exactly one history
//! entry; in-flight drags and live edits commit when they finish.

use eframe::egui;
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

use crate::model::{self, DEFAULT_NODE_COLOR, DEFAULT_NODE_RADIUS, Node, NodeId, Point, Rgba};
use crate::scene::Scene;

use super::history::{DEFAULT_HISTORY_LIMIT, History};
use super::hit_test::{self, Hit};
use super::tool::Tool;
use super::viewport::{DEFAULT_ZOOM_MAX, DEFAULT_ZOOM_MIN, Viewport};

/// A press released within this many screen pixels of where it started is a click.
pub const CLICK_SLOP: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceOptions {
    pub snap_to_grid: bool,
    pub grid_size: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub zoom_step: f32,
    pub node_radius: f32,
    pub node_color: Rgba,
    /// Edge pick tolerance in screen pixels.
    pub edge_hit_px: f32,
    pub history_limit: usize,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: 50.0,
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            zoom_step: 0.1,
            node_radius: DEFAULT_NODE_RADIUS,
            node_color: DEFAULT_NODE_COLOR,
            edge_hit_px: 5.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    Escape,
    DeleteSelected,
    SelectTool(Tool),
}

#[derive(Clone, Debug)]
enum Gesture {
    Pan {
        button: egui::PointerButton,
        start_screen: egui::Pos2,
        start_pan: egui::Vec2,
    },
    DragNode {
        id: NodeId,
        start_screen: egui::Pos2,
        start_pos: egui::Pos2,
    },
    Click {
        start_screen: egui::Pos2,
        logical: egui::Pos2,
    },
}

impl Gesture {
    fn button(&self) -> egui::PointerButton {
        match self {
            Gesture::Pan { button, .. } => *button,
            Gesture::DragNode { .. } | Gesture::Click { .. } => egui::PointerButton::Primary,
        }
    }

    fn start_screen(&self) -> egui::Pos2 {
        match self {
            Gesture::Pan { start_screen, .. }
            | Gesture::DragNode { start_screen, .. }
            | Gesture::Click { start_screen, .. } => *start_screen,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectedInfo {
    pub label: String,
    pub position: Point,
    pub neighbors: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Status {
    pub node_count: usize,
    pub edge_count: usize,
    pub zoom: f32,
    pub tool: Tool,
    pub snap_to_grid: bool,
    pub selected: Option<SelectedInfo>,
}

pub struct Surface {
    scene: Scene,
    view: Viewport,
    tool: Tool,
    tool_before_pan: Option<Tool>,
    selected: Option<NodeId>,
    hovered: Option<NodeId>,
    connect_start: Option<NodeId>,
    gesture: Option<Gesture>,
    last_pointer: Option<egui::Pos2>,
    history: History,
    options: SurfaceOptions,
    clear_pending: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SurfaceOptions::default())
    }
}

impl Surface {
    pub fn new(options: SurfaceOptions) -> Self {
        let scene = Scene::new();
        Self {
            history: History::new(scene.clone(), options.history_limit),
            scene,
            view: Viewport::new(options.zoom_min, options.zoom_max),
            tool: Tool::default(),
            tool_before_pan: None,
            selected: None,
            hovered: None,
            connect_start: None,
            gesture: None,
            last_pointer: None,
            options,
            clear_pending: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut Viewport {
        &mut self.view
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_ref().and_then(|id| self.scene.node(id))
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    pub fn connect_start(&self) -> Option<&NodeId> {
        self.connect_start.as_ref()
    }

    pub fn last_pointer(&self) -> Option<egui::Pos2> {
        self.last_pointer
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Some(Gesture::Pan { .. }))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_clear_pending(&self) -> bool {
        self.clear_pending
    }

    /// Pick tolerance for edges in logical units; constant on screen at any zoom.
    pub fn edge_threshold(&self) -> f32 {
        self.options.edge_hit_px / self.view.zoom()
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.options.snap_to_grid = enabled;
    }

    pub fn set_grid_size(&mut self, grid_size: f32) {
        if grid_size > 0.0 && grid_size.is_finite() {
            self.options.grid_size = grid_size;
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.settle();
        self.tool_before_pan = None;
        self.tool = tool;
        self.selected = None;
        self.hovered = None;
        self.connect_start = None;
        debug!(tool = tool.label(), "tool selected");
    }

    pub fn key(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
            KeyCommand::Escape => {
                self.selected = None;
                self.connect_start = None;
                self.clear_pending = false;
            }
            KeyCommand::DeleteSelected => self.delete_selected(),
            KeyCommand::SelectTool(tool) => self.set_tool(tool),
        }
    }

    pub fn pointer_down(&mut self, screen: egui::Pos2, button: egui::PointerButton) {
        self.last_pointer = Some(screen);
        if self.gesture.is_some() {
            return;
        }
        // A live inspector edit gets its own history entry.
        self.commit_if_changed("edit node");
        match button {
            egui::PointerButton::Primary => {}
            egui::PointerButton::Middle => {
                self.tool_before_pan = Some(self.tool);
                self.tool = Tool::Pan;
                self.begin_pan(button, screen);
                return;
            }
            _ => return,
        }

        let logical = self.view.to_logical(screen);
        trace!(x = logical.x, y = logical.y, tool = self.tool.label(), "pointer down");
        match self.tool {
            Tool::Pan => self.begin_pan(button, screen),
            Tool::Create => {
                self.gesture = Some(Gesture::Click {
                    start_screen: screen,
                    logical,
                })
            }
            Tool::Select => {
                let picked = hit_test::node_at(&self.scene, logical).map(|n| (n.id.clone(), n.pos));
                if let Some((id, pos)) = picked {
                    self.selected = Some(id.clone());
                    self.gesture = Some(Gesture::DragNode {
                        id,
                        start_screen: screen,
                        start_pos: pos.to_pos2(),
                    });
                } else {
                    self.selected = None;
                    self.begin_pan(button, screen);
                }
            }
            Tool::Connect | Tool::ConnectDashed => self.connect_at(logical),
            Tool::Delete => self.delete_at(logical),
            Tool::Paint => self.paint_at(logical),
        }
    }

    pub fn pointer_move(&mut self, screen: egui::Pos2) {
        self.last_pointer = Some(screen);
        match self.gesture.clone() {
            Some(Gesture::Pan {
                start_screen,
                start_pan,
                ..
            }) => self.view.pan_from(start_pan, start_screen, screen),
            Some(Gesture::DragNode {
                id,
                start_screen,
                start_pos,
            }) => {
                let target = self.drag_target(start_pos, start_screen, screen);
                self.scene.update_node_position(&id, Point::from_pos2(target));
            }
            Some(Gesture::Click { .. }) => {}
            None => {
                let logical = self.view.to_logical(screen);
                self.hovered = hit_test::node_at(&self.scene, logical).map(|n| n.id.clone());
            }
        }
    }

    pub fn pointer_up(&mut self, screen: egui::Pos2, button: egui::PointerButton) {
        self.last_pointer = Some(screen);
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if gesture.button() != button {
            self.gesture = Some(gesture);
            return;
        }
        self.finish_gesture(gesture, screen);
    }

    /// The pointer left the canvas: finish what it was doing where it was last seen.
    pub fn pointer_leave(&mut self) {
        self.hovered = None;
        self.finish_pending_gesture();
    }

    pub fn wheel(&mut self, screen: egui::Pos2, delta: f32) {
        let before = self.view.zoom();
        self.view.zoom_step_at(screen, delta, self.options.zoom_step);
        if self.view.zoom() != before {
            self.rebase_gesture();
        }
    }

    pub fn undo(&mut self) {
        self.settle();
        let Some(scene) = self.history.undo() else {
            return;
        };
        self.scene = scene.clone();
        self.prune_stale_refs();
        debug!(index = self.history.index(), "undo");
    }

    pub fn redo(&mut self) {
        self.settle();
        let Some(scene) = self.history.redo() else {
            return;
        };
        self.scene = scene.clone();
        self.prune_stale_refs();
        debug!(index = self.history.index(), "redo");
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        self.settle();
        if self.scene.remove_node(&id) {
            self.forget_node(&id);
            self.commit("delete node");
        }
    }

    /// Live label edit; call [`Surface::finish_edit`] once the edit is done.
    pub fn set_selected_label(&mut self, label: &str) {
        if let Some(id) = self.selected.clone() {
            self.scene.set_node_label(&id, label);
        }
    }

    /// Live radius edit; call [`Surface::finish_edit`] once the edit is done.
    pub fn set_selected_radius(&mut self, radius: f32) {
        if let Some(id) = self.selected.clone() {
            self.scene.set_node_radius(&id, radius);
        }
    }

    pub fn finish_edit(&mut self) {
        self.commit_if_changed("edit node");
    }

    pub fn set_selected_color(&mut self, color: Rgba) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        self.settle();
        if self.scene.set_node_color(&id, color) {
            self.commit("recolor node");
        }
    }

    pub fn request_clear(&mut self) {
        self.clear_pending = true;
    }

    pub fn cancel_clear(&mut self) {
        self.clear_pending = false;
    }

    /// Empties the canvas. Recorded as a history entry, so it can be undone.
    pub fn confirm_clear(&mut self) {
        if !self.clear_pending {
            return;
        }
        self.clear_pending = false;
        self.settle();
        let (nodes, edges) = (self.scene.node_count(), self.scene.edge_count());
        self.scene.clear();
        self.selected = None;
        self.hovered = None;
        self.connect_start = None;
        self.commit("clear all");
        info!(nodes, edges, "canvas cleared");
    }

    pub fn status(&self) -> Status {
        let selected = self.selected_node().map(|node| SelectedInfo {
            label: node.label.clone(),
            position: node.pos,
            neighbors: self.scene.neighbor_labels(&node.id),
        });
        Status {
            node_count: self.scene.node_count(),
            edge_count: self.scene.edge_count(),
            zoom: self.view.zoom(),
            tool: self.tool,
            snap_to_grid: self.options.snap_to_grid,
            selected,
        }
    }

    fn begin_pan(&mut self, button: egui::PointerButton, screen: egui::Pos2) {
        self.gesture = Some(Gesture::Pan {
            button,
            start_screen: screen,
            start_pan: self.view.pan,
        });
    }

    fn snap(&self, logical: egui::Pos2) -> egui::Pos2 {
        if self.options.snap_to_grid {
            hit_test::snap_to_grid(logical, self.options.grid_size)
        } else {
            logical
        }
    }

    fn drag_target(
        &self,
        start_pos: egui::Pos2,
        start_screen: egui::Pos2,
        current: egui::Pos2,
    ) -> egui::Pos2 {
        self.snap(start_pos + (current - start_screen) / self.view.zoom())
    }

    fn finish_gesture(&mut self, gesture: Gesture, screen: egui::Pos2) {
        match gesture {
            Gesture::Pan {
                button,
                start_screen,
                start_pan,
            } => {
                self.view.pan_from(start_pan, start_screen, screen);
                if button == egui::PointerButton::Middle {
                    self.tool = self.tool_before_pan.take().unwrap_or(Tool::Select);
                }
            }
            Gesture::DragNode {
                id,
                start_screen,
                start_pos,
            } => {
                let target = self.drag_target(start_pos, start_screen, screen);
                self.scene.update_node_position(&id, Point::from_pos2(target));
                self.commit_if_changed("move node");
            }
            Gesture::Click {
                start_screen,
                logical,
            } => {
                if (screen - start_screen).length() <= CLICK_SLOP {
                    self.create_node_at(logical);
                }
            }
        }
    }

    fn finish_pending_gesture(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if let Gesture::Click { .. } = gesture {
            return;
        }
        let at = self.last_pointer.unwrap_or_else(|| gesture.start_screen());
        self.finish_gesture(gesture, at);
    }

    /// Finishes any gesture and commits any live edit.
    fn settle(&mut self) {
        self.finish_pending_gesture();
        self.commit_if_changed("edit node");
    }

    /// Restart the in-flight gesture from the current pointer after the zoom changed.
    fn rebase_gesture(&mut self) {
        let Some(pointer) = self.last_pointer else {
            return;
        };
        match &mut self.gesture {
            Some(Gesture::Pan {
                start_screen,
                start_pan,
                ..
            }) => {
                *start_screen = pointer;
                *start_pan = self.view.pan;
            }
            Some(Gesture::DragNode {
                id,
                start_screen,
                start_pos,
            }) => {
                if let Some(node) = self.scene.node(id) {
                    *start_pos = node.pos.to_pos2();
                    *start_screen = pointer;
                }
            }
            Some(Gesture::Click { .. }) | None => {}
        }
    }

    fn create_node_at(&mut self, logical: egui::Pos2) {
        let logical = self.snap(logical);
        let label = model::alphabet_label(self.scene.node_count());
        let node = Node::new(label, Point::from_pos2(logical))
            .with_radius(self.options.node_radius)
            .with_color(self.options.node_color);
        let id = self.scene.add_node(node);
        trace!(%id, x = logical.x, y = logical.y, "node created");
        self.commit("create node");
    }

    fn connect_at(&mut self, logical: egui::Pos2) {
        let target = hit_test::node_at(&self.scene, logical).map(|n| n.id.clone());
        match (self.connect_start.take(), target) {
            (None, Some(target)) => self.connect_start = Some(target),
            (Some(start), Some(end)) if start != end => {
                let dashed = self.tool == Tool::ConnectDashed;
                if self.scene.add_edge(&start, &end, dashed).is_some() {
                    self.commit("connect");
                }
            }
            // Same node again or empty space cancels the pending start.
            _ => {}
        }
    }

    fn delete_at(&mut self, logical: egui::Pos2) {
        match hit_test::hit(&self.scene, logical, self.edge_threshold()) {
            Some(Hit::Node(id)) => {
                if self.scene.remove_node(&id) {
                    self.forget_node(&id);
                    self.commit("delete node");
                }
            }
            Some(Hit::Edge(id)) => {
                if self.scene.remove_edge(&id) {
                    self.commit("delete edge");
                }
            }
            None => {}
        }
    }

    fn paint_at(&mut self, logical: egui::Pos2) {
        let changed = match hit_test::hit(&self.scene, logical, self.edge_threshold()) {
            Some(Hit::Node(id)) => self.scene.toggle_node_paint(&id),
            Some(Hit::Edge(id)) => self.scene.toggle_edge_paint(&id),
            None => false,
        };
        if changed {
            self.commit("paint");
        }
    }

    fn forget_node(&mut self, id: &NodeId) {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.hovered.as_ref() == Some(id) {
            self.hovered = None;
        }
        if self.connect_start.as_ref() == Some(id) {
            self.connect_start = None;
        }
    }

    fn prune_stale_refs(&mut self) {
        let scene = &self.scene;
        for slot in [&mut self.selected, &mut self.hovered, &mut self.connect_start] {
            if slot.as_ref().is_some_and(|id| !scene.contains_node(id)) {
                *slot = None;
            }
        }
    }

    fn commit(&mut self, action: &str) {
        self.history.commit(&self.scene);
        debug!(
            action,
            index = self.history.index(),
            len = self.history.len(),
            nodes = self.scene.node_count(),
            edges = self.scene.edge_count(),
            "commit"
        );
    }

    fn commit_if_changed(&mut self, action: &str) {
        if self.scene != *self.history.current() {
            self.commit(action);
        }
    }
}
