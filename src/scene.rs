//! The editable diagram: nodes, edges, and the painted sets.
//!
//! Insertion order is z-order. Later nodes and edges are drawn on top and win
//! hit tests. Collections are persistent (`im`), so cloning a scene for the
//! history ledger shares structure with the live copy.

use std::collections::BTreeSet;

use crate::model::{Edge, EdgeId, MIN_NODE_RADIUS, Node, NodeId, Point, Rgba};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    nodes: im::Vector<Node>,
    edges: im::Vector<Edge>,
    painted_nodes: im::HashSet<NodeId>,
    painted_edges: im::HashSet<EdgeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == *id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn is_node_painted(&self, id: &NodeId) -> bool {
        self.painted_nodes.contains(id)
    }

    pub fn is_edge_painted(&self, id: &EdgeId) -> bool {
        self.painted_edges.contains(id)
    }

    /// Logical positions of the edge's start and end nodes.
    pub fn edge_endpoints(&self, edge: &Edge) -> Option<(Point, Point)> {
        let a = self.node(&edge.start)?;
        let b = self.node(&edge.end)?;
        Some((a.pos, b.pos))
    }

    /// Labels of every node sharing an edge with `id`, in either direction.
    pub fn neighbor_labels(&self, id: &NodeId) -> BTreeSet<String> {
        self.edges
            .iter()
            .filter_map(|e| {
                if e.start == *id {
                    Some(&e.end)
                } else if e.end == *id {
                    Some(&e.start)
                } else {
                    None
                }
            })
            .filter_map(|other| self.node(other).map(|n| n.label.clone()))
            .collect()
    }

    fn node_index(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == *id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let idx = self.node_index(id)?;
        self.nodes.get_mut(idx)
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.nodes.push_back(node);
        id
    }

    /// Removes the node together with every edge that touches it.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        let Some(idx) = self.node_index(id) else {
            return false;
        };
        self.nodes.remove(idx);
        self.painted_nodes.remove(id);
        let dropped: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| e.touches(id))
            .map(|e| e.id.clone())
            .collect();
        self.edges.retain(|e| !e.touches(id));
        for edge_id in &dropped {
            self.painted_edges.remove(edge_id);
        }
        true
    }

    /// Self-loops and edges to unknown nodes are refused. Parallel edges are allowed.
    pub fn add_edge(&mut self, start: &NodeId, end: &NodeId, dashed: bool) -> Option<EdgeId> {
        if start == end || !self.contains_node(start) || !self.contains_node(end) {
            return None;
        }
        let id = EdgeId::generate();
        self.edges.push_back(Edge {
            id: id.clone(),
            start: start.clone(),
            end: end.clone(),
            dashed,
        });
        Some(id)
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> bool {
        let Some(idx) = self.edges.iter().position(|e| e.id == *id) else {
            return false;
        };
        self.edges.remove(idx);
        self.painted_edges.remove(id);
        true
    }

    pub fn update_node_position(&mut self, id: &NodeId, pos: Point) -> bool {
        match self.node_mut(id) {
            Some(node) if node.pos != pos => {
                node.pos = pos;
                true
            }
            _ => false,
        }
    }

    pub fn set_node_label(&mut self, id: &NodeId, label: &str) -> bool {
        match self.node_mut(id) {
            Some(node) if node.label != label => {
                node.label = label.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_node_color(&mut self, id: &NodeId, color: Rgba) -> bool {
        match self.node_mut(id) {
            Some(node) if node.color != color => {
                node.color = color;
                true
            }
            _ => false,
        }
    }

    pub fn set_node_radius(&mut self, id: &NodeId, radius: f32) -> bool {
        if !radius.is_finite() {
            return false;
        }
        let radius = radius.max(MIN_NODE_RADIUS);
        match self.node_mut(id) {
            Some(node) if node.radius != radius => {
                node.radius = radius;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_node_paint(&mut self, id: &NodeId) -> bool {
        if !self.contains_node(id) {
            return false;
        }
        if self.painted_nodes.remove(id).is_none() {
            self.painted_nodes.insert(id.clone());
        }
        true
    }

    pub fn toggle_edge_paint(&mut self, id: &EdgeId) -> bool {
        if self.edge(id).is_none() {
            return false;
        }
        if self.painted_edges.remove(id).is_none() {
            self.painted_edges.insert(id.clone());
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
