use eframe::egui;

use crate::model::{self, Edge, EdgeId, Node, NodeId};
use crate::scene::Scene;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    Node(NodeId),
    Edge(EdgeId),
}

/// Topmost node whose circle contains `logical`.
pub fn node_at(scene: &Scene, logical: egui::Pos2) -> Option<&Node> {
    scene
        .nodes()
        .rev()
        .find(|n| (logical - n.pos.to_pos2()).length() <= n.radius)
}

/// Topmost edge strictly closer than `threshold` logical units to `logical`.
pub fn edge_at(scene: &Scene, logical: egui::Pos2, threshold: f32) -> Option<&Edge> {
    scene.edges().rev().find(|e| {
        scene.edge_endpoints(e).is_some_and(|(a, b)| {
            model::distance_to_segment(logical, a.to_pos2(), b.to_pos2()) < threshold
        })
    })
}

/// Nodes take priority over edges.
pub fn hit(scene: &Scene, logical: egui::Pos2, threshold: f32) -> Option<Hit> {
    if let Some(node) = node_at(scene, logical) {
        return Some(Hit::Node(node.id.clone()));
    }
    edge_at(scene, logical, threshold).map(|e| Hit::Edge(e.id.clone()))
}

pub fn snap_to_grid(p: egui::Pos2, grid: f32) -> egui::Pos2 {
    if grid <= 0.0 || !grid.is_finite() {
        return p;
    }
    egui::pos2((p.x / grid).round() * grid, (p.y / grid).round() * grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn most_recent_node_wins_overlap() {
        let mut scene = Scene::new();
        let _a = scene.add_node(Node::new("a", Point::new(0.0, 0.0)));
        let b = scene.add_node(Node::new("b", Point::new(20.0, 0.0)));
        let hit = node_at(&scene, egui::pos2(10.0, 0.0)).map(|n| n.id.clone());
        assert_eq!(hit, Some(b));
    }

    #[test]
    fn node_boundary_is_inclusive() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::new("a", Point::new(0.0, 0.0)));
        assert_eq!(node_at(&scene, egui::pos2(25.0, 0.0)).map(|n| n.id.clone()), Some(a));
        assert!(node_at(&scene, egui::pos2(25.5, 0.0)).is_none());
    }

    #[test]
    fn edges_hit_only_within_threshold() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::new("a", Point::new(0.0, 0.0)));
        let b = scene.add_node(Node::new("b", Point::new(200.0, 0.0)));
        let e = scene.add_edge(&a, &b, false).unwrap();
        assert_eq!(hit(&scene, egui::pos2(100.0, 4.0), 5.0), Some(Hit::Edge(e)));
        assert_eq!(hit(&scene, egui::pos2(100.0, 5.0), 5.0), None);
        assert_eq!(hit(&scene, egui::pos2(100.0, 20.0), 5.0), None);
    }

    #[test]
    fn nodes_shadow_edges() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::new("a", Point::new(0.0, 0.0)));
        let b = scene.add_node(Node::new("b", Point::new(200.0, 0.0)));
        scene.add_edge(&a, &b, false).unwrap();
        assert_eq!(hit(&scene, egui::pos2(10.0, 0.0), 5.0), Some(Hit::Node(a)));
    }

    #[test]
    fn snapping_rounds_to_nearest_multiple() {
        assert_eq!(snap_to_grid(egui::pos2(30.0, 30.0), 50.0), egui::pos2(50.0, 50.0));
        assert_eq!(snap_to_grid(egui::pos2(24.0, -26.0), 50.0), egui::pos2(0.0, -50.0));
        assert_eq!(snap_to_grid(egui::pos2(7.0, 8.0), 0.0), egui::pos2(7.0, 8.0));
    }
}
