use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_NODE_RADIUS: f32 = 25.0;
pub const MIN_NODE_RADIUS: f32 = 4.0;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_pos2(p: egui::Pos2) -> Self {
        Self::new(p.x, p.y)
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_premultiplied(self.r, self.g, self.b, self.a)
    }
}

pub const DEFAULT_NODE_COLOR: Rgba = Rgba::rgb(40, 90, 200);

/// Opaque node identifier. Unique for the lifetime of the process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

/// Opaque edge identifier. Unique for the lifetime of the process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(String);

fn random_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl NodeId {
    pub fn generate() -> Self {
        Self(random_id())
    }
}

impl EdgeId {
    pub fn generate() -> Self {
        Self(random_id())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub pos: Point,
    pub label: String,
    pub radius: f32,
    pub color: Rgba,
}

impl Node {
    pub fn new(label: impl Into<String>, pos: Point) -> Self {
        Self {
            id: NodeId::generate(),
            pos,
            label: label.into(),
            radius: DEFAULT_NODE_RADIUS,
            color: DEFAULT_NODE_COLOR,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(MIN_NODE_RADIUS);
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub dashed: bool,
}

impl Edge {
    pub fn touches(&self, node: &NodeId) -> bool {
        self.start == *node || self.end == *node
    }
}

/// Labels assigned by the create tool cycle through `a..=z`.
pub fn alphabet_label(index: usize) -> String {
    char::from(b'a' + (index % 26) as u8).to_string()
}

pub fn distance_to_segment(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let ab_len2 = ab.x * ab.x + ab.y * ab.y;
    if ab_len2 <= f32::EPSILON {
        return (p - a).length();
    }
    let t = (ap.x * ab.x + ap.y * ab.y) / ab_len2;
    let t = t.clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_wrap_after_z() {
        assert_eq!(alphabet_label(0), "a");
        assert_eq!(alphabet_label(25), "z");
        assert_eq!(alphabet_label(26), "a");
        assert_eq!(alphabet_label(27), "b");
    }

    #[test]
    fn segment_distance_projects_inside_segment() {
        let d = distance_to_segment(
            egui::pos2(50.0, 10.0),
            egui::pos2(0.0, 0.0),
            egui::pos2(100.0, 0.0),
        );
        assert!((d - 10.0).abs() < 1e-5);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let d = distance_to_segment(
            egui::pos2(-30.0, 40.0),
            egui::pos2(0.0, 0.0),
            egui::pos2(100.0, 0.0),
        );
        assert!((d - 50.0).abs() < 1e-4);
        let d = distance_to_segment(
            egui::pos2(103.0, 4.0),
            egui::pos2(0.0, 0.0),
            egui::pos2(100.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_segment_is_point_distance() {
        let a = egui::pos2(10.0, 10.0);
        let d = distance_to_segment(egui::pos2(13.0, 14.0), a, a);
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
        assert!(!a.to_string().contains('-'));
    }

    #[test]
    fn radius_has_a_floor() {
        let n = Node::new("a", Point::default()).with_radius(0.0);
        assert_eq!(n.radius, MIN_NODE_RADIUS);
    }
}
