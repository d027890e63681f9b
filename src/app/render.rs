use crate::model;
use eframe::egui;

use super::surface::Surface;
use super::tool::Tool;
use super::viewport::Viewport;

const EDGE_COLOR: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);
const PAINT_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 40);
const SELECT_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 160, 255);
const HOVER_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
const PENDING_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 160, 80);

pub(super) const NODE_COLOR_PRESETS: [model::Rgba; 6] = [
    model::Rgba::rgb(20, 20, 20),
    model::Rgba::rgb(200, 40, 40),
    model::Rgba::rgb(40, 140, 60),
    model::Rgba::rgb(40, 90, 200),
    model::Rgba::rgb(200, 140, 40),
    model::Rgba::rgb(130, 60, 180),
];

pub(super) fn tool_button(ui: &mut egui::Ui, tool: Tool, active: Tool) -> bool {
    ui.selectable_label(active == tool, tool.label())
        .on_hover_text(format!("{} ({})", tool.label(), tool.shortcut()))
        .clicked()
}

/// Returns the preset the user clicked, if any.
pub(super) fn color_row(ui: &mut egui::Ui, current: model::Rgba) -> Option<model::Rgba> {
    let mut picked = None;
    ui.horizontal(|ui| {
        for c in NODE_COLOR_PRESETS {
            let mut button = egui::Button::new("").fill(c.to_color32());
            if c == current {
                button = button.stroke(egui::Stroke::new(2.0, SELECT_COLOR));
            }
            if ui.add_sized([18.0, 18.0], button).clicked() {
                picked = Some(c);
            }
        }
    });
    picked
}

pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect, view: &Viewport, grid: f32) {
    let bg = painter.ctx().style().visuals.extreme_bg_color;
    painter.rect_filled(rect, 0.0, bg);
    for shape in grid_shapes(rect, view, grid) {
        painter.add(shape);
    }
}

fn grid_shapes(rect: egui::Rect, view: &Viewport, grid: f32) -> Vec<egui::Shape> {
    let mut shapes = Vec::new();
    let spacing_screen = grid * view.zoom();
    if spacing_screen < 12.0 || !spacing_screen.is_finite() {
        return shapes;
    }
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(60));
    let start = rect.min + view.pan;
    let x0 = ((rect.min.x - start.x) / spacing_screen).floor() * spacing_screen + start.x;
    let y0 = ((rect.min.y - start.y) / spacing_screen).floor() * spacing_screen + start.y;
    let mut x = x0;
    while x < rect.max.x {
        shapes.push(egui::Shape::line_segment(
            [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
            stroke,
        ));
        x += spacing_screen;
    }
    let mut y = y0;
    while y < rect.max.y {
        shapes.push(egui::Shape::line_segment(
            [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)],
            stroke,
        ));
        y += spacing_screen;
    }
    shapes
}

/// Scene geometry in paint order, offset by the canvas origin. Labels are not included.
pub(super) fn scene_shapes(origin: egui::Pos2, surface: &Surface) -> Vec<egui::Shape> {
    let view = surface.view();
    let scene = surface.scene();
    let to_screen = |p: model::Point| origin + view.to_screen(p.to_pos2()).to_vec2();
    let mut shapes = Vec::new();

    for edge in scene.edges() {
        let Some((a, b)) = scene.edge_endpoints(edge) else {
            continue;
        };
        let color = if scene.is_edge_painted(&edge.id) {
            PAINT_COLOR
        } else {
            EDGE_COLOR
        };
        let stroke = egui::Stroke::new(2.0 * view.zoom(), color);
        let (a, b) = (to_screen(a), to_screen(b));
        if edge.dashed {
            push_dashed_line(&mut shapes, a, b, stroke, 10.0 * view.zoom(), 5.0 * view.zoom());
        } else {
            shapes.push(egui::Shape::line_segment([a, b], stroke));
        }
    }

    if let (Some(start), Some(pointer)) = (surface.connect_start(), surface.last_pointer()) {
        if let Some(node) = scene.node(start) {
            let stroke = egui::Stroke::new(1.5, PENDING_COLOR);
            push_dashed_line(&mut shapes, to_screen(node.pos), origin + pointer.to_vec2(), stroke, 6.0, 4.0);
        }
    }

    for node in scene.nodes() {
        let center = to_screen(node.pos);
        let radius = node.radius * view.zoom();
        let color = node.color.to_color32();
        if scene.is_node_painted(&node.id) {
            shapes.push(egui::Shape::circle_filled(center, radius, color));
        } else {
            shapes.push(egui::Shape::circle_filled(center, radius, egui::Color32::WHITE));
        }
        shapes.push(egui::Shape::circle_stroke(
            center,
            radius,
            egui::Stroke::new(2.0 * view.zoom(), color),
        ));

        let highlight = if surface.connect_start() == Some(&node.id) {
            Some(PENDING_COLOR)
        } else if surface.selected() == Some(&node.id) {
            Some(SELECT_COLOR)
        } else if surface.hovered() == Some(&node.id) {
            Some(HOVER_COLOR)
        } else {
            None
        };
        if let Some(c) = highlight {
            shapes.push(egui::Shape::circle_stroke(
                center,
                radius + 4.0,
                egui::Stroke::new(2.0, c),
            ));
        }
    }
    shapes
}

pub(super) fn draw_scene(painter: &egui::Painter, origin: egui::Pos2, surface: &Surface) {
    painter.extend(scene_shapes(origin, surface));
    let view = surface.view();
    let scene = surface.scene();
    for node in scene.nodes() {
        if node.label.is_empty() {
            continue;
        }
        let center = origin + view.to_screen(node.pos.to_pos2()).to_vec2();
        let text_color = if scene.is_node_painted(&node.id) {
            egui::Color32::WHITE
        } else {
            EDGE_COLOR
        };
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            &node.label,
            egui::FontId::proportional((16.0 * view.zoom()).max(1.0)),
            text_color,
        );
    }
}

fn push_dashed_line(
    shapes: &mut Vec<egui::Shape>,
    a: egui::Pos2,
    b: egui::Pos2,
    stroke: egui::Stroke,
    dash_len: f32,
    gap_len: f32,
) {
    let v = b - a;
    let len = v.length();
    if len <= f32::EPSILON || dash_len <= 0.0 {
        return;
    }
    let dir = v / len;
    let mut pos = 0.0;
    let mut drawing = true;
    while pos < len {
        let seg_len = if drawing { dash_len } else { gap_len.max(0.1) };
        let next_pos = (pos + seg_len).min(len);
        if drawing {
            shapes.push(egui::Shape::line_segment([a + dir * pos, a + dir * next_pos], stroke));
        }
        pos = next_pos;
        drawing = !drawing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::PointerButton::Primary;
    use eframe::egui::pos2;

    fn two_connected(tool: Tool) -> Surface {
        let mut s = Surface::default();
        s.set_tool(Tool::Create);
        for x in [0.0, 200.0] {
            s.pointer_down(pos2(x, 0.0), Primary);
            s.pointer_up(pos2(x, 0.0), Primary);
        }
        s.set_tool(tool);
        s.pointer_down(pos2(0.0, 0.0), Primary);
        s.pointer_down(pos2(200.0, 0.0), Primary);
        s.set_tool(Tool::Select);
        s
    }

    #[test]
    fn solid_edge_and_two_nodes() {
        let s = two_connected(Tool::Connect);
        // one edge, plus fill and outline per node
        assert_eq!(scene_shapes(egui::Pos2::ZERO, &s).len(), 5);
    }

    #[test]
    fn dashed_edges_split_into_segments() {
        let s = two_connected(Tool::ConnectDashed);
        assert!(scene_shapes(egui::Pos2::ZERO, &s).len() > 5 + 1);
    }

    #[test]
    fn rendering_leaves_the_session_untouched() {
        let s = two_connected(Tool::Connect);
        let before = s.scene().clone();
        let first = scene_shapes(egui::pos2(10.0, 10.0), &s).len();
        let second = scene_shapes(egui::pos2(10.0, 10.0), &s).len();
        assert_eq!(first, second);
        assert_eq!(s.scene(), &before);
    }

    #[test]
    fn grid_hidden_when_too_dense() {
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(400.0, 300.0));
        let mut view = Viewport::default();
        assert_eq!(grid_shapes(rect, &view, 50.0).len(), 8 + 6);
        view.zoom_at(egui::Pos2::ZERO, 0.2);
        assert!(grid_shapes(rect, &view, 50.0).is_empty());
    }
}
