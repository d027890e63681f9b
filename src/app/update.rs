use eframe::egui;

use super::render::{color_row, draw_background, draw_scene, tool_button};
use super::surface::KeyCommand;
use super::tool::Tool;
use super::{CanvasApp, canvas_local};

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                self.show_help = !self.show_help;
            }
            if wants_keyboard {
                return;
            }
            if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z)
                || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y)
            {
                self.surface.key(KeyCommand::Redo);
            } else if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z) {
                self.surface.key(KeyCommand::Undo);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                self.surface.key(KeyCommand::Escape);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
            {
                self.surface.key(KeyCommand::DeleteSelected);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::G) {
                self.toggle_snap();
            }

            // Shift variants first: an unshifted pattern also matches with shift held.
            let tool = if i.consume_key(egui::Modifiers::SHIFT, egui::Key::C) {
                Some(Tool::ConnectDashed)
            } else if i.consume_key(egui::Modifiers::NONE, egui::Key::C) {
                Some(Tool::Connect)
            } else if i.consume_key(egui::Modifiers::NONE, egui::Key::V) {
                Some(Tool::Select)
            } else if i.consume_key(egui::Modifiers::NONE, egui::Key::N) {
                Some(Tool::Create)
            } else if i.consume_key(egui::Modifiers::NONE, egui::Key::H) {
                Some(Tool::Pan)
            } else if i.consume_key(egui::Modifiers::NONE, egui::Key::D) {
                Some(Tool::Delete)
            } else if i.consume_key(egui::Modifiers::NONE, egui::Key::P) {
                Some(Tool::Paint)
            } else {
                None
            };
            if let Some(tool) = tool {
                self.surface.key(KeyCommand::SelectTool(tool));
            }
        });

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for tool in Tool::ALL {
                    if tool_button(ui, tool, self.surface.tool()) {
                        self.surface.set_tool(tool);
                    }
                }
                ui.separator();

                let mut snap = self.surface.options().snap_to_grid;
                if ui.checkbox(&mut snap, "Snap to grid").changed() {
                    self.surface.set_snap_to_grid(snap);
                    self.persist_settings();
                }
                let mut grid = self.surface.options().grid_size;
                let response = ui.add(
                    egui::DragValue::new(&mut grid)
                        .range(10.0..=200.0)
                        .speed(1.0)
                        .prefix("grid "),
                );
                if response.changed() {
                    self.surface.set_grid_size(grid);
                }
                if response.drag_stopped() || (response.changed() && !response.dragged()) {
                    self.persist_settings();
                }
                ui.separator();

                if ui
                    .add_enabled(self.surface.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.surface.undo();
                }
                if ui
                    .add_enabled(self.surface.can_redo(), egui::Button::new("Redo"))
                    .clicked()
                {
                    self.surface.redo();
                }
                if ui.button("Reset view").clicked() {
                    self.surface.view_mut().reset();
                }
                if ui.button("Clear all").clicked() {
                    self.surface.request_clear();
                }
                if ui.button("Help").clicked() {
                    self.show_help = true;
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_text());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.0}%", self.surface.status().zoom * 100.0));
                });
            });
        });

        if let Some(node) = self.surface.selected_node().cloned() {
            egui::SidePanel::right("inspector")
                .resizable(true)
                .min_width(200.0)
                .show(ctx, |ui| {
                    ui.heading("Node");
                    ui.separator();

                    let mut label = node.label.clone();
                    ui.horizontal(|ui| {
                        ui.label("Label");
                        let response = ui.text_edit_singleline(&mut label);
                        if response.changed() {
                            self.surface.set_selected_label(&label);
                        }
                        if response.lost_focus() {
                            self.surface.finish_edit();
                        }
                    });

                    let mut radius = node.radius;
                    let response = ui.add(egui::Slider::new(&mut radius, 10.0..=80.0).text("Radius"));
                    if response.changed() {
                        self.surface.set_selected_radius(radius);
                    }
                    if response.drag_stopped() || (response.changed() && !response.dragged()) {
                        self.surface.finish_edit();
                    }

                    ui.label("Color");
                    if let Some(color) = color_row(ui, node.color) {
                        self.surface.set_selected_color(color);
                    }

                    ui.separator();
                    ui.label(format!("Position: ({:.0}, {:.0})", node.pos.x, node.pos.y));
                    if ui.button("Delete node").clicked() {
                        self.surface.delete_selected();
                    }
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            let origin = rect.min;

            let events = ctx.input(|i| i.events.clone());
            for event in events {
                match event {
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: true,
                        ..
                    } => {
                        if rect.contains(pos) && response.hovered() {
                            self.surface.pointer_down(canvas_local(origin, pos), button);
                        }
                    }
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: false,
                        ..
                    } => self.surface.pointer_up(canvas_local(origin, pos), button),
                    egui::Event::PointerMoved(pos) => {
                        if rect.contains(pos) {
                            self.surface.pointer_move(canvas_local(origin, pos));
                        } else {
                            self.surface.pointer_leave();
                        }
                    }
                    egui::Event::PointerGone => self.surface.pointer_leave(),
                    _ => {}
                }
            }

            if response.hovered() {
                let scroll_delta = ctx.input(|i| i.raw_scroll_delta.y);
                if scroll_delta != 0.0 {
                    if let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) {
                        self.surface.wheel(canvas_local(origin, hover_pos), scroll_delta);
                    }
                }
            }

            let painter = ui.painter_at(rect);
            draw_background(&painter, rect, self.surface.view(), self.surface.options().grid_size);
            draw_scene(&painter, origin, &self.surface);
            if self.surface.scene().is_empty() {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Press N and click to add nodes",
                    egui::FontId::proportional(16.0),
                    ui.visuals().weak_text_color(),
                );
            }

            if response.hovered() {
                let icon = match self.surface.tool() {
                    _ if self.surface.is_panning() => egui::CursorIcon::Grabbing,
                    Tool::Pan => egui::CursorIcon::Grab,
                    Tool::Create => egui::CursorIcon::Crosshair,
                    Tool::Select if self.surface.hovered().is_some() => egui::CursorIcon::PointingHand,
                    Tool::Select => egui::CursorIcon::Default,
                    tool if tool.is_connect() => egui::CursorIcon::Cell,
                    Tool::Delete => egui::CursorIcon::NotAllowed,
                    _ => egui::CursorIcon::PointingHand,
                };
                ctx.set_cursor_icon(icon);
            }
        });

        if self.surface.is_clear_pending() {
            let mut confirm = false;
            let mut cancel = false;
            egui::Window::new("Clear canvas")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label("Remove every node and edge? This can be undone.");
                    ui.horizontal(|ui| {
                        confirm = ui.button("Clear").clicked();
                        cancel = ui.button("Cancel").clicked();
                    });
                });
            if confirm {
                self.surface.confirm_clear();
            } else if cancel {
                self.surface.cancel_clear();
            }
        }

        super::help::draw_help_window(ctx, &mut self.show_help);
    }
}
