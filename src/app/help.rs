use eframe::egui;

use super::tool::Tool;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();

                ui.label("General");
                help_row(ui, "⌘Z", "Undo");
                help_row(ui, "⌘⇧Z / ⌘Y", "Redo");
                help_row(ui, "Escape", "Drop selection and pending connection");
                help_row(ui, "Delete / Backspace", "Delete selected node");
                help_row(ui, "G", "Toggle snap to grid");
                help_row(ui, "F1", "Toggle this window");

                ui.add_space(10.0);
                ui.label("Tools");
                for tool in Tool::ALL {
                    help_row(ui, tool.shortcut(), tool.label());
                }

                ui.add_space(10.0);
                ui.label("Mouse");
                help_row(ui, "Scroll wheel", "Zoom around the pointer");
                help_row(ui, "Middle drag", "Pan with any tool");
                help_row(ui, "Drag empty space", "Pan (Select tool)");

                ui.add_space(20.0);
                ui.heading("Tips");
                ui.separator();
                ui.label("• Connect: click the first node, then the second");
                ui.label("• Paint toggles the fill of nodes and the color of edges");
                ui.label("• Settings are stored in settings.toml");
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [120.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}
