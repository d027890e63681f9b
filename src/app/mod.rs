use eframe::egui;
use tracing::{info, warn};

mod help;
mod history;
mod hit_test;
mod render;
mod settings;
mod surface;
mod tool;
mod update;
mod viewport;

use surface::Surface;

pub struct CanvasApp {
    surface: Surface,
    settings: settings::AppSettings,
    settings_path: String,
    show_help: bool,
}

impl CanvasApp {
    fn config_path() -> Option<String> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = std::path::PathBuf::from(home)
                .join(".config")
                .join("circle-canvas.toml");
            if path.exists() {
                return Some(path.display().to_string());
            }
        }
        if std::path::Path::new("settings.toml").exists() {
            return Some("settings.toml".to_string());
        }
        None
    }

    fn load_settings(path: &str) -> settings::AppSettings {
        let candidates = [path, "settings.json"];
        for candidate in candidates {
            if !std::path::Path::new(candidate).exists() {
                continue;
            }
            match settings::load_settings(candidate) {
                Ok(settings) => {
                    info!(path = candidate, "loaded settings");
                    return settings;
                }
                Err(err) => warn!(path = candidate, %err, "ignoring unreadable settings"),
            }
        }
        settings::AppSettings::default()
    }

    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = Self::config_path().unwrap_or_else(|| "settings.toml".to_string());
        let settings = Self::load_settings(&settings_path);
        Self {
            surface: Surface::new(settings.surface_options()),
            settings,
            settings_path,
            show_help: false,
        }
    }

    fn persist_settings(&mut self) {
        self.settings.snap_to_grid = self.surface.options().snap_to_grid;
        self.settings.grid_size = self.surface.options().grid_size;
        if let Err(err) = settings::save_settings(&self.settings_path, &self.settings) {
            warn!(path = %self.settings_path, %err, "could not save settings");
        }
    }

    fn toggle_snap(&mut self) {
        let enabled = !self.surface.options().snap_to_grid;
        self.surface.set_snap_to_grid(enabled);
        self.persist_settings();
    }

    fn status_text(&self) -> String {
        let status = self.surface.status();
        let mut text = format!(
            "{}{}  |  Nodes: {}  Edges: {}",
            status.tool.label(),
            if status.snap_to_grid { " (snap)" } else { "" },
            status.node_count,
            status.edge_count
        );
        if let Some(selected) = status.selected {
            text.push_str(&format!(
                "  |  Selected: {} ({:.0}, {:.0})",
                selected.label, selected.position.x, selected.position.y
            ));
            if selected.neighbors.is_empty() {
                text.push_str("  no connections");
            } else {
                let neighbors: Vec<&str> = selected.neighbors.iter().map(String::as_str).collect();
                text.push_str(&format!("  connected to: {}", neighbors.join(", ")));
            }
        }
        text
    }
}

// Anchors a pointer event position to the canvas.
fn canvas_local(origin: egui::Pos2, pos: egui::Pos2) -> egui::Pos2 {
    (pos - origin).to_pos2()
}
