use crate::model;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::history::DEFAULT_HISTORY_LIMIT;
use super::surface::SurfaceOptions;
use super::viewport::{DEFAULT_ZOOM_MAX, DEFAULT_ZOOM_MIN};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("could not encode settings as TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub snap_to_grid: bool,
    pub grid_size: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub zoom_step: f32,
    pub node_radius: f32,
    pub node_color: model::Rgba,
    pub edge_hit_px: f32,
    pub history_limit: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: 50.0,
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            zoom_step: 0.1,
            node_radius: model::DEFAULT_NODE_RADIUS,
            node_color: model::DEFAULT_NODE_COLOR,
            edge_hit_px: 5.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppSettings {
    /// Replaces unusable values with defaults so a hand-edited file can't break the canvas.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.grid_size) {
            self.grid_size = defaults.grid_size;
        }
        if !positive(self.zoom_min) || !positive(self.zoom_max) || self.zoom_min > self.zoom_max {
            self.zoom_min = defaults.zoom_min;
            self.zoom_max = defaults.zoom_max;
        }
        if !positive(self.zoom_step) {
            self.zoom_step = defaults.zoom_step;
        }
        if !positive(self.node_radius) {
            self.node_radius = defaults.node_radius;
        }
        if !positive(self.edge_hit_px) {
            self.edge_hit_px = defaults.edge_hit_px;
        }
        if self.history_limit == 0 {
            self.history_limit = defaults.history_limit;
        }
        self
    }

    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            snap_to_grid: self.snap_to_grid,
            grid_size: self.grid_size,
            zoom_min: self.zoom_min,
            zoom_max: self.zoom_max,
            zoom_step: self.zoom_step,
            node_radius: self.node_radius,
            node_color: self.node_color,
            edge_hit_px: self.edge_hit_px,
            history_limit: self.history_limit,
        }
    }
}

fn parse_settings(path: &str, s: &str) -> Result<AppSettings, SettingsError> {
    if path.ends_with(".toml") {
        toml::from_str::<AppSettings>(s)
            .or_else(|e| serde_json::from_str::<AppSettings>(s).map_err(|_| e.into()))
    } else {
        serde_json::from_str::<AppSettings>(s)
            .or_else(|e| toml::from_str::<AppSettings>(s).map_err(|_| e.into()))
    }
}

pub(super) fn load_settings(path: &str) -> Result<AppSettings, SettingsError> {
    let s = std::fs::read_to_string(path)?;
    Ok(parse_settings(path, &s)?.sanitized())
}

pub(super) fn save_settings(path: &str, settings: &AppSettings) -> Result<(), SettingsError> {
    let text = if path.ends_with(".toml") {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_in_defaults() {
        let parsed = parse_settings("settings.toml", "snap_to_grid = true\ngrid_size = 20.0\n")
            .unwrap();
        assert!(parsed.snap_to_grid);
        assert_eq!(parsed.grid_size, 20.0);
        assert_eq!(parsed.zoom_max, DEFAULT_ZOOM_MAX);
    }

    #[test]
    fn json_is_accepted_under_a_toml_name() {
        let parsed = parse_settings("settings.toml", r#"{ "edge_hit_px": 8.0 }"#).unwrap();
        assert_eq!(parsed.edge_hit_px, 8.0);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_settings("settings.json", "zoom_min = [").is_err());
    }

    #[test]
    fn sanitize_repairs_bad_ranges() {
        let settings = AppSettings {
            grid_size: -1.0,
            zoom_min: 5.0,
            zoom_max: 1.0,
            history_limit: 0,
            ..AppSettings::default()
        }
        .sanitized();
        assert_eq!(settings.grid_size, 50.0);
        assert_eq!((settings.zoom_min, settings.zoom_max), (DEFAULT_ZOOM_MIN, DEFAULT_ZOOM_MAX));
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn save_then_load_toml() {
        let path = std::env::temp_dir().join(format!("circle-canvas-{}.toml", std::process::id()));
        let path = path.display().to_string();
        let settings = AppSettings {
            snap_to_grid: true,
            node_color: model::Rgba::rgb(1, 2, 3),
            ..AppSettings::default()
        };
        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_settings("/definitely/not/here/settings.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
