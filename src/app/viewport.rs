//! Screen <-> logical coordinate mapping.
//!
//! Screen coordinates are canvas-local pixels (origin at the canvas' top-left).
//! Logical coordinates are diagram units.

use eframe::egui;

pub const DEFAULT_ZOOM_MIN: f32 = 0.1;
pub const DEFAULT_ZOOM_MAX: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: egui::Vec2,
    zoom: f32,
    zoom_min: f32,
    zoom_max: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_MIN, DEFAULT_ZOOM_MAX)
    }
}

impl Viewport {
    pub fn new(zoom_min: f32, zoom_max: f32) -> Self {
        let mut view = Self {
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
            zoom_min,
            zoom_max,
        };
        view.zoom = view.clamp_zoom(1.0);
        view
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Saturates to the configured range. Non-finite requests keep the current zoom.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        if !zoom.is_finite() {
            return self.zoom;
        }
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    pub fn to_logical(&self, screen: egui::Pos2) -> egui::Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    pub fn to_screen(&self, logical: egui::Pos2) -> egui::Pos2 {
        (logical.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    /// Changes zoom while keeping the logical point under `focus` fixed on screen.
    pub fn zoom_at(&mut self, focus: egui::Pos2, zoom: f32) {
        let anchor = self.to_logical(focus);
        self.zoom = self.clamp_zoom(zoom);
        self.pan = focus.to_vec2() - anchor.to_vec2() * self.zoom;
    }

    /// One fixed additive step in the direction of `direction`'s sign.
    pub fn zoom_step_at(&mut self, focus: egui::Pos2, direction: f32, step: f32) {
        if direction == 0.0 || !direction.is_finite() {
            return;
        }
        let target = self.zoom + step.abs() * direction.signum();
        self.zoom_at(focus, target);
    }

    /// Pan for a drag that began at `start_screen` with the view panned by `start_pan`.
    pub fn pan_from(&mut self, start_pan: egui::Vec2, start_screen: egui::Pos2, current: egui::Pos2) {
        self.pan = start_pan + (current - start_screen);
    }

    pub fn reset(&mut self) {
        self.pan = egui::Vec2::ZERO;
        self.zoom = self.clamp_zoom(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identity_view_maps_points_unchanged() {
        let view = Viewport::default();
        let p = egui::pos2(30.0, 30.0);
        assert_eq!(view.to_logical(p), p);
        assert_eq!(view.to_screen(p), p);
    }

    #[test]
    fn zoom_saturates_at_both_ends() {
        let mut view = Viewport::default();
        view.zoom_at(egui::Pos2::ZERO, 100.0);
        assert_eq!(view.zoom(), DEFAULT_ZOOM_MAX);
        view.zoom_at(egui::Pos2::ZERO, -4.0);
        assert_eq!(view.zoom(), DEFAULT_ZOOM_MIN);
        view.zoom_at(egui::Pos2::ZERO, f32::NAN);
        assert_eq!(view.zoom(), DEFAULT_ZOOM_MIN);
    }

    #[test]
    fn wheel_steps_are_fixed_size() {
        let mut view = Viewport::default();
        view.zoom_step_at(egui::pos2(10.0, 10.0), 250.0, 0.1);
        assert!((view.zoom() - 1.1).abs() < 1e-6);
        view.zoom_step_at(egui::pos2(10.0, 10.0), -0.5, 0.1);
        assert!((view.zoom() - 1.0).abs() < 1e-6);
        view.zoom_step_at(egui::pos2(10.0, 10.0), 0.0, 0.1);
        assert!((view.zoom() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn drag_pan_does_not_accumulate() {
        let mut view = Viewport::default();
        let start = egui::pos2(100.0, 100.0);
        let start_pan = view.pan;
        view.pan_from(start_pan, start, egui::pos2(110.0, 100.0));
        view.pan_from(start_pan, start, egui::pos2(120.0, 105.0));
        assert_eq!(view.pan, egui::vec2(20.0, 5.0));
    }

    proptest! {
        #[test]
        fn screen_logical_round_trip(
            zoom in 0.1f32..3.0,
            pan_x in -500f32..500.0,
            pan_y in -500f32..500.0,
            x in -1000f32..1000.0,
            y in -1000f32..1000.0,
        ) {
            let mut view = Viewport::default();
            view.pan = egui::vec2(pan_x, pan_y);
            view.zoom_at(egui::Pos2::ZERO, zoom);
            view.pan = egui::vec2(pan_x, pan_y);
            let p = egui::pos2(x, y);
            let back = view.to_screen(view.to_logical(p));
            prop_assert!((back - p).length() < 1e-2);
        }

        #[test]
        fn zoom_keeps_focus_stationary(
            zoom in 0.1f32..3.0,
            target in 0.05f32..4.0,
            pan_x in -500f32..500.0,
            pan_y in -500f32..500.0,
            fx in 0f32..1600.0,
            fy in 0f32..1200.0,
        ) {
            let mut view = Viewport::default();
            view.zoom_at(egui::Pos2::ZERO, zoom);
            view.pan = egui::vec2(pan_x, pan_y);
            let focus = egui::pos2(fx, fy);
            let before = view.to_logical(focus);
            view.zoom_at(focus, target);
            let after = view.to_logical(focus);
            prop_assert!((after - before).length() < 0.05);
        }
    }
}
