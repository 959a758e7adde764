//! Interactive venation viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`SimulationContext`] and
//! implements [`eframe::App`] to draw it and to turn buttons and key
//! presses into [`Command`]s.

use eframe::App;
use glam::Vec2;
use venation_core::{
    network::GrowthStatus,
    patterns::SourcePattern,
    shapes::BoundaryShape,
    simulation::{Command, SimulationContext},
};

/// Keys the viewer listens to.
const SHORTCUT_KEYS: [egui::Key; 10] = [
    egui::Key::R,
    egui::Key::B,
    egui::Key::O,
    egui::Key::S,
    egui::Key::A,
    egui::Key::Space,
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
];

/// Maps a key press onto a command, given the shape currently shown.
pub fn command_for_key(key: egui::Key, current: BoundaryShape) -> Option<Command> {
    let cmd = match key {
        egui::Key::R => Command::Reset(current),
        egui::Key::B => Command::ToggleBoundsVisible,
        egui::Key::O => Command::ToggleObstaclesVisible,
        egui::Key::S => Command::ToggleSourcesVisible,
        egui::Key::A => Command::ToggleAttractionZones,
        egui::Key::Space => Command::TogglePause,
        egui::Key::Num1 => Command::Reset(BoundaryShape::from_digit(1)?),
        egui::Key::Num2 => Command::Reset(BoundaryShape::from_digit(2)?),
        egui::Key::Num3 => Command::Reset(BoundaryShape::from_digit(3)?),
        egui::Key::Num4 => Command::Reset(BoundaryShape::from_digit(4)?),
        _ => return None,
    };
    Some(cmd)
}

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Translate key presses and button clicks into [`Command`]s.
/// 2. If not paused and enough time has passed, tick the simulation.
/// 3. Render boundary, obstacles, veins and sources.
///
/// ### Fields
/// - `sim` - Scene context: network, configuration, view flags.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
/// - `new_from` - Nodes with an id at or above this were created in the
///   last step (for highlighting).
/// - `use_grid`, `scatter_count`, `grid_spacing` - Pattern settings that
///   are written into the scene configuration on the next reset.
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time between the last two steps.
/// - `last_error` - Message from the most recent failed command.
pub struct Viewer {
    sim: SimulationContext,

    zoom: f32,
    pan: egui::Vec2,

    new_from: usize,

    use_grid: bool,
    scatter_count: usize,
    grid_spacing: f32,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,

    last_error: Option<String>,
}

impl Viewer {
    pub fn new(sim: SimulationContext) -> Self {
        let (use_grid, scatter_count, grid_spacing) = match sim.config.pattern {
            SourcePattern::Scatter { count } => (false, count, 12.0),
            SourcePattern::Grid { dx, .. } => (true, 500, dx),
        };
        let new_from = sim.network().nodes().len();

        Self {
            sim,
            zoom: 0.6,
            pan: egui::vec2(0.0, 0.0),
            new_from,
            use_grid,
            scatter_count,
            grid_spacing,
            step_interval: 0.02,
            last_step_time: 0.0,
            last_step_dt: 0.0,
            last_error: None,
        }
    }

    /// Applies a command and remembers a failure for the status bar.
    fn apply(&mut self, cmd: Command) {
        if let Command::Reset(_) = cmd {
            self.sim.config.pattern = if self.use_grid {
                SourcePattern::Grid {
                    dx: self.grid_spacing,
                    dy: self.grid_spacing,
                }
            } else {
                SourcePattern::Scatter {
                    count: self.scatter_count,
                }
            };
        }

        match self.sim.apply(cmd) {
            Ok(()) => {
                self.last_error = None;
                if let Command::Reset(_) = cmd {
                    self.new_from = self.sim.network().nodes().len();
                }
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Advances the simulation by a single step, even when paused.
    fn step_once(&mut self) {
        self.new_from = self.sim.network().nodes().len();
        self.sim.step();
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let pressed: Vec<egui::Key> =
            ctx.input(|i| SHORTCUT_KEYS.into_iter().filter(|&k| i.key_pressed(k)).collect());
        for key in pressed {
            if let Some(cmd) = command_for_key(key, self.sim.shape()) {
                self.apply(cmd);
            }
        }
    }

    /// Builds the top panel (run controls, stepping, shapes, view toggles).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.sim.paused { "▶ Run" } else { "⏸ Pause" })
                    .clicked()
                {
                    self.apply(Command::TogglePause);
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.apply(Command::Reset(self.sim.shape()));
                }

                ui.separator();
                for shape in BoundaryShape::ALL {
                    if ui
                        .selectable_label(self.sim.shape() == shape, shape.name())
                        .clicked()
                    {
                        self.apply(Command::Reset(shape));
                    }
                }

                ui.separator();
                let view = self.sim.view;
                if ui.selectable_label(view.show_bounds, "Bounds").clicked() {
                    self.apply(Command::ToggleBoundsVisible);
                }
                if ui.selectable_label(view.show_obstacles, "Obstacles").clicked() {
                    self.apply(Command::ToggleObstaclesVisible);
                }
                if ui.selectable_label(view.show_sources, "Sources").clicked() {
                    self.apply(Command::ToggleSourcesVisible);
                }
                if ui
                    .selectable_label(view.show_attraction_zones, "Zones")
                    .clicked()
                {
                    self.apply(Command::ToggleAttractionZones);
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let net = self.sim.network();
        let status = match net.status() {
            GrowthStatus::Growing => "growing",
            GrowthStatus::Exhausted => "all sources consumed",
            GrowthStatus::Blocked => "blocked",
            GrowthStatus::Dormant => "dormant",
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("status = {status}"));
                ui.label(format!("alive sources = {}", net.alive_sources()));
                ui.label(format!("nodes = {}", net.nodes().len()));
                ui.label(format!("step = {}", net.steps()));
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the right-hand panel for scene parameters.
    ///
    /// Changes take effect on the next reset.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Radii");
                let growth = &mut self.sim.config.growth;
                Self::labeled_drag_f32(
                    ui,
                    "influence_radius:",
                    &mut growth.influence_radius,
                    1.0..=500.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "consume_radius:",
                    &mut growth.consume_radius,
                    0.5..=100.0,
                    0.1,
                );

                ui.separator();
                ui.label("Growth");
                Self::labeled_drag_f32(ui, "step_len:", &mut growth.step_len, 0.5..=50.0, 0.1);

                ui.separator();
                ui.label("Sources");
                ui.radio_value(&mut self.use_grid, false, "Scatter");
                ui.radio_value(&mut self.use_grid, true, "Grid");
                if self.use_grid {
                    Self::labeled_drag_f32(
                        ui,
                        "spacing:",
                        &mut self.grid_spacing,
                        2.0..=200.0,
                        0.5,
                    );
                } else {
                    ui.horizontal(|ui| {
                        ui.label("count:");
                        ui.add(
                            egui::DragValue::new(&mut self.scatter_count)
                                .range(0..=20_000)
                                .speed(10.0),
                        );
                    });
                }

                ui.separator();
                if ui.button("Apply & reset").clicked() {
                    self.apply(Command::Reset(self.sim.shape()));
                }
            });
    }

    fn draw_outline(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        points: &[Vec2],
        stroke: egui::Stroke,
    ) {
        let pts: Vec<egui::Pos2> = points
            .iter()
            .map(|&p| self.world_to_screen(p, rect))
            .collect();
        painter.add(egui::Shape::closed_line(pts, stroke));
    }

    /// Builds the central panel where the scene is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let net = self.sim.network();
            let view = self.sim.view;

            if view.show_bounds {
                let stroke = egui::Stroke::new(1.5, egui::Color32::GRAY);
                self.draw_outline(&painter, rect, net.boundary().points(), stroke);
            }

            if view.show_obstacles {
                let stroke = egui::Stroke::new(1.5, egui::Color32::from_rgb(200, 120, 60));
                for obstacle in net.obstacles() {
                    self.draw_outline(&painter, rect, obstacle.points(), stroke);
                }
            }

            if view.show_attraction_zones {
                let fill = egui::Color32::from_rgba_unmultiplied(255, 0, 0, 6);
                for a in net.sources() {
                    let p = self.world_to_screen(a.pos, rect);
                    painter.circle_filled(p, a.influence_radius * self.zoom, fill);
                }
            }

            // Vein segments, each drawn from parent to child.
            let nodes = net.nodes();
            let vein = egui::Stroke::new(1.0, egui::Color32::LIGHT_GREEN);
            for node in nodes {
                if let Some(parent) = node.parent {
                    let a = self.world_to_screen(nodes[parent].pos, rect);
                    let b = self.world_to_screen(node.pos, rect);
                    painter.line_segment([a, b], vein);
                }
            }

            // Roots and the nodes grown in the last step.
            for (i, node) in nodes.iter().enumerate() {
                let p = self.world_to_screen(node.pos, rect);
                if node.is_root {
                    painter.circle_filled(p, 4.0, egui::Color32::LIGHT_BLUE);
                } else if i >= self.new_from {
                    painter.circle_filled(p, 2.0, egui::Color32::RED);
                }
            }

            if view.show_sources {
                for a in net.sources() {
                    let p = self.world_to_screen(a.pos, rect);
                    painter.circle_filled(p, 1.5, egui::Color32::from_gray(160));
                }
            }

            // Auto-run unless paused.
            if !self.sim.paused {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.new_from = self.sim.network().nodes().len();
                    self.sim.tick();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venation_core::config::SceneConfig;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn test_viewer() -> Viewer {
        let config = SceneConfig {
            pattern: SourcePattern::Scatter { count: 100 },
            ..SceneConfig::default()
        };
        Viewer::new(SimulationContext::new(config, BoundaryShape::Circle).unwrap())
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = test_viewer();
        viewer.zoom = 2.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let eps = 1e-4;
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(-3.5, 8.25),
        ] {
            let back = viewer.screen_to_world(viewer.world_to_screen(p, rect), rect);
            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn keys_map_to_commands() {
        let current = BoundaryShape::Square;
        assert_eq!(
            command_for_key(egui::Key::R, current),
            Some(Command::Reset(BoundaryShape::Square))
        );
        assert_eq!(
            command_for_key(egui::Key::Num4, current),
            Some(Command::Reset(BoundaryShape::Leaf))
        );
        assert_eq!(
            command_for_key(egui::Key::B, current),
            Some(Command::ToggleBoundsVisible)
        );
        assert_eq!(
            command_for_key(egui::Key::O, current),
            Some(Command::ToggleObstaclesVisible)
        );
        assert_eq!(
            command_for_key(egui::Key::Space, current),
            Some(Command::TogglePause)
        );
        assert_eq!(command_for_key(egui::Key::Q, current), None);
    }

    #[test]
    fn step_once_marks_new_nodes() {
        let mut viewer = test_viewer();
        let before = viewer.sim.network().nodes().len();

        viewer.step_once();

        assert_eq!(viewer.new_from, before);
        assert_eq!(viewer.sim.network().steps(), 1);
    }

    #[test]
    fn reset_applies_pattern_settings() {
        let mut viewer = test_viewer();
        viewer.scatter_count = 40;
        for _ in 0..5 {
            viewer.step_once();
        }

        viewer.apply(Command::Reset(BoundaryShape::Triangle));

        assert!(viewer.last_error.is_none());
        assert_eq!(viewer.sim.shape(), BoundaryShape::Triangle);
        assert_eq!(viewer.sim.network().sources().len(), 40);
        assert_eq!(viewer.sim.network().steps(), 0);
        assert_eq!(viewer.new_from, viewer.sim.network().nodes().len());
    }

    #[test]
    fn failed_reset_is_reported() {
        let mut viewer = test_viewer();
        viewer.sim.config.growth.step_len = -1.0;

        viewer.apply(Command::Reset(BoundaryShape::Leaf));

        assert!(viewer.last_error.is_some());
        assert_eq!(viewer.sim.shape(), BoundaryShape::Circle);
    }
}
