// ui.rs - The window: controls, the canvas image and click-to-toggle

use eframe::egui;
use egui::{Color32, ColorImage, Rect, Sense, TextureHandle, TextureOptions, Vec2, pos2};

use conway::{AnimationController, Canvas, ScreenRect};
use universe::{PATTERNS, Universe};

use crate::scheduler::RepaintScheduler;

pub type Controller = AnimationController<Universe, RepaintScheduler>;

pub struct LifeApp {
    controller: Controller,
    texture: Option<TextureHandle>,
    zoom: f32,
    selected_pattern: usize,
    grid_color: Color32,
    dead_color: Color32,
    alive_color: Color32,
    last_error: Option<String>,
}

impl LifeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut controller: Controller,
        zoom: f32,
        autoplay: bool,
    ) -> Self {
        controller.scheduler_mut().attach(cc.egui_ctx.clone());
        let config = *controller.renderer().config();

        let mut app = Self {
            controller,
            texture: None,
            zoom,
            selected_pattern: 0,
            grid_color: config.grid_color,
            dead_color: config.dead_color,
            alive_color: config.alive_color,
            last_error: None,
        };
        if autoplay {
            let result = app.controller.play();
            app.report(result);
        }
        app
    }

    /// Failures stop the animation, never the window.
    fn report(&mut self, result: conway::Result<()>) {
        if let Err(err) = result {
            tracing::error!(%err, "simulation control failed");
            self.last_error = Some(err.to_string());
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button(self.controller.indicator()).clicked() {
                let result = self.controller.toggle();
                self.report(result);
            }

            if ui.button("Reset").clicked() {
                let result = self.controller.reset();
                self.report(result);
            }

            if ui.button("⏹ Clear").clicked() {
                let result = self.controller.mutate(Universe::clear);
                self.report(result);
            }

            ui.separator();

            // Pattern dropdown
            ui.label("Pattern:");
            egui::ComboBox::from_id_source("pattern_selector")
                .selected_text(PATTERNS[self.selected_pattern].name)
                .show_ui(ui, |ui| {
                    for (i, pattern) in PATTERNS.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                    }
                });

            if ui.button("Apply Pattern").clicked() {
                let pattern = &PATTERNS[self.selected_pattern];
                let result = self.controller.mutate(|universe| universe.load_pattern(pattern));
                self.report(result);
            }

            ui.separator();

            ui.label(format!("Generation: {}", self.controller.simulation().generation()));
        });

        ui.horizontal(|ui| {
            let mut changed = false;
            ui.label("Live:");
            changed |= ui.color_edit_button_srgba(&mut self.alive_color).changed();
            ui.label("Dead:");
            changed |= ui.color_edit_button_srgba(&mut self.dead_color).changed();
            ui.label("Grid:");
            changed |= ui.color_edit_button_srgba(&mut self.grid_color).changed();

            if changed {
                let (grid, dead, alive) = (self.grid_color, self.dead_color, self.alive_color);
                let result = self.controller.set_palette(grid, dead, alive);
                self.report(result);
            }

            ui.separator();
            ui.add(egui::Slider::new(&mut self.zoom, 0.5..=4.0).text("zoom"));
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (width, height) = self.controller.canvas().size();
        let display = Vec2::new(width as f32, height as f32) * self.zoom;
        let (response, painter) = ui.allocate_painter(display, Sense::click());

        // Toggle before uploading so the click shows up this frame.
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let screen = ScreenRect::new(response.rect, width, height);
                match self.controller.click(pos, &screen) {
                    Ok(coord) => tracing::debug!(row = coord.row, col = coord.col, "cell toggled"),
                    Err(err) => self.report(Err(err)),
                }
            }
        }

        let texture = self.texture.get_or_insert_with(|| {
            let blank = ColorImage::new([1, 1], Color32::TRANSPARENT);
            ui.ctx().load_texture("life-canvas", blank, TextureOptions::NEAREST)
        });
        texture.set(self.controller.canvas().to_color_image(), TextureOptions::NEAREST);

        painter.image(
            texture.id(),
            response.rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    fn statistics(&self, ui: &mut egui::Ui) {
        let Ok(view) = self.controller.view() else {
            return;
        };
        let total = view.dimensions().cell_count();
        let live_cells = view.live_count();

        ui.horizontal(|ui| {
            ui.label(format!("Live cells: {}", live_cells));
            ui.label(format!("Dead cells: {}", total - live_cells));
            ui.label(format!("Population: {:.1}%", (live_cells as f32 / total as f32) * 100.0));
        });
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Run the frame the controller asked for, if this repaint is it.
        if let Some(due) = self.controller.scheduler_mut().take_due() {
            let result = self.controller.on_frame(due);
            self.report(result);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");

            self.controls(ui);

            ui.separator();

            ui.label("Click cells to toggle them alive/dead. Use ▶/⏸ to run the simulation.");

            ui.separator();

            egui::ScrollArea::both().show(ui, |ui| {
                self.canvas(ui);
            });

            ui.separator();

            self.statistics(ui);

            if let Some(err) = &self.last_error {
                ui.colored_label(Color32::RED, err.as_str());
            }
        });
    }
}
