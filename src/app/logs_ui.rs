// Logs window in a separate OS viewport: virtualized line list with an
// app-only filter, autoscroll, and copy to clipboard.

use eframe::egui;
use lazy_static::lazy_static;
use log::Level;
use std::sync::RwLock;

use crate::logger;

#[derive(Clone, Copy)]
struct LogsWindow {
    open: bool,
    autoscroll: bool,
    app_only: bool,
}

impl Default for LogsWindow {
    fn default() -> Self {
        Self {
            open: false,
            autoscroll: true,
            app_only: false,
        }
    }
}

lazy_static! {
    static ref WINDOW: RwLock<LogsWindow> = RwLock::new(LogsWindow::default());
}

pub fn open_logs() {
    if let Ok(mut w) = WINDOW.write() {
        w.open = true;
    }
}

pub fn draw_logs_viewport(ctx: &egui::Context) {
    let open = WINDOW.read().map(|w| w.open).unwrap_or(false);
    if !open {
        return;
    }

    let viewport_id = egui::ViewportId::from_hash_of("logs_window");

    ctx.show_viewport_deferred(
        viewport_id,
        egui::ViewportBuilder::default()
            .with_title("Logs")
            .with_inner_size([800.0, 500.0])
            .with_resizable(true),
        move |ctx, _class| {
            // OS close (X): mark as closed and close the viewport.
            if ctx.input(|i| i.viewport().close_requested()) {
                if let Ok(mut w) = WINDOW.write() {
                    w.open = false;
                }
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }

            let mut state = WINDOW.read().map(|w| *w).unwrap_or_default();
            egui::CentralPanel::default().show(ctx, |ui| {
                let mut changed = false;
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        logger::clear();
                    }
                    if ui.button("Copy").clicked() {
                        let text = logger::with_buffer(|b| {
                            b.iter()
                                .filter(|e| !state.app_only || e.from_app)
                                .map(|e| e.to_line())
                                .collect::<Vec<_>>()
                                .join("\n")
                        });
                        ui.output_mut(|o| o.copied_text = text);
                    }
                    changed |= ui.checkbox(&mut state.app_only, "App only").changed();
                    changed |= ui.checkbox(&mut state.autoscroll, "Autoscroll").changed();
                    ui.separator();
                    let (total, dropped) = logger::with_buffer(|b| (b.len(), b.dropped()));
                    if dropped > 0 {
                        ui.label(format!("{total} lines ({dropped} dropped)"));
                    } else {
                        ui.label(format!("{total} lines"));
                    }
                });
                if changed {
                    if let Ok(mut w) = WINDOW.write() {
                        *w = state;
                    }
                }
                ui.separator();

                let mut scroll = egui::ScrollArea::vertical().auto_shrink([false, false]);
                if state.autoscroll {
                    scroll = scroll.stick_to_bottom(true);
                }

                let shown = logger::with_buffer(|b| {
                    if state.app_only {
                        b.iter().filter(|e| e.from_app).count()
                    } else {
                        b.len()
                    }
                });
                let row_height = ui.text_style_height(&egui::TextStyle::Monospace) + 2.0;
                let plain = ui.visuals().text_color();

                // Virtualized list: the visible slice is batched into one
                // layout job to keep the per-frame widget count low.
                scroll.show_rows(ui, row_height, shown, |ui, rows| {
                    let job = logger::with_buffer(|b| {
                        let mut job = egui::text::LayoutJob::default();
                        let lines = b
                            .iter()
                            .filter(|e| !state.app_only || e.from_app)
                            .skip(rows.start)
                            .take(rows.len());
                        for e in lines {
                            let fmt = egui::TextFormat {
                                color: color_for_level(e.level, plain),
                                font_id: egui::FontId::monospace(12.0),
                                ..Default::default()
                            };
                            job.append(&format!("{}\n", e.to_line()), 0.0, fmt);
                        }
                        job
                    });
                    ui.label(job);
                });
            });
        },
    );
}

fn color_for_level(level: Level, plain: egui::Color32) -> egui::Color32 {
    match level {
        Level::Error => egui::Color32::from_rgb(220, 80, 80),
        Level::Warn => egui::Color32::from_rgb(235, 200, 80),
        _ => plain,
    }
}
