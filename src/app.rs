// Application state and top-level UI: top bar, feed grid, pagination.
// Fetching, the photo pipeline, and the tokio runtime live in submodules.

use eframe::{egui, App};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::types::FeedSort;
use crate::ui_constants::{MAX_PHOTOS_PER_ROW, SEARCH_DEBOUNCE_MS};

mod cache;
mod fetch;
mod grid;
mod logs_ui;
mod runtime;
pub mod settings;
mod state;

pub use fetch::PhotoMsg;
pub use runtime::rt;
use state::{ImagesState, NetState};

pub struct PuppygramApp {
    page: u32,
    sort: FeedSort,
    author_query: String,
    search_due_at: Option<Instant>,
    /// Feed grid column count; mirrored to settings when changed.
    photos_per_row: u32,
    net: NetState,
    images: ImagesState,
}

impl Default for PuppygramApp {
    fn default() -> Self {
        let photos_per_row = settings::with_settings(|st| st.photos_per_row);
        Self {
            page: 1,
            sort: FeedSort::default(),
            author_query: String::new(),
            search_due_at: None,
            photos_per_row,
            net: NetState::new(),
            images: ImagesState::new(),
        }
    }
}

impl App for PuppygramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Any new logs? repaint so the logs window stays fresh
        if crate::logger::take_new_flag() {
            ctx.request_repaint();
        }

        // Incoming feed pages and decoded photos
        self.poll_incoming(ctx);

        // Schedule photo downloads for currently displayed posts (idempotent)
        self.schedule_photo_downloads(ctx);

        // First automatic fetch. Errors wait for an explicit Retry.
        if self.net.last_result.is_none() && !self.net.loading && self.net.last_error.is_none() {
            self.start_fetch(ctx);
        }

        self.draw_top_bar(ctx);

        // Run debounced author search once the deadline passes
        if let Some(due) = self.search_due_at {
            if Instant::now() >= due {
                self.search_due_at = None;
                self.page = 1;
                self.start_fetch(ctx);
            }
        }

        // Central panel: the card grid
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Some(err) = self.net.last_error.clone() {
                        ui.add_space(crate::ui_constants::spacing::XLARGE);
                        ui.vertical_centered(|ui| {
                            ui.colored_label(egui::Color32::RED, format!("Error: {}", err));
                            if ui.button("Retry").clicked() {
                                self.net.last_error = None;
                                self.start_fetch(ctx);
                            }
                        });
                    } else if self.net.loading && self.net.last_result.is_none() {
                        ui.add_space(crate::ui_constants::spacing::XLARGE);
                        ui.vertical_centered(|ui| {
                            ui.add(egui::Spinner::new());
                            ui.label("Loading...");
                        });
                    } else if self.net.last_result.is_some() {
                        // Clone so we don't hold an immutable borrow of `self`
                        // across draw_feed_grid (&mut self).
                        let data_cloned = {
                            let msg = self.net.last_result.as_ref().unwrap();
                            msg.data.clone()
                        };

                        // Drop hidden posts, then apply the local sort; the
                        // grid itself just renders what it is handed, in order.
                        let hidden: HashSet<String> = settings::with_settings(|st| {
                            st.hidden_posts.iter().cloned().collect()
                        });
                        let mut display_data: Vec<crate::feed::Post> = data_cloned
                            .into_iter()
                            .filter(|p| !hidden.contains(p.id.as_str()))
                            .collect();
                        self.sort.apply(&mut display_data);

                        if display_data.is_empty() {
                            ui.add_space(crate::ui_constants::spacing::XLARGE);
                            ui.vertical_centered(|ui| {
                                ui.label("No posts to show 🐶");
                            });
                        } else {
                            let cols = self.photos_per_row as usize;
                            self.draw_feed_grid(ui, ctx, &display_data, cols);
                        }

                        // Bottom pagination controls
                        ui.add_space(crate::ui_constants::spacing::MEDIUM);
                        ui.vertical_centered(|ui| {
                            let (cur, total) = {
                                let msg = self.net.last_result.as_ref().unwrap();
                                (msg.pagination.page, msg.pagination.total)
                            };
                            ui.horizontal(|ui| {
                                if ui.add_enabled(cur > 1, egui::Button::new("◀")).clicked() {
                                    self.page = cur.saturating_sub(1);
                                    self.start_fetch(ctx);
                                }
                                ui.label(format!("Page {} / {}", cur, total));
                                if ui.add_enabled(cur < total, egui::Button::new("▶")).clicked()
                                {
                                    self.page = cur + 1;
                                    self.start_fetch(ctx);
                                }
                            });
                        });
                    }
                });
        });

        // Logs window (separate OS viewport)
        logs_ui::draw_logs_viewport(ctx);

        // Settings window (separate OS viewport)
        settings::draw_settings_viewport(ctx);
    }
}

impl PuppygramApp {
    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(crate::ui_constants::spacing::SMALL);
            ui.horizontal(|ui| {
                ui.heading("Puppygram 🐾");
                ui.separator();

                // Author search with debounce
                let prev_query = self.author_query.clone();
                ui.label("Author:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.author_query)
                        .desired_width(160.0)
                        .hint_text("anyone"),
                );
                if self.author_query != prev_query {
                    self.search_due_at =
                        Some(Instant::now() + Duration::from_millis(SEARCH_DEBOUNCE_MS));
                    ctx.request_repaint_after(Duration::from_millis(SEARCH_DEBOUNCE_MS));
                }

                ui.separator();

                // Local sort; does not refetch
                egui::ComboBox::from_id_source("feed_sort")
                    .selected_text(self.sort.label())
                    .show_ui(ui, |ui| {
                        use strum::IntoEnumIterator;
                        for s in FeedSort::iter() {
                            ui.selectable_value(&mut self.sort, s, s.label());
                        }
                    });

                ui.separator();

                // Column count, passed straight through to the grid
                ui.label("Columns:");
                let resp = ui.add(
                    egui::Slider::new(&mut self.photos_per_row, 1..=MAX_PHOTOS_PER_ROW)
                        .show_value(true),
                );
                if resp.changed() {
                    settings::set_photos_per_row(self.photos_per_row);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        settings::open_settings();
                        ctx.request_repaint();
                    }
                    if ui.button("Logs").clicked() {
                        logs_ui::open_logs();
                        ctx.request_repaint();
                    }
                    if ui.button("Refresh").clicked() {
                        self.start_fetch(ctx);
                    }
                });
            });
            ui.add_space(crate::ui_constants::spacing::SMALL);
        });
    }
}
