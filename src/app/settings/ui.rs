// Settings UI: egui viewport window with staged inputs (Save/Cancel).

use eframe::egui;
use lazy_static::lazy_static;
use std::sync::RwLock;

use super::store::{save_settings_to_disk, unhide_all_posts, APP_SETTINGS};

lazy_static! {
    static ref SETTINGS_OPEN: RwLock<bool> = RwLock::new(false);
    static ref API_BASE_INPUT: RwLock<String> = RwLock::new(String::new());
    static ref CACHE_DIR_INPUT: RwLock<String> = RwLock::new(String::new());
    static ref CACHE_PHOTOS_INPUT: RwLock<bool> = RwLock::new(false);
}

pub fn open_settings() {
    {
        let s = APP_SETTINGS.read().unwrap();
        *API_BASE_INPUT.write().unwrap() = s.api_base.clone();
        *CACHE_DIR_INPUT.write().unwrap() = s.cache_dir.to_string_lossy().to_string();
        *CACHE_PHOTOS_INPUT.write().unwrap() = s.cache_photos;
    }
    *SETTINGS_OPEN.write().unwrap() = true;
}

pub fn draw_settings_viewport(ctx: &egui::Context) {
    if !*SETTINGS_OPEN.read().unwrap() {
        return;
    }
    let viewport_id = egui::ViewportId::from_hash_of("settings_window");
    ctx.show_viewport_immediate(
        viewport_id,
        egui::ViewportBuilder::default()
            .with_title("Settings")
            .with_inner_size([560.0, 320.0])
            .with_resizable(true),
        move |ctx, _class| {
            if ctx.input(|i| i.viewport().close_requested()) {
                *SETTINGS_OPEN.write().unwrap() = false;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
            egui::CentralPanel::default().show(ctx, |ui| {
                // API server
                ui.horizontal(|ui| {
                    ui.label("API server:");
                    let mut val = API_BASE_INPUT.read().unwrap().clone();
                    if ui
                        .add(
                            egui::TextEdit::singleline(&mut val)
                                .hint_text("http://localhost:5000"),
                        )
                        .changed()
                    {
                        *API_BASE_INPUT.write().unwrap() = val;
                    }
                });

                // Photo cache folder (click to pick)
                ui.horizontal(|ui| {
                    ui.label("Cache folder:");
                    let cache_val = CACHE_DIR_INPUT.read().unwrap().clone();
                    let resp =
                        ui.add(egui::Label::new(cache_val.clone()).sense(egui::Sense::click()));
                    if resp.clicked() {
                        let init = if !cache_val.is_empty() {
                            std::path::PathBuf::from(cache_val)
                        } else {
                            std::env::current_dir()
                                .unwrap_or_else(|_| std::path::PathBuf::from("."))
                        };
                        if let Some(dir) = rfd::FileDialog::new().set_directory(init).pick_folder()
                        {
                            *CACHE_DIR_INPUT.write().unwrap() =
                                dir.to_string_lossy().to_string();
                        }
                    }
                });

                {
                    let mut b = *CACHE_PHOTOS_INPUT.read().unwrap();
                    if ui.checkbox(&mut b, "Keep photos on disk").changed() {
                        *CACHE_PHOTOS_INPUT.write().unwrap() = b;
                    }
                }

                ui.separator();

                let hidden_count = { APP_SETTINGS.read().unwrap().hidden_posts.len() };
                if ui
                    .add_enabled(
                        hidden_count > 0,
                        egui::Button::new(format!("Unhide all posts ({hidden_count})")),
                    )
                    .clicked()
                {
                    unhide_all_posts();
                }

                ui.add_space(crate::ui_constants::spacing::MEDIUM);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        {
                            let mut st = APP_SETTINGS.write().unwrap();
                            st.api_base = API_BASE_INPUT.read().unwrap().trim().to_string();
                            st.cache_dir = std::path::PathBuf::from(
                                CACHE_DIR_INPUT.read().unwrap().clone(),
                            );
                            st.cache_photos = *CACHE_PHOTOS_INPUT.read().unwrap();
                        }
                        save_settings_to_disk();
                        *SETTINGS_OPEN.write().unwrap() = false;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    if ui.button("Cancel").clicked() {
                        *SETTINGS_OPEN.write().unwrap() = false;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        },
    );
}
