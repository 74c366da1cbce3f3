use eframe::egui::{self, Color32, RichText};

use crate::feed::Post;

/// Single-line meta row: likes, comments, post date.
pub fn draw_meta_row(ui: &mut egui::Ui, post: &Post) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = crate::ui_constants::spacing::MEDIUM;
        let col = Color32::from_rgb(170, 170, 170);

        ui.label(
            RichText::new(format!("👍 {}", post.likes.len()))
                .small()
                .color(col),
        );
        ui.label(
            RichText::new(format!("💬 {}", post.comments.len()))
                .small()
                .color(col),
        );
        ui.label(
            RichText::new(format!("🕓 {}", post.created_date()))
                .small()
                .color(col),
        );
    });
}
