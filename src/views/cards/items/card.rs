use eframe::egui::{self, Color32, RichText, Rounding, Stroke};

use crate::feed::Post;
use crate::ui_constants::card as card_const;

use super::meta_row::draw_meta_row;
use super::photo::draw_photo;

/// Actions reported by post_card so the caller can mutate app state.
#[derive(Default)]
pub struct CardAction {
    pub hide_clicked: bool,
    /// Photo URL the user asked to open in the browser.
    pub open_url: Option<String>,
}

/// Fixed-width feed card: photo, caption, author line, meta row.
/// Strictly constrained to `width` so rows form a proper grid.
/// All per-card egui ids are namespaced under the post id, so card identity
/// stays with the post across refetches and column changes.
pub fn post_card(
    ui: &mut egui::Ui,
    post: &Post,
    width: f32,
    photo_tex: Option<&egui::TextureHandle>,
) -> CardAction {
    let rounding = Rounding::same(card_const::ROUNDING);
    let fill = Color32::from_rgb(36, 36, 36);
    let stroke = Stroke::new(1.0, Color32::from_rgb(64, 64, 64));

    // Hard limit the card width inside the row.
    ui.set_min_width(width);
    ui.set_max_width(width);

    let mut action = CardAction::default();

    ui.push_id(("post_card", post.id.as_str()), |ui| {
        let frame_out = egui::Frame::none()
            .fill(fill)
            .stroke(stroke)
            .rounding(rounding)
            .inner_margin(egui::Margin::symmetric(
                card_const::INNER_MARGIN,
                card_const::INNER_MARGIN,
            ))
            .show(ui, |ui| {
                // Constrain inner content to card width minus inner margins.
                let inner_w = width - 2.0 * card_const::INNER_MARGIN;
                ui.set_width(inner_w);

                draw_photo(ui, post, inner_w, photo_tex);

                ui.add_space(card_const::POST_PHOTO_GAP);
                // Caption is a single truncated line to keep card height
                // data-independent (the grid relies on that).
                ui.add(
                    egui::Label::new(
                        RichText::new(&post.caption).color(Color32::from_rgb(230, 230, 230)),
                    )
                    .truncate(true),
                );

                ui.add_space(crate::ui_constants::spacing::SMALL);
                ui.label(
                    RichText::new(format!("by {}", post.author_name()))
                        .small()
                        .color(Color32::from_rgb(180, 180, 180)),
                );
                ui.add_space(crate::ui_constants::spacing::SMALL);

                // Meta plaque on a dark rounded background
                egui::Frame::none()
                    .fill(Color32::from_rgba_premultiplied(28, 28, 28, 180))
                    .rounding(Rounding::same(card_const::META_ROUNDING))
                    .inner_margin(egui::Margin::symmetric(
                        card_const::META_MARGIN_H,
                        card_const::META_MARGIN_V,
                    ))
                    .show(ui, |ui| {
                        draw_meta_row(ui, post);
                    });
            });

        // Full caption on hover since the label truncates.
        let resp = if post.caption.is_empty() {
            frame_out.response
        } else {
            frame_out.response.on_hover_text(&post.caption)
        };

        resp.context_menu(|ui| {
            if ui.button("Hide").clicked() {
                action.hide_clicked = true;
                ui.close_menu();
            }
            if !post.photo.is_empty() {
                if ui.button("Open photo in browser").clicked() {
                    action.open_url = Some(post.photo.clone());
                    ui.close_menu();
                }
            }
        });
    });

    action
}
