use eframe::egui::{self, Color32, Rounding, Sense, Vec2};

use crate::feed::Post;

/// Draws the post photo as a square spanning `inner_w`. The texture is
/// center-cropped to the square, never stretched. While the photo is still
/// loading a dimmed placeholder with a spinner is shown; a post without a
/// photo gets a quiet empty tile.
pub fn draw_photo(
    ui: &mut egui::Ui,
    post: &Post,
    inner_w: f32,
    tex: Option<&egui::TextureHandle>,
) {
    let (rect, _resp) = ui.allocate_exact_size(Vec2::new(inner_w, inner_w), Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }

    match tex {
        Some(tex) => {
            let painter = ui.painter_at(rect);
            painter.image(tex.id(), rect, crop_uv(tex.size()), Color32::WHITE);
        }
        None => {
            ui.painter_at(rect)
                .rect_filled(rect, Rounding::same(4.0), Color32::from_rgb(24, 24, 24));
            ui.allocate_ui_at_rect(rect, |ui| {
                ui.centered_and_justified(|ui| {
                    if post.photo.is_empty() {
                        ui.label(
                            egui::RichText::new("no photo")
                                .small()
                                .color(Color32::from_rgb(90, 90, 90)),
                        );
                    } else {
                        ui.add(egui::Spinner::new());
                    }
                });
            });
        }
    }
}

/// UV rect that center-crops a w*h texture to a square.
fn crop_uv(size: [usize; 2]) -> egui::Rect {
    let (w, h) = (size[0] as f32, size[1] as f32);
    if w <= 0.0 || h <= 0.0 {
        return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }
    if w > h {
        let x = (1.0 - h / w) / 2.0;
        egui::Rect::from_min_max(egui::pos2(x, 0.0), egui::pos2(1.0 - x, 1.0))
    } else {
        let y = (1.0 - w / h) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, y), egui::pos2(1.0, 1.0 - y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_texture_is_not_cropped() {
        let uv = crop_uv([512, 512]);
        assert_eq!(uv.min, egui::pos2(0.0, 0.0));
        assert_eq!(uv.max, egui::pos2(1.0, 1.0));
    }

    #[test]
    fn wide_texture_crops_horizontally() {
        let uv = crop_uv([200, 100]);
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);
    }

    #[test]
    fn tall_texture_crops_vertically() {
        let uv = crop_uv([100, 400]);
        assert_eq!(uv.min.x, 0.0);
        assert_eq!(uv.max.x, 1.0);
        assert!((uv.min.y - 0.375).abs() < 1e-6);
        assert!((uv.max.y - 0.625).abs() < 1e-6);
    }
}
