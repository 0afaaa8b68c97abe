// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background preview with the item text laid over it.
//!
//! Text is sized with the same relative units sent to the renderer, so the
//! preview matches the output at any panel size.

use crate::models::item::{Item, Position};
use crate::models::job::RelativeStyle;

/// Portrait 9:16 canvas.
const ASPECT: f32 = 9.0 / 16.0;
const MAX_WIDTH: f32 = 360.0;

/// State of the preview background.
pub enum PreviewImage {
    None,
    Loading,
    Ready(egui::TextureHandle),
    /// Shown as a label instead of an image (videos, load failures).
    Placeholder(String),
}

/// Paint the preview canvas.
pub fn show(ui: &mut egui::Ui, image: &PreviewImage, item: &Item, dim: f32) {
    let width = ui.available_width().min(MAX_WIDTH);
    let size = egui::vec2(width, width / ASPECT);
    let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 6.0, egui::Color32::BLACK);

    match image {
        PreviewImage::Ready(texture) => {
            painter.image(
                texture.id(),
                cover_rect(rect, texture.size_vec2()),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        PreviewImage::Loading => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Loading…",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(120),
            );
        }
        PreviewImage::Placeholder(label) => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(13.0),
                egui::Color32::from_gray(140),
            );
        }
        PreviewImage::None => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No background",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(90),
            );
        }
    }

    let alpha = (dim.clamp(0.0, 1.0) * 255.0).round() as u8;
    painter.rect_filled(rect, 6.0, egui::Color32::from_black_alpha(alpha));

    if item.text.is_empty() {
        return;
    }

    let style = RelativeStyle::from_pixels(item.font_size, item.line_gap, item.margin, item.position);
    let font_px = (style.font_vh as f32 / 100.0 * rect.height()).max(4.0);
    let margin_px = style.margin_vh as f32 / 100.0 * rect.height();
    let wrap_width = (rect.width() - 2.0 * margin_px).max(font_px);

    let mut job = egui::text::LayoutJob::default();
    job.append(
        &item.text,
        0.0,
        egui::TextFormat {
            font_id: egui::FontId::proportional(font_px),
            color: egui::Color32::WHITE,
            line_height: Some(font_px * (1.0 + style.line_gap_em as f32)),
            ..Default::default()
        },
    );
    job.wrap.max_width = wrap_width;
    job.halign = egui::Align::Center;
    let galley = ui.fonts(|fonts| fonts.layout_job(job));

    let height = galley.size().y;
    let top = match item.position {
        Position::Top => rect.top() + margin_px,
        Position::Center => rect.center().y - height / 2.0,
        Position::Bottom => rect.bottom() - margin_px - height,
    };
    painter.galley(egui::pos2(rect.center().x, top), galley, egui::Color32::WHITE);
}

/// Scale `image_size` to cover `rect`, centered (like CSS `object-fit: cover`).
fn cover_rect(rect: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return rect;
    }
    let scale = (rect.width() / image_size.x).max(rect.height() / image_size.y);
    egui::Rect::from_center_size(rect.center(), image_size * scale)
}
