use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::gallery::GalleryItem;

const MAX_IMAGE_WIDTH: f32 = 900.0;

/// Render a vertical gallery of captioned images.
pub fn gallery(ui: &mut Ui, items: &[GalleryItem]) {
    if items.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No images configured. Add entries to the gallery manifest.");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for item in items {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.heading(&item.title);
                    ui.add(
                        egui::Image::new(item.uri())
                            .max_width(ui.available_width().min(MAX_IMAGE_WIDTH))
                            .shrink_to_fit(),
                    );
                    if !item.caption.is_empty() {
                        ui.label(RichText::new(&item.caption).italics());
                    }
                });
                ui.separator();
            }
        });
}
