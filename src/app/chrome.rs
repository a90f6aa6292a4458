//! Site chrome for `SiteApp`.
//!
//! Header with the studio wordmark, history buttons and the two top-level
//! links; footer with contact details.

use std::time::Instant;

use eframe::egui;
use skarpe_mobler::router::Route;

use super::SiteApp;

impl SiteApp {
    /// Render the header strip.
    pub fn draw_header(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            // Back / Forward
            if ui
                .add_enabled(
                    self.router.can_go_back(),
                    egui::Button::new("\u{25C0}").min_size(egui::vec2(28.0, 24.0)),
                )
                .clicked()
            {
                self.go_back();
            }
            if ui
                .add_enabled(
                    self.router.can_go_forward(),
                    egui::Button::new("\u{25B6}").min_size(egui::vec2(28.0, 24.0)),
                )
                .clicked()
            {
                self.go_forward();
            }

            ui.add_space(12.0);
            let wordmark = egui::RichText::new(self.config.title.to_uppercase())
                .size(22.0)
                .strong();
            if ui.add(egui::Label::new(wordmark).sense(egui::Sense::click())).clicked() {
                self.navigate("/", now);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                let on_gallery = matches!(self.router.route(), Route::Gallery | Route::Detail(_));
                if ui.selectable_label(on_gallery, "Furniture").clicked() {
                    self.navigate("/furniture", now);
                }
                let on_home = matches!(self.router.route(), Route::Home);
                if ui.selectable_label(on_home, "Home").clicked() {
                    self.navigate("/", now);
                }
            });
        });
    }

    /// Render the contact footer.
    pub fn draw_footer(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!(
                    "Contact us: {} | {}",
                    self.config.contact.email, self.config.contact.phone
                ))
                .size(13.0)
                .color(egui::Color32::from_gray(90)),
            );
            ui.add_space(4.0);
        });
    }
}
