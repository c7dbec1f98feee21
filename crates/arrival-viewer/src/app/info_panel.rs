//! The Info tab: local running rules

use arrival_routes::rules::{Accordion, RULES};
use egui::RichText;

#[derive(Default)]
pub struct InfoPanel {
    accordion: Accordion,
}

impl InfoPanel {
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.heading(RichText::new("Local Rules").strong());
        ui.label(RichText::new("Survive your first run in the city.").weak());
        ui.add_space(16.0);

        for rule in &RULES {
            let open = self.accordion.is_open(rule.id);
            let chevron = if open { "⏷" } else { "⏵" };
            let header = RichText::new(format!("{chevron} {}", rule.title)).strong();

            if ui
                .add_sized(
                    [ui.available_width(), 32.0],
                    egui::Button::new(header).selected(open),
                )
                .clicked()
            {
                self.accordion.toggle(rule.id);
            }

            if open {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(rule.description);
                });
            }
            ui.add_space(6.0);
        }
    }
}
