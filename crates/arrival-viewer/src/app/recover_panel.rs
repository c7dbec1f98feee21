//! The Recover tab: when to run to get over jet lag

use arrival_routes::jetlag::{self, CITIES, DEFAULT_CITY, Recommendation};
use egui::RichText;

pub struct RecoverPanel {
    home_city: usize,
    /// Free text, only echoed back with the result
    landing_time: String,
    recommendation: Option<Recommendation>,
}

impl Default for RecoverPanel {
    fn default() -> Self {
        Self {
            home_city: DEFAULT_CITY,
            landing_time: "08:00".to_string(),
            recommendation: None,
        }
    }
}

impl RecoverPanel {
    pub fn calculate(&mut self) -> Recommendation {
        let recommendation = jetlag::recommend(CITIES[self.home_city].offset);
        self.recommendation = Some(recommendation);
        recommendation
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.heading(RichText::new("✈ Jet Lag Recovery").strong());
        ui.label(RichText::new("Find the best time to run when you land.").weak());
        ui.add_space(16.0);

        egui::Grid::new("recover_inputs")
            .num_columns(2)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                ui.label("Home city");
                let previous = self.home_city;
                egui::ComboBox::from_id_salt("home_city")
                    .selected_text(CITIES[self.home_city].name)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for (index, city) in CITIES.iter().enumerate() {
                            ui.selectable_value(&mut self.home_city, index, city.name);
                        }
                    });
                if previous != self.home_city {
                    self.recommendation = None;
                }
                ui.end_row();

                ui.label("Landing time");
                ui.add(
                    egui::TextEdit::singleline(&mut self.landing_time)
                        .hint_text("HH:MM")
                        .desired_width(80.0),
                );
                ui.end_row();
            });

        ui.add_space(12.0);
        if ui.button("Calculate Run Window").clicked() {
            self.calculate();
        }

        if let Some(rec) = &self.recommendation {
            ui.add_space(16.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                let hours = jetlag::time_difference(CITIES[self.home_city].offset);
                ui.label(
                    RichText::new(format!(
                        "Landing at {} · {:+} h from home",
                        self.landing_time.trim(),
                        hours
                    ))
                    .weak(),
                );
                ui.label(RichText::new(rec.action).strong().size(18.0));
                ui.label(rec.reason);
            });
        }
    }
}
