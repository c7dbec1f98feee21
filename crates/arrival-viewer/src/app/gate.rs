//! Optional password gate in front of the app
//!
//! This only keeps casual visitors out; the password is compared in plain
//! text and the "authenticated" marker is an opaque string in local storage.

use crate::app::storage::StorageBackend;
use egui::{Color32, RichText};

const TOKEN_KEY: &str = "arrival_auth_token";
const TOKEN_VALUE: &str = "valid";
/// How long the "Incorrect password" message stays up
const ERROR_DISPLAY_SECS: f32 = 2.0;

pub struct AccessGate {
    /// `None` disables the gate
    password: Option<String>,
    storage: Box<dyn StorageBackend>,
    authenticated: bool,
    input: String,
    error_shown_at: Option<instant::Instant>,
}

impl AccessGate {
    pub fn new(password: Option<String>, storage: Box<dyn StorageBackend>) -> Self {
        let authenticated = match &password {
            None => true,
            Some(_) => match storage.get_string(TOKEN_KEY) {
                Ok(token) => token.as_deref() == Some(TOKEN_VALUE),
                Err(e) => {
                    tracing::warn!("Could not read access token: {e}");
                    false
                }
            },
        };

        Self {
            password,
            storage,
            authenticated,
            input: String::new(),
            error_shown_at: None,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.authenticated
    }

    /// Check `attempt` against the password, case-insensitively
    pub fn submit(&mut self, attempt: &str) -> bool {
        let Some(password) = &self.password else {
            return true;
        };

        if attempt.to_lowercase() == password.to_lowercase() {
            if let Err(e) = self.storage.set_string(TOKEN_KEY, TOKEN_VALUE) {
                tracing::warn!("Could not remember access: {e}");
            }
            self.authenticated = true;
            self.error_shown_at = None;
            tracing::info!("Access granted");
        } else {
            self.error_shown_at = Some(instant::Instant::now());
        }
        self.authenticated
    }

    pub fn showing_error(&self) -> bool {
        self.error_shown_at
            .is_some_and(|at| at.elapsed().as_secs_f32() < ERROR_DISPLAY_SECS)
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.label(RichText::new("🔒").size(40.0));
                ui.heading(RichText::new("Arrival").size(28.0).strong());
                ui.label(RichText::new("Restricted Access").weak());
                ui.add_space(24.0);

                let input = egui::TextEdit::singleline(&mut self.input)
                    .password(true)
                    .hint_text("Enter password")
                    .desired_width(260.0);
                let response = ui.add(input);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(8.0);
                if ui.button("Enter ➡").clicked() || submitted {
                    let attempt = std::mem::take(&mut self.input);
                    self.submit(&attempt);
                }

                if self.showing_error() {
                    ui.add_space(8.0);
                    ui.label(RichText::new("Incorrect password").color(Color32::RED));
                    ctx.request_repaint_after(std::time::Duration::from_millis(200));
                }
            });
        });
    }
}
