//! The Map tab: route selector, locate button and route info over a
//! walkers map.
//!
//! A `MapPanel` is created when the tab is shown and dropped when the user
//! leaves it, which also drops any fetch or locate result still in flight.

use crate::app::plugin::RoutePlugin;
use crate::app::settings::Settings;
use arrival_routes::{
    CameraCommand, DirRouteSource, FixedLocation, HttpRouteSource, LocationProvider, MapViewModel,
    RouteDefinition, RouteKey, RouteSource,
};
use egui::{Color32, RichText};
use std::sync::Arc;
use walkers::{
    HttpTiles, Map, MapMemory, TileId,
    sources::{Attribution, TileSource},
};

/// How long a geolocation failure stays on screen
const LOCATE_NOTICE_SECS: f32 = 3.0;

/// CARTO dark basemap
pub struct CartoDark;

impl TileSource for CartoDark {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://a.basemaps.cartocdn.com/dark_all/{}/{}/{}.png",
            tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors © CARTO",
            url: "https://carto.com/attributions",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        20
    }
}

fn route_color(route: &RouteDefinition) -> Color32 {
    let (r, g, b) = route.rgb();
    Color32::from_rgb(r, g, b)
}

fn route_source(settings: &Settings) -> Arc<dyn RouteSource> {
    if let Some(base_url) = &settings.base_url {
        match HttpRouteSource::new(base_url.clone(), settings.fetch_timeout()) {
            Ok(source) => return Arc::new(source),
            Err(e) => tracing::warn!(
                "Cannot build HTTP client for {base_url} ({e}); reading {} instead",
                settings.data_dir.display()
            ),
        }
    }
    Arc::new(DirRouteSource::new(settings.data_dir.clone()))
}

pub struct MapPanel {
    view: MapViewModel,
    map_memory: MapMemory,
    line_width: f32,
    /// Message and time of the last failed locate request
    locate_notice: Option<(String, instant::Instant)>,
}

impl MapPanel {
    /// Build the view-model and start loading the initial route
    pub fn mount(settings: &Settings, ctx: &egui::Context) -> Self {
        let locator = settings
            .location
            .map(|position| Arc::new(FixedLocation(position)) as Arc<dyn LocationProvider>);

        let repaint_ctx = ctx.clone();
        let mut view = MapViewModel::new(route_source(settings), locator)
            .with_initial_route(settings.route)
            .with_notifier(Arc::new(move || repaint_ctx.request_repaint()));
        view.initialize();
        tracing::debug!("Map mounted, reading routes from {}", view.source_description());

        Self {
            view,
            map_memory: MapMemory::default(),
            line_width: settings.line_width,
            locate_notice: None,
        }
    }

    fn apply_camera(&mut self, command: CameraCommand) {
        // walkers has no animated transitions, so a fly-to jumps like a set-view
        let (target, zoom) = match command {
            CameraCommand::SetView { center, zoom } => (center, zoom),
            CameraCommand::FlyTo { target, zoom } => (target, zoom),
        };
        self.map_memory
            .center_at(walkers::lat_lon(target.lat, target.lon));
        if self.map_memory.set_zoom(zoom).is_err() {
            tracing::debug!("Zoom {zoom} out of range");
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, tiles: &mut HttpTiles) {
        profiling::scope!("map_panel");

        self.view.poll();
        if let Some(e) = self.view.take_locate_failure() {
            self.locate_notice = Some((e.to_string(), instant::Instant::now()));
        }
        while let Some(command) = self.view.take_camera_command() {
            self.apply_camera(command);
        }

        let route = self.view.route();
        let plugin = RoutePlugin::new(
            self.view.current_path().clone(),
            route_color(route),
            self.line_width,
        )
        .with_user_location(self.view.user_location());

        let map = Map::new(
            Some(tiles),
            &mut self.map_memory,
            walkers::lat_lon(route.center.lat, route.center.lon),
        )
        .with_plugin(plugin);
        ui.add(map);

        self.route_selector(ui);
        self.locate_button(ui);
        self.route_info(ui);
        self.locate_notice(ui);
    }

    fn route_selector(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let mut selected = None;

        egui::Area::new(egui::Id::new("route_selector"))
            .fixed_pos(rect.center_top() + egui::vec2(0.0, 12.0))
            .pivot(egui::Align2::CENTER_TOP)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for key in RouteKey::ALL {
                            let route = key.definition();
                            let active = self.view.active_route() == key;
                            let text = RichText::new(route.name).strong();
                            let text = if active {
                                text.color(route_color(route))
                            } else {
                                text
                            };
                            if ui.selectable_label(active, text).clicked() {
                                selected = Some(key);
                            }
                        }
                    });
                });
            });

        if let Some(key) = selected {
            self.view.select_route(key);
        }
    }

    /// Round button in the top-right corner
    fn locate_button(&mut self, ui: &mut egui::Ui) {
        let button_size = egui::vec2(40.0, 40.0);
        let margin = 12.0;

        let rect = ui.max_rect();
        let button_pos = rect.right_top() + egui::vec2(-button_size.x - margin, 64.0);
        let button_rect = egui::Rect::from_min_size(button_pos, button_size);

        let response = ui
            .allocate_rect(button_rect, egui::Sense::click())
            .on_hover_text("Show my location");

        if response.clicked()
            && let Err(e) = self.view.locate_me()
        {
            self.locate_notice = Some((e.to_string(), instant::Instant::now()));
        }

        let bg_color = if response.hovered() {
            ui.visuals().widgets.hovered.bg_fill
        } else {
            ui.visuals().widgets.inactive.bg_fill
        };
        ui.painter()
            .circle_filled(button_rect.center(), button_size.x / 2.0, bg_color);

        let icon = if self.view.is_locating() { "…" } else { "⌖" };
        ui.painter().text(
            button_rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(22.0),
            ui.visuals().text_color(),
        );
    }

    /// Name and advertised distance of the active route, above the bottom edge
    fn route_info(&self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let route = self.view.route();

        let path = self.view.current_path();

        let area = egui::Area::new(egui::Id::new("route_info"))
            .fixed_pos(rect.center_bottom() + egui::vec2(0.0, -24.0))
            .pivot(egui::Align2::CENTER_BOTTOM)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("{} Loop", route.name)).strong());
                        ui.label("|");
                        ui.label(RichText::new(route.distance_label).color(route_color(route)));
                        if self.view.is_loading() {
                            ui.spinner();
                        } else if path.is_empty() && self.view.last_fetch_error().is_some() {
                            ui.label(RichText::new("no route data").weak());
                        }
                    });
                });
            });

        if !path.is_empty() {
            area.response.on_hover_text(format!(
                "{} points, {:.2} km measured",
                path.len(),
                path.length_meters() / 1000.0
            ));
        }
    }

    fn locate_notice(&mut self, ui: &mut egui::Ui) {
        let Some((message, shown_at)) = &self.locate_notice else {
            return;
        };
        if shown_at.elapsed().as_secs_f32() >= LOCATE_NOTICE_SECS {
            self.locate_notice = None;
            return;
        }

        let message = message.clone();
        let rect = ui.max_rect();
        egui::Area::new(egui::Id::new("locate_notice"))
            .fixed_pos(rect.center_top() + egui::vec2(0.0, 72.0))
            .pivot(egui::Align2::CENTER_TOP)
            .interactable(false)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(RichText::new(message).color(Color32::LIGHT_RED));
                });
            });
        ui.ctx()
            .request_repaint_after(std::time::Duration::from_millis(250));
    }
}
