//! Walkers plugin drawing the active route and the user's position

use arrival_routes::{Coordinate, CoordinatePath};
use egui::{Color32, Stroke};
use walkers::{Plugin, Projector};

const USER_MARKER_RADIUS: f32 = 8.0;
const USER_MARKER_FILL: Color32 = Color32::from_rgb(0x2F, 0x80, 0xED);

pub struct RoutePlugin {
    path: CoordinatePath,
    color: Color32,
    width: f32,
    user_location: Option<Coordinate>,
}

impl RoutePlugin {
    pub fn new(path: CoordinatePath, color: Color32, width: f32) -> Self {
        Self {
            path,
            color,
            width,
            user_location: None,
        }
    }

    pub fn with_user_location(mut self, location: Option<Coordinate>) -> Self {
        self.user_location = location;
        self
    }
}

fn to_screen(projector: &Projector, coordinate: Coordinate) -> egui::Pos2 {
    let screen_vec = projector.project(walkers::lat_lon(coordinate.lat, coordinate.lon));
    egui::Pos2::new(screen_vec.x, screen_vec.y)
}

impl Plugin for RoutePlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        _response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("RoutePlugin::run");

        let painter = ui.painter();

        if self.path.len() >= 2 {
            let screen_points: Vec<egui::Pos2> = self
                .path
                .iter()
                .map(|coordinate| to_screen(projector, *coordinate))
                .collect();
            painter.add(egui::Shape::line(
                screen_points,
                Stroke::new(self.width, self.color),
            ));
        }

        if let Some(location) = self.user_location {
            painter.circle(
                to_screen(projector, location),
                USER_MARKER_RADIUS,
                USER_MARKER_FILL,
                Stroke::new(2.0, Color32::WHITE),
            );
        }
    }
}
