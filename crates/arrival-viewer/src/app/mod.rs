//! Application module
//!
//! - Optional password gate in front of everything
//! - Three tabs behind a bottom navigation bar: Map, Recover and Info

mod gate;
mod info_panel;
mod map_panel;
mod plugin;
mod recover_panel;
pub(crate) mod settings;
mod storage;

use crate::app::gate::AccessGate;
use crate::app::info_panel::InfoPanel;
use crate::app::map_panel::{CartoDark, MapPanel};
use crate::app::recover_panel::RecoverPanel;
use crate::app::settings::Settings;
use eframe::egui;
use walkers::HttpTiles;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Map,
    Recover,
    Info,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Map, Tab::Recover, Tab::Info];

    fn label(self) -> &'static str {
        match self {
            Tab::Map => "🗺 Map",
            Tab::Recover => "✈ Recover",
            Tab::Info => "ℹ Info",
        }
    }
}

pub struct ArrivalApp {
    settings: Settings,
    gate: AccessGate,
    tab: Tab,
    /// Kept across tab switches so downloaded tiles stay cached
    tiles: HttpTiles,
    /// Only present while the Map tab is shown
    map: Option<MapPanel>,
    recover: RecoverPanel,
    info: InfoPanel,
}

impl ArrivalApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let storage = storage::open_storage(settings.storage_file.clone());
        let gate = AccessGate::new(settings.password.clone(), storage);
        let tiles = HttpTiles::new(CartoDark, cc.egui_ctx.clone());

        Self {
            settings,
            gate,
            tab: Tab::Map,
            tiles,
            map: None,
            recover: RecoverPanel::default(),
            info: InfoPanel::default(),
        }
    }

    fn bottom_nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_nav")
            .exact_height(52.0)
            .show(ctx, |ui| {
                ui.columns(Tab::ALL.len(), |columns| {
                    for (column, tab) in columns.iter_mut().zip(Tab::ALL) {
                        column.vertical_centered_justified(|ui| {
                            ui.add_space(8.0);
                            ui.selectable_value(&mut self.tab, tab, tab.label());
                        });
                    }
                });
            });
    }
}

#[profiling::all_functions]
impl eframe::App for ArrivalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.gate.is_open() {
            self.gate.ui(ctx);
            return;
        }

        self.bottom_nav(ctx);

        if self.tab != Tab::Map && self.map.take().is_some() {
            tracing::debug!("Map unmounted");
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| match self.tab {
                Tab::Map => {
                    let map = self
                        .map
                        .get_or_insert_with(|| MapPanel::mount(&self.settings, ctx));
                    map.ui(ui, &mut self.tiles);
                }
                Tab::Recover => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        egui::Frame::NONE
                            .inner_margin(egui::Margin::same(16))
                            .show(ui, |ui| self.recover.ui(ui));
                    });
                }
                Tab::Info => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        egui::Frame::NONE
                            .inner_margin(egui::Margin::same(16))
                            .show(ui, |ui| self.info.ui(ui));
                    });
                }
            });
    }
}
