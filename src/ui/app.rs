use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ClientEvent, Resource};
use crate::compose::SubmissionHandler;
use crate::config;

use super::components::{chat_area, event_panel, input_bar, page_bar};
use super::state::AppState;

/// What the window needs to know about where messages go.
pub struct DmAppOptions {
    pub page_url: String,
    pub base_url: String,
    pub resource: Resource,
    pub rollback_failed: bool,
    /// Config file the last opened page is written back to.
    pub config_path: String,
}

pub struct DmApp {
    state: AppState,
    handler: SubmissionHandler,
    event_receiver: mpsc::Receiver<ClientEvent>,
    base_url: String,
    resource: Resource,
    config_path: String,
}

impl DmApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        options: DmAppOptions,
        handler: SubmissionHandler,
        event_receiver: mpsc::Receiver<ClientEvent>,
    ) -> Self {
        Self {
            state: AppState::new(&options.page_url, options.rollback_failed),
            handler,
            event_receiver,
            base_url: options.base_url,
            resource: options.resource,
            config_path: options.config_path,
        }
    }

    fn handle_client_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply_event(event);
        }
    }

    fn submit(&mut self) {
        if let Some(local_id) = self
            .handler
            .on_submit(&mut self.state.form, &mut self.state.list)
        {
            self.state.note_submitted(&local_id);
        }
    }

    fn open_page(&mut self) {
        if let Some(page_url) = self.state.open_page() {
            config::persist_page_url(&self.config_path, &page_url);
        }
    }
}

impl eframe::App for DmApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_client_events();

        egui::TopBottomPanel::top("page_bar").show(ctx, |ui| {
            let resource = self.resource;
            if page_bar::render(ui, &mut self.state, &self.base_url, resource) {
                self.open_page();
            }
        });

        egui::SidePanel::right("event_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                event_panel::render(ui, &self.state);
            });

        egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            if input_bar::render(ui, &mut self.state.form.input_text) {
                self.submit();
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Direct Messages");
            ui.separator();
            chat_area::render(ui, self.state.list.rows());
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
