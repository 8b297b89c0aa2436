use std::collections::{HashSet, VecDeque};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Address;
use wallet_core::{Action, WalletEvent};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::view_model::{ScreenButton, ScreenModel};

const ACTIVITY_LOG_LIMIT: usize = 50;

pub struct MinterApp {
    title: String,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    account: Option<Address>,
    in_flight: HashSet<Action>,
    alerts: VecDeque<String>,
    activity: VecDeque<String>,
    last_transaction: Option<String>,
    status: String,
}

impl MinterApp {
    /// Queues the startup account discovery right away.
    pub fn new(
        title: impl Into<String>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        let mut app = Self {
            title: title.into(),
            cmd_tx,
            ui_rx,
            account: None,
            in_flight: HashSet::new(),
            alerts: VecDeque::new(),
            activity: VecDeque::new(),
            last_transaction: None,
            status: "Checking for an authorized wallet account".to_string(),
        };
        app.dispatch(BackendCommand::CheckWallet);
        app
    }

    pub fn screen(&self) -> ScreenModel {
        ScreenModel::build(&self.title, self.account, &self.in_flight)
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            let line = self.status.clone();
            self.log(line);
        }
    }

    fn log(&mut self, line: impl Into<String>) {
        if self.activity.len() == ACTIVITY_LOG_LIMIT {
            self.activity.pop_front();
        }
        self.activity.push_back(line.into());
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message.clone();
                    self.log(message);
                }
                UiEvent::SessionChanged(account) => {
                    self.account = account;
                    self.status = match account {
                        Some(account) => format!("Connected as {account}"),
                        None => "Wallet not connected".to_string(),
                    };
                    let line = self.status.clone();
                    self.log(line);
                }
                UiEvent::Wallet(event) => self.apply_wallet_event(event),
                UiEvent::ActionFinished(action) => {
                    self.in_flight.remove(&action);
                }
                UiEvent::Error(err) => {
                    tracing::warn!(
                        context = ?err.context(),
                        category = ?err.category(),
                        "{}",
                        err.message()
                    );
                    self.status = err.status_line();
                    self.log(err.status_line());
                }
            }
        }
    }

    fn apply_wallet_event(&mut self, event: WalletEvent) {
        match event {
            WalletEvent::Alert(message) => {
                self.log(format!("Alert: {message}"));
                self.alerts.push_back(message);
            }
            WalletEvent::ActionStarted(action) => {
                self.in_flight.insert(action);
                self.status = format!("{action}: initialize payment");
                self.log(format!("{action}: initialize payment"));
            }
            WalletEvent::ActionRejectedBusy(action) => {
                self.log(format!("{action} ignored; the previous one is still pending"));
            }
            WalletEvent::TransactionSubmitted { action, hash } => {
                let label = capitalize(action.progress_label());
                self.status = format!("{label}... please wait");
                self.log(format!("{label}... please wait ({hash})"));
            }
            WalletEvent::TransactionConfirmed {
                action,
                explorer_url,
                ..
            } => {
                self.in_flight.remove(&action);
                let label = capitalize(action.done_label());
                self.status = format!("{label}, see transaction");
                self.log(format!("{label}, see transaction: {explorer_url}"));
                self.last_transaction = Some(explorer_url);
            }
            WalletEvent::ActionFailed {
                action,
                kind,
                reason,
            } => {
                self.in_flight.remove(&action);
                let context = match action {
                    Action::Mint => UiErrorContext::Mint,
                    Action::Burn => UiErrorContext::Burn,
                };
                let err = UiError::new(UiErrorCategory::from(kind), context, reason);
                self.status = err.status_line();
                self.log(err.status_line());
            }
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alerts.front() else {
            return;
        };
        let mut acknowledged = false;
        egui::Window::new("Alert")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });
        if acknowledged {
            self.alerts.pop_front();
        }
    }

    fn show_main_screen(&mut self, ctx: &egui::Context) {
        let model = self.screen();
        let mut clicked = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.heading(&model.title);
                ui.add_space(8.0);
                match model.account {
                    Some(account) => ui.monospace(format!("Account: {account}")),
                    None => ui.weak("No wallet account connected"),
                };
                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    for state in &model.buttons {
                        let button = egui::Button::new(state.button.label())
                            .min_size(egui::vec2(140.0, 32.0));
                        if ui.add_enabled(state.enabled, button).clicked() {
                            clicked.push(state.button);
                        }
                    }
                });
                if let Some(link) = &self.last_transaction {
                    ui.add_space(8.0);
                    ui.hyperlink_to("View last transaction", link);
                }
            });

            ui.add_space(16.0);
            ui.separator();
            ui.label(&self.status);
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.activity {
                        ui.small(line);
                    }
                });
        });

        for button in clicked {
            self.dispatch(button.command());
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl eframe::App for MinterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_main_screen(ctx);
        self.show_alert(ctx);

        if self.in_flight.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
