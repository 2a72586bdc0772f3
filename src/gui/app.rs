// src/gui/app.rs
use std::{
    error::Error,
    time::{Duration, Instant},
};

use eframe::egui;

use crate::{
    config::{
        consts::{ERROR_TRACE_PREVIEW, FRONT_POLL_MS},
        state::AppState,
    },
    core::sanitize::truncate_chars,
    specs::login::Credentials,
    worker::{Answer, Event, Poll, RunHandle, RunParams},
};

use super::components::{error_dialog, login_panel, save_dialog, status_log, wing_dialog};

const CLOSE_DELAY: Duration = Duration::from_millis(500);

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Canaimé Cara-Crachá",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    Status,
    Log,
    Success,
    Error,
}

impl LogKind {
    pub fn label(self) -> &'static str {
        match self {
            LogKind::Status => "status",
            LogKind::Log => "log",
            LogKind::Success => "success",
            LogKind::Error => "error",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogLine {
    pub kind: LogKind,
    pub message: String,
}

pub struct App {
    // single source of truth for form text (UI thread only)
    pub state: AppState,

    // live run, if any; dropped once it reports terminated
    pub run: Option<RunHandle>,

    pub log: Vec<LogLine>,
    pub login_hint: Option<String>,

    // dialogs
    pub wing_dialog_open: bool,
    pub wing_warning: Option<String>,
    pub save_dialog_open: bool,
    pub login_error: Option<String>,
    pub confirm_close: bool,

    close_at: Option<Instant>,
    allow_close: bool,
}

impl App {
    pub fn new(state: AppState) -> Self {
        logf!("Init: GUI ready");
        Self {
            state,
            run: None,
            log: Vec::new(),
            login_hint: None,
            wing_dialog_open: false,
            wing_warning: None,
            save_dialog_open: false,
            login_error: None,
            confirm_close: false,
            close_at: None,
            allow_close: false,
        }
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.run.is_some()
    }

    #[inline]
    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        self.log.push(LogLine { kind, message: message.into() });
    }

    /// Validate the login form and spawn a fresh run (fresh channels + cancel flag).
    pub fn start(&mut self) {
        if self.running() {
            return;
        }
        let gui = &self.state.gui;
        if gui.username.trim().is_empty() || gui.password.is_empty() {
            self.login_hint = Some(s!("Enter both username and password."));
            return;
        }
        self.login_hint = None;
        self.log.clear();

        let params = RunParams {
            headless: false,
            credentials: Credentials::new(gui.username.trim(), gui.password.as_str()),
            options: self.state.options.clone(),
        };
        match RunHandle::spawn(params) {
            Ok(handle) => {
                logf!("UI: Run started");
                self.push(LogKind::Status, "Starting...");
                self.run = Some(handle);
            }
            Err(e) => {
                loge!("UI: Could not start worker: {e}");
                self.push(LogKind::Error, format!("Could not start worker: {e}"));
            }
        }
    }

    pub fn answer(&mut self, ans: Answer) {
        match &self.run {
            Some(run) => run.answer(ans),
            None => logd!("UI: Answer with no run: {ans:?}"),
        }
    }

    pub fn cancel_run(&mut self) {
        if let Some(run) = &self.run {
            run.cancel();
            self.push(LogKind::Status, "Cancelling...");
        }
        self.wing_dialog_open = false;
        self.save_dialog_open = false;
    }

    /// Drain whatever the worker sent since the last frame.
    fn pump(&mut self) {
        let mut events = Vec::new();
        let mut finished = false;
        if let Some(run) = self.run.as_mut() {
            loop {
                match run.poll(Duration::ZERO) {
                    Poll::Event(ev) => events.push(ev),
                    Poll::Idle => break,
                    Poll::Finished => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        for ev in events {
            self.on_event(ev);
        }
        if finished {
            logf!("UI: Run terminated");
            self.run = None;
            self.wing_dialog_open = false;
            self.save_dialog_open = false;
        }
    }

    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Status(m) => self.push(LogKind::Status, m),
            Event::Log(m) => self.push(LogKind::Log, m),
            Event::Success(m) => self.push(LogKind::Success, m),
            Event::Error { message, trace, auth_failure } => {
                if auth_failure {
                    self.login_error = Some(message);
                } else {
                    self.push(LogKind::Error, message);
                    let preview = truncate_chars(&trace, ERROR_TRACE_PREVIEW);
                    for line in preview.lines().filter(|l| !l.trim().is_empty()) {
                        self.push(LogKind::Error, line);
                    }
                }
            }
            Event::Exit(m) => {
                self.push(LogKind::Status, m);
                self.close_at = Some(Instant::now() + CLOSE_DELAY);
            }
            Event::ChooseWings(wings) => {
                self.state.gui.offer_wings(&wings);
                self.wing_warning = None;
                self.wing_dialog_open = true;
            }
            Event::AskSavePath(suggested) => {
                self.state.gui.save_path_text = suggested;
                self.save_dialog_open = true;
            }
        }
    }

    fn handle_close(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.viewport().close_requested()) && self.running() && !self.allow_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.confirm_close = true;
        }

        if self.confirm_close {
            egui::Window::new("Quit?")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("A run is still in progress. Cancel it and quit?");
                    ui.horizontal(|ui| {
                        if ui.button("Quit").clicked() {
                            self.cancel_run();
                            self.confirm_close = false;
                            self.allow_close = true;
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                        if ui.button("Keep running").clicked() {
                            self.confirm_close = false;
                        }
                    });
                });
        }

        if let Some(at) = self.close_at {
            let now = Instant::now();
            if now >= at {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            } else {
                ctx.request_repaint_after(at - now);
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            login_panel::draw(ui, self);

            ui.separator();

            status_log::draw(ui, self);
        });

        wing_dialog::draw(ctx, self);
        save_dialog::draw(ctx, self);
        error_dialog::draw(ctx, self);
        self.handle_close(ctx);

        if self.running() {
            ctx.request_repaint_after(Duration::from_millis(FRONT_POLL_MS));
        }
    }
}
