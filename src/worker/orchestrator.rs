// src/worker/orchestrator.rs
//
// One run, start to finish: login, roster, wing pick, details, save path, render.
// Talks to the front end only through the `WorkerLink`.

use std::path::PathBuf;

use crate::config::consts::{LOGIN_TOKEN, SUGGESTED_FILE_PREFIX};
use crate::config::options::PortalOptions;
use crate::core::net::{CallSite, HttpTransport, Session, Transport};
use crate::core::sanitize::wing_tag;
use crate::error::{Result, ScrapeError};
use crate::progress::Progress;
use crate::render::render_document;
use crate::specs::details::{EnrichedRecord, fetch_details};
use crate::specs::login::{self, Credentials};
use crate::specs::roster::{Record, distinct_wings, fetch_roster};

use super::channel::{Answer, Event, WorkerLink};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Rendered { path: PathBuf, pages: usize },
    /// Operator left the save path empty
    NoDocument,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Init,
    Authenticating,
    RosterFetch,
    AwaitingWingSelection,
    DetailFetch,
    AwaitingSavePath,
    Rendering,
    Done(Completion),
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done(_) | RunState::Failed)
    }
}

#[derive(Clone, Debug)]
pub struct RunParams {
    pub headless: bool,
    pub credentials: Credentials,
    pub options: PortalOptions,
}

impl RunParams {
    pub fn new(headless: bool, username: &str, password: &str) -> Self {
        Self {
            headless,
            credentials: Credentials::new(username, password),
            options: PortalOptions::default(),
        }
    }
}

/// Entry point for front ends: default portal options, reports only through `link`.
pub fn run(headless: bool, link: WorkerLink, username: &str, password: &str) {
    run_with(RunParams::new(headless, username, password), link);
}

/// Like `run`, with caller-supplied options. Returns the final state for callers
/// that care (the front ends only watch events).
pub fn run_with(params: RunParams, mut link: WorkerLink) -> RunState {
    link.set_headless(params.headless);
    match HttpTransport::new(&params.options) {
        Ok(transport) => Orchestrator::with_transport(transport, link, params).execute(),
        Err(e) => {
            report_failure(&link, &e);
            RunState::Failed
        }
    }
}

fn report_failure(link: &WorkerLink, e: &ScrapeError) {
    loge!("Run failed: {e}");
    link.emit(Event::Error {
        message: e.to_string(),
        trace: e.trace(),
        auth_failure: e.is_auth_failure(),
    });
}

pub struct Orchestrator<T: Transport> {
    session: Session<T>,
    link: WorkerLink,
    params: RunParams,
    state: RunState,
}

impl<T: Transport> Orchestrator<T> {
    pub fn with_transport(transport: T, mut link: WorkerLink, params: RunParams) -> Self {
        link.set_headless(params.headless);
        Self { session: Session::new(transport), link, params, state: RunState::Init }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Drive the run to a terminal state. Errors end up as one `Error` event.
    pub fn execute(mut self) -> RunState {
        match self.drive() {
            Ok(done) => self.enter(done),
            Err(e) => {
                report_failure(&self.link, &e);
                self.enter(RunState::Failed);
            }
        }
        self.state
    }

    fn enter(&mut self, next: RunState) {
        logd!("State: {:?} → {:?}", self.state, next);
        self.state = next;
    }

    fn drive(&mut self) -> Result<RunState> {
        // front end may have given up before the thread got going
        if self.link.is_cancelled() {
            return Ok(self.cancelled());
        }

        self.enter(RunState::Authenticating);
        self.authenticate()?;

        self.enter(RunState::RosterFetch);
        self.link.status("Loading roster...");
        let records = fetch_roster(
            &mut self.session,
            &self.params.options.roster_url,
            &self.params.options.roster,
            &mut self.link,
        )?;
        if records.is_empty() {
            self.check_still_logged_in()?;
        }
        self.link.status(&format!("{} inmates on the roster.", records.len()));

        self.enter(RunState::AwaitingWingSelection);
        self.link.emit(Event::ChooseWings(distinct_wings(&records)));
        let Some(selected) = self.await_wings() else {
            return Ok(self.cancelled());
        };

        self.enter(RunState::DetailFetch);
        let Some(enriched) = self.fetch_selected(&records, &selected) else {
            return Ok(self.cancelled());
        };

        self.enter(RunState::AwaitingSavePath);
        let suggested = format!("{SUGGESTED_FILE_PREFIX}{}.pdf", wing_tag(&selected));
        self.link.emit(Event::AskSavePath(suggested));
        let Some(path) = self.await_save_path() else {
            return Ok(self.cancelled());
        };
        if path.is_empty() {
            self.link.status("No file chosen; nothing was saved.");
            self.link.emit(Event::Success(s!("Finished without generating a PDF.")));
            self.link.emit(Event::Exit(s!("Done")));
            return Ok(RunState::Done(Completion::NoDocument));
        }

        self.enter(RunState::Rendering);
        let path = PathBuf::from(path);
        let pages = self.render(&enriched, &path);
        self.link.emit(Event::Success(format!("Finished: {pages} page(s).")));
        self.link.emit(Event::Exit(s!("Done")));
        Ok(RunState::Done(Completion::Rendered { path, pages }))
    }

    fn authenticate(&mut self) -> Result<()> {
        let opts = &self.params.options;
        self.link.status("Opening login page...");
        let form = login::discover(&mut self.session, &opts.login_url, &mut self.link)?;
        self.link.log(&format!("Form action: {}", form.action_url));

        if !form.has_form {
            self.link.status("No login form found; continuing without credentials.");
            return Ok(());
        }

        let resolved =
            login::fill_credentials(&form.base_payload, &self.params.credentials, &form.raw_markup);
        self.link.log(&format!(
            "Detected fields: user={} password={}",
            resolved.username_field.as_deref().unwrap_or("?"),
            resolved.password_field.as_deref().unwrap_or("?"),
        ));

        self.link.status("Sending credentials...");
        self.session.post_form(
            &form.action_url,
            &resolved.payload,
            CallSite::Credentials,
            &mut self.link,
        )?;
        Ok(())
    }

    /// Empty roster: look again and see whether the portal bounced us to its login page.
    /// Approximate: any page mentioning the token counts.
    fn check_still_logged_in(&mut self) -> Result<()> {
        let url = &self.params.options.roster_url;
        let resp = self.session.get(url, CallSite::AuthCheck, &mut self.link)?;
        let token = LOGIN_TOKEN.to_lowercase();
        if resp.url.to_lowercase().contains(&token) || resp.text().to_lowercase().contains(&token) {
            return Err(ScrapeError::AuthenticationFailed(format!(
                "roster was empty and {} looks like a login page",
                resp.url
            )));
        }
        logw!("Roster empty but no login page detected");
        Ok(())
    }

    fn await_wings(&mut self) -> Option<Vec<String>> {
        let poll = self.params.options.answer_poll;
        loop {
            match self.link.next_answer(poll)? {
                Answer::SelectedWings(wings) if !wings.is_empty() => return Some(wings),
                Answer::SelectedWings(_) => self.link.status("Select at least one wing."),
                other => logd!("Ignoring {other:?} while waiting for wings"),
            }
        }
    }

    fn await_save_path(&mut self) -> Option<String> {
        let poll = self.params.options.answer_poll;
        loop {
            match self.link.next_answer(poll)? {
                Answer::SavePath(p) => return Some(s!(p.trim())),
                other => logd!("Ignoring {other:?} while waiting for a save path"),
            }
        }
    }

    /// `None` when cancelled mid-way.
    fn fetch_selected(&mut self, records: &[Record], wings: &[String]) -> Option<Vec<EnrichedRecord>> {
        let picked: Vec<&Record> = records.iter().filter(|r| wings.contains(&r.wing)).collect();
        let total = picked.len();
        self.link.status(&format!("{total} inmates in the selected wing(s)."));

        let mut out = Vec::with_capacity(total);
        for (i, rec) in picked.into_iter().enumerate() {
            if self.link.is_cancelled() {
                return None;
            }
            if !rec.has_id() {
                logd!("Skipping roster entry without id: {:?}", rec.name);
                continue;
            }
            self.link.status(&format!("Fetching details {}/{total}: {}", i + 1, rec.name));
            match fetch_details(&mut self.session, &self.params.options, &rec.id, &mut self.link) {
                Ok((cad, desc)) => out.push(EnrichedRecord::merge(rec, &cad, &desc)),
                Err(e) => {
                    logw!("Details for {}: {e}", rec.id);
                    self.link.status(&format!("Could not fetch details for {}: {e}", rec.id));
                }
            }
        }
        Some(out)
    }

    /// Rendering trouble is reported, never fatal.
    fn render(&mut self, records: &[EnrichedRecord], path: &std::path::Path) -> usize {
        self.link.status("Generating PDF...");
        match render_document(records, &mut self.session, path) {
            Ok(0) => {
                self.link.status("No records to render; no file was written.");
                0
            }
            Ok(pages) => {
                self.link.status(&format!("PDF saved to {}", path.display()));
                pages
            }
            Err(e) => {
                loge!("Render failed: {e}");
                self.link.status(&format!("Error generating PDF: {e}"));
                0
            }
        }
    }

    fn cancelled(&mut self) -> RunState {
        logf!("Run cancelled in {:?}", self.state);
        self.link.status("Cancelled by operator.");
        self.link.emit(Event::Exit(s!("Cancelled")));
        RunState::Done(Completion::Cancelled)
    }
}
