// src/cli.rs
//
// Headless front end: same worker, same events, answers come from flags or stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};

use crate::config::consts::{ERROR_TRACE_PREVIEW, FRONT_POLL_MS, REQUEST_TIMEOUT_SECS};
use crate::config::options::PortalOptions;
use crate::core::sanitize::{truncate_chars, with_pdf_extension};
use crate::log::{self, Console};
use crate::specs::login::Credentials;
use crate::worker::{Answer, Event, Poll, RunHandle, RunParams};

#[derive(Debug, Parser)]
#[command(
    name = "cara_cracha",
    version,
    about = "Log into the Canaimé portal, pick wings and render one badge page per inmate"
)]
pub struct Args {
    /// Portal username
    #[arg(long, env = "CANAIME_USER")]
    pub user: Option<String>,
    /// Portal password
    #[arg(long, env = "CANAIME_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Wings to include, comma separated (asked interactively when absent)
    #[arg(long, value_delimiter = ',')]
    pub wings: Option<Vec<String>>,
    /// Output PDF (asked interactively when absent; empty answer writes nothing)
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub login_url: Option<String>,
    #[arg(long)]
    pub roster_url: Option<String>,
    /// Registration page template, `{id}` is replaced
    #[arg(long)]
    pub cadastral_url: Option<String>,
    /// Description page template, `{id}` is replaced
    #[arg(long)]
    pub descriptive_url: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,
    /// Also print diagnostic `log` events
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn portal_options(&self) -> PortalOptions {
        let mut opts = PortalOptions { timeout: Duration::from_secs(self.timeout), ..Default::default() };
        if let Some(u) = &self.login_url {
            opts.login_url = u.clone();
        }
        if let Some(u) = &self.roster_url {
            opts.roster_url = u.clone();
        }
        if let Some(u) = &self.cadastral_url {
            opts.cadastral_url_tmpl = u.clone();
        }
        if let Some(u) = &self.descriptive_url {
            opts.descriptive_url_tmpl = u.clone();
        }
        opts
    }
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    log::init(Console::Stderr).wrap_err("could not open the log file")?;

    let username = match &args.user {
        Some(u) => u.clone(),
        None => prompt("Username: ")?.unwrap_or_default(),
    };
    let password = match &args.password {
        Some(p) => p.clone(),
        None => prompt("Password: ")?.unwrap_or_default(),
    };
    if username.trim().is_empty() || password.is_empty() {
        bail!("username and password are required");
    }

    let params = RunParams {
        headless: true,
        credentials: Credentials::new(username.trim(), password),
        options: args.portal_options(),
    };
    let mut handle = RunHandle::spawn(params).wrap_err("could not start the worker")?;

    let mut failed = false;
    loop {
        match handle.poll(Duration::from_millis(FRONT_POLL_MS)) {
            Poll::Event(ev) => failed |= on_event(&args, &handle, ev)?,
            Poll::Idle => {}
            Poll::Finished => break,
        }
    }

    if failed {
        bail!("run failed");
    }
    Ok(())
}

/// Returns true for an `Error` event.
fn on_event(args: &Args, handle: &RunHandle, ev: Event) -> Result<bool> {
    match ev {
        Event::Status(m) | Event::Success(m) | Event::Exit(m) => println!("{m}"),
        Event::Log(m) => {
            if args.verbose {
                println!("  {m}");
            }
        }
        Event::Error { message, trace, auth_failure } => {
            eprintln!("Error: {message}");
            if auth_failure {
                eprintln!("Hint: check --user/--password (or CANAIME_USER/CANAIME_PASSWORD).");
            } else {
                eprintln!("{}", truncate_chars(&trace, ERROR_TRACE_PREVIEW));
            }
            return Ok(true);
        }
        Event::ChooseWings(wings) => match &args.wings {
            Some(picked) => handle.answer(Answer::SelectedWings(picked.clone())),
            None => match ask_wings(&wings)? {
                Some(picked) => handle.answer(Answer::SelectedWings(picked)),
                None => handle.cancel(),
            },
        },
        Event::AskSavePath(suggested) => {
            let path = match &args.out {
                Some(p) => p.to_string_lossy().into_owned(),
                None => prompt(&format!("Save as [{suggested}] (empty to skip): "))?
                    .unwrap_or_default(),
            };
            handle.answer(Answer::SavePath(with_pdf_extension(&path)));
        }
    }
    Ok(false)
}

/// Numbered list, answers by number or name. `None` on EOF or when there is nothing to pick.
fn ask_wings(wings: &[String]) -> Result<Option<Vec<String>>> {
    if wings.is_empty() {
        eprintln!("No wings found on the roster.");
        return Ok(None);
    }
    for (i, w) in wings.iter().enumerate() {
        println!("{:>3}) {w}", i + 1);
    }
    loop {
        let Some(line) = prompt("Wings (numbers or names, comma separated): ")? else {
            return Ok(None);
        };
        let picked = parse_wing_answer(&line, wings);
        if !picked.is_empty() {
            return Ok(Some(picked));
        }
        println!("Select at least one wing.");
    }
}

/// Tokens are 1-based indexes or exact wing names; unknown tokens are dropped.
pub fn parse_wing_answer(line: &str, wings: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tok in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let hit = match tok.parse::<usize>() {
            Ok(n) if (1..=wings.len()).contains(&n) => Some(wings[n - 1].clone()),
            _ => wings.iter().find(|w| w.eq_ignore_ascii_case(tok)).cloned(),
        };
        match hit {
            Some(w) if !out.contains(&w) => out.push(w),
            Some(_) => {}
            None => eprintln!("Unknown wing: {tok}"),
        }
    }
    out
}

/// One trimmed line from stdin; `None` on EOF.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    let n = io::stdin().lock().read_line(&mut line)?;
    Ok((n > 0).then(|| s!(line.trim())))
}
