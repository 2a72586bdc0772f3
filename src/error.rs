// src/error.rs
use std::backtrace::Backtrace;
use std::error::Error as _;

use thiserror::Error;

/// Everything that can end (or dent) a scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Certificate/handshake trouble. Recoverable once per call site.
    #[error("TLS failure talking to {url}: {detail}")]
    Tls { url: String, detail: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {detail}")]
    Transport { url: String, detail: String },

    #[error("invalid URL {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not build HTTP client: {0}")]
    ClientBuild(String),

    /// Detected after the fact: the portal bounced us back to its login page.
    #[error("Login failed: check username/password or changes to the login form ({0})")]
    AuthenticationFailed(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn is_tls(&self) -> bool {
        matches!(self, ScrapeError::Tls { .. })
    }

    /// Front ends show a dedicated dialog for this kind.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ScrapeError::AuthenticationFailed(_))
    }

    /// Human-readable diagnostic: the source chain followed by a captured backtrace.
    pub fn trace(&self) -> String {
        let mut out = format!("Error: {self}\n");
        let mut cause = self.source();
        while let Some(c) = cause {
            out.push_str(&format!("Caused by: {c}\n"));
            cause = c.source();
        }
        out.push_str("\nBacktrace:\n");
        out.push_str(&Backtrace::force_capture().to_string());
        out
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
