// src/progress.rs

/// Lightweight reporting surface for long-running steps (login, scrape, render).
/// The worker implements this on its event link; tests collect into a `Vec`.
pub trait Progress {
    /// Human-facing status line.
    fn status(&mut self, _msg: &str) {}

    /// Diagnostic detail (form action, detected fields, ...).
    fn log(&mut self, _msg: &str) {}

    /// Recoverable trouble the operator should see (TLS downgrade etc.).
    fn warn(&mut self, msg: &str) {
        self.status(msg);
    }
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects status + warn lines in order. Handy for tests and the CLI summary.
impl Progress for Vec<String> {
    fn status(&mut self, msg: &str) {
        self.push(s!(msg));
    }
}
