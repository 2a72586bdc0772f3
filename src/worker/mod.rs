// src/worker/mod.rs
//! Background run: the orchestrator state machine on its own thread, plus the
//! event/answer protocol the front ends speak to it.

pub mod channel;
pub mod handle;
pub mod orchestrator;

pub use channel::{Answer, CancelFlag, Event, FrontLink, WorkerLink, link};
pub use handle::{Poll, RunHandle};
pub use orchestrator::{Completion, Orchestrator, RunParams, RunState, run, run_with};
