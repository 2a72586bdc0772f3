// src/worker/handle.rs

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::consts::CANCEL_GRACE_POLLS;

use super::channel::{Answer, Event, FrontLink, Recv, link};
use super::orchestrator::{RunParams, run_with};

/// What one poll of a run produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Poll {
    Event(Event),
    /// Nothing yet; the run is still live
    Idle,
    /// Terminal event seen, worker gone, or cancel grace expired
    Finished,
}

/// Front-end view of a background run. Shared by GUI and CLI so both decide
/// "terminated" the same way.
pub struct RunHandle {
    front: FrontLink,
    worker: Option<JoinHandle<()>>,
    empty_after_cancel: u32,
    finished: bool,
}

impl RunHandle {
    /// Spawn the worker thread for one run.
    pub fn spawn(params: RunParams) -> std::io::Result<Self> {
        let (worker_link, front) = link();
        let worker = thread::Builder::new()
            .name(s!("cara-cracha-worker"))
            .spawn(move || {
                let end = run_with(params, worker_link);
                logf!("Worker finished: {end:?}");
            })?;
        Ok(Self::from_parts(front, Some(worker)))
    }

    /// Wrap an existing front link (tests drive the worker themselves).
    pub fn from_parts(front: FrontLink, worker: Option<JoinHandle<()>>) -> Self {
        Self { front, worker, empty_after_cancel: 0, finished: false }
    }

    pub fn answer(&self, ans: Answer) {
        self.front.answer(ans);
    }

    pub fn cancel(&self) {
        logf!("Cancel requested");
        self.front.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Wait up to `wait` for the next event. `Duration::ZERO` never blocks.
    pub fn poll(&mut self, wait: Duration) -> Poll {
        if self.finished {
            return Poll::Finished;
        }
        let got = if wait.is_zero() { self.front.try_recv() } else { self.front.recv_timeout(wait) };
        match got {
            Recv::Event(ev) => {
                self.empty_after_cancel = 0;
                if ev.is_terminal() {
                    self.finish();
                }
                Poll::Event(ev)
            }
            Recv::Empty if self.front.is_cancelled() => {
                self.empty_after_cancel += 1;
                if self.empty_after_cancel >= CANCEL_GRACE_POLLS {
                    logd!("Cancel grace period over");
                    self.finish();
                    Poll::Finished
                } else {
                    Poll::Idle
                }
            }
            Recv::Empty => Poll::Idle,
            Recv::Closed => {
                self.finish();
                Poll::Finished
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        // Only reap a thread that is already done; a cancelled worker may still be mid-request
        if self.worker.as_ref().is_some_and(|w| w.is_finished()) {
            if let Some(w) = self.worker.take() {
                let _ = w.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_event_finishes() {
        let (worker, front) = link();
        let mut h = RunHandle::from_parts(front, None);
        worker.emit(Event::Status(s!("hi")));
        worker.emit(Event::Exit(s!("Done")));
        assert_eq!(h.poll(Duration::ZERO), Poll::Event(Event::Status(s!("hi"))));
        assert_eq!(h.poll(Duration::ZERO), Poll::Event(Event::Exit(s!("Done"))));
        assert!(h.is_finished());
        assert_eq!(h.poll(Duration::ZERO), Poll::Finished);
    }

    #[test]
    fn cancel_grace_counts_empty_polls() {
        let (_worker, front) = link();
        let mut h = RunHandle::from_parts(front, None);
        assert_eq!(h.poll(Duration::ZERO), Poll::Idle);
        h.cancel();
        for _ in 1..CANCEL_GRACE_POLLS {
            assert_eq!(h.poll(Duration::ZERO), Poll::Idle);
        }
        assert_eq!(h.poll(Duration::ZERO), Poll::Finished);
    }

    #[test]
    fn worker_gone_finishes() {
        let (worker, front) = link();
        let mut h = RunHandle::from_parts(front, None);
        drop(worker);
        assert_eq!(h.poll(Duration::from_millis(5)), Poll::Finished);
    }
}
