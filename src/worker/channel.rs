// src/worker/channel.rs
//
// The two ordered channels and the cancel flag shared by a run's worker and its front end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::progress::Progress;

/// Worker → front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Status(String),
    Log(String),
    Success(String),
    Error { message: String, trace: String, auth_failure: bool },
    Exit(String),
    ChooseWings(Vec<String>),
    AskSavePath(String),
}

impl Event {
    /// No further events follow a terminal one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Error { .. } | Event::Exit(_))
    }
}

/// Front end → worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    SelectedWings(Vec<String>),
    SavePath(String),
}

/// Cooperative cancel. Fresh per run.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Worker end of a run.
pub struct WorkerLink {
    events: Sender<Event>,
    answers: Receiver<Answer>,
    cancel: CancelFlag,
    headless: bool,
}

/// Front end of a run.
pub struct FrontLink {
    events: Receiver<Event>,
    answers: Sender<Answer>,
    cancel: CancelFlag,
}

/// Fresh channels + flag for one run.
pub fn link() -> (WorkerLink, FrontLink) {
    let (ev_tx, ev_rx) = mpsc::channel();
    let (ans_tx, ans_rx) = mpsc::channel();
    let cancel = CancelFlag::default();
    (
        WorkerLink { events: ev_tx, answers: ans_rx, cancel: cancel.clone(), headless: false },
        FrontLink { events: ev_rx, answers: ans_tx, cancel },
    )
}

impl WorkerLink {
    /// Headless runs mirror every event into the log at info.
    pub fn set_headless(&mut self, headless: bool) {
        self.headless = headless;
    }

    pub fn emit(&self, ev: Event) {
        if self.headless {
            logf!("Event: {ev:?}");
        } else {
            logd!("Event: {ev:?}");
        }
        // A gone front end is noticed at the next wait point
        let _ = self.events.send(ev);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Block for the next answer, waking every `poll` to check the cancel flag.
    /// `None` means the run is cancelled (flag set or front end gone).
    pub fn next_answer(&self, poll: Duration) -> Option<Answer> {
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }
            match self.answers.recv_timeout(poll) {
                Ok(ans) => return Some(ans),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    logw!("Answer channel closed; treating as cancel");
                    return None;
                }
            }
        }
    }
}

impl Progress for WorkerLink {
    fn status(&mut self, msg: &str) {
        self.emit(Event::Status(s!(msg)));
    }

    fn log(&mut self, msg: &str) {
        self.emit(Event::Log(s!(msg)));
    }
}

/// Outcome of one non-blocking or timed receive on the front end.
#[derive(Debug, PartialEq, Eq)]
pub enum Recv {
    Event(Event),
    Empty,
    Closed,
}

impl FrontLink {
    pub fn answer(&self, ans: Answer) {
        if self.answers.send(ans).is_err() {
            logd!("Answer dropped: worker already gone");
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn try_recv(&self) -> Recv {
        match self.events.try_recv() {
            Ok(ev) => Recv::Event(ev),
            Err(TryRecvError::Empty) => Recv::Empty,
            Err(TryRecvError::Disconnected) => Recv::Closed,
        }
    }

    pub fn recv_timeout(&self, wait: Duration) -> Recv {
        match self.events.recv_timeout(wait) {
            Ok(ev) => Recv::Event(ev),
            Err(RecvTimeoutError::Timeout) => Recv::Empty,
            Err(RecvTimeoutError::Disconnected) => Recv::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn events_arrive_in_order() {
        let (mut worker, front) = link();
        worker.status("one");
        worker.log("two");
        worker.emit(Event::Exit(s!("bye")));
        assert_eq!(front.try_recv(), Recv::Event(Event::Status(s!("one"))));
        assert_eq!(front.try_recv(), Recv::Event(Event::Log(s!("two"))));
        assert_eq!(front.try_recv(), Recv::Event(Event::Exit(s!("bye"))));
        assert_eq!(front.try_recv(), Recv::Empty);
        drop(worker);
        assert_eq!(front.try_recv(), Recv::Closed);
    }

    #[test]
    fn answer_is_delivered() {
        let (worker, front) = link();
        front.answer(Answer::SavePath(s!("out.pdf")));
        assert_eq!(
            worker.next_answer(Duration::from_millis(10)),
            Some(Answer::SavePath(s!("out.pdf")))
        );
    }

    #[test]
    fn cancel_wakes_a_waiting_worker() {
        let (worker, front) = link();
        let t = thread::spawn(move || worker.next_answer(Duration::from_millis(10)));
        thread::sleep(Duration::from_millis(30));
        front.cancel();
        assert_eq!(t.join().unwrap(), None);
    }

    #[test]
    fn dropped_front_end_counts_as_cancel() {
        let (worker, front) = link();
        drop(front);
        assert_eq!(worker.next_answer(Duration::from_millis(10)), None);
    }

    #[test]
    fn each_link_has_its_own_flag() {
        let (_w1, f1) = link();
        let (w2, _f2) = link();
        f1.cancel();
        assert!(!w2.is_cancelled());
    }
}
