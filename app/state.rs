use crate::{
    data::{DisplayState, RainEvent},
    error::Error,
};
use std::future::Future;
use time::OffsetDateTime;
use tokio::sync::{
    mpsc::{channel, Receiver, Sender},
    oneshot,
};

// ##### DISPATCH ###############################################

/// Handle to state owned by a single receive loop.
///
/// All mutation goes through [`Dispatch::run`], so the state is only ever touched by one task.
/// A caller of `run` may be aborted at any await point: a closure that was already queued still
/// runs against the state, and its reply is dropped.
pub struct Dispatch<T>(Sender<Fun<T>>);

type Fun<T> = Box<dyn FnOnce(&mut T) + Send>;

impl<T> Clone for Dispatch<T> {
    fn clone(&self) -> Self {
        Dispatch(self.0.clone())
    }
}

impl<T> Dispatch<T> {
    pub async fn run<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&mut T) -> O + Send + 'static,
        O: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let cb = |state: &mut T| {
            // receiver is gone if the caller was aborted
            let _ = tx.send(f(state));
        };

        self.0
            .send(Box::new(cb))
            .await
            .expect("dispatch loop should outlive its handles");

        rx.await.expect("queued closure should always run")
    }
}

pub fn dispatcher<T>(state: T) -> (Dispatch<T>, impl Future<Output = ()>) {
    let (tx, rx) = channel(64);
    (Dispatch(tx), recv_loop(rx, state))
}

async fn recv_loop<T>(mut recv: Receiver<Fun<T>>, mut state: T) {
    while let Some(f) = recv.recv().await {
        f(&mut state);
    }
}

// ##### VIEW STATE #############################################

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Uninitialized,
    Loading,
    Loaded,
    Failed,
}

/// Identifies one fetch. Only the most recently issued ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

pub enum Completion {
    Loaded,
    Failed(Error),
    /// Stale ticket, or the view was torn down.
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub status: Status,
    pub display: Option<DisplayState>,
    /// Raw timestamp of the last successful load.
    pub raw: Option<String>,
    /// Message of the most recent failure, cleared on a successful load.
    pub error: Option<String>,
    pub text: String,
}

pub struct ViewState {
    status: Status,
    display: Option<DisplayState>,
    latest_raw: Option<String>,
    /// Raw value the last `on_update` check saw.
    seen_raw: Option<String>,
    error: Option<String>,
    issued: u64,
    torn_down: bool,
    placeholder: String,
    clock: fn() -> OffsetDateTime,
}

impl ViewState {
    pub fn new(placeholder: impl Into<String>, clock: fn() -> OffsetDateTime) -> Self {
        Self {
            status: Status::Uninitialized,
            display: None,
            latest_raw: None,
            seen_raw: None,
            error: None,
            issued: 0,
            torn_down: false,
            placeholder: placeholder.into(),
            clock,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Enter `Loading` and hand out a ticket, unless a fetch is in flight or the view is gone.
    pub fn begin_fetch(&mut self) -> Option<Ticket> {
        if self.torn_down || self.status == Status::Loading {
            return None;
        }
        self.issued += 1;
        self.status = Status::Loading;
        Some(Ticket(self.issued))
    }

    /// Like [`ViewState::begin_fetch`], but only when the raw timestamp changed since the last check.
    pub fn begin_update(&mut self) -> Option<Ticket> {
        if self.latest_raw == self.seen_raw {
            return None;
        }
        let ticket = self.begin_fetch()?;
        self.seen_raw = self.latest_raw.clone();
        Some(ticket)
    }

    pub fn complete(&mut self, ticket: Ticket, result: Result<RainEvent, Error>) -> Completion {
        if self.torn_down || ticket != Ticket(self.issued) || self.status != Status::Loading {
            return Completion::Ignored;
        }

        let display = result.and_then(|ev| {
            let display = DisplayState::from_event(&ev, (self.clock)())?;
            Ok((ev.timestamp, display))
        });

        match display {
            Ok((raw, display)) => {
                self.status = Status::Loaded;
                self.display = Some(display);
                self.latest_raw = Some(raw);
                self.error = None;
                Completion::Loaded
            }
            Err(e) => {
                self.status = Status::Failed;
                self.error = Some(e.to_string());
                Completion::Failed(e)
            }
        }
    }

    pub fn tear_down(&mut self) {
        self.torn_down = true;
    }

    pub fn render(&self) -> String {
        match &self.display {
            Some(DisplayState {
                calendar_date,
                elapsed_label,
            }) => format!("Last Rain: {calendar_date} ({elapsed_label} ago)"),
            None => format!("Last Rain: {}", self.placeholder),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            display: self.display.clone(),
            raw: self.latest_raw.clone(),
            error: self.error.clone(),
            text: self.render(),
        }
    }
}
