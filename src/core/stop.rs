//! One-shot cancellation signal.
//!
//! A `StopHandle`/`StopToken` pair built on channel disconnection: the
//! handle never sends a message, it just drops the shared sender when
//! `stop()` is called. Every token clone then observes the disconnect,
//! including tokens currently parked inside a blocking `select!` — which
//! is what lets a worker waiting on an empty task queue wake immediately
//! instead of on its next loop iteration.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

/// Create a connected stop handle/token pair.
pub fn stop_pair() -> (StopHandle, StopToken) {
    let (tx, rx) = bounded::<()>(0);
    (
        StopHandle {
            tx: Arc::new(Mutex::new(Some(tx))),
        },
        StopToken { rx },
    )
}

/// Firing side of the stop signal. Clones share the signal, so a handle
/// can be passed to a ctrl-c hook or another thread while the pipeline
/// keeps its own copy.
#[derive(Clone)]
pub struct StopHandle {
    tx: Arc<Mutex<Option<Sender<()>>>>,
}

impl StopHandle {
    /// Fire the stop signal. Idempotent.
    pub fn stop(&self) {
        if let Ok(mut tx) = self.tx.lock() {
            tx.take();
        }
    }

    /// Whether `stop` has been called
    pub fn is_stopped(&self) -> bool {
        self.tx.lock().map(|tx| tx.is_none()).unwrap_or(true)
    }
}

/// Observing side of the stop signal. One clone per component.
#[derive(Clone)]
pub struct StopToken {
    rx: Receiver<()>,
}

impl StopToken {
    /// Non-blocking check, for components that poll between units of
    /// work (the crawler checks this between directory entries).
    pub fn is_stopped(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Raw channel endpoint for use in `select!`. The channel becomes
    /// ready (with a disconnect error) the moment the handle fires.
    pub fn channel(&self) -> &Receiver<()> {
        &self.rx
    }
}
