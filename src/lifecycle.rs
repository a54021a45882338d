//! Run lifecycle: subscribe, wait for a termination signal, then wipe the
//! table and close the connection.
//!
//! Rows only live for the duration of a run. They are deleted on a clean
//! shutdown; a run that dies without receiving a signal leaves its rows behind
//! (see `DEPTH_CLEAR_ON_START`).

use std::future::Future;

use serde_json::Value;
#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::{error, info, warn};

use crate::connection::{Feed, OnMessage};
use crate::error::Error;
use crate::handler::DepthHandler;
use crate::store::{blocking, SharedStore};
use crate::writer::RowWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    ShuttingDown,
    Terminated,
}

pub struct Lifecycle {
    state: State,
    store: SharedStore,
}

impl Lifecycle {
    /// Created once the feed subscription is live, or once shutdown was
    /// requested before it went live.
    pub fn new(store: SharedStore) -> Self {
        Self {
            state: State::Running,
            store,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Delete every row, then close the connection. Failures are logged and
    /// never stop the shutdown. Only the first call has any effect.
    pub fn shutdown(&mut self) {
        if self.state != State::Running {
            return;
        }
        self.state = State::ShuttingDown;

        info!("Deleting depth rows of this run");
        match self.store.delete_all() {
            Ok(rows) => info!(rows, "Depth rows deleted"),
            Err(e) => error!("Error deleting depth rows: {}", e),
        }

        match self.store.close() {
            Ok(true) => info!("Database connection closed"),
            Ok(false) => warn!("Database connection was already closed"),
            Err(e) => error!("Error closing database connection: {}", e),
        }

        self.state = State::Terminated;
    }
}

/// SIGINT / SIGTERM listener. Receiving a signal only wakes the waiting task;
/// all cleanup happens on that task.
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
}

impl ShutdownSignal {
    #[cfg(unix)]
    pub fn install() -> Result<Self, Error> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> Result<Self, Error> {
        Ok(Self {})
    }

    #[cfg(unix)]
    pub async fn recv(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => info!("Received SIGINT"),
            _ = self.terminate.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C"),
            Err(e) => error!("Error waiting for Ctrl+C: {}", e),
        }
    }
}

/// Record `symbol` from `feed` into `store` until `shutdown` resolves.
///
/// A shutdown that arrives while the feed is still connecting skips straight
/// to the cleanup.
pub async fn run<F, S>(feed: &F, symbol: &str, store: SharedStore, shutdown: S) -> Result<(), Error>
where
    F: Feed,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let handler = DepthHandler::new(RowWriter::new(store.clone()));
    let on_message: OnMessage = Box::new(move |message: Value| handler.handle(&message));
    let subscription = tokio::select! {
        result = feed.subscribe(symbol, on_message) => Some(result?),
        _ = &mut shutdown => None,
    };

    let mut lifecycle = Lifecycle::new(store);
    match subscription {
        Some(subscription) => {
            info!(symbol, "Streaming started");
            shutdown.as_mut().await;
            subscription.stop().await;
            info!("Streaming stopped");
        }
        None => info!(symbol, "Shutdown requested before the subscription was live"),
    }

    blocking(|| lifecycle.shutdown());
    info!(state = ?lifecycle.state(), "Depth recorder stopped");
    Ok(())
}
