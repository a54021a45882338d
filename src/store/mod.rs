use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::error::Error;

mod motherduck;
#[cfg(test)]
pub mod memory;

pub use motherduck::MotherDuckStore;

/// One persisted top-of-book snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRow {
    /// Exchange event time, epoch milliseconds
    pub event_time: i64,
    pub bid_price: f64,
    pub bid_quantity: f64,
    pub ask_price: f64,
    pub ask_quantity: f64,
}

/// Trait implemented by the databases depth rows can be written to.
///
/// Calls are synchronous; the caller blocks until the statement completes.
pub trait DepthStore: Send + 'static {
    /// Append a single row.
    fn insert(&mut self, row: &DepthRow) -> Result<(), Error>;
    /// Delete every row of the table, returning how many were removed.
    fn delete_all(&mut self) -> Result<usize, Error>;
    /// Close the underlying connection.
    fn close(self: Box<Self>) -> Result<(), Error>;
}

/// Run a synchronous database call from async code.
///
/// On a multi-threaded runtime the worker hands its other tasks off while `f`
/// blocks. Elsewhere (current-thread runtime, no runtime) `f` runs in place.
pub fn blocking<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// The one database connection of a run, shared by the message path and the
/// shutdown path.
///
/// Every call holds the lock for the duration of the statement, so an insert
/// never interleaves with the shutdown wipe. Once closed, further calls fail
/// with [`Error::ConnectionClosed`].
#[derive(Clone)]
pub struct SharedStore {
    conn: Arc<Mutex<Option<Box<dyn DepthStore>>>>,
}

impl SharedStore {
    pub fn new<S: DepthStore>(store: S) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(Box::new(store)))),
        }
    }

    pub fn insert(&self, row: &DepthRow) -> Result<(), Error> {
        match self.conn.lock().as_mut() {
            Some(store) => store.insert(row),
            None => Err(Error::ConnectionClosed),
        }
    }

    pub fn delete_all(&self) -> Result<usize, Error> {
        match self.conn.lock().as_mut() {
            Some(store) => store.delete_all(),
            None => Err(Error::ConnectionClosed),
        }
    }

    /// Close the connection. Returns `Ok(false)` if it was already closed.
    ///
    /// The connection is released even when closing it reports an error.
    pub fn close(&self) -> Result<bool, Error> {
        let store = self.conn.lock().take();
        match store {
            Some(store) => store.close().map(|_| true),
            None => Ok(false),
        }
    }
}
