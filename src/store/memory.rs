//! In-memory store used as a stand-in for the database in tests.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{DepthRow, DepthStore};
use crate::error::Error;

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    rows: Vec<DepthRow>,
    closes: usize,
    unavailable: bool,
}

impl MemoryStore {
    pub fn rows(&self) -> Vec<DepthRow> {
        self.state.lock().rows.clone()
    }

    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }

    /// Make every following statement fail as if the database went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    fn check(state: &State) -> Result<(), Error> {
        if state.unavailable {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "database unavailable").into());
        }
        Ok(())
    }
}

impl DepthStore for MemoryStore {
    fn insert(&mut self, row: &DepthRow) -> Result<(), Error> {
        let mut state = self.state.lock();
        Self::check(&state)?;
        state.rows.push(*row);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<usize, Error> {
        let mut state = self.state.lock();
        Self::check(&state)?;
        let removed = state.rows.len();
        state.rows.clear();
        Ok(removed)
    }

    fn close(self: Box<Self>) -> Result<(), Error> {
        let mut state = self.state.lock();
        state.closes += 1;
        Self::check(&state)
    }
}
