use duckdb::{params, Connection};

use super::{DepthRow, DepthStore};
use crate::error::Error;

const INSERT_ROW_SQL: &str = r#"
    INSERT INTO htf.depth_updates (E, bid_price, bid_quantity, ask_price, ask_quantity)
    VALUES (?, ?, ?, ?, ?)
"#;

const DELETE_ROWS_SQL: &str = "DELETE FROM htf.depth_updates";

/// DuckDB connection to the MotherDuck database holding `htf.depth_updates`.
///
/// DuckDB runs in autocommit mode, so every statement is committed as soon as
/// it completes.
pub struct MotherDuckStore {
    conn: Connection,
}

impl MotherDuckStore {
    /// Open a connection, e.g. `md:?token=...`.
    pub fn connect(url: &str) -> Result<Self, Error> {
        Ok(Self {
            conn: Connection::open(url)?,
        })
    }
}

impl DepthStore for MotherDuckStore {
    fn insert(&mut self, row: &DepthRow) -> Result<(), Error> {
        self.conn.execute(
            INSERT_ROW_SQL,
            params![
                row.event_time,
                row.bid_price,
                row.bid_quantity,
                row.ask_price,
                row.ask_quantity
            ],
        )?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<usize, Error> {
        Ok(self.conn.execute(DELETE_ROWS_SQL, [])?)
    }

    fn close(self: Box<Self>) -> Result<(), Error> {
        self.conn.close().map_err(|(_, e)| Error::from(e))
    }
}
