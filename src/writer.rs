use std::convert::TryFrom;

use tracing::{debug, error};

use crate::error::Error;
use crate::store::{DepthRow, SharedStore};

/// A price level as sent by the exchange: (price, quantity).
pub type Level = (String, String);

/// Writes the top of book of each depth update as one row.
#[derive(Clone)]
pub struct RowWriter {
    store: SharedStore,
}

impl RowWriter {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Write the best bid and ask. Failures are logged and the row dropped.
    pub fn write(&self, bids: &[Level], asks: &[Level], event_time: i64) {
        match self.try_write(bids, asks, event_time) {
            Ok(Some(row)) => debug!(?row, "Depth row written"),
            Ok(None) => debug!(event_time, "Empty book side, nothing written"),
            Err(e) => error!(event_time, "Error writing depth row: {}", e),
        }
    }

    /// Write the best bid and ask, returning the row, or `None` if either side
    /// of the book is empty.
    pub fn try_write(
        &self,
        bids: &[Level],
        asks: &[Level],
        event_time: i64,
    ) -> Result<Option<DepthRow>, Error> {
        let (Some(bid), Some(ask)) = (bids.first(), asks.first()) else {
            return Ok(None);
        };

        let bid = Quote::try_from(bid)?;
        let ask = Quote::try_from(ask)?;
        let row = DepthRow {
            event_time,
            bid_price: bid.price,
            bid_quantity: bid.quantity,
            ask_price: ask.price,
            ask_quantity: ask.quantity,
        };

        self.store.insert(&row)?;
        Ok(Some(row))
    }
}

struct Quote {
    price: f64,
    quantity: f64,
}

impl TryFrom<&Level> for Quote {
    type Error = Error;

    fn try_from((p, q): &Level) -> Result<Self, Self::Error> {
        Ok(Quote {
            price: p.trim().parse::<f64>()?,
            quantity: q.trim().parse::<f64>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::test_utils::capture_logs;

    fn level(p: &str, q: &str) -> Level {
        (p.to_owned(), q.to_owned())
    }

    fn writer() -> (RowWriter, MemoryStore) {
        let memory = MemoryStore::default();
        (RowWriter::new(SharedStore::new(memory.clone())), memory)
    }

    #[test]
    fn writes_first_level_of_each_side() {
        let (writer, memory) = writer();
        let bids = [level("100.5", "2.0"), level("100.4", "9")];
        let asks = [level("100.7", "1.5"), level("100.8", "3")];

        let row = writer.try_write(&bids, &asks, 1_700_000_000_000).unwrap();

        let expected = DepthRow {
            event_time: 1_700_000_000_000,
            bid_price: 100.5,
            bid_quantity: 2.0,
            ask_price: 100.7,
            ask_quantity: 1.5,
        };
        assert_eq!(row, Some(expected));
        assert_eq!(memory.rows(), vec![expected]);
    }

    #[test]
    fn empty_side_is_a_no_op() {
        let (writer, memory) = writer();
        let side = [level("1", "1")];

        assert_eq!(writer.try_write(&[], &side, 1).unwrap(), None);
        assert_eq!(writer.try_write(&side, &[], 2).unwrap(), None);
        assert_eq!(writer.try_write(&[], &[], 3).unwrap(), None);
        assert!(memory.rows().is_empty());
    }

    #[test]
    fn non_numeric_level_writes_nothing() {
        let (writer, memory) = writer();
        let good = [level("1", "1")];

        let err = writer.try_write(&[level("abc", "1")], &good, 1).unwrap_err();
        assert!(matches!(err, Error::ParseFloat(_)));
        let err = writer.try_write(&good, &[level("1", "")], 2).unwrap_err();
        assert!(matches!(err, Error::ParseFloat(_)));

        let logs = capture_logs(|| writer.write(&good, &[level("1", "x")], 3));
        assert!(memory.rows().is_empty());
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("Error writing depth row: invalid float literal"), "{logs}");
    }

    #[test]
    fn empty_side_is_not_an_error() {
        let (writer, memory) = writer();
        let logs = capture_logs(|| writer.write(&[], &[level("1", "1")], 1));
        assert!(memory.rows().is_empty());
        assert!(logs.contains("Empty book side"), "{logs}");
        assert!(!logs.contains("ERROR"), "{logs}");
    }

    #[test]
    fn database_failure_drops_the_row() {
        let (writer, memory) = writer();
        let side = [level("1", "1")];
        memory.set_unavailable(true);

        assert!(matches!(writer.try_write(&side, &side, 1), Err(Error::Io(_))));
        let logs = capture_logs(|| writer.write(&side, &side, 2));
        assert!(logs.contains("Error writing depth row: database unavailable"), "{logs}");

        memory.set_unavailable(false);
        writer.write(&side, &side, 3);
        assert_eq!(memory.rows().len(), 1);
        assert_eq!(memory.rows()[0].event_time, 3);
    }
}
