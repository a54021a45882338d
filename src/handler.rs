use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::error::Error;
use crate::writer::{Level, RowWriter};

/// Depth update as pushed on `<symbol>@depth`. Only the fields that are
/// recorded are kept.
#[derive(Debug, Deserialize)]
pub struct DepthEvent {
    /// event timestamp, epoch milliseconds
    #[serde(rename(deserialize = "E"))]
    pub event_time: i64,
    /// bids (price, quantity), best first
    #[serde(rename(deserialize = "b"))]
    pub bids: Vec<Level>,
    /// asks (price, quantity), best first
    #[serde(rename(deserialize = "a"))]
    pub asks: Vec<Level>,
}

impl DepthEvent {
    pub fn from_message(message: &Value) -> Result<Self, Error> {
        Ok(DepthEvent::deserialize(message)?)
    }
}

/// Callback target for the depth feed.
#[derive(Clone)]
pub struct DepthHandler {
    writer: RowWriter,
}

impl DepthHandler {
    pub fn new(writer: RowWriter) -> Self {
        Self { writer }
    }

    /// Record one raw message. Malformed messages are logged and dropped.
    pub fn handle(&self, message: &Value) {
        match DepthEvent::from_message(message) {
            Ok(event) => self.writer.write(&event.bids, &event.asks, event.event_time),
            Err(e) => error!("Error in depth message: {}", e),
        }
    }
}
