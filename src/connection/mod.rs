use async_trait::async_trait;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::error::Error;

mod binance;
#[cfg(test)]
pub mod replay;

pub use binance::BinanceFeed;

/// Callback invoked once per message received on a subscription.
pub type OnMessage = Box<dyn Fn(Value) + Send + Sync + 'static>;

/// Trait implemented by different market data feeds
#[async_trait]
pub trait Feed: Send + Sync + 'static {
    /// Subscribe to the depth stream of `symbol`. `on_message` runs on the
    /// feed's own task.
    async fn subscribe(&self, symbol: &str, on_message: OnMessage) -> Result<Subscription, Error>;
}

/// A running subscription. Dropping it leaves the feed running.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stop message delivery and wait for the feed task to wind down.
    pub async fn stop(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}
