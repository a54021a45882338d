//! Feed that replays a fixed sequence of messages, for tests.

use async_trait::async_trait;
use serde_json::Value;

use super::{Feed, OnMessage, Subscription};
use crate::error::Error;

pub struct ReplayFeed {
    messages: Vec<Value>,
}

impl ReplayFeed {
    pub fn new(messages: Vec<Value>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl Feed for ReplayFeed {
    async fn subscribe(&self, _symbol: &str, on_message: OnMessage) -> Result<Subscription, Error> {
        let messages = self.messages.clone();
        let task = tokio::spawn(async move {
            for message in messages {
                on_message(message);
                tokio::task::yield_now().await;
            }
        });
        Ok(Subscription::new(task))
    }
}
