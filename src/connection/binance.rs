use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

use super::Feed;
use super::OnMessage;
use super::Subscription;
use crate::config::Credentials;
use crate::error::Error;
use crate::store::blocking;

/// A connection to the Binance raw depth stream
pub struct BinanceFeed {
    base_url: String,
    credentials: Credentials,
}

impl BinanceFeed {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    fn stream_url(&self, symbol: &str) -> String {
        format!("{}/{}@depth", self.base_url, symbol.to_lowercase())
    }

    /// The depth stream is public: credentials never go on the handshake.
    fn request(&self, symbol: &str) -> Result<Request, Error> {
        Ok(self.stream_url(symbol).into_client_request()?)
    }
}

#[async_trait]
impl Feed for BinanceFeed {
    async fn subscribe(&self, symbol: &str, on_message: OnMessage) -> Result<Subscription, Error> {
        let request = self.request(symbol)?;
        let (mut stream, _) = tokio_tungstenite::connect_async(request).await?;
        info!(
            symbol,
            api_key = self.credentials.api_key.is_some(),
            "Subscribed to {}",
            self.stream_url(symbol)
        );

        let symbol = symbol.to_owned();
        let task = tokio::spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Ok(Message::Close(frame)) => {
                        info!(?frame, "Depth stream closed by server");
                        break;
                    }
                    Ok(msg) => match decode(msg) {
                        Ok(Some(value)) => blocking(|| on_message(value)),
                        Ok(None) => {}
                        Err(e) => warn!("Error decoding depth frame: {}", e),
                    },
                    Err(e) => {
                        error!("Error consuming depth stream: {}", e);
                        break;
                    }
                }
            }
            info!(symbol = %symbol, "Depth stream ended");
        });

        Ok(Subscription::new(task))
    }
}

/// Decode a websocket frame into a JSON message. Control frames carry no message.
fn decode(msg: Message) -> Result<Option<Value>, Error> {
    match msg {
        Message::Text(s) => Ok(Some(serde_json::from_str(&s)?)),
        Message::Ping(_) | Message::Pong(_) => Ok(None),
        other => Err(Error::UnexpectedItem(format!("{:?}", other))),
    }
}
