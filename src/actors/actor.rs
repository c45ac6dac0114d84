use crate::actors::message::Envelope;
use crate::actors::message::Message;
use crate::actors::message::StoreError;
use crate::actors::message::StoreResult;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tracing::debug;
use tracing::trace;

/// all actors must implement this trait
#[async_trait]
pub trait Actor {
    /// the function to implement per actor
    async fn handle_envelope(&mut self, envelope: Envelope);
    async fn stop(&mut self);
}

/// `Handle` is the API for all actors
#[derive(Debug, Clone)]
pub struct Handle {
    #[doc(hidden)]
    pub sender: mpsc::Sender<Envelope>,
}

/// `Handle` is the API for all actors via `ask` and `tell`
impl Handle {
    #[doc(hidden)]
    pub async fn send(&self, envelope: Envelope) -> StoreResult<()> {
        self.sender
            .send(envelope)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// fire and forget
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the message is not received by
    /// the target actor
    pub async fn tell(&self, message: Message) -> StoreResult<()> {
        let envelope = Envelope {
            message,
            respond_to: None,
        };

        trace!("tell sending envelope {envelope:?}");
        self.send(envelope).await
    }

    /// request <-> response
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the message is not received and replied to
    /// by the target actor, or if the actor replies with a failure
    pub async fn ask(&self, message: Message) -> StoreResult<Message> {
        let (send, recv) = oneshot::channel();

        let envelope = Envelope {
            message,
            respond_to: Some(send),
        };

        trace!("ask sending envelope: {envelope:?}");
        self.send(envelope).await?;
        recv.await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }

    #[doc(hidden)]
    #[must_use]
    pub const fn new(sender: mpsc::Sender<Envelope>) -> Self {
        Self { sender }
    }
}

/// utility function most actors need to reply if a message is an 'ask'
pub fn respond_or_log_error(
    respond_to: Option<oneshot::Sender<StoreResult<Message>>>,
    result: StoreResult<Message>,
) {
    if let Some(respond_to) = respond_to {
        if let Err(err) = respond_to.send(result) {
            // the asker went away, usually a dropped http connection
            debug!("Cannot respond to 'ask' with confirmation: {:?}", err);
        }
    }
}
