use super::helpers::load_ride;
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::MessageAPI,
    auth::User,
    entities::Message,
    error::{invalid_state_error, validation_error, Error},
    store::{child_key, decode, doc_key, encode, Subscription},
};

#[async_trait]
impl MessageAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn send_message(
        &self,
        user: User,
        request_id: Uuid,
        text: String,
    ) -> Result<Message, Error> {
        let ride = load_ride(&self.store, &request_id)?;

        self.authorize(user.clone(), "message", ride.clone())?;

        // the channel opens at acceptance and stays open through completion
        if !ride.chat_open() {
            return Err(invalid_state_error());
        }

        if text.trim().is_empty() {
            return Err(validation_error());
        }

        let message = Message::new(request_id, user.id, text, self.store.next_seq()?);

        self.store.messages.insert(
            child_key(&message.request_id, message.seq),
            encode(&message)?,
        )?;

        Ok(message)
    }

    // reads carry no ownership check beyond the ride existing
    #[tracing::instrument(skip(self))]
    async fn list_messages(&self, request_id: Uuid) -> Result<Vec<Message>, Error> {
        load_ride(&self.store, &request_id)?;

        let mut messages = Vec::new();

        for entry in self.store.messages.scan_prefix(doc_key(&request_id)) {
            let (_, bytes) = entry?;
            messages.push(decode(&bytes)?);
        }

        Ok(messages)
    }

    #[tracing::instrument(skip(self))]
    async fn watch_messages(&self, request_id: Uuid) -> Result<Subscription<Message>, Error> {
        load_ride(&self.store, &request_id)?;

        Ok(Subscription::children(
            &self.store.messages,
            &doc_key(&request_id),
        ))
    }
}
