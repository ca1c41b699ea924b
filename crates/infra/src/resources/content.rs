use deviceplat_domain::{Card, CardResponse, ContentList, Result};
use serde_json::Value;
use tracing::instrument;

use super::segment;
use crate::api::ApiClient;

/// Cards owned by the authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct ContentApi<'a> {
    api: &'a ApiClient,
}

impl<'a> ContentApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /content/mine`
    #[instrument(skip(self))]
    pub async fn list_mine(&self) -> Result<ContentList> {
        self.api.get("/content/mine").await
    }

    /// `GET /content/{id}`
    #[instrument(skip(self))]
    pub async fn get(&self, card_id: &str) -> Result<Card> {
        let response: CardResponse =
            self.api.get(&format!("/content/{}", segment(card_id))).await?;
        Ok(response.card)
    }

    /// `POST /content`; creates when `card_id` is absent, updates otherwise.
    #[instrument(skip(self, card), fields(card_id = card.card_id.as_deref().unwrap_or("new")))]
    pub async fn create_or_update(&self, card: &Card) -> Result<Card> {
        let response: CardResponse = self.api.post("/content", card).await?;
        Ok(response.card)
    }

    /// `DELETE /content/{id}`
    #[instrument(skip(self))]
    pub async fn delete(&self, card_id: &str) -> Result<()> {
        let _: Option<Value> = self.api.delete(&format!("/content/{}", segment(card_id))).await?;
        Ok(())
    }
}
