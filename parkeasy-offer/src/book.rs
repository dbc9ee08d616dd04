use crate::models::{Quote, QuoteStatus};
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory quote registry with expiry tracking
pub struct QuoteBook {
    quotes: HashMap<Uuid, Quote>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self {
            quotes: HashMap::new(),
        }
    }

    pub fn store_quote(&mut self, quote: Quote) {
        self.quotes.insert(quote.id, quote);
    }

    /// The quote regardless of state; callers decide how to surface expiry
    pub fn get_quote(&self, quote_id: &Uuid) -> Option<&Quote> {
        self.quotes.get(quote_id)
    }

    /// Only quotes that are still active
    pub fn get_active(&self, quote_id: &Uuid) -> Option<&Quote> {
        self.quotes.get(quote_id).filter(|q| q.is_active())
    }

    /// Accept an active quote, returning its final value
    pub fn accept_quote(&mut self, quote_id: &Uuid) -> Result<Quote, QuoteBookError> {
        let quote = self
            .quotes
            .get_mut(quote_id)
            .ok_or_else(|| QuoteBookError::NotFound(quote_id.to_string()))?;

        if !quote.is_active() {
            return Err(QuoteBookError::Expired(quote_id.to_string()));
        }

        quote.status = QuoteStatus::Accepted;
        Ok(quote.clone())
    }

    /// Drop expired active quotes; returns how many were removed
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Utc::now();
        let initial_count = self.quotes.len();

        self.quotes.retain(|_, quote| {
            !(quote.expires_at <= now && quote.status == QuoteStatus::Active)
        });

        initial_count - self.quotes.len()
    }

    pub fn active_count(&self) -> usize {
        self.quotes.values().filter(|q| q.is_active()).count()
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuoteBookError {
    #[error("Quote not found: {0}")]
    NotFound(String),

    #[error("Quote expired: {0}")]
    Expired(String),
}
