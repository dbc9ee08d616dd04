use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Entry credential for a confirmed booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingPass {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub token: String,
    pub is_redeemed: bool,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ParkingPass {
    pub fn new(booking_id: Uuid, token: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            token,
            is_redeemed: false,
            redeemed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark as redeemed (gate scanned the pass)
    pub fn redeem(&mut self) {
        self.is_redeemed = true;
        self.redeemed_at = Some(Utc::now());
    }
}

/// Issues and redeems single-use parking passes
pub struct PassService {
    passes: HashMap<Uuid, ParkingPass>,
}

impl PassService {
    pub fn new() -> Self {
        Self {
            passes: HashMap::new(),
        }
    }

    /// Issue a pass for a booking
    pub fn issue(&mut self, booking_id: Uuid) -> ParkingPass {
        let token = self.generate_token(&booking_id);
        let pass = ParkingPass::new(booking_id, token);

        self.passes.insert(pass.id, pass.clone());
        pass
    }

    pub fn get_pass(&self, pass_id: &Uuid) -> Option<&ParkingPass> {
        self.passes.get(pass_id)
    }

    pub fn get_by_token(&self, token: &str) -> Option<&ParkingPass> {
        self.passes.values().find(|p| p.token == token)
    }

    /// Redeem a pass at the gate; a pass is good for exactly one entry
    pub fn redeem(&mut self, token: &str) -> Result<(), PassError> {
        let pass = self
            .passes
            .values_mut()
            .find(|p| p.token == token)
            .ok_or_else(|| PassError::NotFound(token.to_string()))?;

        if pass.is_redeemed {
            return Err(PassError::AlreadyRedeemed(token.to_string()));
        }

        pass.redeem();
        Ok(())
    }

    /// Token format: PARK-{timestamp}-{short_id}
    fn generate_token(&self, booking_id: &Uuid) -> String {
        let timestamp = Utc::now().timestamp();
        let short_id = &booking_id.to_string()[..8];
        format!("PARK-{}-{}", timestamp, short_id.to_uppercase())
    }

    /// QR payload for the mobile pass
    pub fn qr_payload(&self, pass: &ParkingPass) -> String {
        serde_json::json!({
            "token": pass.token,
            "booking_id": pass.booking_id,
            "created_at": pass.created_at,
        })
        .to_string()
    }
}

impl Default for PassService {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("Pass not found: {0}")]
    NotFound(String),

    #[error("Pass already redeemed: {0}")]
    AlreadyRedeemed(String),
}
