use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parkeasy_shared::pii::Masked;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::card;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
    Refunded,
}

/// A processed (or attempted) charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String, // pay_<id>
    pub amount: f64,
    pub currency: String,
    pub method_id: String,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A stored payment instrument. Card numbers never survive registration;
/// only the brand and last four digits are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentMethod {
    Card {
        id: String,
        card_brand: String,
        last4: String,
        expiry_month: u8,
        expiry_year: u16,
        cardholder_name: String,
        is_default: bool,
    },
    Upi {
        id: String,
        upi_id: String,
        is_default: bool,
    },
}

impl PaymentMethod {
    pub fn id(&self) -> &str {
        match self {
            Self::Card { id, .. } | Self::Upi { id, .. } => id,
        }
    }

    pub fn is_default(&self) -> bool {
        match self {
            Self::Card { is_default, .. } | Self::Upi { is_default, .. } => *is_default,
        }
    }

    pub fn set_default(&mut self, value: bool) {
        match self {
            Self::Card { is_default, .. } | Self::Upi { is_default, .. } => *is_default = value,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::Upi { .. } => "upi",
        }
    }
}

/// Registration payload for a new instrument
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NewPaymentMethod {
    Card {
        card_number: Masked<String>,
        cardholder_name: String,
        expiry_month: u8,
        expiry_year: u16,
        cvv: Masked<String>,
        #[serde(default)]
        is_default: bool,
    },
    Upi {
        upi_id: String,
        #[serde(default)]
        is_default: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeRequest {
    pub amount: f64,
    pub currency: String,
    pub method_id: String,
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Invalid payment method: {0}")]
    InvalidMethod(String),

    #[error("Invalid card number")]
    InvalidCard,

    #[error("Invalid UPI ID format")]
    InvalidUpi,

    #[error("Payment processing failed. Please try again.")]
    Declined,

    #[error("Payment not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge an instrument; the returned record is already settled
    async fn process_payment(&self, charge: ChargeRequest) -> Result<PaymentRecord, PaymentError>;

    /// Validate and tokenize a new instrument
    async fn register_method(
        &self,
        method: NewPaymentMethod,
    ) -> Result<PaymentMethod, PaymentError>;

    /// Look up a previously processed charge
    async fn verify_payment(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError>;

    /// Mark a settled charge refunded
    async fn refund(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError>;
}

/// In-process gateway simulation. Charges succeed with a configurable
/// probability (the marketplace's sandbox behavior is a 90% success rate);
/// tests pin the rate to 1.0 or 0.0 for determinism.
pub struct SimulatedGateway {
    success_rate: f64,
    records: RwLock<HashMap<String, PaymentRecord>>,
}

impl SimulatedGateway {
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate,
            records: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn process_payment(&self, charge: ChargeRequest) -> Result<PaymentRecord, PaymentError> {
        if !charge.method_id.starts_with("pm_") {
            return Err(PaymentError::InvalidMethod(charge.method_id));
        }

        let succeeded = rand::thread_rng().gen::<f64>() < self.success_rate;
        if !succeeded {
            tracing::warn!(method_id = %charge.method_id, "Simulated payment declined");
            return Err(PaymentError::Declined);
        }

        let record = PaymentRecord {
            id: format!("pay_{}", Uuid::new_v4().simple()),
            amount: charge.amount,
            currency: charge.currency,
            method_id: charge.method_id,
            status: PaymentStatus::Succeeded,
            description: charge.description,
            created_at: Utc::now(),
        };

        tracing::info!(payment_id = %record.id, amount = record.amount, "Payment captured");

        self.records
            .write()
            .expect("payment record lock poisoned")
            .insert(record.id.clone(), record.clone());

        Ok(record)
    }

    async fn register_method(
        &self,
        method: NewPaymentMethod,
    ) -> Result<PaymentMethod, PaymentError> {
        match method {
            NewPaymentMethod::Card {
                card_number,
                cardholder_name,
                expiry_month,
                expiry_year,
                cvv: _,
                is_default,
            } => {
                let number = card_number.into_inner();
                if !card::luhn_valid(&number) {
                    return Err(PaymentError::InvalidCard);
                }

                Ok(PaymentMethod::Card {
                    id: format!("pm_{}", Uuid::new_v4().simple()),
                    card_brand: card::card_brand(&number).to_string(),
                    last4: card::last4(&number),
                    expiry_month,
                    expiry_year,
                    cardholder_name,
                    is_default,
                })
            }
            NewPaymentMethod::Upi { upi_id, is_default } => {
                let valid = upi_id.split_once('@').is_some_and(|(local, psp)| {
                    !local.is_empty()
                        && !psp.is_empty()
                        && local
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
                        && psp.chars().all(|c| c.is_ascii_alphanumeric())
                });
                if !valid {
                    return Err(PaymentError::InvalidUpi);
                }

                Ok(PaymentMethod::Upi {
                    id: format!("pm_{}", Uuid::new_v4().simple()),
                    upi_id,
                    is_default,
                })
            }
        }
    }

    async fn verify_payment(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError> {
        if !payment_id.starts_with("pay_") {
            return Err(PaymentError::InvalidMethod(payment_id.to_string()));
        }

        self.records
            .read()
            .expect("payment record lock poisoned")
            .get(payment_id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(payment_id.to_string()))
    }

    async fn refund(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError> {
        let mut records = self.records.write().expect("payment record lock poisoned");
        let record = records
            .get_mut(payment_id)
            .ok_or_else(|| PaymentError::NotFound(payment_id.to_string()))?;

        record.status = PaymentStatus::Refunded;
        tracing::info!(payment_id = %record.id, "Payment refunded");

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge() -> ChargeRequest {
        ChargeRequest {
            amount: 160.0,
            currency: "INR".to_string(),
            method_id: "pm_test".to_string(),
            description: Some("Parking payment".to_string()),
        }
    }

    #[tokio::test]
    async fn test_charge_succeeds_at_full_rate() {
        let gateway = SimulatedGateway::new(1.0);

        let record = gateway.process_payment(charge()).await.unwrap();
        assert_eq!(record.status, PaymentStatus::Succeeded);
        assert!(record.id.starts_with("pay_"));

        // And is retrievable for verification
        let verified = gateway.verify_payment(&record.id).await.unwrap();
        assert_eq!(verified.amount, 160.0);
    }

    #[tokio::test]
    async fn test_charge_declines_at_zero_rate() {
        let gateway = SimulatedGateway::new(0.0);
        let result = gateway.process_payment(charge()).await;
        assert!(matches!(result, Err(PaymentError::Declined)));
    }

    #[tokio::test]
    async fn test_rejects_malformed_method_id() {
        let gateway = SimulatedGateway::new(1.0);
        let mut req = charge();
        req.method_id = "card_123".to_string();

        let result = gateway.process_payment(req).await;
        assert!(matches!(result, Err(PaymentError::InvalidMethod(_))));
    }

    #[tokio::test]
    async fn test_card_registration_validates_luhn() {
        let gateway = SimulatedGateway::new(1.0);

        let method = gateway
            .register_method(NewPaymentMethod::Card {
                card_number: Masked("4111111111111111".to_string()),
                cardholder_name: "Demo User".to_string(),
                expiry_month: 12,
                expiry_year: 27,
                cvv: Masked("123".to_string()),
                is_default: true,
            })
            .await
            .unwrap();

        match method {
            PaymentMethod::Card {
                ref id,
                ref card_brand,
                ref last4,
                ..
            } => {
                assert!(id.starts_with("pm_"));
                assert_eq!(card_brand, "visa");
                assert_eq!(last4, "1111");
            }
            PaymentMethod::Upi { .. } => panic!("expected a card"),
        }

        let bad = gateway
            .register_method(NewPaymentMethod::Card {
                card_number: Masked("4111111111111112".to_string()),
                cardholder_name: "Demo User".to_string(),
                expiry_month: 12,
                expiry_year: 27,
                cvv: Masked("123".to_string()),
                is_default: false,
            })
            .await;
        assert!(matches!(bad, Err(PaymentError::InvalidCard)));
    }

    #[tokio::test]
    async fn test_upi_registration_validates_shape() {
        let gateway = SimulatedGateway::new(1.0);

        let ok = gateway
            .register_method(NewPaymentMethod::Upi {
                upi_id: "demo.user@okbank".to_string(),
                is_default: false,
            })
            .await;
        assert!(ok.is_ok());

        let bad = gateway
            .register_method(NewPaymentMethod::Upi {
                upi_id: "not-a-upi-id".to_string(),
                is_default: false,
            })
            .await;
        assert!(matches!(bad, Err(PaymentError::InvalidUpi)));
    }

    #[test]
    fn test_payment_method_wire_shape() {
        let method = PaymentMethod::Card {
            id: "pm_abc".to_string(),
            card_brand: "visa".to_string(),
            last4: "1111".to_string(),
            expiry_month: 12,
            expiry_year: 27,
            cardholder_name: "Demo User".to_string(),
            is_default: true,
        };

        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["type"], "card");
        assert_eq!(value["last4"], "1111");
        // Full card numbers never appear on the wire
        assert!(value.get("card_number").is_none());
    }

    #[tokio::test]
    async fn test_refund_marks_record() {
        let gateway = SimulatedGateway::new(1.0);
        let record = gateway.process_payment(charge()).await.unwrap();

        let refunded = gateway.refund(&record.id).await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);

        let missing = gateway.refund("pay_missing").await;
        assert!(matches!(missing, Err(PaymentError::NotFound(_))));
    }
}
