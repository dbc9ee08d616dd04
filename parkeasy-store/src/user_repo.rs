use parkeasy_core::identity::{UserProfile, Vehicle};
use parkeasy_core::payment::PaymentMethod;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Everything the profile surface hangs off a user
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    pub profile: UserProfile,
    pub avatar_url: Option<String>,
    pub vehicles: Vec<Vehicle>,
    pub favorites: Vec<Uuid>,
    pub payment_methods: Vec<PaymentMethod>,
}

impl UserAccount {
    fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            avatar_url: None,
            vehicles: Vec::new(),
            favorites: Vec::new(),
            payment_methods: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("User not found: {0}")]
    NotFound(String),
}

/// In-memory account store keyed by user id
pub struct InMemoryUserStore {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Seeded with the demo account's vehicle, matching the sandbox
    /// directory in parkeasy-core
    pub fn with_demo_accounts() -> Self {
        let store = Self::new();

        let mut demo = UserAccount::new(UserProfile {
            id: "user_1".to_string(),
            name: "Demo User".to_string(),
            email: "demo@parkeasy.com".to_string(),
            phone: "+1234567890".to_string(),
        });
        demo.vehicles.push(Vehicle {
            id: "v1".to_string(),
            vehicle_type: "sedan".to_string(),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2020,
            color: "Silver".to_string(),
            license_plate: "ABC123".to_string(),
            is_default: true,
        });

        store
            .accounts
            .write()
            .expect("account lock poisoned")
            .insert(demo.profile.id.clone(), demo);

        store
    }

    /// Ensure an account exists for a freshly authenticated profile without
    /// clobbering an existing one
    pub fn ensure_account(&self, profile: &UserProfile) {
        let mut accounts = self.accounts.write().expect("account lock poisoned");
        accounts
            .entry(profile.id.clone())
            .or_insert_with(|| UserAccount::new(profile.clone()));
    }

    pub fn get(&self, user_id: &str) -> Result<UserAccount, UserStoreError> {
        self.accounts
            .read()
            .expect("account lock poisoned")
            .get(user_id)
            .cloned()
            .ok_or_else(|| UserStoreError::NotFound(user_id.to_string()))
    }

    pub fn add_vehicle(&self, user_id: &str, mut vehicle: Vehicle) -> Result<UserAccount, UserStoreError> {
        self.with_account(user_id, |account| {
            if vehicle.is_default {
                for existing in &mut account.vehicles {
                    existing.is_default = false;
                }
            }
            if vehicle.id.is_empty() {
                vehicle.id = format!("v_{}", Uuid::new_v4().simple());
            }
            account.vehicles.push(vehicle.clone());
        })
    }

    pub fn remove_vehicle(&self, user_id: &str, vehicle_id: &str) -> Result<UserAccount, UserStoreError> {
        self.with_account(user_id, |account| {
            account.vehicles.retain(|v| v.id != vehicle_id);
        })
    }

    /// Idempotent: favoriting an already-favorite spot is a no-op
    pub fn add_favorite(&self, user_id: &str, spot_id: Uuid) -> Result<UserAccount, UserStoreError> {
        self.with_account(user_id, |account| {
            if !account.favorites.contains(&spot_id) {
                account.favorites.push(spot_id);
            }
        })
    }

    pub fn remove_favorite(&self, user_id: &str, spot_id: Uuid) -> Result<UserAccount, UserStoreError> {
        self.with_account(user_id, |account| {
            account.favorites.retain(|id| *id != spot_id);
        })
    }

    /// A new default instrument unsets the previous default
    pub fn add_payment_method(
        &self,
        user_id: &str,
        method: PaymentMethod,
    ) -> Result<UserAccount, UserStoreError> {
        self.with_account(user_id, |account| {
            if method.is_default() {
                for existing in &mut account.payment_methods {
                    existing.set_default(false);
                }
            }
            account.payment_methods.push(method.clone());
        })
    }

    pub fn remove_payment_method(
        &self,
        user_id: &str,
        method_id: &str,
    ) -> Result<UserAccount, UserStoreError> {
        self.with_account(user_id, |account| {
            account.payment_methods.retain(|m| m.id() != method_id);
        })
    }

    fn with_account<F>(&self, user_id: &str, mutate: F) -> Result<UserAccount, UserStoreError>
    where
        F: FnOnce(&mut UserAccount),
    {
        let mut accounts = self.accounts.write().expect("account lock poisoned");
        let account = accounts
            .get_mut(user_id)
            .ok_or_else(|| UserStoreError::NotFound(user_id.to_string()))?;
        mutate(account);
        Ok(account.clone())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}
