use async_trait::async_trait;
use parkeasy_shared::pii::Masked;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Public view of an account; never carries the credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String, // user_<id>
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A registered vehicle on a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub license_plate: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Masked<String>,
    pub phone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    AlreadyRegistered,

    #[error("Name, email and password are required")]
    MissingFields,
}

/// Authentication seam. The engine ships a mock directory; a real deployment
/// would verify against a user service with hashed credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<UserProfile, IdentityError>;

    async fn register(&self, new_user: NewUser) -> Result<UserProfile, IdentityError>;
}

struct DirectoryEntry {
    profile: UserProfile,
    password: String,
}

/// Mock user directory seeded with the sandbox accounts. Passwords are
/// compared in the clear; this never leaves the simulation.
pub struct MockDirectory {
    users: RwLock<Vec<DirectoryEntry>>,
}

impl MockDirectory {
    pub fn with_demo_users() -> Self {
        let users = vec![
            DirectoryEntry {
                profile: UserProfile {
                    id: "user_1".to_string(),
                    name: "Demo User".to_string(),
                    email: "demo@parkeasy.com".to_string(),
                    phone: "+1234567890".to_string(),
                },
                password: "password123".to_string(),
            },
            DirectoryEntry {
                profile: UserProfile {
                    id: "user_2".to_string(),
                    name: "John Doe".to_string(),
                    email: "john@example.com".to_string(),
                    phone: "+1987654321".to_string(),
                },
                password: "password123".to_string(),
            },
        ];

        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockDirectory {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, IdentityError> {
        tracing::info!(email = %email, "Login attempt");

        let users = self.users.read().expect("directory lock poisoned");
        let entry = users
            .iter()
            .find(|entry| entry.profile.email == email)
            .ok_or(IdentityError::InvalidCredentials)?;

        if entry.password != password {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(entry.profile.clone())
    }

    async fn register(&self, new_user: NewUser) -> Result<UserProfile, IdentityError> {
        if new_user.name.is_empty() || new_user.email.is_empty() {
            return Err(IdentityError::MissingFields);
        }
        let password = new_user.password.into_inner();
        if password.len() < 6 {
            return Err(IdentityError::MissingFields);
        }

        let mut users = self.users.write().expect("directory lock poisoned");
        if users.iter().any(|entry| entry.profile.email == new_user.email) {
            return Err(IdentityError::AlreadyRegistered);
        }

        let profile = UserProfile {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone.unwrap_or_default(),
        };

        tracing::info!(user_id = %profile.id, "User registered");
        users.push(DirectoryEntry {
            profile: profile.clone(),
            password,
        });

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_login() {
        let directory = MockDirectory::with_demo_users();

        let profile = directory
            .authenticate("demo@parkeasy.com", "password123")
            .await
            .unwrap();
        assert_eq!(profile.id, "user_1");
        assert_eq!(profile.name, "Demo User");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let directory = MockDirectory::with_demo_users();

        let result = directory.authenticate("demo@parkeasy.com", "hunter2").await;
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));

        let result = directory.authenticate("nobody@parkeasy.com", "password123").await;
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_registration_and_duplicate_rejection() {
        let directory = MockDirectory::with_demo_users();

        let profile = directory
            .register(NewUser {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                password: Masked("s3cret-pass".to_string()),
                phone: None,
            })
            .await
            .unwrap();
        assert!(profile.id.starts_with("user_"));

        // Registered users can log in
        let logged_in = directory.authenticate("asha@example.com", "s3cret-pass").await;
        assert!(logged_in.is_ok());

        // Same email twice conflicts
        let duplicate = directory
            .register(NewUser {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                password: Masked("another-pass".to_string()),
                phone: None,
            })
            .await;
        assert!(matches!(duplicate, Err(IdentityError::AlreadyRegistered)));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let directory = MockDirectory::with_demo_users();

        let result = directory
            .register(NewUser {
                name: "Short Pass".to_string(),
                email: "short@example.com".to_string(),
                password: Masked("12345".to_string()),
                phone: None,
            })
            .await;
        assert!(matches!(result, Err(IdentityError::MissingFields)));
    }
}
