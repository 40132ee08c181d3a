use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::application::errors::DomainError;

/// Represents a registered user of the bot.
///
/// Created on first contact from a platform ID, never deleted. The only
/// field that is ever mutated afterwards is the nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Durable identifier, assigned by the store on creation (0 until then)
    pub id: i64,
    /// Messaging-platform user ID
    pub platform_id: i64,
    pub phone: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(platform_id: i64, phone: impl Into<String>, nickname: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            platform_id,
            phone: phone.into(),
            nickname: nickname.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check entity invariants
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.phone.is_empty() {
            return Err(DomainError::InvalidPhone);
        }
        if self.nickname.is_empty() {
            return Err(DomainError::InvalidNickname);
        }
        if self.platform_id <= 0 {
            return Err(DomainError::InvalidPlatformId);
        }
        Ok(())
    }

    pub fn update_nickname(&mut self, nickname: impl Into<String>) -> Result<(), DomainError> {
        let nickname = nickname.into();
        if nickname.is_empty() {
            return Err(DomainError::InvalidNickname);
        }
        self.nickname = nickname;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nickname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_user_passes_validation() {
        let user = User::new(42, "+123456", "sasha");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn empty_phone_is_rejected() {
        let user = User::new(42, "", "sasha");
        assert_eq!(user.validate(), Err(DomainError::InvalidPhone));
    }

    #[test]
    fn empty_nickname_is_rejected() {
        let user = User::new(42, "+123456", "");
        assert_eq!(user.validate(), Err(DomainError::InvalidNickname));
    }

    #[test]
    fn non_positive_platform_id_is_rejected() {
        let user = User::new(0, "+123456", "sasha");
        assert_eq!(user.validate(), Err(DomainError::InvalidPlatformId));
    }

    #[test]
    fn update_nickname_bumps_updated_at() {
        let mut user = User::new(42, "+123456", "sasha");
        let before = user.updated_at;
        user.update_nickname("pasha").unwrap();
        assert_eq!(user.nickname, "pasha");
        assert!(user.updated_at >= before);
        assert_eq!(
            user.update_nickname(""),
            Err(DomainError::InvalidNickname)
        );
    }
}
