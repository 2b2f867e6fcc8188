use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AuthError, AuthResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserClaims {
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            role: None,
        }
    }

    pub fn with_role<S: Into<String>>(mut self, role: S) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn user_id(&self) -> AuthResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

pub fn generate_token<K: AsRef<[u8]>>(claims: &UserClaims, key: K) -> AuthResult<String> {
    let key = EncodingKey::from_secret(key.as_ref());
    Ok(jsonwebtoken::encode(&Header::default(), claims, &key)?)
}

/// Verifies signature and expiry.
pub fn process_token<K: AsRef<[u8]>>(token: &str, key: K) -> AuthResult<UserClaims> {
    let key = DecodingKey::from_secret(key.as_ref());
    let data = jsonwebtoken::decode::<UserClaims>(token, &key, &Validation::default())?;
    Ok(data.claims)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_token_carries_user_and_role() {
        let user = Uuid::new_v4();
        let claims = UserClaims::new(user, Duration::hours(1)).with_role("admin");
        let token = generate_token(&claims, "k").unwrap();

        let decoded = process_token(&token, "k").unwrap();
        assert_eq!(decoded.user_id().unwrap(), user);
        assert_eq!(decoded.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_wrong_key_or_expired() {
        let claims = UserClaims::new(Uuid::new_v4(), Duration::hours(1));
        let token = generate_token(&claims, "k").unwrap();
        assert!(process_token(&token, "other").is_err());

        let expired = UserClaims::new(Uuid::new_v4(), Duration::hours(-2));
        let token = generate_token(&expired, "k").unwrap();
        assert!(process_token(&token, "k").is_err());
    }

    #[test]
    fn test_subject_must_be_uuid() {
        let claims = UserClaims {
            sub: "alice".into(),
            exp: 0,
            role: None,
        };
        assert!(matches!(claims.user_id(), Err(AuthError::InvalidSubject(_))));
    }
}
