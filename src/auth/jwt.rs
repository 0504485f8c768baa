use crate::core::errors::SettleError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Member ID
    pub exp: usize,  // Expiration timestamp
}

pub struct JwtService {
    secret: String,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        JwtService { secret }
    }

    /// Issues a token for `member_id` valid for `ttl_secs`.
    pub fn generate_token(&self, member_id: &str, ttl_secs: u64) -> Result<String, SettleError> {
        let expiration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| (d.as_secs() + ttl_secs) as usize)
            .map_err(|e| SettleError::InternalServerError(format!("Time error: {}", e)))?;

        let claims = Claims {
            sub: member_id.to_string(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| SettleError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, SettleError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| SettleError::Unauthenticated(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip_keeps_subject() {
        let jwt = JwtService::new("test-secret".to_string());
        let token = jwt.generate_token("member-1", 3600).unwrap();
        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "member-1");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("one".to_string());
        let verifier = JwtService::new("two".to_string());
        let token = issuer.generate_token("member-1", 3600).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(SettleError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let jwt = JwtService::new("test-secret".to_string());
        assert!(matches!(
            jwt.validate_token("not-a-jwt"),
            Err(SettleError::Unauthenticated(_))
        ));
    }
}
