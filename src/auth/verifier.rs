//! HS256 verification of caller identity tokens

use anyhow::{Context, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::Claims;

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_secret(secret: &[u8], issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify a JWT token and return the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let token_data =
            decode::<Claims>(token, &self.key, &self.validation).context("JWT validation failed")?;

        Ok(token_data.claims)
    }
}
