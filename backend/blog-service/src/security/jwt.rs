/// RS256 bearer tokens for blog-service
///
/// Tokens are issued at login and validated by the authentication middleware
/// on every request that carries an `Authorization: Bearer` header.
///
/// - **RS256 only**: the validator never accepts a symmetric algorithm
/// - **No hardcoded keys**: PEMs come from configuration
use crate::config::AuthConfig;
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// "access" or "refresh"
    pub token_type: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Signing and verification keys.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_pem(private_key_pem: &str, public_key_pem: &str) -> Result<Self> {
        let encoding = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;
        let decoding = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

        Ok(Self { encoding, decoding })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        match (&config.private_key_pem, &config.public_key_pem) {
            (Some(private_key), Some(public_key)) => Self::from_pem(private_key, public_key),
            _ => Err(anyhow!(
                "JWT_PRIVATE_KEY_PEM and JWT_PUBLIC_KEY_PEM are required to issue tokens"
            )),
        }
    }

    fn generate(&self, user_id: Uuid, username: &str, token_type: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: token_type.to_string(),
            username: username.to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to generate {token_type} token: {e}"))
    }

    pub fn generate_access_token(&self, user_id: Uuid, username: &str) -> Result<String> {
        self.generate(
            user_id,
            username,
            ACCESS_TOKEN,
            Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
        )
    }

    pub fn generate_refresh_token(&self, user_id: Uuid, username: &str) -> Result<String> {
        self.generate(
            user_id,
            username,
            REFRESH_TOKEN,
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        )
    }

    pub fn generate_token_pair(&self, user_id: Uuid, username: &str) -> Result<TokenResponse> {
        Ok(TokenResponse {
            access_token: self.generate_access_token(user_id, username)?,
            refresh_token: self.generate_refresh_token(user_id, username)?,
            token_type: "Bearer".to_string(),
            expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
        })
    }

    /// Verify signature and expiry.
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| anyhow!("Token validation failed: {e}"))
    }

    /// Validate an access token and return the user id it was issued to.
    pub fn authenticate(&self, token: &str) -> Result<Uuid> {
        let data = self.validate_token(token)?;
        if data.claims.token_type != ACCESS_TOKEN {
            return Err(anyhow!("Expected an access token"));
        }
        Uuid::parse_str(&data.claims.sub).map_err(|e| anyhow!("Invalid user ID in token: {e}"))
    }
}
