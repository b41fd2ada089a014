//! JWT issuing and verification for admin and agent sessions

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::model::{Agent, AgentRole};

/// Session lifetime for both admin and agent tokens
const TOKEN_LIFETIME_HOURS: i64 = 8;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AGENT: &str = "agent";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid or expired token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin email or agent id
    pub sub: String,
    /// Session kind, `admin` or `agent`
    pub role: String,
    /// Back-office role for agent sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_role: Option<AgentRole>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Issues and verifies HS256 session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    fn issue(&self, sub: String, role: &str, agent_role: Option<AgentRole>) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub,
            role: role.to_string(),
            agent_role,
            exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
            iat: now.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn issue_admin(&self, email: &str) -> Result<String, AuthError> {
        self.issue(email.to_string(), ROLE_ADMIN, None)
    }

    pub fn issue_agent(&self, agent: &Agent) -> Result<String, AuthError> {
        self.issue(agent.id.clone(), ROLE_AGENT, Some(agent.role))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> Agent {
        Agent {
            id: "agent-1".to_string(),
            username: "mmeyer".to_string(),
            email: "m.meyer@example.de".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Meyer".to_string(),
            role: AgentRole::SeniorAgent,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_token_round_trip() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue_admin("admin@example.de").unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert!(claims.is_admin());
        assert_eq!(claims.sub, "admin@example.de");
        assert!(claims.agent_role.is_none());
    }

    #[test]
    fn agent_token_carries_role() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue_agent(&agent()).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert!(!claims.is_admin());
        assert_eq!(claims.sub, "agent-1");
        assert_eq!(claims.agent_role, Some(AgentRole::SeniorAgent));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenService::new("secret-a");
        let verifier = TokenService::new("secret-b");
        let token = issuer.issue_admin("admin@example.de").unwrap();
        assert!(verifier.verify(&token).is_err());
    }
}
