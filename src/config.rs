use anyhow::{Context, Result};
use std::env;

use crate::ledger::OrgId;
use crate::tender::{TenderConfig, VendorRoster};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Channel members
    pub government_org_id: OrgId,
    pub vendor_roster: VendorRoster,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Caller identity tokens
    pub identity_jwt_secret: String,
    pub identity_jwt_issuer: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Channel members
        let government_org_id =
            env::var("GOVERNMENT_ORG_ID").unwrap_or_else(|_| "Org1MSP".to_string());
        if government_org_id.trim().is_empty() {
            anyhow::bail!("GOVERNMENT_ORG_ID must not be empty");
        }
        let vendor_roster = env::var("VENDOR_ROSTER")
            .context("VENDOR_ROSTER must be set")?
            .parse::<VendorRoster>()
            .context("VENDOR_ROSTER is malformed")?;

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Caller identity tokens
        let identity_jwt_secret =
            env::var("IDENTITY_JWT_SECRET").context("IDENTITY_JWT_SECRET must be set")?;
        let identity_jwt_issuer =
            env::var("IDENTITY_JWT_ISSUER").unwrap_or_else(|_| "tender-ledger".to_string());

        Ok(Settings {
            env,
            server_addr,
            government_org_id: OrgId::new(government_org_id.trim()),
            vendor_roster,
            cors_allow_origins,
            identity_jwt_secret,
            identity_jwt_issuer,
        })
    }

    /// What the contract needs from the environment
    pub fn tender_config(&self) -> TenderConfig {
        TenderConfig::new(self.government_org_id.clone(), self.vendor_roster.clone())
    }
}
