//! Organization membership roster
//!
//! Maps each vendor organization to the vendor ids it bids as. The government
//! organization is authorized for every vendor id on the roster.

use std::str::FromStr;

use thiserror::Error;

use crate::ledger::OrgId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterParseError {
    #[error("roster entry {0:?} must look like ORG=VENDOR[,VENDOR...]")]
    MalformedEntry(String),

    #[error("roster entry for {0} lists no vendor ids")]
    NoVendors(String),

    #[error("vendor id {0:?} must not contain NUL characters")]
    InvalidVendorId(String),

    #[error("organization {0} appears more than once")]
    DuplicateOrg(String),
}

/// Ordered `org -> vendor ids` mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorRoster {
    entries: Vec<(OrgId, Vec<String>)>,
}

impl VendorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org<I, S>(mut self, org: impl Into<OrgId>, vendor_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .push((org.into(), vendor_ids.into_iter().map(Into::into).collect()));
        self
    }

    pub fn vendor_ids(&self, org: &OrgId) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(entry_org, _)| entry_org == org)
            .map(|(_, ids)| ids.as_slice())
    }

    /// Every vendor id on the roster, in roster order, without repeats
    pub fn all_vendor_ids(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for id in self.entries.iter().flat_map(|(_, ids)| ids) {
            if !all.contains(id) {
                all.push(id.clone());
            }
        }
        all
    }

    pub fn orgs(&self) -> impl Iterator<Item = &OrgId> {
        self.entries.iter().map(|(org, _)| org)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses `Org2MSP=300;Org3MSP=400,401`
impl FromStr for VendorRoster {
    type Err = RosterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut roster = VendorRoster::new();

        for entry in s.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (org, ids) = entry
                .split_once('=')
                .ok_or_else(|| RosterParseError::MalformedEntry(entry.to_string()))?;
            let org = org.trim();
            if org.is_empty() {
                return Err(RosterParseError::MalformedEntry(entry.to_string()));
            }
            let org = OrgId::from(org);
            if roster.vendor_ids(&org).is_some() {
                return Err(RosterParseError::DuplicateOrg(org.to_string()));
            }

            let ids: Vec<String> = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
            if ids.is_empty() {
                return Err(RosterParseError::NoVendors(org.to_string()));
            }
            if let Some(bad) = ids.iter().find(|id| id.contains('\u{0}')) {
                return Err(RosterParseError::InvalidVendorId(bad.clone()));
            }

            roster.entries.push((org, ids));
        }

        Ok(roster)
    }
}

/// Static configuration of the tender contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderConfig {
    /// The only organization allowed to create contracts
    pub government_org: OrgId,
    pub roster: VendorRoster,
}

impl TenderConfig {
    pub fn new(government_org: impl Into<OrgId>, roster: VendorRoster) -> Self {
        Self {
            government_org: government_org.into(),
            roster,
        }
    }

    /// The government followed by every roster org
    pub fn member_orgs(&self) -> Vec<OrgId> {
        let mut orgs = vec![self.government_org.clone()];
        for org in self.roster.orgs() {
            if !orgs.contains(org) {
                orgs.push(org.clone());
            }
        }
        orgs
    }

    /// Vendor ids whose bids `org` may enumerate, or `None` when the roster
    /// has nothing for it.
    pub fn authorized_vendor_ids(&self, org: &OrgId) -> Option<Vec<String>> {
        let ids = if *org == self.government_org {
            self.roster.all_vendor_ids()
        } else {
            self.roster.vendor_ids(org)?.to_vec()
        };

        (!ids.is_empty()).then_some(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TenderConfig {
        let roster: VendorRoster = "Org2MSP=300; Org3MSP=400,300".parse().unwrap();
        TenderConfig::new("Org1MSP", roster)
    }

    #[test]
    fn government_sees_every_vendor_once() {
        let ids = config().authorized_vendor_ids(&OrgId::from("Org1MSP")).unwrap();
        assert_eq!(ids, vec!["300".to_string(), "400".to_string()]);
    }

    #[test]
    fn vendor_sees_its_own_ids() {
        let cfg = config();
        assert_eq!(
            cfg.authorized_vendor_ids(&OrgId::from("Org2MSP")).unwrap(),
            vec!["300".to_string()]
        );
        assert_eq!(
            cfg.authorized_vendor_ids(&OrgId::from("Org3MSP")).unwrap(),
            vec!["400".to_string(), "300".to_string()]
        );
        assert_eq!(cfg.authorized_vendor_ids(&OrgId::from("Org9MSP")), None);
    }

    #[test]
    fn members_are_the_government_then_roster_orgs() {
        let cfg = TenderConfig::new("Org2MSP", "Org2MSP=300;Org3MSP=400".parse().unwrap());
        assert_eq!(
            cfg.member_orgs(),
            vec![OrgId::from("Org2MSP"), OrgId::from("Org3MSP")]
        );
        assert_eq!(config().member_orgs().len(), 3);
    }

    #[test]
    fn empty_roster_authorizes_nobody() {
        let cfg = TenderConfig::new("Org1MSP", VendorRoster::new());
        assert_eq!(cfg.authorized_vendor_ids(&OrgId::from("Org1MSP")), None);
    }

    #[test]
    fn rejects_malformed_rosters() {
        assert_eq!(
            "Org2MSP".parse::<VendorRoster>(),
            Err(RosterParseError::MalformedEntry("Org2MSP".to_string()))
        );
        assert_eq!(
            "Org2MSP= ,".parse::<VendorRoster>(),
            Err(RosterParseError::NoVendors("Org2MSP".to_string()))
        );
        assert_eq!(
            "Org2MSP=1;Org2MSP=2".parse::<VendorRoster>(),
            Err(RosterParseError::DuplicateOrg("Org2MSP".to_string()))
        );
    }

    #[test]
    fn builder_matches_parsed_form() {
        let built = VendorRoster::new()
            .with_org("Org2MSP", ["300"])
            .with_org("Org3MSP", ["400", "401"]);
        let parsed: VendorRoster = "Org2MSP=300;Org3MSP=400,401".parse().unwrap();
        assert_eq!(built, parsed);
    }
}
