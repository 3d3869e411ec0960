//! Repository permission levels

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Permission a team holds on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    #[serde(alias = "pull")]
    Read,
    Triage,
    #[serde(alias = "push")]
    Write,
    Maintain,
    Admin,
}

impl Permission {
    /// Name used by the GitHub REST API `permission` field
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Read => "pull",
            Self::Triage => "triage",
            Self::Write => "push",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Triage => "triage",
            Self::Write => "write",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" | "pull" => Ok(Self::Read),
            "triage" => Ok(Self::Triage),
            "write" | "push" => Ok(Self::Write),
            "maintain" => Ok(Self::Maintain),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::validation(format!(
                "Invalid permission '{}': expected one of read, write, admin, maintain, triage",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_literals() {
        assert_eq!("read".parse::<Permission>().unwrap(), Permission::Read);
        assert_eq!("write".parse::<Permission>().unwrap(), Permission::Write);
        assert_eq!("admin".parse::<Permission>().unwrap(), Permission::Admin);
        assert_eq!("maintain".parse::<Permission>().unwrap(), Permission::Maintain);
        assert_eq!("triage".parse::<Permission>().unwrap(), Permission::Triage);
    }

    #[test]
    fn test_parse_api_aliases() {
        assert_eq!("pull".parse::<Permission>().unwrap(), Permission::Read);
        assert_eq!("push".parse::<Permission>().unwrap(), Permission::Write);
    }

    #[test]
    fn test_parse_invalid() {
        let err = "owner".parse::<Permission>().unwrap_err();
        assert!(err.to_string().contains("Invalid permission 'owner'"));
        assert!("READ".parse::<Permission>().is_err());
    }

    #[test]
    fn test_api_names() {
        assert_eq!(Permission::Read.as_api_str(), "pull");
        assert_eq!(Permission::Write.as_api_str(), "push");
        assert_eq!(Permission::Admin.as_api_str(), "admin");
    }

    #[test]
    fn test_serde() {
        let p: Permission = serde_json::from_str("\"push\"").unwrap();
        assert_eq!(p, Permission::Write);
        assert_eq!(serde_json::to_string(&Permission::Maintain).unwrap(), "\"maintain\"");
    }
}
