//! On-disk shape of a team document

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::domain::{
    Permission, RepositoryRule, RepositoryRules, TeamDesiredState, TeamValidationError,
    TeamVisibility,
};

/// A team document as written by users
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamDocument {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: TeamVisibility,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub repositories: RuleList,
}

impl TeamDocument {
    pub fn into_desired_state(self) -> Result<TeamDesiredState, TeamValidationError> {
        let rules = self
            .repositories
            .0
            .into_iter()
            .map(|entry| RepositoryRule::new(&entry.pattern, entry.permission))
            .collect::<Result<Vec<_>, _>>()?;

        let mut team = TeamDesiredState::new(self.name, self.slug)?
            .with_visibility(self.visibility)
            .with_members(self.members)?
            .with_repository_rules(RepositoryRules::new(rules));

        if let Some(description) = self.description {
            team = team.with_description(description);
        }

        Ok(team)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub pattern: String,
    pub permission: Permission,
}

/// Repository rules in document order.
///
/// Accepts a list of `{pattern, permission}` objects, or an object mapping
/// pattern to permission whose entries are kept in the order they were read.
/// TOML tables lose that order, so `parse_document` only lets JSON use the
/// object form.
#[derive(Debug, Default)]
pub struct RuleList(pub Vec<RuleEntry>);

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RuleListVisitor)
    }
}

struct RuleListVisitor;

impl<'de> Visitor<'de> for RuleListVisitor {
    type Value = RuleList;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list of {pattern, permission} rules or a map of pattern to permission")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut rules = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<RuleEntry>()? {
            rules.push(entry);
        }
        Ok(RuleList(rules))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut rules: Vec<RuleEntry> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((pattern, permission)) = map.next_entry::<String, Permission>()? {
            if rules.iter().any(|r| r.pattern == pattern) {
                return Err(de::Error::custom(format!(
                    "duplicate repository pattern '{}'",
                    pattern
                )));
            }
            rules.push(RuleEntry {
                pattern,
                permission,
            });
        }
        Ok(RuleList(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(team: &TeamDesiredState) -> Vec<(String, Permission)> {
        team.repository_rules()
            .iter()
            .map(|r| (r.pattern().to_string(), r.permission()))
            .collect()
    }

    #[test]
    fn test_json_rule_list() {
        let document: TeamDocument = serde_json::from_str(
            r#"{
                "name": "Engineering",
                "slug": "eng",
                "description": "Builds things",
                "visibility": "open",
                "members": ["a", "b"],
                "repositories": [
                    {"pattern": "repo-*", "permission": "read"},
                    {"pattern": "repo-special", "permission": "admin"}
                ]
            }"#,
        )
        .unwrap();
        let team = document.into_desired_state().unwrap();

        assert_eq!(team.description(), Some("Builds things"));
        assert_eq!(team.visibility(), TeamVisibility::Open);
        assert_eq!(team.members().len(), 2);
        assert_eq!(
            patterns(&team),
            vec![
                ("repo-*".to_string(), Permission::Read),
                ("repo-special".to_string(), Permission::Admin),
            ]
        );
    }

    #[test]
    fn test_json_rule_map_keeps_document_order() {
        let document: TeamDocument = serde_json::from_str(
            r#"{
                "name": "eng",
                "slug": "eng",
                "repositories": {"zeta-*": "write", "alpha": "maintain", "*": "read"}
            }"#,
        )
        .unwrap();
        let team = document.into_desired_state().unwrap();

        assert_eq!(
            patterns(&team),
            vec![
                ("zeta-*".to_string(), Permission::Write),
                ("alpha".to_string(), Permission::Maintain),
                ("*".to_string(), Permission::Read),
            ]
        );
    }

    #[test]
    fn test_json_rule_map_rejects_duplicate_pattern() {
        let result: Result<TeamDocument, _> = serde_json::from_str(
            r#"{"name": "eng", "slug": "eng", "repositories": {"a": "read", "a": "admin"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_rule_tables() {
        let document: TeamDocument = toml::from_str(
            r#"
            name = "Platform"
            slug = "platform"
            members = ["octocat"]

            [[repositories]]
            pattern = "infra-*"
            permission = "maintain"

            [[repositories]]
            pattern = "*"
            permission = "triage"
            "#,
        )
        .unwrap();
        let team = document.into_desired_state().unwrap();

        assert_eq!(team.visibility(), TeamVisibility::Restricted);
        assert_eq!(
            patterns(&team),
            vec![
                ("infra-*".to_string(), Permission::Maintain),
                ("*".to_string(), Permission::Triage),
            ]
        );
    }

    #[test]
    fn test_defaults_when_optional_fields_missing() {
        let document: TeamDocument =
            serde_json::from_str(r#"{"name": "eng", "slug": "eng"}"#).unwrap();
        let team = document.into_desired_state().unwrap();

        assert!(team.members().is_empty());
        assert!(team.repository_rules().is_empty());
        assert!(team.description().is_none());
    }

    #[test]
    fn test_invalid_permission_rejected() {
        let result: Result<TeamDocument, _> = serde_json::from_str(
            r#"{"name": "eng", "slug": "eng", "repositories": [{"pattern": "*", "permission": "owner"}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<TeamDocument, _> =
            serde_json::from_str(r#"{"name": "eng", "slug": "eng", "maintainers": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_slug_rejected() {
        let document: TeamDocument =
            serde_json::from_str(r#"{"name": "eng", "slug": ""}"#).unwrap();
        assert_eq!(
            document.into_desired_state().unwrap_err(),
            TeamValidationError::EmptySlug
        );
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let document: TeamDocument = serde_json::from_str(
            r#"{"name": "eng", "slug": "eng", "repositories": [{"pattern": "", "permission": "read"}]}"#,
        )
        .unwrap();
        assert_eq!(
            document.into_desired_state().unwrap_err(),
            TeamValidationError::EmptyPattern
        );
    }
}
