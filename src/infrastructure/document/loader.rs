//! Loads team documents from a directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::model::TeamDocument;
use crate::domain::{DomainError, TeamDesiredState};

/// Supported document formats, by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Reads every `*.json` and `*.toml` file of a directory, one team per file.
///
/// Files are read in file-name order and subdirectories are ignored. Any
/// invalid document fails the whole load.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    dir: PathBuf,
}

impl DocumentLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn load(&self) -> Result<Vec<TeamDesiredState>, DomainError> {
        let paths = self.document_paths().await?;
        let mut teams = Vec::with_capacity(paths.len());
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for path in paths {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| DomainError::document(path.display().to_string(), e.to_string()))?;
            let team = parse_document(&path, &contents)?;

            if let Some(previous) = seen.get(team.slug()) {
                return Err(DomainError::document(
                    path.display().to_string(),
                    format!(
                        "duplicate slug '{}' (also declared in {})",
                        team.slug(),
                        previous.display()
                    ),
                ));
            }

            debug!(path = %path.display(), slug = %team.slug(), "Loaded team document");
            seen.insert(team.slug().to_string(), path);
            teams.push(team);
        }

        info!(dir = %self.dir.display(), teams = teams.len(), "Loaded team documents");
        Ok(teams)
    }

    async fn document_paths(&self) -> Result<Vec<PathBuf>, DomainError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            DomainError::configuration(format!(
                "Cannot read document directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::configuration(e.to_string()))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);

            if is_file && DocumentFormat::from_path(&path).is_some() {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

/// Parse and validate a single document
pub fn parse_document(path: &Path, contents: &str) -> Result<TeamDesiredState, DomainError> {
    let location = path.display().to_string();

    let document: TeamDocument = match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Json) => serde_json::from_str(contents)
            .map_err(|e| DomainError::document(&location, e.to_string()))?,
        Some(DocumentFormat::Toml) => {
            let table: toml::Table = toml::from_str(contents)
                .map_err(|e| DomainError::document(&location, e.to_string()))?;
            if matches!(table.get("repositories"), Some(toml::Value::Table(_))) {
                return Err(DomainError::document(
                    location,
                    "repositories must be an array of tables ([[repositories]]) in TOML, \
                     a table does not keep rule order",
                ));
            }
            toml::from_str(contents).map_err(|e| DomainError::document(&location, e.to_string()))?
        }
        None => {
            return Err(DomainError::document(
                location,
                "unsupported file extension (expected .json or .toml)",
            ));
        }
    };

    document
        .into_desired_state()
        .map_err(|e| DomainError::document(location, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_load_sorted_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.json", r#"{"name": "Beta", "slug": "beta"}"#);
        write(dir.path(), "a.toml", "name = \"Alpha\"\nslug = \"alpha\"\n");
        write(dir.path(), "README.md", "# not a team");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let teams = DocumentLoader::new(dir.path()).load().await.unwrap();
        let slugs: Vec<&str> = teams.iter().map(|t| t.slug()).collect();

        assert_eq!(slugs, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"name": "Eng", "slug": "eng"}"#);
        write(dir.path(), "b.json", r#"{"name": "Eng 2", "slug": "eng"}"#);

        let err = DocumentLoader::new(dir.path()).load().await.unwrap_err();
        assert!(err.to_string().contains("duplicate slug 'eng'"));
    }

    #[tokio::test]
    async fn test_invalid_document_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "broken.json",
            r#"{"name": "Eng", "slug": "eng", "repositories": [{"pattern": "*", "permission": "owner"}]}"#,
        );

        let err = DocumentLoader::new(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, DomainError::Document { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let err = DocumentLoader::new("/nonexistent/teamsync-docs")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let teams = DocumentLoader::new(dir.path()).load().await.unwrap();
        assert!(teams.is_empty());
    }

    #[test]
    fn test_parse_unsupported_extension() {
        let err = parse_document(Path::new("team.yaml"), "name: eng").unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }

    #[test]
    fn test_parse_toml_rule_table_rejected() {
        let contents = r#"
            name = "eng"
            slug = "eng"

            [repositories]
            "zeta-*" = "write"
            "alpha" = "maintain"
            "*" = "read"
        "#;

        let err = parse_document(Path::new("eng.toml"), contents).unwrap_err();

        assert!(matches!(err, DomainError::Document { .. }));
        assert!(err.to_string().contains("[[repositories]]"));
    }

    #[test]
    fn test_parse_toml_rule_array_keeps_order() {
        let contents = r#"
            name = "eng"
            slug = "eng"

            [[repositories]]
            pattern = "zeta-*"
            permission = "write"

            [[repositories]]
            pattern = "*"
            permission = "read"
        "#;

        let team = parse_document(Path::new("eng.toml"), contents).unwrap();

        assert_eq!(
            team.repository_rules().resolve("zeta-api"),
            Some(crate::domain::Permission::Write)
        );
        assert_eq!(
            team.repository_rules().resolve("alpha"),
            Some(crate::domain::Permission::Read)
        );
    }

    #[test]
    fn test_parse_validation_error() {
        let err = parse_document(Path::new("team.json"), r#"{"name": "", "slug": "eng"}"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Document error in team.json: Team name cannot be empty"
        );
    }
}
