use crate::domain::Language;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument, warn};

const LANGUAGE_KEY: &str = "language";

/// Key-value preferences persisted as a JSON object.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PreferenceStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored language. A missing file or an unknown value yields the default language.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load_language(&self) -> Language {
        let preferences = match self.read().await {
            Ok(preferences) => preferences,
            Err(PreferencesError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!("No stored preferences");
                return Language::default();
            }
            Err(e) => {
                warn!("⚠️ Unable to read preferences: {}", e);
                return Language::default();
            }
        };

        match preferences.get(LANGUAGE_KEY).and_then(Value::as_str).map(str::parse::<Language>) {
            Some(Ok(language)) => language,
            Some(Err(e)) => {
                warn!("⚠️ Ignoring stored language: {}", e);
                Language::default()
            }
            None => Language::default(),
        }
    }

    /// Stores the language, keeping every other preference in the file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn save_language(&self, language: Language) -> Result<(), PreferencesError> {
        let mut preferences = match self.read().await {
            Ok(preferences) => preferences,
            Err(PreferencesError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e),
        };

        preferences.insert(LANGUAGE_KEY.to_string(), Value::String(language.code().to_string()));
        let content = serde_json::to_string_pretty(&preferences)?;
        fs::write(&self.path, content).await.map_err(|e| self.io_error(e))?;

        debug!("Saved language {}", language);
        Ok(())
    }

    async fn read(&self) -> Result<Map<String, Value>, PreferencesError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| self.io_error(e))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn io_error(&self, source: io::Error) -> PreferencesError {
        PreferencesError::Io {
            source,
            path: self.path.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("{source} ({})", path.display())]
    Io { source: io::Error, path: PathBuf },
    #[error("invalid preferences: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env::temp_dir;
    use test_log::test;

    async fn store_with(name: &str, content: Option<&str>) -> io::Result<PreferenceStore> {
        let path = temp_dir().join(format!("beacon-{}.json", name));
        match content {
            Some(content) => fs::write(&path, content).await?,
            None => {
                let _ = fs::remove_file(&path).await;
            }
        }
        Ok(PreferenceStore::new(path))
    }

    #[test(tokio::test)]
    async fn load_language_defaults_to_english_without_a_file() -> io::Result<()> {
        let store = store_with("missing", None).await?;

        assert_eq!(store.load_language().await, Language::En);

        Ok(())
    }

    #[test(tokio::test)]
    async fn load_language_reads_the_stored_code() -> io::Result<()> {
        let store = store_with("stored", Some(r#"{"language": "id"}"#)).await?;

        assert_eq!(store.load_language().await, Language::Id);

        Ok(())
    }

    #[test(tokio::test)]
    async fn load_language_ignores_unknown_values() -> io::Result<()> {
        let unknown = store_with("unknown", Some(r#"{"language": "fr"}"#)).await?;
        let malformed = store_with("malformed", Some("not json")).await?;

        assert_eq!(unknown.load_language().await, Language::En);
        assert_eq!(malformed.load_language().await, Language::En);

        Ok(())
    }

    #[test(tokio::test)]
    async fn save_language_keeps_other_preferences() -> Result<(), Box<dyn std::error::Error>> {
        let store = store_with("save", Some(r#"{"theme": "dark", "language": "en"}"#)).await?;

        store.save_language(Language::En.toggled()).await?;

        let saved: Value = serde_json::from_str(&fs::read_to_string(store.path()).await?)?;
        assert_eq!(saved, serde_json::json!({"theme": "dark", "language": "id"}));
        assert_eq!(store.load_language().await, Language::Id);

        Ok(())
    }

    #[test(tokio::test)]
    async fn save_language_refuses_to_overwrite_a_malformed_file() -> io::Result<()> {
        let store = store_with("corrupt", Some("{oops")).await?;

        let result = store.save_language(Language::Id).await;

        assert!(matches!(result, Err(PreferencesError::Json(_))));
        Ok(())
    }
}
