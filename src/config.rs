//! Runtime configuration for the SafeRoute core.
//!
//! Configuration is plain data: it can be built in code with the `with_*`
//! methods or loaded from a JSON file. Missing keys take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default collection holding one record per user.
pub const DEFAULT_USERS_COLLECTION: &str = "users";

/// Default collection holding contact requests.
pub const DEFAULT_REQUESTS_COLLECTION: &str = "contactRequests";

/// Default database file name inside the data directory.
pub const DEFAULT_DATABASE_FILE: &str = "documents.db";

/// Number of notifications shown in the feed preview.
pub const DEFAULT_NOTIFICATION_PREVIEW: usize = 4;

/// Language used for user-facing labels and notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Brazilian Portuguese.
    #[default]
    PtBr,
    /// English.
    En,
}

impl Locale {
    /// Converts to the tag used in config files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PtBr => "pt-br",
            Self::En => "en",
        }
    }

    /// Parses a locale tag, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Some(Self::PtBr),
            "en" | "en-us" | "en_us" => Some(Self::En),
            _ => None,
        }
    }
}

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`CoreConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config values are inconsistent.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for [`SafeRouteCore`](crate::SafeRouteCore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    /// Directory holding the local database.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub database_file: String,
    /// Collection of user records.
    pub users_collection: String,
    /// Collection of contact requests.
    pub requests_collection: String,
    /// Language of labels and notices.
    pub locale: Locale,
    /// Notifications shown in the feed preview.
    pub notification_preview: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            users_collection: DEFAULT_USERS_COLLECTION.to_string(),
            requests_collection: DEFAULT_REQUESTS_COLLECTION.to_string(),
            locale: Locale::default(),
            notification_preview: DEFAULT_NOTIFICATION_PREVIEW,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Sets the database file name.
    #[must_use]
    pub fn with_database_file(mut self, name: impl Into<String>) -> Self {
        self.database_file = name.into();
        self
    }

    /// Sets the users collection name.
    #[must_use]
    pub fn with_users_collection(mut self, name: impl Into<String>) -> Self {
        self.users_collection = name.into();
        self
    }

    /// Sets the contact requests collection name.
    #[must_use]
    pub fn with_requests_collection(mut self, name: impl Into<String>) -> Self {
        self.requests_collection = name.into();
        self
    }

    /// Sets the locale.
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Sets how many notifications the feed preview shows.
    #[must_use]
    pub const fn with_notification_preview(mut self, count: usize) -> Self {
        self.notification_preview = count;
        self
    }

    /// Full path of the database file.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_file.trim().is_empty() {
            return Err(ConfigError::Invalid("databaseFile is empty".to_string()));
        }
        if self.users_collection.trim().is_empty() {
            return Err(ConfigError::Invalid("usersCollection is empty".to_string()));
        }
        if self.requests_collection.trim().is_empty() {
            return Err(ConfigError::Invalid("requestsCollection is empty".to_string()));
        }
        if self.users_collection == self.requests_collection {
            return Err(ConfigError::Invalid(
                "usersCollection and requestsCollection must differ".to_string(),
            ));
        }
        if self.notification_preview == 0 {
            return Err(ConfigError::Invalid("notificationPreview must be at least 1".to_string()));
        }
        Ok(())
    }
}
