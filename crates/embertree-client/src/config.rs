use serde::{Deserialize, Serialize};

/// Host application options, forwarded unchanged from the embedding app.
///
/// Only `database_url` is consumed by the client itself, and only lazily on
/// first use — an app that never touches the database may omit it entirely
/// (progressive enhancement).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
}

impl AppConfig {
    pub fn with_database_url(url: impl Into<String>) -> Self {
        Self {
            database_url: Some(url.into()),
            ..Self::default()
        }
    }
}
