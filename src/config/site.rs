//! Site configuration (postview.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::image::ImageUrlBuilder;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub url: String,
    pub root: String,
    pub timezone: String,
    pub date_format: String,

    // Output
    pub public_dir: String,

    // Revalidation window in seconds
    pub revalidate: u64,

    // Base URL hosting /api/createComment
    pub comment_api_base: String,

    // Syntect theme for code blocks
    pub highlight_theme: String,

    #[serde(default)]
    pub sanity: SanityConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Medium Blog".to_string(),
            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),
            timezone: "UTC".to_string(),
            date_format: "YYYY-MM-DD HH:mm:ss".to_string(),
            public_dir: "public".to_string(),
            revalidate: 60,
            comment_api_base: "http://localhost:3000".to_string(),
            highlight_theme: "base16-ocean.dark".to_string(),
            sanity: SanityConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup; empty values are ignored
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .filter_map(|&key| lookup(key))
                .find(|value| !value.trim().is_empty())
        };

        if let Some(project_id) = get(&["SANITY_PROJECT_ID", "NEXT_PUBLIC_SANITY_PROJECT_ID"]) {
            self.sanity.project_id = project_id;
        }
        if let Some(dataset) = get(&["SANITY_DATASET", "NEXT_PUBLIC_SANITY_DATASET"]) {
            self.sanity.dataset = dataset;
        }
        if let Some(token) = get(&["SANITY_API_TOKEN"]) {
            self.sanity.token = Some(token);
        }
    }

    /// Build the renderer configuration; dataset and project id are required
    pub fn renderer_config(&self) -> Result<RendererConfig> {
        RendererConfig::new(&self.sanity.project_id, &self.sanity.dataset)
    }

    /// Revalidation window as a duration
    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate)
    }

    /// Parse the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
            chrono_tz::UTC
        })
    }
}

/// Content store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2021-10-21".to_string(),
            use_cdn: true,
            token: None,
        }
    }
}

impl SanityConfig {
    /// Base URL of the query endpoint for this project and dataset
    pub fn query_url(&self) -> String {
        let host = if self.use_cdn && self.token.is_none() {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!(
            "https://{}.{}/v{}/data/query/{}",
            self.project_id,
            host,
            self.api_version.trim_start_matches('v'),
            self.dataset
        )
    }
}

/// Values the rich-text renderer needs at render time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub project_id: String,
    pub dataset: String,
}

impl RendererConfig {
    pub fn new(project_id: &str, dataset: &str) -> Result<Self> {
        if project_id.trim().is_empty() {
            return Err(Error::Config(
                "sanity project id is not set (SANITY_PROJECT_ID)".to_string(),
            ));
        }
        if dataset.trim().is_empty() {
            return Err(Error::Config(
                "sanity dataset is not set (SANITY_DATASET)".to_string(),
            ));
        }
        Ok(Self {
            project_id: project_id.to_string(),
            dataset: dataset.to_string(),
        })
    }

    pub fn image_urls(&self) -> ImageUrlBuilder {
        ImageUrlBuilder::new(&self.project_id, &self.dataset)
    }
}
