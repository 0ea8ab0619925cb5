//! Configuration type definitions.
//!
//! This module contains all the struct definitions for configuration,
//! including site settings, content settings, theme and markdown options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Root configuration
// =============================================================================

/// Site configuration, as read from `quire.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// Public base URL, used for canonical links
    pub url: Option<String>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("_site")
}

// =============================================================================
// Content configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root content directory (relative to the config file)
    #[serde(default = "default_content_path")]
    pub path: PathBuf,
    /// URL path prefix for article pages (e.g., "/posts" -> site.com/posts/...)
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

fn default_content_path() -> PathBuf {
    PathBuf::from("posts")
}

fn default_url_prefix() -> String {
    "/posts".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: default_content_path(),
            url_prefix: default_url_prefix(),
        }
    }
}

// =============================================================================
// Theme configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Directory whose `templates/` folder overrides the built-in templates
    pub path: Option<PathBuf>,
    /// Arbitrary settings passed to templates as `theme.*`
    #[serde(default = "default_theme_settings")]
    pub settings: serde_json::Value,
}

fn default_theme_settings() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            path: None,
            settings: default_theme_settings(),
        }
    }
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Added to every heading level when rendering HTML, so that `#` in an
    /// article sits below the page title. Levels are capped at 6.
    #[serde(default = "default_heading_offset")]
    pub heading_offset: u8,
    /// Convert straight quotes and dashes into typographic ones
    #[serde(default)]
    pub smart_punctuation: bool,
}

fn default_heading_offset() -> u8 {
    1
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            heading_offset: default_heading_offset(),
            smart_punctuation: false,
        }
    }
}
