use serde::Deserialize;

/// Main configuration structure for paddock
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    /// Optional blob-storage archive; absent means local-only
    #[serde(default)]
    pub archive: Option<ArchiveConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// How many days of results to walk back through, most recent first
    pub days: i64,

    /// Root-page address template; the meeting date is appended as
    /// zero-padded YYYY/MM/DD segments
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Wait after each navigation for the page to finish rendering
    /// (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Navigation attempts per race page before giving up
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,

    /// Wait between navigation attempts for the same address
    /// (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            days: 1,
            base_url: "https://racing.hkjc.com/racing/information/English/Racing/LocalResults.aspx?RaceDate="
                .to_string(),
            settle_delay_ms: 2000,
            retry_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./paddock.db".to_string(),
        }
    }
}

/// Local artifact storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding one folder per collected race
    pub root: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            root: "./raw_data".to_string(),
        }
    }
}

/// Blob-storage archive configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Name of the target bucket
    pub bucket: String,

    /// Key prefix under which race folders are uploaded
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "paddock".to_string()
}
