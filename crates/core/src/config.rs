use serde::Deserialize;

/// Top-level configuration, loaded from a TOML file with an embedded fallback.
///
/// No section is read from the environment: §6 of the specification is explicit that paths
/// and behavior are wholly CLI-driven.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawler: CrawlerConfig,
    pub clusters: ClustersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            crawler: CrawlerConfig::default(),
            clusters: ClustersConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default = "default_depth")]
    pub depth: u32,
    #[serde(default = "default_pages")]
    pub pages: u64,
    #[serde(default = "default_dest")]
    pub dest: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfig {
            threads: default_threads(),
            depth: default_depth(),
            pages: default_pages(),
            dest: default_dest(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_threads() -> usize {
    3
}
fn default_depth() -> u32 {
    u32::MAX
}
fn default_pages() -> u64 {
    u64::MAX
}
fn default_dest() -> String {
    "./site".to_string()
}
fn default_fetch_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClustersConfig {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_rotate_step")]
    pub rotate_step: u32,
    #[serde(default = "default_size_proportion")]
    pub size_proportion: f64,
}

impl Default for ClustersConfig {
    fn default() -> Self {
        ClustersConfig {
            window: default_window(),
            rotate_step: default_rotate_step(),
            size_proportion: default_size_proportion(),
        }
    }
}

fn default_window() -> usize {
    20
}
fn default_rotate_step() -> u32 {
    8
}
fn default_size_proportion() -> f64 {
    1.25
}
