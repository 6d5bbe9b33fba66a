use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::BaseDirs;

pub const DEFAULT_API_ENDPOINT: &str = "https://cloud.kili-technology.com/api/label/graphql";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    /// Defaults, then `~/.config/kili/.kilirc`, then the environment.
    pub fn load() -> Self {
        let config_path = default_config_path();
        let mut map = default_map();

        if config_path.exists() {
            match fs::File::open(&config_path) {
                Ok(file) => read_pairs(BufReader::new(file), &mut map),
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), %err, "cannot read config file")
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map }
    }

    /// Defaults overlaid with a specific rc file. The environment is not consulted.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open config file {}", path.display()))?;
        let mut map = default_map();
        read_pairs(BufReader::new(file), &mut map);
        Ok(Self { inner: map })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    /// Like `get`, but treats blank values as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|s| !s.trim().is_empty())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn api_endpoint(&self) -> String {
        self.get_non_empty("KILI_API_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string())
    }

    pub fn request_timeout(&self) -> u64 {
        self.get_u64("REQUEST_TIMEOUT").unwrap_or(60)
    }
}

fn read_pairs(reader: impl BufRead, map: &mut HashMap<String, String>) {
    for line in reader.lines().map_while(|l| l.ok()) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &["REQUEST_TIMEOUT"];

    KEYS.contains(&k) || k.starts_with("KILI_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("kili").join(".kilirc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("KILI_API_ENDPOINT".into(), DEFAULT_API_ENDPOINT.into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m
}
