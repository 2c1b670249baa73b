//! Configuration management for the OCR server

use std::env;
use std::path::PathBuf;

/// Upload ceiling: 25 MiB
pub const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Places the OCR engine executable is looked for, in order.
/// Bare names are resolved against `PATH`.
pub const ENGINE_CANDIDATES: &[&str] = &[
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    "/usr/bin/tesseract",
    "tesseract",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Tesseract language pack
    pub language: String,
    pub engine_candidates: Vec<String>,
    /// Linear scale applied when rasterizing PDF pages for OCR
    pub render_scale: f32,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    /// Directory that holds uploads and page rasters while a request is in flight
    pub scratch_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_PORT '{0}'")]
    InvalidPort(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            ocr: OcrConfig {
                language: "jpn".to_string(),
                engine_candidates: ENGINE_CANDIDATES.iter().map(|c| c.to_string()).collect(),
                render_scale: 2.0,
            },
            upload: UploadConfig {
                max_file_size: MAX_FILE_SIZE,
                scratch_dir: env::temp_dir(),
            },
        }
    }
}

impl Config {
    /// Only the bind address is taken from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => defaults.server.port,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            ..defaults
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
