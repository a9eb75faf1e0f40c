use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Result, WastearrError};

const APP_DIR: &str = "wastearr";

/// Manages paths for Wastearr configuration and cache data
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration file (~/.config/wastearr/conf)
    pub config_file: PathBuf,
    /// Dotfile in the working directory (./.env)
    pub dotenv_file: PathBuf,
    /// Cache directory (~/.cache/wastearr)
    pub cache_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance from the user's home directory,
    /// honouring `XDG_CONFIG_HOME` and `XDG_CACHE_HOME`
    pub fn new() -> Result<Self> {
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| WastearrError::Config("HOME is not set".to_string()))?;
        let cwd = std::env::current_dir()?;

        let xdg = |var: &str, fallback: &str| {
            std::env::var_os(var)
                .filter(|v: &OsString| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| home.join(fallback))
        };

        Ok(Self::from_dirs(
            &xdg("XDG_CONFIG_HOME", ".config"),
            &xdg("XDG_CACHE_HOME", ".cache"),
            &cwd,
        ))
    }

    /// Build paths under explicit config, cache and working directories
    pub fn from_dirs(config_root: &Path, cache_root: &Path, working_dir: &Path) -> Self {
        Self {
            config_file: config_root.join(APP_DIR).join("conf"),
            dotenv_file: working_dir.join(".env"),
            cache_dir: cache_root.join(APP_DIR),
        }
    }
}
