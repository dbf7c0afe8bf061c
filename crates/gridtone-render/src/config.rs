//! Render configuration.
//!
//! Loaded from YAML. Resolution order for [`RenderConfig::load`]:
//! an explicit path, then `$GRIDTONE_CONFIG`, then built-in defaults.
//! `$GRIDTONE_LUT_DIR` and `$GRIDTONE_BACKEND` override the matching keys
//! afterwards.
//!
//! ```yaml
//! size: { width: 1080, height: 1350 }   # omit for the texture's own size
//! fit: contain                           # or cover
//! lut_dir: lut
//! lut_load_timeout_ms: 5000
//! backend: auto                          # cpu, wgpu, auto
//! detail:
//!   sharp_sigma_spatial: 1.25
//!   structure_sigma_spatial: 4.0
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gridtone_ops::DetailSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::FitMode;
use crate::{RenderError, RenderResult};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "GRIDTONE_CONFIG";
/// Environment override for [`RenderConfig::lut_dir`].
pub const LUT_DIR_ENV: &str = "GRIDTONE_LUT_DIR";
/// Environment override for [`RenderConfig::backend`].
pub const BACKEND_ENV: &str = "GRIDTONE_BACKEND";

/// Fixed surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceDims {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Which render backend to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// wgpu when compiled in and an adapter is available, else CPU.
    #[default]
    Auto,
    /// Rayon CPU backend.
    Cpu,
    /// wgpu compute backend.
    Wgpu,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "wgpu" | "gpu" => Ok(Self::Wgpu),
            other => Err(format!("unknown backend '{other}' (expected auto, cpu or wgpu)")),
        }
    }
}

/// Settings for a render surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fixed surface size; `None` renders at the texture's own size
    pub size: Option<SurfaceDims>,
    /// Quad fit policy
    pub fit: FitMode,
    /// Directory holding the `.cube` catalog
    pub lut_dir: PathBuf,
    /// Upper bound a capture waits for an in-flight LUT load
    pub lut_load_timeout_ms: u64,
    /// Backend selection
    pub backend: BackendKind,
    /// Detail stage tunables
    pub detail: DetailSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: None,
            fit: FitMode::Contain,
            lut_dir: PathBuf::from("lut"),
            lut_load_timeout_ms: 5000,
            backend: BackendKind::Auto,
            detail: DetailSettings::default(),
        }
    }
}

impl RenderConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> RenderResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Reads a YAML file. A relative `lut_dir` is resolved against the
    /// file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_yaml_str(&content)?;
        if let Some(parent) = path.parent().filter(|_| config.lut_dir.is_relative()) {
            config.lut_dir = parent.join(&config.lut_dir);
        }
        debug!(path = %path.display(), "loaded render config");
        Ok(config)
    }

    /// Resolves the configuration: `explicit`, else `$GRIDTONE_CONFIG`, else
    /// defaults; environment overrides applied last.
    pub fn load(explicit: Option<&Path>) -> RenderResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match env::var_os(CONFIG_ENV) {
                Some(path) => Self::from_file(PathBuf::from(path))?,
                None => Self::default(),
            },
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> RenderResult<()> {
        if let Some(dir) = env::var_os(LUT_DIR_ENV) {
            self.lut_dir = PathBuf::from(dir);
        }
        if let Ok(kind) = env::var(BACKEND_ENV) {
            self.backend = kind.parse().map_err(RenderError::Config)?;
        }
        Ok(())
    }

    /// [`Self::lut_load_timeout_ms`] as a duration.
    pub fn lut_load_timeout(&self) -> Duration {
        Duration::from_millis(self.lut_load_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = RenderConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn parses_full_document() {
        let yaml = r#"
size: { width: 1080, height: 1350 }
fit: cover
lut_dir: /srv/luts
lut_load_timeout_ms: 250
backend: cpu
detail:
  structure_sigma_spatial: 3.0
"#;
        let config = RenderConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.size, Some(SurfaceDims { width: 1080, height: 1350 }));
        assert_eq!(config.fit, FitMode::Cover);
        assert_eq!(config.backend, BackendKind::Cpu);
        assert_eq!(config.lut_load_timeout(), Duration::from_millis(250));
        assert_eq!(config.detail.structure_sigma_spatial, 3.0);
        assert_eq!(config.detail.sharp_sigma_spatial, 1.25);
    }

    #[test]
    fn relative_lut_dir_follows_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "lut_dir: cubes\n").unwrap();
        let config = RenderConfig::from_file(&path).unwrap();
        assert_eq!(config.lut_dir, dir.path().join("cubes"));
    }

    #[test]
    fn bad_yaml_is_config_error() {
        assert!(matches!(
            RenderConfig::from_yaml_str("fit: sideways"),
            Err(RenderError::Config(_))
        ));
    }
}
