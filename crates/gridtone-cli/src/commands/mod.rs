//! CLI command implementations

pub mod defaults;
pub mod lut_check;
pub mod luts;
pub mod post;
pub mod render;

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use gridtone_core::ImageProperties;
use gridtone_render::{RenderConfig, RenderError, SurfaceDims};

use crate::SurfaceArgs;

/// Resolves the render config and applies command-line overrides.
pub fn load_config(path: Option<&Path>, args: &SurfaceArgs) -> Result<RenderConfig> {
    let mut config = RenderConfig::load(path).context("Failed to load render config")?;
    if let Some(fit) = &args.fit {
        config.fit = fit.parse().map_err(|e: String| anyhow!(e))?;
    }
    if let Some(size) = &args.size {
        config.size = Some(parse_size(size)?);
    }
    if let Some(backend) = &args.backend {
        config.backend = backend.parse().map_err(|e: String| anyhow!(e))?;
    }
    if let Some(dir) = &args.lut_dir {
        config.lut_dir = dir.clone();
    }
    Ok(config)
}

/// Parses `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Result<SurfaceDims> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("Invalid size '{s}', expected WIDTHxHEIGHT"))?;
    let width: u32 = w.trim().parse().with_context(|| format!("Invalid width in '{s}'"))?;
    let height: u32 = h.trim().parse().with_context(|| format!("Invalid height in '{s}'"))?;
    if width == 0 || height == 0 {
        bail!("Size must be non-zero, got {s}");
    }
    Ok(SurfaceDims { width, height })
}

/// Reads a flat properties JSON file.
pub fn read_props(path: &Path) -> Result<ImageProperties> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid properties: {}", path.display()))
}

/// Applies `NAME=VALUE` overrides.
pub fn apply_sets(props: &mut ImageProperties, sets: &[String]) -> Result<()> {
    for (name, value) in parse_sets(sets)? {
        props
            .assign(name, value)
            .with_context(|| format!("Invalid --set {name}={value}"))?;
    }
    Ok(())
}

/// Splits `NAME=VALUE` arguments.
pub fn parse_sets(sets: &[String]) -> Result<Vec<(&str, &str)>> {
    sets.iter()
        .map(|s| {
            s.split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .with_context(|| format!("Expected NAME=VALUE, got '{s}'"))
        })
        .collect()
}

/// Prints a warning for a LUT that could not be applied.
pub fn report_lut_error(err: Option<RenderError>) {
    if let Some(err) = err {
        eprintln!("warning: {err}; rendered without LUT");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        let d = parse_size("1080x1350").unwrap();
        assert_eq!((d.width, d.height), (1080, 1350));
        assert!(parse_size("1080").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn test_apply_sets() {
        let mut props = ImageProperties::default();
        let sets = vec!["brightness=0".to_string(), "lut = kodak".to_string()];
        apply_sets(&mut props, &sets).unwrap();
        assert_eq!(props.brightness, 0.0);
        assert_eq!(props.lut.as_deref(), Some("kodak"));
        assert!(apply_sets(&mut props, &["hue".to_string()]).is_err());
        assert!(apply_sets(&mut props, &["hue=abc".to_string()]).is_err());
        assert!(apply_sets(&mut props, &["nope=1".to_string()]).is_err());
    }
}
