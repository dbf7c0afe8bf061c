//! Render command

use std::path::Path;

use anyhow::{Context, Result};
use gridtone_core::ImageProperties;
use gridtone_render::RenderSurface;
use tracing::debug;

use crate::RenderArgs;

pub fn run(args: RenderArgs, config: Option<&Path>, verbose: u8) -> Result<()> {
    let config = super::load_config(config, &args.surface)?;

    let mut props = match &args.props {
        Some(path) => super::read_props(path)?,
        None => ImageProperties::default(),
    };
    super::apply_sets(&mut props, &args.set)?;
    if let Some(lut) = &args.lut {
        props.lut = gridtone_core::properties::parse_lut_name(lut);
    }
    debug!(modified = ?props.modified_fields(), lut = ?props.lut, "render parameters");

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to load: {}", args.input.display()))?;
    let mut surface = RenderSurface::from_config(config).context("Failed to create render surface")?;
    surface
        .load_texture(&bytes)
        .with_context(|| format!("Failed to decode: {}", args.input.display()))?;
    surface.submit(props);

    let png = surface.capture_frame().context("Render failed")?;
    super::report_lut_error(surface.take_lut_error());
    std::fs::write(&args.output, &png)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose > 0 {
        let (w, h) = surface.surface_size().unwrap_or_default();
        println!(
            "Rendered {} -> {} ({}x{}, {} backend)",
            args.input.display(),
            args.output.display(),
            w,
            h,
            surface.backend_name()
        );
    }
    Ok(())
}
