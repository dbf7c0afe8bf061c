//! LUT catalog listing

use std::path::Path;

use anyhow::{Context, Result};
use gridtone_lut::LutCatalog;
use gridtone_render::RenderConfig;

use crate::LutsArgs;

pub fn run(args: LutsArgs, config: Option<&Path>) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => RenderConfig::load(config).context("Failed to load render config")?.lut_dir,
    };
    let catalog = LutCatalog::scan(&dir)
        .with_context(|| format!("Failed to scan: {}", dir.display()))?;

    if catalog.is_empty() {
        println!("No LUTs in {}", dir.display());
        return Ok(());
    }
    let width = catalog.entries().iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in catalog.entries() {
        println!("{:<width$}  {}", entry.name, entry.display_name);
    }
    Ok(())
}
