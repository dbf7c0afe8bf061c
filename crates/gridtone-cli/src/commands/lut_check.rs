//! .cube validation

use anyhow::{Context, Result};
use gridtone_lut::read_cube;

use crate::LutCheckArgs;

pub fn run(args: LutCheckArgs) -> Result<()> {
    let lut = read_cube(&args.file)
        .with_context(|| format!("Invalid LUT: {}", args.file.display()))?;
    println!("{}: OK", args.file.display());
    println!("  size:    {0}x{0}x{0} ({1} entries)", lut.size, lut.entry_count());
    println!("  domain:  {:?} .. {:?}", lut.domain_min, lut.domain_max);
    Ok(())
}
