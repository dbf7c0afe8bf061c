//! Default properties

use anyhow::Result;
use gridtone_core::ImageProperties;

use crate::DefaultsArgs;

pub fn run(args: DefaultsArgs) -> Result<()> {
    let props = ImageProperties::default();
    if args.form {
        for (name, value) in props.to_form() {
            println!("{name}={value}");
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&props)?);
    }
    Ok(())
}
