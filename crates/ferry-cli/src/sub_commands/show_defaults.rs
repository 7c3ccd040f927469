use anyhow::Result;
use ferry::ClientDefaults;

pub fn show_defaults(defaults: &ClientDefaults) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(defaults)?);
    Ok(())
}
