use anyhow::Result;
use form_spec::FormDefinition;

pub fn run() -> Result<()> {
    let schema = schemars::schema_for!(FormDefinition);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
