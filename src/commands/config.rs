use anyhow::Context;

use crate::bootstrap::AppDeps;
use crate::cli::ConfigCommands;

const REDACTED: &str = "<redacted>";

pub async fn execute(deps: &AppDeps, command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Path => {
            println!("{}", deps.record_path.display());
        }
        ConfigCommands::Show => match deps.get_configuration.execute().await? {
            Some(record) => {
                let mut value =
                    serde_json::to_value(&record).context("Failed to encode setup record")?;
                if let Some(hash) = value.get_mut("adminPasswordHash") {
                    *hash = serde_json::Value::String(REDACTED.to_string());
                }
                println!("{}", serde_json::to_string_pretty(&value)?);
                if !record.is_complete() {
                    println!("(setup not finished)");
                }
            }
            None => println!("No setup configuration stored at {}", deps.record_path.display()),
        },
    }
    Ok(())
}
