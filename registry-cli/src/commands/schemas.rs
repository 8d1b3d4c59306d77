use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use registry_catalog::{BuiltinEntity, to_yaml};

use crate::error::CliError;

/// List the built-in schemas, or print one as YAML.
pub(crate) fn run_schemas(show: Option<BuiltinEntity>) -> Result<(), CliError> {
    if let Some(entity) = show {
        let yaml = to_yaml(&entity.schema()).map_err(|e| CliError::config(e.to_string()))?;
        // Data for redirection, not a status message
        println!("{}", yaml.trim_end());
        return Ok(());
    }

    log::info!("Built-in schemas:");
    log::info!("");
    for entity in BuiltinEntity::all() {
        let schema = entity.schema();
        log::info!(
            "  {} -> {}{}",
            entity.name().if_supports_color(Stdout, |t| t.bold()),
            schema.table.if_supports_color(Stdout, |t| t.cyan()),
            if schema.generate_id {
                format!(" {}", "(generated id)".if_supports_color(Stdout, |t| t.green()))
            } else {
                String::new()
            },
        );
        for col in &schema.columns {
            log::info!("    {:<20} {}", col.column, col.kind);
        }
    }
    Ok(())
}
