use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use registry_import::InvalidValuePolicy;
use registry_import::settings::{self, delimiter_byte};

use crate::error::CliError;

/// Show the settings file location and contents.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings::settings_path();
    log::info!(
        "{}",
        "Import settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let current = settings::load_import_settings();
    let show = |name: &str, value: Option<String>, default: &str| match value {
        Some(v) => log::info!("  {:<12} {}", name, v),
        None => log::info!(
            "  {:<12} {}",
            name,
            format!("{default} (default)").if_supports_color(Stdout, |t| t.dimmed()),
        ),
    };
    show(
        "delimiter",
        current.delimiter.map(|c| format!("{c:?}")),
        "','",
    );
    show(
        "on_invalid",
        current.on_invalid.map(|p| p.to_string()),
        InvalidValuePolicy::default().as_str(),
    );
    show(
        "stable_ids",
        current.stable_ids.map(|b| b.to_string()),
        "false",
    );

    if let Some(contents) = settings::load_settings_string() {
        log::debug!("Raw settings:\n{}", contents.trim_end());
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings::settings_path().display());
    Ok(())
}

/// Update saved defaults; fields not given keep their saved value.
pub(crate) fn run_config_set(
    delimiter: Option<char>,
    on_invalid: Option<InvalidValuePolicy>,
    stable_ids: Option<bool>,
) -> Result<(), CliError> {
    if delimiter.is_none() && on_invalid.is_none() && stable_ids.is_none() {
        return Err(CliError::usage(
            "nothing to set: pass --delimiter, --on-invalid or --stable-ids",
        ));
    }
    if let Some(c) = delimiter {
        delimiter_byte(c).map_err(CliError::config)?;
    }

    let mut current = settings::load_import_settings();
    if delimiter.is_some() {
        current.delimiter = delimiter;
    }
    if on_invalid.is_some() {
        current.on_invalid = on_invalid;
    }
    if stable_ids.is_some() {
        current.stable_ids = stable_ids;
    }
    settings::save_import_settings(&current)?;

    log::info!(
        "{} Saved {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        settings::settings_path().display(),
    );
    Ok(())
}
