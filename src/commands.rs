//! Handlers for the `config` subcommands.
//!
//! Each handler validates its arguments, asks the injected [`Prompter`] for
//! anything the user left out, calls into the [`ProfileStore`], and formats
//! the result through [`Ui`]. Handlers never write the file themselves;
//! `main` saves the store once the handler has succeeded.

use anstyle::AnsiColor;
use anyhow::{Result, bail};
use serde::Serialize;
use serde_yaml::Value;
use tracing::{debug, info};

use crate::document::nest;
use crate::error::ConfigError;
use crate::options::Registry;
use crate::prompt::Prompter;
use crate::selection::{resolve_active_profile, resolve_target};
use crate::store::{Lookup, ProfileStore};
use crate::ui::Ui;
use crate::values;

/// One row of `list-keys` in JSON mode
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyInfo<'a> {
    key: &'a str,
    #[serde(rename = "type")]
    value_type: String,
    sensitive: bool,
    allowed_values: &'a [String],
    flag: Option<String>,
    env_var: Option<&'a str>,
    usage: &'a str,
}

#[derive(Serialize)]
struct ProfileSummary<'a> {
    name: &'a str,
    description: &'a str,
    active: bool,
}

fn exactly_one(args: &[String]) -> Result<&str, ConfigError> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(ConfigError::InvalidArgumentCount {
            expected: "exactly 1",
            actual: args.len(),
        }),
    }
}

fn at_most_one(args: &[String]) -> Result<Option<&str>, ConfigError> {
    match args {
        [] => Ok(None),
        [arg] => Ok(Some(arg.as_str())),
        _ => Err(ConfigError::InvalidArgumentCount {
            expected: "at most 1",
            actual: args.len(),
        }),
    }
}

/// Add a profile, prompting for any value not given as a flag
pub fn add_profile(
    store: &mut ProfileStore,
    ui: &Ui,
    prompter: &dyn Prompter,
    name: Option<String>,
    description: Option<String>,
    set_active: Option<bool>,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => prompter.text("New profile name:")?,
    };
    // Reject a bad name before asking anything else
    store.validate_new_profile_name(&name)?;

    let description = match description {
        Some(description) => description,
        None => prompter.text("New profile description:")?,
    };
    let set_active = match set_active {
        Some(set_active) => set_active,
        None => prompter.confirm("Set new profile as active?", false)?,
    };

    store.add_profile(&name, &description, set_active)?;
    info!(profile = %name, set_active, "added profile");

    ui.ok(format!("Added profile '{}'", name));
    if set_active {
        ui.info(format!("'{}' is now the active profile", name));
    }
    Ok(())
}

/// Delete a profile after confirmation (skipped with `--yes`)
pub fn delete_profile(
    store: &mut ProfileStore,
    ui: &Ui,
    prompter: &dyn Prompter,
    args: &[String],
    yes: bool,
) -> Result<()> {
    let requested = match at_most_one(args)? {
        Some(name) => name.to_string(),
        None => {
            let candidates: Vec<String> = store
                .list_profile_names()
                .into_iter()
                .filter(|name| !store.is_active(name))
                .collect();
            if candidates.is_empty() {
                bail!(
                    "No profile can be deleted: '{}' is the only profile and it is active",
                    store.active_profile()
                );
            }
            prompter.select("Select profile to delete:", candidates)?
        }
    };

    let name = store.ensure_deletable(&requested)?.to_string();

    if !yes {
        let confirmed = prompter.confirm(
            &format!("Are you sure you want to delete profile '{}'?", name),
            false,
        )?;
        if !confirmed {
            ui.warn("Profile deletion cancelled.");
            return Ok(());
        }
    }

    store.delete_profile(&name)?;
    info!(profile = %name, "deleted profile");
    ui.ok(format!("Deleted profile '{}'", name));
    Ok(())
}

/// Change the persisted active profile
pub fn set_active_profile(
    store: &mut ProfileStore,
    ui: &Ui,
    prompter: &dyn Prompter,
    args: &[String],
) -> Result<()> {
    let requested = match at_most_one(args)? {
        Some(name) => name.to_string(),
        None => prompter.select("Select profile to set as active:", store.list_profile_names())?,
    };

    store.set_active_profile(&requested)?;
    info!(profile = %store.active_profile(), "changed active profile");
    ui.ok(format!("Active profile set to '{}'", store.active_profile()));
    Ok(())
}

/// Show every setting of a profile (the active one by default)
pub fn view_profile(
    store: &ProfileStore,
    ui: &Ui,
    args: &[String],
    profile_override: Option<&str>,
    unmask: bool,
) -> Result<()> {
    let name = match at_most_one(args)? {
        Some(name) => name.to_string(),
        None => resolve_active_profile(store, profile_override),
    };
    let view = store.view_profile(&name, unmask)?;

    if ui.is_json() {
        return ui.print_structured(&view.to_yaml());
    }

    let title = if view.active {
        format!("Profile: {} (active)", view.name)
    } else {
        format!("Profile: {}", view.name)
    };
    ui.section(title);
    if !view.description.is_empty() {
        ui.println(ui.dim(&view.description));
    }
    ui.newline();

    let mut table = ui.simple_table();
    table.set_header(vec![ui.header_cell("Key"), ui.header_cell("Value")]);
    for entry in &view.entries {
        table.add_row(vec![ui.cell(&entry.key), ui.cell(&entry.text)]);
    }
    ui.println(table.to_string());
    Ok(())
}

/// Print one value, or the subtree under a key prefix
pub fn get(
    store: &ProfileStore,
    ui: &Ui,
    args: &[String],
    profile_override: Option<&str>,
    unmask: bool,
) -> Result<()> {
    let key = exactly_one(args)?;
    let profile = resolve_target(store, profile_override)?;
    debug!(profile = %profile, key, "reading configuration value");

    match store.get_value(&profile, key)? {
        Lookup::Value { descriptor, value } if !ui.is_json() => {
            ui.println(values::format(descriptor, &value, unmask));
        }
        lookup => ui.print_structured(&lookup.render(unmask))?,
    }
    Ok(())
}

/// Store `key=value` in the target profile
pub fn set(
    store: &mut ProfileStore,
    ui: &Ui,
    args: &[String],
    profile_override: Option<&str>,
) -> Result<()> {
    let assignment = exactly_one(args)?;
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidAssignment {
            arg: assignment.to_string(),
        })?;
    let profile = resolve_target(store, profile_override)?;

    store.set_value(&profile, key, raw)?;
    info!(profile = %profile, key, "set configuration value");

    if let Lookup::Value { descriptor, value } = store.get_value(&profile, key)? {
        ui.ok(format!(
            "Set '{}' to '{}' in profile '{}'",
            key,
            values::format(descriptor, &value, false),
            profile
        ));
    }
    Ok(())
}

/// Remove a stored value so the key reads as its default again
pub fn unset(
    store: &mut ProfileStore,
    ui: &Ui,
    args: &[String],
    profile_override: Option<&str>,
) -> Result<()> {
    let key = exactly_one(args)?;
    let profile = resolve_target(store, profile_override)?;

    store.unset_value(&profile, key)?;
    info!(profile = %profile, key, "unset configuration value");

    if let Lookup::Value { descriptor, value } = store.get_value(&profile, key)? {
        ui.ok(format!(
            "Unset '{}' in profile '{}'; it now reads '{}'",
            key,
            profile,
            values::format(descriptor, &value, false)
        ));
    }
    Ok(())
}

/// List every configuration key, or print a document skeleton with `--yaml`
pub fn list_keys(registry: &Registry, ui: &Ui, yaml: bool) -> Result<()> {
    if yaml {
        let skeleton = nest(
            registry
                .iter()
                .map(|descriptor| (descriptor.key.as_str(), descriptor.default.to_yaml())),
        );
        return ui.print_structured(&Value::Mapping(skeleton));
    }

    if ui.is_json() {
        let keys: Vec<KeyInfo> = registry
            .iter()
            .map(|descriptor| KeyInfo {
                key: &descriptor.key,
                value_type: descriptor.value_type.to_string(),
                sensitive: descriptor.sensitive,
                allowed_values: &descriptor.allowed_values,
                flag: descriptor.flag.as_ref().map(|flag| format!("--{flag}")),
                env_var: descriptor.env_var.as_deref(),
                usage: &descriptor.usage,
            })
            .collect();
        ui.println(serde_json::to_string_pretty(&keys)?);
        return Ok(());
    }

    let mut table = ui.simple_table();
    table.set_header(vec![
        ui.header_cell("Key"),
        ui.header_cell("Type"),
        ui.header_cell("Description"),
    ]);
    for descriptor in registry.iter() {
        let value_type = if descriptor.allowed_values.is_empty() {
            descriptor.value_type.to_string()
        } else {
            format!("{} ({})", descriptor.value_type, descriptor.allowed_values.join("|"))
        };
        table.add_row(vec![
            ui.cell(&descriptor.key),
            ui.cell(ui.dim(value_type)),
            ui.cell(&descriptor.usage),
        ]);
    }
    ui.section("Configuration keys");
    ui.println(table.to_string());
    Ok(())
}

/// List profiles, marking the active one
pub fn list_profiles(store: &ProfileStore, ui: &Ui) -> Result<()> {
    let names = store.list_profile_names();

    if ui.is_json() {
        let profiles: Vec<ProfileSummary> = names
            .iter()
            .filter_map(|name| store.require_profile(name).ok())
            .map(|profile| ProfileSummary {
                name: &profile.name,
                description: &profile.description,
                active: store.is_active(&profile.name),
            })
            .collect();
        ui.println(serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    let mut table = ui.simple_table();
    table.set_header(vec![
        ui.header_cell(""),
        ui.header_cell("Profile"),
        ui.header_cell("Description"),
        ui.header_cell("Status"),
    ]);
    for name in &names {
        let profile = store.require_profile(name)?;
        let is_active = store.is_active(name);
        let icon = if is_active { ui.icon_ok() } else { " " };
        let status_cell = if is_active {
            ui.colored_cell("active", AnsiColor::Green)
        } else {
            ui.cell("-")
        };
        table.add_row(vec![
            ui.cell(icon),
            ui.cell(&profile.name),
            ui.cell(&profile.description),
            status_cell,
        ]);
    }

    ui.section("Profiles");
    ui.println(table.to_string());
    Ok(())
}
