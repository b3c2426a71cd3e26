use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use pingcli::{
    catalog::{self, keys},
    commands,
    logging,
    options::Registry,
    paths::ConfigLocation,
    prompt,
    resolve::{GlobalSettings, Resolver},
    selection,
    store::ProfileStore,
    ui::{OutputFormat, Ui},
};

#[derive(Parser)]
#[command(name = "pingcli")]
#[command(about = "Manage configuration profiles for Ping Identity services")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short = 'C', long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Profile to use for this invocation instead of the active one
    #[arg(short = 'P', long, global = true, value_name = "NAME")]
    profile: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Output format: text or json
    #[arg(long, global = true, value_name = "FORMAT")]
    output_format: Option<String>,

    /// Exit with code 2 when the configuration file was changed
    #[arg(short = 'D', long = "detailed-exitcode", global = true)]
    detailed_exit_code: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Global flags the user actually passed, keyed by option key
    fn option_flags(&self) -> BTreeMap<String, String> {
        let mut flags = BTreeMap::new();
        if self.no_color {
            flags.insert(keys::NO_COLOR.to_string(), "true".to_string());
        }
        if let Some(format) = &self.output_format {
            flags.insert(keys::OUTPUT_FORMAT.to_string(), format.clone());
        }
        if self.detailed_exit_code {
            flags.insert(keys::DETAILED_EXIT_CODE.to_string(), "true".to_string());
        }
        flags
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration profiles and settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Add a new profile
    AddProfile(AddProfileArgs),

    /// Delete a profile
    DeleteProfile {
        /// Name of the profile to delete (prompts when omitted)
        names: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Set the active profile
    SetActiveProfile {
        /// Name of the profile to activate (prompts when omitted)
        names: Vec<String>,
    },

    /// Show every setting of a profile
    ViewProfile {
        /// Name of the profile to view (defaults to the active profile)
        names: Vec<String>,

        /// Show sensitive values in plain text
        #[arg(long)]
        unmask_values: bool,
    },

    /// Read a configuration value or every value under a key prefix
    Get {
        key: Vec<String>,

        /// Show sensitive values in plain text
        #[arg(long)]
        unmask_values: bool,
    },

    /// Store a configuration value: key=value
    Set { assignment: Vec<String> },

    /// Reset a configuration value to its default
    Unset { key: Vec<String> },

    /// List every configuration key
    ListKeys {
        /// Print a YAML skeleton of all keys with their defaults
        #[arg(short, long)]
        yaml: bool,
    },

    /// List all profiles
    ListProfiles,
}

#[derive(Args)]
struct AddProfileArgs {
    /// Name of the new profile
    #[arg(long)]
    name: Option<String>,

    /// Description of the new profile
    #[arg(long)]
    description: Option<String>,

    /// Make the new profile active
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    set_active: Option<bool>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_ansi =
        !cli.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
    if let Err(err) = logging::init(cli.verbose, log_ansi) {
        eprintln!("{err:#}");
    }

    let fallback_ui = Ui::new(cli.no_color, OutputFormat::Text);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            fallback_ui.err(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Completion { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(ref command) => run_config(&cli, command),
    }
}

fn run_config(cli: &Cli, command: &ConfigCommand) -> Result<ExitCode> {
    let registry = catalog::builtin();

    // Listing keys reads only the registry, so it works without a usable file
    if let ConfigCommand::ListKeys { yaml } = command {
        let format = match &cli.output_format {
            Some(format) => format
                .parse::<OutputFormat>()
                .map_err(anyhow::Error::msg)
                .context("Invalid output format")?,
            None => OutputFormat::Text,
        };
        commands::list_keys(&registry, &Ui::new(cli.no_color, format), *yaml)?;
        return Ok(ExitCode::SUCCESS);
    }

    let location = ConfigLocation::resolve(cli.config.clone())?;
    debug!(path = %location.path.display(), explicit = location.explicit, "using configuration file");
    let mut store = open_store(&location, &registry)?;

    let profile_override = selection::profile_override(cli.profile.clone());
    let flags = cli.option_flags();
    let settings = {
        let profile = selection::resolve_active_profile(&store, profile_override.as_deref());
        // An unknown override is reported by the command itself; fall back to
        // the active profile for display settings
        let profile = match store.require_profile(&profile) {
            Ok(found) => found.name.clone(),
            Err(_) => store.active_profile().to_string(),
        };
        GlobalSettings::resolve(&Resolver::new(&store, &profile, &flags))?
    };
    let format: OutputFormat = settings
        .output_format
        .parse()
        .map_err(anyhow::Error::msg)
        .context("Invalid output format")?;
    let ui = Ui::new(settings.no_color, format);

    let override_name = profile_override.as_deref();
    let prompter = prompt::for_stdin();

    match command {
        ConfigCommand::AddProfile(args) => commands::add_profile(
            &mut store,
            &ui,
            prompter.as_ref(),
            args.name.clone(),
            args.description.clone(),
            args.set_active,
        ),
        ConfigCommand::DeleteProfile { names, yes } => {
            commands::delete_profile(&mut store, &ui, prompter.as_ref(), names, *yes)
        }
        ConfigCommand::SetActiveProfile { names } => {
            commands::set_active_profile(&mut store, &ui, prompter.as_ref(), names)
        }
        ConfigCommand::ViewProfile {
            names,
            unmask_values,
        } => commands::view_profile(&store, &ui, names, override_name, *unmask_values),
        ConfigCommand::Get { key, unmask_values } => {
            commands::get(&store, &ui, key, override_name, *unmask_values)
        }
        ConfigCommand::Set { assignment } => {
            commands::set(&mut store, &ui, assignment, override_name)
        }
        ConfigCommand::Unset { key } => commands::unset(&mut store, &ui, key, override_name),
        // Handled before the store is opened
        ConfigCommand::ListKeys { .. } => Ok(()),
        ConfigCommand::ListProfiles => commands::list_profiles(&store, &ui),
    }?;

    let changed = store.is_dirty();
    if changed {
        let path = store.path().to_path_buf();
        store
            .save()
            .with_context(|| format!("Failed to save {}", path.display()))?;
        debug!(path = %path.display(), "saved configuration file");
    }

    if changed && settings.detailed_exit_code {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

/// Load the store; the caller reports any failure to the user
fn open_store<'r>(location: &ConfigLocation, registry: &'r Registry) -> Result<ProfileStore<'r>> {
    let store = ProfileStore::open(location, registry).map_err(|err| {
        debug!(
            path = %location.path.display(),
            fatal = err.is_fatal(),
            "configuration file could not be loaded"
        );
        err
    })?;
    if store.was_created() {
        debug!(path = %store.path().display(), "created configuration file");
    }
    Ok(store)
}
