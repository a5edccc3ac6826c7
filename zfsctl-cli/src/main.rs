// zfsctl-cli/src/main.rs
mod models;
mod rendering;

use anyhow::{anyhow, Context, Result};
use colored::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use time::macros::format_description;
use tracing::{debug, info, Level};
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use zfsctl_core::{
    clients_from_config, CloneOptions, CreateOptions, DestroyOptions, DeviceSpec, GetOptions,
    ListOptions, PoolAddOptions, PoolCreateOptions, PoolDestroyOptions, PoolListOptions,
    PropertyAssignment, SetOptions, SnapshotOptions, ZfsClient, ZfsctlConfig, ZpoolClient,
};

use crate::models::cli::{Cli, Commands, GetArgs, SetArgs, ZfsCommand, ZpoolCommand};
use crate::rendering::{
    dataset_table, pool_table, print_done, print_error, print_records, property_table,
};

const CONFIG_DIR_NAME: &str = "zfsctl";
const CONFIG_FILENAME: &str = "zfsctl.toml";

/// `--config` wins; otherwise the per-user file is used when it exists.
fn resolve_config_path(explicit: Option<&Path>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    config_dir
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
        .filter(|path| path.is_file())
}

fn load_cli_config(explicit: Option<&Path>) -> Result<ZfsctlConfig> {
    let Some(config_path) = resolve_config_path(explicit, dirs::config_dir()) else {
        debug!("No configuration file found, using defaults");
        return Ok(ZfsctlConfig::default());
    };
    let config_toml_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
    let config = ZfsctlConfig::from_toml_str(&config_toml_content)
        .with_context(|| format!("Failed to parse or validate {:?}", config_path))?;
    info!("Loaded configuration from {:?}", config_path);
    Ok(config)
}

fn parse_assignments(raw: &[String]) -> Result<Vec<PropertyAssignment>> {
    raw.iter()
        .map(|s| s.parse::<PropertyAssignment>().map_err(anyhow::Error::from))
        .collect()
}

/// Splits `tank/data@daily` into dataset and snapshot name.
fn split_snapshot(full: &str) -> Result<(String, String)> {
    match full.split_once('@') {
        Some((dataset, name)) if !dataset.is_empty() && !name.is_empty() => {
            Ok((dataset.to_string(), name.to_string()))
        }
        _ => Err(anyhow!("expected <dataset>@<name>, got '{}'", full)),
    }
}

fn get_options(args: GetArgs) -> GetOptions {
    GetOptions {
        property: args.property,
        source: args.source,
        target: args.target,
    }
}

fn set_options(args: SetArgs) -> Result<SetOptions> {
    let assignment: PropertyAssignment = args.assignment.parse()?;
    Ok(SetOptions::new(args.name, assignment.property, assignment.value))
}

async fn run_zfs(zfs: &ZfsClient, action: ZfsCommand, json: bool) -> Result<()> {
    match action {
        ZfsCommand::List { kind, sort, recursive, target } => {
            let options = ListOptions {
                kind: kind.map(Into::into),
                sort,
                recursive,
                target,
            };
            let datasets = zfs.list(&options).await?;
            print_records(&datasets, dataset_table(&datasets), json)
        }
        ZfsCommand::Get(args) => {
            let properties = zfs.get(&get_options(args)).await?;
            print_records(&properties, property_table(&properties), json)
        }
        ZfsCommand::Set(args) => {
            let options = set_options(args)?;
            zfs.set(&options).await?;
            print_done("set", &format!("{}={} on {}", options.property, options.value, options.name));
            Ok(())
        }
        ZfsCommand::Destroy { recursive, name } => {
            zfs.destroy(&DestroyOptions { name: name.clone(), recursive }).await?;
            print_done("destroyed", &name);
            Ok(())
        }
        ZfsCommand::Create { options, size, name } => {
            let options = CreateOptions {
                name: name.clone(),
                options: parse_assignments(&options)?,
                size,
            };
            zfs.create(&options).await?;
            print_done("created", &name);
            Ok(())
        }
        ZfsCommand::Snapshot { recursive, snapshot } => {
            let (dataset, name) = split_snapshot(&snapshot)?;
            zfs.snapshot(&SnapshotOptions { dataset, name, recursive }).await?;
            print_done("snapshot", &snapshot);
            Ok(())
        }
        ZfsCommand::Clone { snapshot, dataset } => {
            zfs.clone_snapshot(&CloneOptions { snapshot, dataset: dataset.clone() })
                .await?;
            print_done("cloned into", &dataset);
            Ok(())
        }
    }
}

async fn run_zpool(zpool: &ZpoolClient, action: ZpoolCommand, json: bool) -> Result<()> {
    match action {
        ZpoolCommand::List { name } => {
            let pools = zpool.list(&PoolListOptions { name }).await?;
            print_records(&pools, pool_table(&pools), json)
        }
        ZpoolCommand::Get(args) => {
            let properties = zpool.get(&get_options(args)).await?;
            print_records(&properties, property_table(&properties), json)
        }
        ZpoolCommand::Set(args) => {
            let options = set_options(args)?;
            zpool.set(&options).await?;
            print_done("set", &format!("{}={} on {}", options.property, options.value, options.name));
            Ok(())
        }
        ZpoolCommand::Destroy { name } => {
            zpool.destroy(&PoolDestroyOptions { name: name.clone() }).await?;
            print_done("destroyed pool", &name);
            Ok(())
        }
        ZpoolCommand::Create { options, mountpoint, name, devices } => {
            let options = PoolCreateOptions {
                name: name.clone(),
                devices: DeviceSpec::new(devices),
                options: parse_assignments(&options)?,
                mountpoint,
            };
            zpool.create(&options).await?;
            print_done("created pool", &name);
            Ok(())
        }
        ZpoolCommand::Add { name, devices } => {
            zpool
                .add(&PoolAddOptions { name: name.clone(), devices: DeviceSpec::new(devices) })
                .await?;
            print_done("added devices to", &name);
            Ok(())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_cli_config(cli.config.as_deref())?;
    let (zfs, zpool) = clients_from_config(&config);
    match cli.command {
        Commands::Zfs { action } => run_zfs(&zfs, action, cli.json).await,
        Commands::Zpool { action } => run_zpool(&zpool, action, cli.json).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // --- Logging Setup ---
    let default_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    let local_timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(local_timer.clone())
        .with_target(false)
        .with_level(true);

    // The guard flushes the file writer on drop, so it lives until main returns.
    let mut _guard = None;
    let file_layer = match cli.log_file.as_deref() {
        Some(log_path) => {
            let (Some(dir), Some(file_name)) = (log_path.parent(), log_path.file_name()) else {
                eprintln!("{} Invalid log file path: {}", "Error:".red(), log_path.display());
                return ExitCode::FAILURE;
            };
            let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("{} Failed to create log directory {}: {}", "Error:".red(), dir.display(), e);
                return ExitCode::FAILURE;
            }
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            _guard = Some(guard);
            Some(
                fmt::layer()
                    .with_writer(non_blocking_writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_timer(local_timer),
            )
        }
        None => None,
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("{} Failed to initialize logging: {}", "Error:".red(), e);
        return ExitCode::FAILURE;
    }
    debug!(
        "Logging initialized. Level determined by RUST_LOG or -v flags (default: {})",
        default_level
    );
    // --- End Logging Setup ---

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_config_path_wins() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("custom.toml");
        assert_eq!(
            resolve_config_path(Some(&explicit), Some(dir.path().to_path_buf())),
            Some(explicit)
        );
    }

    #[test]
    fn test_user_config_used_only_when_present() {
        let dir = tempdir().unwrap();
        assert_eq!(resolve_config_path(None, Some(dir.path().to_path_buf())), None);

        let config_dir = dir.path().join(CONFIG_DIR_NAME);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILENAME), "max_output_bytes = 1024\n").unwrap();
        assert_eq!(
            resolve_config_path(None, Some(dir.path().to_path_buf())),
            Some(config_dir.join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zfsctl.toml");
        fs::write(&path, "zfs_path = \"/opt/zfs/bin/zfs\"\nmax_output_bytes = 4096\n").unwrap();
        let config = load_cli_config(Some(&path)).unwrap();
        assert_eq!(config.zfs_path, Some(PathBuf::from("/opt/zfs/bin/zfs")));
        assert_eq!(config.max_output_bytes, 4096);
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        let dir = tempdir().unwrap();
        let err = load_cli_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_split_snapshot() {
        assert_eq!(
            split_snapshot("tank/data@daily").unwrap(),
            ("tank/data".to_string(), "daily".to_string())
        );
        assert!(split_snapshot("tank/data").is_err());
        assert!(split_snapshot("@daily").is_err());
    }

    #[test]
    fn test_set_options_from_assignment() {
        let options = set_options(SetArgs {
            assignment: "compression=lz4".to_string(),
            name: "tank/data".to_string(),
        })
        .unwrap();
        assert_eq!(options, SetOptions::new("tank/data", "compression", "lz4"));
        assert!(set_options(SetArgs {
            assignment: "compression".to_string(),
            name: "tank/data".to_string(),
        })
        .is_err());
    }
}
