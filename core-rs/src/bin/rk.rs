//! rk - remote jupyter kernel administration CLI

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

use rk_core::{
    prompt, InstallAction, Installer, KernelTarget, Messages, Registry, RkError, Settings,
    SshSetup, StdinConfirm, Uninstaller,
};

#[derive(Parser)]
#[command(name = "rk")]
#[command(version)]
#[command(about = "Remote jupyter kernel administration utility", long_about = None)]
struct Cli {
    /// Settings file (YAML), defaults to ~/.config/rk/rk.yaml
    #[arg(long, global = true, env = "RK_CONFIG")]
    config: Option<PathBuf>,
    /// Registry file (JSON), overrides registry_path from the settings
    #[arg(long, global = true)]
    registry: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List installable remote kernels
    List,
    /// Install remote kernel(s)
    Install {
        #[arg(required = true, value_name = "KERNEL_NAME")]
        kernel_names: Vec<String>,
    },
    /// Install the template remote kernel
    InstallTemplate,
    /// Install every remote kernel from the registry
    InstallAll,
    /// Uninstall remote kernel(s)
    Uninstall {
        #[arg(required = true, value_name = "KERNEL_NAME")]
        kernel_names: Vec<String>,
    },
    /// Uninstall the template remote kernel
    UninstallTemplate,
    /// Uninstall every kernel found in the kernels location
    UninstallAll,
    /// Set up password-less SSH login to a remote host
    Ssh,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let Cli {
        config,
        registry,
        verbose,
        command,
    } = Cli::parse();

    let Some(command) = command else {
        // no sub-command: help, clean exit
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    init_tracing(verbose);

    if let Commands::Ssh = command {
        let messages = Messages::default();
        if let Err(err) = handle_ssh(&messages) {
            report_error(&messages, &err);
            std::process::exit(1);
        }
        return;
    }

    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    };
    let registry_path = registry.unwrap_or_else(|| settings.registry_path.clone());

    if let Err(err) = run(command, &settings, &registry_path) {
        report_error(&settings.messages, &err);
        std::process::exit(1);
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings> {
    let path = match config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    Settings::load(&path).context("failed to load settings")
}

fn load_registry(path: &Path) -> Result<Registry> {
    Registry::load(path).context("failed to load kernel registry")
}

fn run(command: Commands, settings: &Settings, registry_path: &Path) -> Result<()> {
    match command {
        Commands::List => handle_list(registry_path),
        Commands::Install { kernel_names } => {
            handle_install(settings, registry_path, KernelTarget::Names(kernel_names))
        }
        Commands::InstallTemplate => handle_install(settings, registry_path, KernelTarget::Template),
        Commands::InstallAll => handle_install(settings, registry_path, KernelTarget::All),
        Commands::Uninstall { kernel_names } => {
            handle_uninstall(settings, KernelTarget::Names(kernel_names))
        }
        Commands::UninstallTemplate => handle_uninstall(settings, KernelTarget::Template),
        Commands::UninstallAll => handle_uninstall(settings, KernelTarget::All),
        Commands::Ssh => handle_ssh(&settings.messages),
    }
}

/// Handle `rk list`
fn handle_list(registry_path: &Path) -> Result<()> {
    let registry = load_registry(registry_path)?;
    for (name, display_name) in registry.list() {
        println!("{} (display name: \"{}\")", name, display_name);
    }
    Ok(())
}

/// Handle `rk install`, `rk install-template` and `rk install-all`
fn handle_install(settings: &Settings, registry_path: &Path, target: KernelTarget) -> Result<()> {
    // the template comes from the settings, the registry is not needed
    let registry = if target.is_template() {
        Registry::default()
    } else {
        load_registry(registry_path)?
    };

    let messages = &settings.messages;
    Installer::new(settings, &registry).install_reporting(
        &target,
        &mut StdinConfirm,
        &mut |outcome| match outcome.action {
            InstallAction::Installed | InstallAction::Reinstalled => {
                println!("{}", messages.installed(&outcome.name, outcome.template))
            }
            InstallAction::Kept => println!("{}", messages.kept(&outcome.name)),
        },
    )?;
    Ok(())
}

/// Handle `rk uninstall`, `rk uninstall-template` and `rk uninstall-all`
fn handle_uninstall(settings: &Settings, target: KernelTarget) -> Result<()> {
    let messages = &settings.messages;
    let uninstaller = Uninstaller::new(settings);

    if target == KernelTarget::All {
        let removed = uninstaller.uninstall(&target)?;
        println!("{}", messages.uninstalled_all(&removed));
        return Ok(());
    }

    let template = target.is_template();
    uninstaller.uninstall_reporting(&target, &mut |name| {
        println!("{}", messages.uninstalled(name, template))
    })?;
    Ok(())
}

/// Handle `rk ssh`
fn handle_ssh(messages: &Messages) -> Result<()> {
    let setup = SshSetup::for_current_user()?;
    setup
        .run(&mut || prompt::ask(&messages.ask_remote_host))
        .context("ssh setup failed")
}

fn report_error(messages: &Messages, err: &anyhow::Error) {
    match err.downcast_ref::<RkError>() {
        Some(RkError::UnknownKernel(names)) => eprintln!("{}", messages.unknown_kernels(names)),
        Some(RkError::NoTemplate(name)) => eprintln!("{}", messages.no_template(name)),
        Some(RkError::PermissionDenied(path)) => eprintln!("{}", messages.no_root(path)),
        _ => eprintln!("{}", messages.oops(&format!("{:#}", err))),
    }
}
