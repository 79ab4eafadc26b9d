//! check_wintask CLI
//!
//! Entry point for the `check_wintask` monitoring plugin. Prints one report
//! line per task on stdout and exits with the plugin code of the worst
//! severity found. Anything that prevents the check from running at all
//! (bad flags, unreadable config) is reported as UNKNOWN.

use check_wintask::classifier::CheckPolicy;
use check_wintask::config::{ConfigFile, ConnectionOverrides, ConnectionSettings};
use check_wintask::pipeline::run_check;
use check_wintask::remote::SshStatusSource;
use check_wintask::report::Severity;
use clap::Parser;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "check_wintask")]
#[command(about = "Check Windows scheduled tasks over SSH", version)]
struct Cli {
    /// Host FQDN or IP
    #[arg(long, help_heading = "SSH connection arguments")]
    hostname: String,

    /// ssh port, default port: 22
    #[arg(long, help_heading = "SSH connection arguments")]
    sshport: Option<u16>,

    /// ssh user
    #[arg(long, help_heading = "SSH connection arguments")]
    sshuser: Option<String>,

    /// ssh key file
    #[arg(long, help_heading = "SSH connection arguments")]
    sshkey: Option<String>,

    /// ssh connection timeout in seconds, default: 30
    #[arg(long, help_heading = "SSH connection arguments")]
    connect_timeout: Option<u32>,

    /// TOML file with connection defaults (default: ~/.config/check_wintask/config.toml)
    #[arg(long, help_heading = "SSH connection arguments")]
    config: Option<PathBuf>,

    /// Include task for checking, --include-taskname "taskname 1" --include-taskname "taskname 2" ...etc
    #[arg(long, value_name = "\"MY TASKNAME\"", help_heading = "Task arguments")]
    include_taskname: Vec<String>,

    /// Ignore task from checking, --ignore-taskname "taskname 1" --ignore-taskname "taskname 2" ...etc
    #[arg(long, value_name = "\"MY TASKNAME\"", help_heading = "Task arguments")]
    ignore_taskname: Vec<String>,

    /// Ignore tasks with "Last Run Result" code, --ignore-resultcode "0x41301" --ignore-resultcode "0x41303" ...etc
    #[arg(long, value_name = "\"0x123456\"", help_heading = "Task arguments")]
    ignore_resultcode: Vec<String>,

    /// Ignore task check if task is not scheduled or no trigger
    #[arg(long, help_heading = "Task arguments")]
    ignore_nextruntime: bool,

    /// Verbose diagnostics on stderr (remote query, parsed task records)
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let policy = match CheckPolicy::from_args(
        cli.include_taskname,
        cli.ignore_taskname,
        cli.ignore_resultcode,
        !cli.ignore_nextruntime,
    ) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("Argument error: {}", e);
            process::exit(Severity::Unknown.exit_code());
        }
    };

    let config_file = match &cli.config {
        Some(path) => ConfigFile::load(path),
        None => ConfigFile::load_default(),
    };
    let config_file = match config_file {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Config error: {}", e);
            process::exit(Severity::Unknown.exit_code());
        }
    };

    let overrides = ConnectionOverrides {
        user: cli.sshuser,
        port: cli.sshport,
        key_path: cli.sshkey,
        connect_timeout_seconds: cli.connect_timeout,
    };
    let settings = match ConnectionSettings::resolve(cli.hostname, &config_file, &overrides) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Argument error: {}", e);
            process::exit(Severity::Unknown.exit_code());
        }
    };

    if cli.debug {
        eprintln!(
            "connecting to {}@{} port {} with key {}",
            settings.user, settings.host, settings.port, settings.key_path
        );
    }

    let hostname = settings.host.clone();
    let source = SshStatusSource::new(settings);
    let report = run_check(&source, &policy, &hostname, cli.debug);

    for line in report.ordered_lines() {
        println!("{}", line);
    }
    process::exit(report.exit_severity().exit_code());
}
