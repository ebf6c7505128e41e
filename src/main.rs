use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fortios_cmdb::config::Config;
use fortios_cmdb::fortios::auth;
use fortios_cmdb::{
    DhcpReservedAddress, DhcpServer, FortiClient, Lookup, RouterOspf,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage FortiOS DHCP and OSPF configuration over the REST API
#[derive(Parser, Debug)]
#[command(name = "fortios", version, about, long_about = None)]
struct Args {
    /// Appliance base URL, e.g. https://192.0.2.1
    #[arg(long, env = "FORTIOS_HOST", global = true)]
    host: Option<String>,

    /// REST API token (defaults to $FORTIOS_ACCESS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Virtual domain to address
    #[arg(long, env = "FORTIOS_VDOM", global = true)]
    vdom: Option<String>,

    /// Accept self-signed certificates
    #[arg(long, env = "FORTIOS_INSECURE", global = true)]
    insecure: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// DHCP servers (system.dhcp/server)
    #[command(subcommand)]
    DhcpServer(DhcpServerCommand),
    /// Reserved addresses of a DHCP server
    #[command(subcommand)]
    DhcpReservation(DhcpReservationCommand),
    /// Global OSPF settings (router/ospf)
    #[command(subcommand)]
    Ospf(OspfCommand),
    /// Saved CLI settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum DhcpServerCommand {
    List,
    Get { id: String },
    /// Create from a YAML or JSON parameter file
    Create { file: PathBuf },
    Update { id: String, file: PathBuf },
    Delete { id: String },
    /// Show the server attached to an interface
    Find { interface: String },
}

#[derive(Subcommand, Debug)]
enum DhcpReservationCommand {
    List { server: String },
    Get { server: String, id: String },
    Create { server: String, file: PathBuf },
    Update { server: String, id: String, file: PathBuf },
    Delete { server: String, id: String },
}

#[derive(Subcommand, Debug)]
enum OspfCommand {
    Get,
    Update { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    Set { key: ConfigKey, value: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfigKey {
    Host,
    Vdom,
    Insecure,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", log_path.display());
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("fortios started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("fortios").join("fortios.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".fortios").join("fortios.log");
    }
    PathBuf::from("fortios.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        host,
        token,
        vdom,
        insecure,
        log_level,
        command,
    } = Args::parse();

    let _log_guard = setup_logging(log_level);

    let mut config = Config::load();

    let connect = || -> Result<FortiClient> {
        let token = auth::resolve_token(token.as_deref(), config.token.as_deref())
            .context("Invalid API token")?;
        if token.is_none() {
            tracing::warn!("No API token configured, requests will be unauthenticated");
        }

        let client_config =
            config.client_config(host.as_deref(), vdom.as_deref(), insecure, token)?;
        tracing::info!(
            "Using host: {}, vdom: {:?}",
            client_config.base_url,
            client_config.vdom
        );

        FortiClient::new(&client_config).context("Failed to create FortiOS client")
    };

    match command {
        Command::DhcpServer(command) => run_dhcp_server(&connect()?, command).await,
        Command::DhcpReservation(command) => run_dhcp_reservation(&connect()?, command).await,
        Command::Ospf(command) => run_ospf(&connect()?, command).await,
        Command::Config(command) => run_config(&command, &mut config),
    }
}

async fn run_dhcp_server(client: &FortiClient, command: DhcpServerCommand) -> Result<()> {
    let servers = client.dhcp_servers();
    match command {
        DhcpServerCommand::List => print_json(&servers.list().await?),
        DhcpServerCommand::Get { id } => {
            let server = found(servers.read(&id).await?, || format!("DHCP server {id}"))?;
            print_json(&server)
        }
        DhcpServerCommand::Create { file } => {
            let params: DhcpServer = read_params(&file)?;
            print_json(&servers.create(&params).await?)
        }
        DhcpServerCommand::Update { id, file } => {
            let params: DhcpServer = read_params(&file)?;
            print_json(&servers.update(&params, &id).await?)
        }
        DhcpServerCommand::Delete { id } => {
            servers.delete(&id).await?;
            println!("Deleted DHCP server {id}");
            Ok(())
        }
        DhcpServerCommand::Find { interface } => match servers.find_by_interface(&interface).await? {
            Some(server) => print_json(&server),
            None => anyhow::bail!("could not find dhcp server on interface, {interface}"),
        },
    }
}

async fn run_dhcp_reservation(client: &FortiClient, command: DhcpReservationCommand) -> Result<()> {
    let reservations = client.dhcp_reservations();
    match command {
        DhcpReservationCommand::List { server } => print_json(&reservations.list(&server).await?),
        DhcpReservationCommand::Get { server, id } => {
            let reservation = found(reservations.read(&server, &id).await?, || {
                format!("DHCP reservation {id} on server {server}")
            })?;
            print_json(&reservation)
        }
        DhcpReservationCommand::Create { server, file } => {
            let params: DhcpReservedAddress = read_params(&file)?;
            print_json(&reservations.create(&params, &server).await?)
        }
        DhcpReservationCommand::Update { server, id, file } => {
            let params: DhcpReservedAddress = read_params(&file)?;
            print_json(&reservations.update(&params, &server, &id).await?)
        }
        DhcpReservationCommand::Delete { server, id } => {
            reservations.delete(&server, &id).await?;
            println!("Deleted DHCP reservation {id} on server {server}");
            Ok(())
        }
    }
}

async fn run_ospf(client: &FortiClient, command: OspfCommand) -> Result<()> {
    let ospf = client.router_ospf();
    match command {
        OspfCommand::Get => {
            let settings = found(ospf.read().await?, || "OSPF settings".to_string())?;
            print_json(&settings)
        }
        OspfCommand::Update { file } => {
            let params: RouterOspf = read_params(&file)?;
            print_json(&ospf.update(&params).await?)
        }
    }
}

fn run_config(command: &ConfigCommand, config: &mut Config) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            if shown.token.is_some() {
                shown.token = Some("****".to_string());
            }
            print_json(&shown)
        }
        ConfigCommand::Set { key, value } => {
            match key {
                ConfigKey::Host => {
                    fortios_cmdb::ClientConfig::new(value)
                        .with_context(|| format!("Invalid FortiOS host '{value}'"))?;
                    config.host = Some(value.clone());
                }
                ConfigKey::Vdom => config.vdom = Some(value.clone()),
                ConfigKey::Insecure => {
                    config.insecure = value
                        .parse()
                        .with_context(|| format!("Expected true or false, got '{value}'"))?;
                }
            }
            config.save()
        }
    }
}

/// Parameter files may be YAML or JSON
fn read_params<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn found<T>(lookup: Lookup<T>, what: impl FnOnce() -> String) -> Result<T> {
    match lookup {
        Lookup::Found(value) => Ok(value),
        Lookup::NotFound => anyhow::bail!("{} not found", what()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
