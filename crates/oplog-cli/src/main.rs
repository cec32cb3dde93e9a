use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

mod commands;

use commands::{ConnectionOverrides, ResizeRequest};

#[derive(Parser)]
#[command(name = "oplog")]
#[command(about = "Resize and compact a replica-set member's oplog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring the member's oplog to the desired size (idempotent).
    ///
    /// Prints {"changed","compacted","msg"} on success, or
    /// {"failed":true,"kind","msg"} and exits 1 on failure.
    Resize {
        #[command(flatten)]
        conn: ConnectionArgs,

        /// Desired oplog size in megabytes (overrides oplog.size_mb)
        #[arg(long = "size-mb", allow_negative_numbers = true)]
        size_mb: Option<i64>,

        /// Compact local.oplog.rs after shrinking (SECONDARY members only)
        #[arg(long, default_value_t = false)]
        compact: bool,

        /// Report what would change without modifying the member
        #[arg(long, default_value_t = false)]
        check: bool,
    },

    /// Print the member's current oplog size and replication role.
    Status {
        #[command(flatten)]
        conn: ConnectionArgs,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> member ...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// Layered config paths in merge order
    #[arg(long = "config")]
    config_paths: Vec<String>,

    /// Fail instead of warn when the config has keys nothing reads
    #[arg(long, default_value_t = false)]
    strict_config: bool,

    /// Member hostname (overrides connection.host)
    #[arg(long)]
    host: Option<String>,

    /// Member port (overrides connection.port)
    #[arg(long)]
    port: Option<u16>,

    /// Database holding the login credentials (overrides connection.login_database)
    #[arg(long)]
    login_database: Option<String>,

    /// NAME of the env var holding the login user
    #[arg(long)]
    login_user_env: Option<String>,

    /// NAME of the env var holding the login password
    #[arg(long)]
    login_password_env: Option<String>,

    /// Connect with TLS (overrides connection.tls.enabled)
    #[arg(long, default_value_t = false)]
    tls: bool,

    /// CERT_NONE | CERT_OPTIONAL | CERT_REQUIRED (overrides connection.tls.cert_reqs)
    #[arg(long)]
    tls_cert_reqs: Option<String>,

    /// Server selection deadline in milliseconds
    #[arg(long)]
    server_selection_timeout_ms: Option<u64>,
}

impl ConnectionArgs {
    fn into_overrides(self) -> ConnectionOverrides {
        ConnectionOverrides {
            config_paths: self.config_paths,
            strict_config: self.strict_config,
            host: self.host,
            port: self.port,
            login_database: self.login_database,
            login_user_env: self.login_user_env,
            login_password_env: self.login_password_env,
            tls: self.tls,
            tls_cert_reqs: self.tls_cert_reqs,
            server_selection_timeout_ms: self.server_selection_timeout_ms,
        }
    }
}

fn main() -> Result<ExitCode> {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Resize {
            conn,
            size_mb,
            compact,
            check,
        } => Ok(commands::resize::run(ResizeRequest {
            conn: conn.into_overrides(),
            size_mb,
            compact,
            check,
        })),

        Commands::Status { conn } => Ok(commands::status::run(conn.into_overrides())),

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = oplog_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr; stdout carries only the JSON result.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
