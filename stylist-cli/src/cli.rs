//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use shared::models::{FamilyStatus, Quality};
use stylist_client::ClientConfig;
use stylist_session::PollConfig;

/// stylist - browse the fabric catalog and render garments
#[derive(Debug, Parser)]
#[command(name = "stylist")]
#[command(about = "Virtual stylist: catalog browsing, garment generation and admin console")]
#[command(version)]
pub struct Cli {
    /// Backend base URL [overrides STYLIST_API_BASE]
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// HTTP request timeout in seconds [overrides STYLIST_HTTP_TIMEOUT_SECS, default 60]
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Bearer token for admin commands [overrides STYLIST_ADMIN_TOKEN]
    #[arg(long, global = true)]
    pub admin_token: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Default log filter (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment (and `.env`) first, then command-line flags on top
    pub fn client_config(&self) -> ClientConfig {
        self.override_client_config(ClientConfig::from_env())
    }

    fn override_client_config(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base) = self.api_base.as_deref() {
            config.base_url = ClientConfig::new(base).base_url;
        }
        if let Some(seconds) = self.timeout_secs {
            config = config.with_timeout(seconds);
        }
        if let Some(token) = self.admin_token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_admin_token(token);
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List families and colors with the default selection
    Catalog,

    /// Look a color up by id and select it
    Search {
        /// Color id, e.g. navy-001
        id: String,
    },

    /// Render the selected fabric
    Generate(GenerateArgs),

    /// Administrative CRUD
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Family to select (defaults to the catalog's default family)
    #[arg(long)]
    pub family: Option<String>,

    /// Color to select within the family
    #[arg(long)]
    pub color: Option<String>,

    /// Custom swatch image (jpeg, png or webp, up to 5 MiB)
    #[arg(long)]
    pub swatch: Option<PathBuf>,

    #[arg(long)]
    pub seed: Option<i64>,

    /// preview | final
    #[arg(long)]
    pub quality: Option<Quality>,

    /// Status poll interval [overrides STYLIST_POLL_INTERVAL_MS]
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Give up after this long [overrides STYLIST_POLL_MAX_WAIT_MS]
    #[arg(long)]
    pub max_wait_ms: Option<u64>,
}

impl GenerateArgs {
    pub fn poll_config(&self) -> PollConfig {
        self.override_poll_config(PollConfig::from_env())
    }

    fn override_poll_config(&self, base: PollConfig) -> PollConfig {
        let mut config = PollConfig {
            seed: self.seed,
            quality: self.quality,
            ..base
        };
        if let Some(ms) = self.interval_ms.filter(|ms| *ms > 0) {
            config.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_wait_ms.filter(|ms| *ms > 0) {
            config.max_wait = Duration::from_millis(ms);
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Fabric families
    Fabrics {
        #[command(subcommand)]
        command: FabricCommand,
    },
    /// Fabric colors
    Colors {
        #[command(subcommand)]
        command: ColorCommand,
    },
    /// Generation history
    Generations {
        #[command(subcommand)]
        command: GenerationCommand,
    },
}

#[derive(Debug, Args)]
pub struct Page {
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum FabricCommand {
    List {
        /// Search family id or display name
        #[arg(long)]
        q: Option<String>,
        /// active | inactive
        #[arg(long)]
        status: Option<FamilyStatus>,
        #[command(flatten)]
        page: Page,
    },
    Create {
        #[arg(long)]
        family_id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "active")]
        status: FamilyStatus,
    },
    Deactivate {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ColorCommand {
    List {
        /// Search color id, name or swatch code
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        family_id: Option<String>,
        #[arg(long)]
        status: Option<FamilyStatus>,
        #[command(flatten)]
        page: Page,
    },
    Get {
        id: i64,
    },
    /// Activate or deactivate one color
    Status {
        id: i64,
        status: FamilyStatus,
    },
    /// Move a color to another fabric family
    Move {
        id: i64,
        #[arg(long)]
        to: i64,
    },
    Delete {
        id: i64,
    },
    /// Set the status of many colors; failures are reported, not retried
    BulkStatus {
        status: FamilyStatus,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GenerationCommand {
    List {
        #[arg(long)]
        family_id: Option<String>,
        #[arg(long)]
        color_id: Option<String>,
        #[command(flatten)]
        page: Page,
    },
    /// Completed renders for one fabric color
    ByFabric {
        family_id: String,
        color_id: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Stats,
    Get {
        job_id: String,
    },
    Delete {
        job_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stylist").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn generate_flags() {
        let cli = parse(&[
            "--api-base",
            "http://localhost:8000/",
            "generate",
            "--family",
            "navy",
            "--color",
            "navy-001",
            "--quality",
            "preview",
            "--seed",
            "42",
            "--interval-ms",
            "500",
        ]);

        let Command::Generate(args) = &cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.family.as_deref(), Some("navy"));
        let poll = args.override_poll_config(PollConfig::default());
        assert_eq!(poll.interval, Duration::from_millis(500));
        assert_eq!(poll.max_wait, PollConfig::default().max_wait);
        assert_eq!(poll.quality, Some(Quality::Preview));
        assert_eq!(poll.seed, Some(42));

        let config = cli.override_client_config(ClientConfig::unconfigured());
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn flags_override_environment() {
        let env = ClientConfig::new("https://env.example.com")
            .with_timeout(5)
            .with_admin_token("from-env");

        let untouched = parse(&["catalog"]).override_client_config(env.clone());
        assert_eq!(untouched, env);

        let cli = parse(&[
            "--api-base",
            "https://flag.example.com/",
            "--timeout-secs",
            "90",
            "--admin-token",
            "from-flag",
            "catalog",
        ]);
        let config = cli.override_client_config(env);
        assert_eq!(config.base_url.as_deref(), Some("https://flag.example.com"));
        assert_eq!(config.timeout_secs, 90);
        assert_eq!(config.admin_token.as_deref(), Some("from-flag"));
    }

    #[test]
    fn poll_flags_override_environment() {
        let env = PollConfig {
            interval: Duration::from_millis(750),
            max_wait: Duration::from_secs(30),
            ..PollConfig::default()
        };
        let cli = parse(&["generate", "--max-wait-ms", "60000"]);
        let Command::Generate(args) = &cli.command else {
            panic!("expected generate");
        };
        let poll = args.override_poll_config(env);
        assert_eq!(poll.interval, Duration::from_millis(750));
        assert_eq!(poll.max_wait, Duration::from_secs(60));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["search", "navy-001", "--json", "--log-level", "debug"]);
        assert!(cli.json);
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Search { ref id } if id == "navy-001"));
    }

    #[test]
    fn bulk_status_requires_ids() {
        assert!(Cli::try_parse_from(["stylist", "admin", "colors", "bulk-status", "inactive"]).is_err());

        let cli = parse(&["admin", "colors", "bulk-status", "inactive", "3", "5", "8"]);
        let Command::Admin {
            command: AdminCommand::Colors {
                command: ColorCommand::BulkStatus { status, ids },
            },
        } = cli.command
        else {
            panic!("expected bulk-status");
        };
        assert_eq!(status, FamilyStatus::Inactive);
        assert_eq!(ids, vec![3, 5, 8]);
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["stylist", "admin", "colors", "status", "4", "archived"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
