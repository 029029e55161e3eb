use std::path::PathBuf;

use clap::{Parser, Subcommand};

use vigil_core::{Config, FilterMode, Warden};

mod commands;

#[derive(Parser)]
#[command(name = "vigil", version, about = "VIGIL focus session control")]
struct Cli {
    /// Database path override
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a focus session
    Start {
        /// Filter mode, allow or block
        #[arg(long)]
        mode: FilterMode,
        /// Session length in minutes
        #[arg(long, default_value_t = 45)]
        duration: i64,
        /// Domains to filter, comma or space separated
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// End the current session
    Stop,
    /// Push the session end time out
    Extend {
        /// Minutes to add
        #[arg(long, default_value_t = 15)]
        minutes: i64,
    },
    /// Pull the session end time in
    Reduce {
        /// Minutes to remove
        #[arg(long, default_value_t = 15)]
        minutes: i64,
    },
    /// Show the current session
    Status {
        /// Print the raw status JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a domain to the running session's list
    AddDomain {
        /// Domain to add
        domain: String,
    },
    /// Live countdown until the session ends
    Watch,
    /// Print the interceptor's verdict for a URL
    Check {
        /// URL to evaluate
        url: String,
    },
    /// Show or clear intercepted navigations
    Log {
        /// Number of entries to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Clear the intercept log
        #[arg(long)]
        clear: bool,
    },
    /// Show past sessions
    History {
        /// Number of sessions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() {
    vigil_core::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.database {
        Some(path) => Config {
            database_path: path,
            ..Config::default()
        },
        None => Config::default(),
    };
    let warden = Warden::new(config)?;

    match cli.command {
        Commands::Start {
            mode,
            duration,
            domains,
        } => commands::session::start(&warden, mode, duration, domains),
        Commands::Stop => commands::session::stop(&warden),
        Commands::Extend { minutes } => commands::session::extend(&warden, minutes),
        Commands::Reduce { minutes } => commands::session::reduce(&warden, minutes),
        Commands::Status { json } => commands::session::status(&warden, json),
        Commands::AddDomain { domain } => commands::session::add_domain(&warden, &domain),
        Commands::Watch => commands::session::watch(&warden),
        Commands::Check { url } => commands::check::run(&warden, &url),
        Commands::Log { limit, clear } => commands::log::run(&warden, limit, clear),
        Commands::History { limit } => commands::history::run(&warden, limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        let cli = Cli::try_parse_from([
            "vigil",
            "start",
            "--mode",
            "block",
            "--duration",
            "25",
            "reddit.com",
            "x.com",
        ])
        .unwrap();

        match cli.command {
            Commands::Start {
                mode,
                duration,
                domains,
            } => {
                assert_eq!(mode, FilterMode::Block);
                assert_eq!(duration, 25);
                assert_eq!(domains, vec!["reddit.com", "x.com"]);
            }
            _ => panic!("Expected start command"),
        }
    }

    #[test]
    fn test_parse_start_defaults_duration() {
        let cli =
            Cli::try_parse_from(["vigil", "start", "--mode", "allow", "docs.rs"]).unwrap();
        match cli.command {
            Commands::Start { duration, .. } => assert_eq!(duration, 45),
            _ => panic!("Expected start command"),
        }
    }

    #[test]
    fn test_parse_start_requires_domains() {
        assert!(Cli::try_parse_from(["vigil", "start", "--mode", "block"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        assert!(
            Cli::try_parse_from(["vigil", "start", "--mode", "deny", "reddit.com"]).is_err()
        );
    }

    #[test]
    fn test_parse_adjustment_defaults() {
        let cli = Cli::try_parse_from(["vigil", "extend"]).unwrap();
        match cli.command {
            Commands::Extend { minutes } => assert_eq!(minutes, 15),
            _ => panic!("Expected extend command"),
        }

        let cli = Cli::try_parse_from(["vigil", "reduce", "--minutes", "5"]).unwrap();
        match cli.command {
            Commands::Reduce { minutes } => assert_eq!(minutes, 5),
            _ => panic!("Expected reduce command"),
        }
    }

    #[test]
    fn test_parse_global_database_flag() {
        let cli = Cli::try_parse_from(["vigil", "status", "--database", "/tmp/test.db"]).unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/test.db")));
    }

    #[test]
    fn test_parse_add_domain() {
        let cli = Cli::try_parse_from(["vigil", "add-domain", "YouTube.com"]).unwrap();
        match cli.command {
            Commands::AddDomain { domain } => assert_eq!(domain, "YouTube.com"),
            _ => panic!("Expected add-domain command"),
        }
    }
}
