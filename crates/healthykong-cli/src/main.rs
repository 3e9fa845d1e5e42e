use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "healthykong-cli", version, about = "HealthyKong CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User provisioning
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Record and list health logs
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Donation total, donor level, streak and badges for a user
    Status {
        /// User ID
        user: String,
    },
    /// Badge catalog and evaluation
    Badges {
        #[command(subcommand)]
        action: commands::badges::BadgesAction,
    },
    /// Community feed
    Community {
        #[command(subcommand)]
        action: commands::community::CommunityAction,
    },
    /// Weekly report and AI insights
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Status { user } => commands::status::run(&user),
        Commands::Badges { action } => commands::badges::run(action),
        Commands::Community { action } => commands::community::run(action),
        Commands::Report { action } => commands::report::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
