use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "daybrief", version, about = "Daybrief calendar assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the day's schedule
    Today {
        /// Include declined events
        #[arg(long)]
        all: bool,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Analyze the day's free/busy structure
    Analyze {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stack rank meetings by importance
    Rank {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a focus block
    Focus {
        /// Focus block title
        title: String,
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM)
        end: String,
        /// Focus block description
        #[arg(long)]
        description: Option<String>,
    },
    /// Create a commute block
    Commute {
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM)
        end: String,
        /// Commute description
        #[arg(long, default_value = "Travel time")]
        description: String,
    },
    /// Decline a meeting
    Decline {
        /// Partial title of the meeting to decline
        title: String,
        /// Don't send a notification to attendees
        #[arg(long)]
        no_notify: bool,
    },
    /// Reschedule a meeting
    Reschedule {
        /// Partial title of the meeting to reschedule
        title: String,
        /// Minutes to shift (positive = later)
        #[arg(long, allow_hyphen_values = true)]
        shift_minutes: i64,
        /// Message to include with the reschedule
        #[arg(long)]
        message: Option<String>,
        /// Don't send a notification to attendees
        #[arg(long)]
        no_notify: bool,
    },
    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Today { all, date } => commands::today::run(all, date.as_deref()),
        Commands::Analyze { date, json } => commands::analyze::run(date.as_deref(), json),
        Commands::Rank { date, json } => commands::rank::run(date.as_deref(), json),
        Commands::Focus {
            title,
            start,
            end,
            description,
        } => commands::focus::run(&title, &start, &end, description.as_deref()),
        Commands::Commute {
            start,
            end,
            description,
        } => commands::commute::run(&start, &end, &description),
        Commands::Decline { title, no_notify } => commands::decline::run(&title, no_notify),
        Commands::Reschedule {
            title,
            shift_minutes,
            message,
            no_notify,
        } => commands::reschedule::run(&title, shift_minutes, message.as_deref(), no_notify),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "daybrief", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
