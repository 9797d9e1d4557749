use clap::Subcommand;
use daybrief_core::GoogleCalendar;

use super::CliError;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Authenticate with Google Calendar
    Login {
        /// OAuth client ID
        #[arg(long)]
        client_id: String,
        /// OAuth client secret
        #[arg(long)]
        client_secret: String,
    },
    /// Remove stored credentials
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), CliError> {
    match action {
        AuthAction::Login {
            client_id,
            client_secret,
        } => {
            GoogleCalendar::set_credentials(&client_id, &client_secret)?;
            let calendar = GoogleCalendar::new()?;
            calendar.login()?;
            println!("Google Calendar authenticated");
        }
        AuthAction::Logout => {
            let calendar = GoogleCalendar::new()?;
            calendar.logout()?;
            println!("Google Calendar disconnected");
        }
        AuthAction::Status => {
            let calendar = GoogleCalendar::new()?;
            println!(
                "{}",
                if calendar.is_authenticated() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}
