//! CLI entry point for Under Roof.

pub mod commands;
pub mod errors;

pub use errors::format_error_help;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::profile::Role;

/// Under Roof account CLI
#[derive(Parser, Debug)]
#[command(name = "underroof", version, about = "Under Roof account client")]
pub struct Cli {
    /// API origin (overrides UNDERROOF_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the token pair
    Login(LoginArgs),
    /// Forget the stored token pair
    Logout,
    /// Show who is signed in
    Status,
    /// Profile management
    Profile(ProfileArgs),
}

/// Arguments for `underroof login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    pub username: String,

    /// Password (prompted on stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the `profile` subcommand group.
#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Print the signed-in profile
    Show,
    /// Edit the signed-in profile
    Update(UpdateArgs),
    /// Validate a photo and print its preview data URL
    Preview {
        path: PathBuf,
    },
}

/// Arguments for `underroof profile update`. Omitted fields keep the
/// server's current value.
#[derive(Parser, Debug, Default)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub current_password: Option<String>,

    #[arg(long)]
    pub new_password: Option<String>,

    #[arg(long)]
    pub confirm_password: Option<String>,

    /// New profile photo (jpeg, png, gif or webp; 5MB max)
    #[arg(long)]
    pub photo: Option<PathBuf>,

    /// Administrative edit: enables --role and --active, disables password change
    #[arg(long)]
    pub admin: bool,

    #[arg(long, requires = "admin")]
    pub role: Option<Role>,

    #[arg(long, requires = "admin")]
    pub active: Option<bool>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_login_with_password_flag() {
        let cli = Cli::try_parse_from(["underroof", "login", "alice", "--password", "correct"])
            .unwrap();
        match cli.command {
            Commands::Login(args) => {
                assert_eq!(args.username, "alice");
                assert_eq!(args.password.as_deref(), Some("correct"));
            }
            other => panic!("expected Login, got {other:?}"),
        }
    }

    #[test]
    fn parse_login_missing_username_is_error() {
        assert!(Cli::try_parse_from(["underroof", "login"]).is_err());
    }

    #[test]
    fn parse_global_base_url() {
        let cli =
            Cli::try_parse_from(["underroof", "status", "--base-url", "https://house.example.com"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.base_url.as_deref(), Some("https://house.example.com"));
    }

    #[test]
    fn parse_profile_update_fields() {
        let cli = Cli::try_parse_from([
            "underroof",
            "profile",
            "update",
            "--first-name",
            "Alice",
            "--photo",
            "me.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Profile(ProfileArgs {
                command: ProfileCommands::Update(args),
            }) => {
                assert_eq!(args.first_name.as_deref(), Some("Alice"));
                assert_eq!(args.photo, Some(PathBuf::from("me.png")));
                assert!(!args.admin);
            }
            other => panic!("expected profile update, got {other:?}"),
        }
    }

    #[test]
    fn parse_admin_fields() {
        let cli = Cli::try_parse_from([
            "underroof", "profile", "update", "--admin", "--role", "visitor", "--active", "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Profile(ProfileArgs {
                command: ProfileCommands::Update(args),
            }) => {
                assert!(args.admin);
                assert_eq!(args.role, Some(Role::Visitor));
                assert_eq!(args.active, Some(false));
            }
            other => panic!("expected profile update, got {other:?}"),
        }
    }

    #[test]
    fn role_requires_admin() {
        assert!(Cli::try_parse_from(["underroof", "profile", "update", "--role", "admin"]).is_err());
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["underroof"]).is_err());
    }
}
