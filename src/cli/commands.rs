//! CLI command handlers.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use super::{Cli, Commands, LoginArgs, ProfileCommands, UpdateArgs};
use crate::app::{Action, AppState, Dispatcher, NoticeKind};
use crate::auth::SessionState;
use crate::config::ClientConfig;
use crate::error::{IdentityError, Result};
use crate::navigation::{Navigator, View};
use crate::presenter::IdentityView;
use crate::profile::{stage_photo, EditScope, PasswordChangeIntent, PhotoUpload, ProfileForm};

/// A terminal has nowhere to navigate; page changes are only logged.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, view: View) {
        tracing::debug!(view = %view, path = view.path(), "navigate");
    }

    fn reload(&self) {
        tracing::info!("session ended, state reset");
    }
}

/// Run one parsed command to completion.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env().without_delays();
    if let Some(url) = cli.base_url {
        config = config.with_base_url(url);
    }

    match cli.command {
        Commands::Login(args) => handle_login(config, args).await,
        Commands::Logout => handle_logout(config).await,
        Commands::Status => handle_status(config).await,
        Commands::Profile(profile) => match profile.command {
            ProfileCommands::Show => handle_profile_show(config).await,
            ProfileCommands::Update(args) => handle_profile_update(config, args).await,
            ProfileCommands::Preview { path } => handle_profile_preview(&path).await,
        },
    }
}

fn session(config: &ClientConfig, scope: EditScope) -> Result<(Dispatcher, AppState)> {
    let state = AppState::new(scope, config);
    let dispatcher = Dispatcher::from_config(config.clone(), Arc::new(ConsoleNavigator))?;
    Ok((dispatcher, state))
}

fn print_notice(state: &AppState) {
    if let Some(notice) = state.notices.current() {
        match notice.kind {
            NoticeKind::Success => println!("✅ {}", notice.text),
            NoticeKind::Error => eprintln!("❌ {}", notice.text),
        }
    }
}

/// Handle `underroof login <username>`.
async fn handle_login(config: ClientConfig, args: LoginArgs) -> Result<()> {
    let (dispatcher, mut state) = session(&config, EditScope::SelfEdit)?;
    dispatcher.dispatch(&mut state, Action::OpenLogin).await?;
    if state.session == SessionState::Authenticated {
        println!("✅ Already logged in. Run `underroof logout` to switch accounts.");
        return Ok(());
    }

    let password = match args.password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    dispatcher
        .dispatch(
            &mut state,
            Action::Login {
                username: args.username,
                password,
            },
        )
        .await?;
    print_notice(&state);
    Ok(())
}

/// Handle `underroof logout`.
async fn handle_logout(config: ClientConfig) -> Result<()> {
    let (dispatcher, mut state) = session(&config, EditScope::SelfEdit)?;
    dispatcher.dispatch(&mut state, Action::Logout).await?;
    println!("✅ Logged out");
    Ok(())
}

/// Handle `underroof status`.
async fn handle_status(config: ClientConfig) -> Result<()> {
    let (dispatcher, mut state) = session(&config, EditScope::SelfEdit)?;
    println!("🔐 {}\n", config.base_url());

    let Some(pair) = dispatcher.store().load() else {
        println!("  ❌ Not logged in");
        return Ok(());
    };
    dispatcher.dispatch(&mut state, Action::ProbeSession).await?;

    match &state.identity {
        IdentityView::Authenticated {
            display_name,
            avatar_url,
            ..
        } => {
            println!("  ✅ Logged in as {display_name} (token {})", pair.fingerprint());
            println!("  Avatar: {avatar_url}");
        }
        IdentityView::Anonymous { .. } if dispatcher.store().load().is_some() => {
            println!("  ⚠️  Token stored but the profile could not be loaded");
        }
        IdentityView::Anonymous { .. } => println!("  ❌ Session expired, token cleared"),
    }
    Ok(())
}

/// Handle `underroof profile show`.
async fn handle_profile_show(config: ClientConfig) -> Result<()> {
    let (dispatcher, mut state) = session(&config, EditScope::SelfEdit)?;
    dispatcher.dispatch(&mut state, Action::LoadProfile).await?;
    let Some(record) = &state.profile else {
        return Err(IdentityError::NotLoggedIn);
    };

    println!("Username:   {}", record.username);
    println!("Name:       {} {}", record.first_name, record.last_name);
    println!("Email:      {}", record.email);
    if let Some(role) = &record.role {
        println!("Role:       {role}");
    }
    println!("Active:     {}", record.is_active);
    if let IdentityView::Authenticated { avatar_url, .. } = &state.identity {
        println!("Photo:      {avatar_url}");
    }
    Ok(())
}

/// Handle `underroof profile update`.
async fn handle_profile_update(config: ClientConfig, args: UpdateArgs) -> Result<()> {
    let scope = if args.admin {
        EditScope::AdminEdit
    } else {
        EditScope::SelfEdit
    };
    let (dispatcher, mut state) = session(&config, scope)?;
    dispatcher.dispatch(&mut state, Action::LoadProfile).await?;

    apply_update_args(&mut state.profile_form, &args);
    if let Some(path) = args.photo {
        dispatcher
            .dispatch(&mut state, Action::SelectPhoto(path))
            .await?;
    }
    dispatcher.dispatch(&mut state, Action::UpdateProfile).await?;
    print_notice(&state);
    Ok(())
}

fn apply_update_args(form: &mut ProfileForm, args: &UpdateArgs) {
    if let Some(first_name) = &args.first_name {
        form.fields.first_name = first_name.clone();
    }
    if let Some(last_name) = &args.last_name {
        form.fields.last_name = last_name.clone();
    }
    if let Some(email) = &args.email {
        form.fields.email = email.clone();
    }
    if args.role.is_some() {
        form.fields.role = args.role.clone();
    }
    if args.active.is_some() {
        form.fields.is_active = args.active;
    }
    form.password = PasswordChangeIntent::new(
        args.current_password.clone().unwrap_or_default(),
        args.new_password.clone().unwrap_or_default(),
        args.confirm_password.clone().unwrap_or_default(),
    );
}

/// Handle `underroof profile preview <path>`. Works offline.
async fn handle_profile_preview(path: &Path) -> Result<()> {
    let mut form = ProfileForm::default();
    stage_photo(&mut form, PhotoUpload::from_path(path).await?)?;
    if let Some(preview) = form.preview {
        println!("{}", preview.data_url);
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Role;

    #[test]
    fn update_args_override_only_given_fields() {
        let mut form = ProfileForm::new(EditScope::AdminEdit);
        form.fields.first_name = "Alice".to_string();
        form.fields.email = "alice@example.com".to_string();

        let args = UpdateArgs {
            last_name: Some("Liddell".to_string()),
            admin: true,
            role: Some(Role::Visitor),
            ..UpdateArgs::default()
        };
        apply_update_args(&mut form, &args);

        assert_eq!(form.fields.first_name, "Alice");
        assert_eq!(form.fields.last_name, "Liddell");
        assert_eq!(form.fields.email, "alice@example.com");
        assert_eq!(form.fields.role, Some(Role::Visitor));
        assert!(!form.password.is_requested());
    }

    #[test]
    fn password_flags_become_a_change_intent() {
        let mut form = ProfileForm::new(EditScope::SelfEdit);
        let args = UpdateArgs {
            current_password: Some("old-pass".to_string()),
            new_password: Some("secret1".to_string()),
            confirm_password: Some("secret1".to_string()),
            ..UpdateArgs::default()
        };
        apply_update_args(&mut form, &args);
        assert!(form.password.is_requested());
        assert!(form.password.validate().unwrap().is_some());
    }

    #[tokio::test]
    async fn preview_rejects_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let err = handle_profile_preview(&path).await.unwrap_err();
        assert!(matches!(err, IdentityError::Validation(_)));
    }
}
