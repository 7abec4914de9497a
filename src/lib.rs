//! Under Roof: identity and profile client
//!
//! Client side of the Under Roof account API: obtains and stores a bearer
//! token pair, shows who is signed in, and edits the signed-in profile
//! (fields, password change, photo upload) with local validation before
//! anything is sent.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use underroof::prelude::*;
//! use underroof::navigation::RecordingNavigator;
//!
//! # async fn example() -> underroof::error::Result<()> {
//! let config = ClientConfig::from_env();
//! let dispatcher = Dispatcher::from_config(config.clone(), Arc::new(RecordingNavigator::new()))?;
//! let mut state = AppState::new(EditScope::SelfEdit, &config);
//!
//! dispatcher
//!     .dispatch(&mut state, Action::Login { username: "alice".into(), password: "correct".into() })
//!     .await?;
//! dispatcher.dispatch(&mut state, Action::ProbeSession).await?;
//! println!("{:?}", state.identity);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod navigation;
pub mod prelude;
pub mod presenter;
pub mod profile;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
