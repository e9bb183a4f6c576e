//! # Casino Admin console core
//!
//! Client-side core of the casino back-office: the admin and affiliate
//! consoles talk to the casino backend through this crate.
//!
//! ## Features
//!
//! - **Sessions**: per-role bearer tokens with expiry checks and route guards
//! - **Table pipeline**: search, exact and membership filters, stable sorting
//!   and pagination over any [`table::Record`]
//! - **API client**: bearer injection, response envelope normalization and
//!   session invalidation on 401/403
//! - **Screens**: players, affiliates, KYC, payouts, transactions, referrals
//!   and the single-form admin pages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ca_console::screens::players::Players;
//! use ca_console::AdminClient;
//!
//! # async fn run() -> ca_console::Result<()> {
//! let config = ca_config::ConfigLoader::new().load()?;
//! let client = AdminClient::from_config(&config)?;
//!
//! let players = Players::new(client);
//! players.load().await?;
//! players.set_query("jane");
//! for player in players.view().rows {
//!     println!("{} <{}>", player.username, player.email);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod screens;
pub mod session;
pub mod table;
pub mod token;
pub mod validation;

// Re-export main types
pub use api::AdminClient;
pub use error::{Error, Result};
pub use session::{GuardDecision, Role, SessionGuard, SessionStore};
pub use validation::FormErrors;
