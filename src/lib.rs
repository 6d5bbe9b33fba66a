//! Client for the user-management endpoints of the Kili GraphQL API.
//!
//! Operations borrow any [`Executor`]; [`GraphQlClient`] is the HTTP one and
//! [`KiliAuth`] hands out an authenticated instance.
//!
//! ```no_run
//! use kili::{Config, KiliAuth, MutationsUser};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let auth = KiliAuth::new(&Config::load()).await?;
//! let user = MutationsUser::new(&auth.client)
//!     .create_user("Ann", "ann@example.com", "first-password", "USER")
//!     .await?;
//! println!("{}", user["id"]);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod helpers;
pub mod mutations;
pub mod printer;
pub mod queries;

pub use auth::KiliAuth;
pub use client::{Executor, GraphQlClient};
pub use config::Config;
pub use helpers::{format_result, fragment_builder, GraphQlError};
pub use mutations::user::{signin, MutationsUser, UserPropertiesUpdate};
pub use queries::user::{QueriesUser, UsersFilter};
