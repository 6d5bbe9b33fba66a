//! Command line surface of the `kili` binary.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::{
    client::Executor,
    mutations::user::{signin, MutationsUser, UserPropertiesUpdate},
    queries::user::{QueriesUser, UsersFilter},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "kili", about = "Manage Kili users from the command line", version)]
pub struct Cli {
    /// GraphQL endpoint (overrides KILI_API_ENDPOINT).
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// API key (overrides KILI_API_KEY).
    #[arg(long = "api-key", global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in and print the session payload.
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Add a user to your organization.
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Used for the first sign in only.
        #[arg(long)]
        password: String,
        /// ADMIN or USER.
        #[arg(long = "organization-role")]
        organization_role: String,
    },
    /// Create a user for a project unless the email is already known.
    CreateUserFromEmail {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// ADMIN, REVIEWER, LABELER or READER.
        #[arg(long = "organization-role")]
        organization_role: String,
        #[arg(long = "project-id")]
        project_id: String,
    },
    UpdatePassword {
        #[arg(long)]
        email: String,
        #[arg(long = "old-password")]
        old_password: String,
        #[arg(long = "new-password-1")]
        new_password_1: String,
        #[arg(long = "new-password-2")]
        new_password_2: String,
    },
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Update the properties of a user.
    UpdateUser {
        /// Identifies the user.
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "organization-id")]
        organization_id: Option<String>,
        #[arg(long = "organization-role")]
        organization_role: Option<String>,
        /// true to reactivate, false to deactivate.
        #[arg(long)]
        activated: Option<bool>,
    },
    /// List users.
    Users {
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "organization-id")]
        organization_id: Option<String>,
        /// Fields to return, comma separated (e.g. email,id,organization.name).
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = ["email".to_string(), "id".to_string(), "name".to_string()]
        )]
        fields: Vec<String>,
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=100))]
        first: u32,
        #[arg(long, default_value_t = 0)]
        skip: u32,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

impl Command {
    /// `sign-in` talks to the API before any credentials exist.
    pub fn needs_auth(&self) -> bool {
        !matches!(self, Command::SignIn { .. })
    }

    /// Run the matching operation against `client`.
    pub async fn run(self, client: &dyn Executor) -> Result<Value> {
        let mutations = MutationsUser::new(client);
        match self {
            Command::SignIn { email, password } => signin(client, &email, &password).await,
            Command::CreateUser { name, email, password, organization_role } => {
                mutations.create_user(&name, &email, &password, &organization_role).await
            }
            Command::CreateUserFromEmail { name, email, organization_role, project_id } => {
                mutations
                    .create_user_from_email_if_not_exists(
                        &name,
                        &email,
                        &organization_role,
                        &project_id,
                    )
                    .await
            }
            Command::UpdatePassword { email, old_password, new_password_1, new_password_2 } => {
                mutations
                    .update_password(&email, &old_password, &new_password_1, &new_password_2)
                    .await
            }
            Command::ResetPassword { email } => mutations.reset_password(&email).await,
            Command::UpdateUser { email, name, organization_id, organization_role, activated } => {
                let update =
                    UserPropertiesUpdate { name, organization_id, organization_role, activated };
                mutations.update_properties_in_user(&email, &update).await
            }
            Command::Users { email, organization_id, fields, first, skip } => {
                let filter = UsersFilter { email, organization_id, fields, first, skip };
                QueriesUser::new(client).users(&filter).await
            }
        }
    }
}
