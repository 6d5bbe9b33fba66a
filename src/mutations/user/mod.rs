//! User-management mutations.
//!
//! Each operation sends exactly one request and returns `format_result("data", response)`.
//! Arguments are forwarded as-is; the server is the only validator.

mod documents;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::{client::Executor, helpers::execute_data};

pub use documents::{
    GQL_CREATE_USER, GQL_CREATE_USER_FROM_EMAIL_IF_NOT_EXISTS, GQL_RESET_PASSWORD, GQL_SIGN_IN,
    GQL_UPDATE_PASSWORD, GQL_UPDATE_PROPERTIES_IN_USER,
};

/// Optional properties for [`MutationsUser::update_properties_in_user`].
///
/// Fields left as `None` are still sent, as explicit `null`s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPropertiesUpdate {
    pub name: Option<String>,
    /// Moves the user to another organization.
    pub organization_id: Option<String>,
    /// One of `ADMIN`, `REVIEWER`, `LABELER`, `READER`.
    pub organization_role: Option<String>,
    /// `Some(false)` deactivates the user without deleting it.
    pub activated: Option<bool>,
}

#[derive(Serialize)]
struct SignInVariables<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserVariables<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    organization_role: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserFromEmailVariables<'a> {
    name: &'a str,
    email: &'a str,
    organization_role: &'a str,
    #[serde(rename = "projectID")]
    project_id: &'a str,
}

#[derive(Serialize)]
struct UpdatePasswordVariables<'a> {
    email: &'a str,
    #[serde(rename = "oldPassword")]
    old_password: &'a str,
    #[serde(rename = "newPassword1")]
    new_password_1: &'a str,
    #[serde(rename = "newPassword2")]
    new_password_2: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordVariables<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePropertiesVariables<'a> {
    email: &'a str,
    name: Option<&'a str>,
    organization_id: Option<&'a str>,
    organization_role: Option<&'a str>,
    activated: Option<bool>,
}

/// Sign in with any executor, e.g. a client that is not authenticated yet.
///
/// The payload carries `id`, `token` and `user.id`.
pub async fn signin<E>(client: &E, email: &str, password: &str) -> Result<Value>
where
    E: Executor + ?Sized,
{
    tracing::debug!(operation = "signIn", "running user mutation");
    execute_data(client, GQL_SIGN_IN, &SignInVariables { email, password }).await
}

pub struct MutationsUser<'a, E: ?Sized> {
    client: &'a E,
}

impl<'a, E> MutationsUser<'a, E>
where
    E: Executor + ?Sized,
{
    pub fn new(client: &'a E) -> Self {
        Self { client }
    }

    pub async fn signin(&self, email: &str, password: &str) -> Result<Value> {
        signin(self.client, email, password).await
    }

    /// Add a user to the organization.
    ///
    /// `password` is only used for the first sign in. `organization_role` is `ADMIN` or `USER`.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        organization_role: &str,
    ) -> Result<Value> {
        tracing::debug!(operation = "createUser", "running user mutation");
        let variables = CreateUserVariables { name, email, password, organization_role };
        execute_data(self.client, GQL_CREATE_USER, &variables).await
    }

    /// Create a user for a given project unless one with this email already exists.
    pub async fn create_user_from_email_if_not_exists(
        &self,
        name: &str,
        email: &str,
        organization_role: &str,
        project_id: &str,
    ) -> Result<Value> {
        tracing::debug!(
            operation = "createUserFromEmailIfNotExists",
            %project_id,
            "running user mutation"
        );
        let variables = CreateUserFromEmailVariables { name, email, organization_role, project_id };
        execute_data(self.client, GQL_CREATE_USER_FROM_EMAIL_IF_NOT_EXISTS, &variables).await
    }

    pub async fn update_password(
        &self,
        email: &str,
        old_password: &str,
        new_password_1: &str,
        new_password_2: &str,
    ) -> Result<Value> {
        tracing::debug!(operation = "updatePassword", "running user mutation");
        let variables = UpdatePasswordVariables {
            email,
            old_password,
            new_password_1,
            new_password_2,
        };
        execute_data(self.client, GQL_UPDATE_PASSWORD, &variables).await
    }

    pub async fn reset_password(&self, email: &str) -> Result<Value> {
        tracing::debug!(operation = "resetPassword", "running user mutation");
        execute_data(self.client, GQL_RESET_PASSWORD, &ResetPasswordVariables { email }).await
    }

    /// Update the properties of the user identified by `email`.
    pub async fn update_properties_in_user(
        &self,
        email: &str,
        update: &UserPropertiesUpdate,
    ) -> Result<Value> {
        tracing::debug!(operation = "updatePropertiesInUser", "running user mutation");
        let variables = UpdatePropertiesVariables {
            email,
            name: update.name.as_deref(),
            organization_id: update.organization_id.as_deref(),
            organization_role: update.organization_role.as_deref(),
            activated: update.activated,
        };
        execute_data(self.client, GQL_UPDATE_PROPERTIES_IN_USER, &variables).await
    }
}
