//! User queries.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;

use crate::{
    client::Executor,
    helpers::{execute_data, fragment_builder},
};

/// Fields of the `User` type that can be requested.
pub const USER_FIELDS: &[&str] = &[
    "activated",
    "createdAt",
    "email",
    "id",
    "name",
    "organization",
    "organizationId",
    "organizationRole",
    "updatedAt",
];

/// `User` fields that are objects and need a sub-selection.
pub const USER_OBJECT_FIELDS: &[&str] = &["organization"];

pub const DEFAULT_USER_FIELDS: &[&str] = &["email", "id", "name"];

/// Largest page the server accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

pub fn gql_users(fragment: &str) -> String {
    format!(
        r#"
query($where: UserWhere!, $first: PageSize!, $skip: Int!) {{
  data: users(where: $where, first: $first, skip: $skip) {{
    {fragment}
  }}
}}
"#
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersFilter {
    pub email: Option<String>,
    pub organization_id: Option<String>,
    /// Field paths to select, e.g. `"organization.name"`.
    pub fields: Vec<String>,
    /// Between 0 and 100.
    pub first: u32,
    /// Users are ordered by creation date.
    pub skip: u32,
}

impl Default for UsersFilter {
    fn default() -> Self {
        Self {
            email: None,
            organization_id: None,
            fields: DEFAULT_USER_FIELDS.iter().map(|f| f.to_string()).collect(),
            first: MAX_PAGE_SIZE,
            skip: 0,
        }
    }
}

#[derive(Serialize)]
struct UsersVariables<'a> {
    first: u32,
    skip: u32,
    #[serde(rename = "where")]
    filter: UserWhere<'a>,
}

#[derive(Serialize)]
struct UserWhere<'a> {
    email: Option<&'a str>,
    organization: OrganizationWhere<'a>,
}

#[derive(Serialize)]
struct OrganizationWhere<'a> {
    id: Option<&'a str>,
}

pub struct QueriesUser<'a, E: ?Sized> {
    client: &'a E,
}

impl<'a, E> QueriesUser<'a, E>
where
    E: Executor + ?Sized,
{
    pub fn new(client: &'a E) -> Self {
        Self { client }
    }

    /// Users matching the given email and organization id.
    pub async fn users(&self, filter: &UsersFilter) -> Result<Value> {
        if filter.first > MAX_PAGE_SIZE {
            bail!("first must be between 0 and {}, got {}", MAX_PAGE_SIZE, filter.first);
        }
        let fragment = fragment_builder(&filter.fields, USER_FIELDS, USER_OBJECT_FIELDS)?;
        let document = gql_users(&fragment);
        let variables = UsersVariables {
            first: filter.first,
            skip: filter.skip,
            filter: UserWhere {
                email: filter.email.as_deref(),
                organization: OrganizationWhere { id: filter.organization_id.as_deref() },
            },
        };
        tracing::debug!(
            operation = "users",
            first = filter.first,
            skip = filter.skip,
            "running user query"
        );
        execute_data(self.client, &document, &variables).await
    }
}
