//! Authenticated access to the Kili API.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use crate::{client::GraphQlClient, config::Config, mutations::user::signin};

#[derive(Debug, Clone)]
pub struct KiliAuth {
    pub client: GraphQlClient,
    /// Set when authenticated with email and password.
    pub user_id: Option<String>,
}

impl KiliAuth {
    /// Authenticate with `KILI_API_KEY` when present, otherwise sign in with
    /// `KILI_EMAIL` and `KILI_PASSWORD`.
    pub async fn new(cfg: &Config) -> Result<Self> {
        let mut client = GraphQlClient::from_config(cfg)?;

        if let Some(api_key) = cfg.get_non_empty("KILI_API_KEY") {
            client.inject_api_key(&api_key)?;
            tracing::info!(endpoint = %client.endpoint(), "authenticated with API key");
            return Ok(Self { client, user_id: None });
        }

        let email = cfg.get_non_empty("KILI_EMAIL");
        let password = cfg.get_non_empty("KILI_PASSWORD");
        let (Some(email), Some(password)) = (email, password) else {
            return Err(anyhow!(
                "Missing credentials. Set KILI_API_KEY, or KILI_EMAIL and KILI_PASSWORD, \
                 in env or ~/.config/kili/.kilirc"
            ));
        };

        let payload = signin(&client, &email, &password)
            .await
            .context("sign in failed")?;
        let (token, user_id) = read_auth_payload(&payload)?;
        client.inject_token(&format!("Bearer: {}", token))?;
        tracing::info!(%user_id, endpoint = %client.endpoint(), "signed in");

        Ok(Self { client, user_id: Some(user_id) })
    }
}

fn read_auth_payload(payload: &Value) -> Result<(String, String)> {
    let token = payload
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("sign in response carries no token"))?;
    let user_id = payload
        .pointer("/user/id")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("sign in response carries no user id"))?;
    Ok((token.to_string(), user_id.to_string()))
}
