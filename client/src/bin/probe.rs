//! `alumni-probe`: issue one authenticated request against the backend.
//!
//! ```text
//! alumni-probe [METHOD] <PATH>
//! ```
//!
//! The session is kept in `ALUMNI_SESSION_FILE` (default
//! `.alumni-session.json`). When `ALUMNI_EMAIL` and `ALUMNI_PASSWORD` are set
//! and no session is stored, the probe logs in first.

use alumni_net_client::providers::HistoryNavigator;
use alumni_net_client::stores::FileStorage;
use alumni_net_client::{ApiRequest, ClientConfig, SessionClient};
use anyhow::{Context, bail};
use reqwest::Method;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SESSION_FILE: &str = ".alumni-session.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (method, path) = parse_args(&args)?;

    let config = ClientConfig::from_env().context("loading configuration")?;
    let session_file =
        std::env::var("ALUMNI_SESSION_FILE").unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string());
    let navigator = Arc::new(HistoryNavigator::default());

    let client = SessionClient::new(
        &config,
        Arc::new(FileStorage::new(&session_file)),
        navigator.clone(),
    )?;
    info!(base_url = %config.base_url, session_file = %session_file, "Client ready");

    if !client.session().is_authenticated() {
        if let (Ok(email), Ok(password)) =
            (std::env::var("ALUMNI_EMAIL"), std::env::var("ALUMNI_PASSWORD"))
        {
            client.login(&email, &password).await.context("logging in")?;
        }
    }

    let response = client
        .send(ApiRequest::new(method.clone(), path.clone()))
        .await
        .with_context(|| format!("{method} {path}"))?;

    info!(status = %response.status, "Request succeeded");
    println!("{}", response.text());

    if navigator.navigation_count() > 0 {
        info!(location = %navigator.history().join(" -> "), "Navigation requested");
    }
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<(Method, String)> {
    match args {
        [path] => Ok((Method::GET, path.clone())),
        [method, path] => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("invalid method {method:?}"))?;
            Ok((method, path.clone()))
        }
        _ => bail!("usage: alumni-probe [METHOD] <PATH>"),
    }
}
