//! Diagnostic subcommands; each prints one JSON document on stdout

use anyhow::{Context, Result};
use pmoconfig::Config;
use pmoplayer::{EnvironmentReport, PlayerConfigExt, RcClient, RcEndpoint, SystemEnvironment};
use pmoradiobrowser::{RadioBrowserClient, RadioBrowserConfigExt, SearchQuery};
use pmostream::StreamResolver;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode result")?;
    println!("{}", text);
    Ok(())
}

pub async fn resolve(config: &Config, url: &str) -> Result<()> {
    let resolver = StreamResolver::from_config(config)?;
    let result = resolver
        .resolve(url)
        .await
        .with_context(|| format!("Cannot resolve {}", url))?;
    print_json(&result)
}

pub async fn search(
    config: &Config,
    query: String,
    country: Option<String>,
    tag: Option<String>,
    limit: Option<u32>,
) -> Result<()> {
    let client = RadioBrowserClient::from_config(config).await?;
    let mut search = SearchQuery::new(query).limit(match limit {
        Some(limit) => limit,
        None => config.get_radiobrowser_default_limit()?,
    });
    if let Some(country) = country {
        search = search.country(country);
    }
    if let Some(tag) = tag {
        search = search.tag(tag);
    }

    let stations = client.search(&search).await.context("Station search failed")?;
    print_json(&stations)
}

pub fn probe(config: &Config) -> Result<()> {
    let env = SystemEnvironment::new(config.get_player_vlc_path()?);
    print_json(&EnvironmentReport::probe(&env))
}

pub async fn rc(
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
    commands: Vec<String>,
) -> Result<()> {
    let configured = config.get_player_rc_endpoint()?;
    let endpoint = RcEndpoint::new(
        host.unwrap_or(configured.host),
        port.unwrap_or(configured.port),
    );
    let client = RcClient::from_config(config, endpoint)?;

    let response = tokio::task::spawn_blocking(move || client.send(&commands))
        .await
        .context("RC task failed")?;
    print_json(&response)
}
