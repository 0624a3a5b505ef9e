//! Command line entry point

use anyhow::{bail, Context, Result};
use clap::Parser;
use repobuzz::args::Args;
use repobuzz::config::Settings;
use repobuzz::network::HttpClient;
use repobuzz::providers::github::GitHub;
use repobuzz::providers::twitter::Twitter;
use repobuzz::search::SearchClient;
use repobuzz::{correlate, report};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // --help and --version print and exit cleanly; anything
    // unrecognized is a usage error.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = run(args).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let http = HttpClient::new()?;

    let github = match settings.github_credentials() {
        Some((username, password)) => GitHub::with_credentials(username, password),
        None => {
            info!("no GitHub credentials configured, searching unauthenticated");
            GitHub::new()
        }
    };
    let repos = SearchClient::new(github, http.clone());

    let twitter = Twitter::connect(
        &http,
        &settings.twitter_consumer_key,
        &settings.twitter_consumer_secret,
    )
    .await
    .context("establishing the twitter session")?;
    let posts = SearchClient::new(twitter, http);

    let buzz = correlate::collect_buzz(
        &repos,
        &posts,
        &args.query,
        settings.max_projects,
        settings.max_posts_per_project,
    )
    .await?;
    info!("found commentary for {} projects", buzz.len());

    report::print_buzz(
        buzz,
        settings.max_posts_per_project,
        settings.output_post_summary,
    )
    .await?;

    Ok(())
}

/// Resolve the settings file: an explicit --config path wins, otherwise
/// the first default location that exists.
fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        info!("Loading settings from: {}", path.display());
        return Settings::from_file(path);
    }

    for path in default_settings_paths() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            return Settings::from_file(&path);
        }
    }

    bail!("no settings file found; create repobuzz.yml or pass --config <FILE>")
}

fn default_settings_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("repobuzz.yml"),
        PathBuf::from("config/repobuzz.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("repobuzz/repobuzz.yml"));
    }
    paths
}
