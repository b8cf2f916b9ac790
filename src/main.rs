use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use github_stats::models::StatsSnapshot;
use github_stats::{
    CacheStore, Config, GitHubClient, SqliteCacheStore, StatsAggregator, StatsConfig, StatsController,
    StatsState,
};

#[derive(Parser, Debug)]
#[command(name = "github-stats")]
#[command(version)]
#[command(about = "Fetch and cache GitHub profile, repository and contribution stats")]
struct Args {
    /// GitHub username to report on
    #[arg(short, long)]
    username: String,

    /// Output format (json, text)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Ignore the cached snapshot and fetch fresh data
    #[arg(long)]
    refresh: bool,

    /// Remove the cached snapshot and exit
    #[arg(long)]
    clear_cache: bool,

    /// Cache database path (overrides STATS_CACHE_PATH)
    #[arg(long)]
    cache_path: Option<String>,

    /// Keep running and refresh on the configured interval until Ctrl-C
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("github_stats=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    let stats_config = StatsConfig::from(&config);

    let cache_path = args.cache_path.clone().unwrap_or_else(|| config.cache_path.clone());
    let cache = SqliteCacheStore::new(&cache_path, stats_config.cache_ttl)?;

    if args.clear_cache {
        cache.clear()?;
        tracing::info!("Cleared cached stats in {}", cache_path);
        return Ok(());
    }

    let github = GitHubClient::with_base_url(&config.api_base_url)?;
    let aggregator = Arc::new(StatsAggregator::new(github, cache, stats_config));
    let controller = Arc::new(StatsController::new(
        aggregator,
        args.username.clone(),
        config.github_token.clone(),
    ));

    if args.watch {
        let args = Arc::new(args);
        let task_args = Arc::clone(&args);
        let task = controller.spawn_periodic(config.refresh_interval(), move |state| {
            if let Err(e) = emit(state, &task_args) {
                tracing::error!("Failed to write stats: {}", e);
            }
        });

        tracing::info!(
            "Refreshing stats for {} every {}h, press Ctrl-C to stop",
            args.username,
            config.refresh_interval_hours
        );
        tokio::signal::ctrl_c().await?;
        task.cancel().await;
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Loading GitHub stats for {}", args.username));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let state = controller.load(args.refresh).await;
    spinner.finish_and_clear();

    if let Some(ref error) = state.error {
        anyhow::bail!("{}", error);
    }

    emit(&state, &args)
}

fn emit(state: &StatsState, args: &Args) -> anyhow::Result<()> {
    let Some(ref stats) = state.stats else {
        if let Some(ref error) = state.error {
            tracing::warn!("No stats available: {}", error);
        }
        return Ok(());
    };

    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(stats)?,
        _ => format_text(stats, state, &args.username),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(stats: &StatsSnapshot, state: &StatsState, username: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== GitHub Stats: {} ===\n\n", username));

    output.push_str(&format!("Repositories: {}\n", stats.profile.public_repos));
    output.push_str(&format!("Followers: {}\n", stats.profile.followers));
    output.push_str(&format!("Following: {}\n", stats.profile.following));
    output.push_str(&format!(
        "Member since: {}\n\n",
        stats.profile.created_at.format("%Y-%m-%d")
    ));

    output.push_str(&format!("Contributions (last year): {}\n", stats.total_contributions));
    output.push_str(&format!("Current streak: {} days\n", stats.current_streak));
    output.push_str(&format!("Longest streak: {} days\n", stats.longest_streak));

    if !stats.repos.is_empty() {
        output.push_str("\nTop Repositories:\n");
        for repo in &stats.repos {
            output.push_str(&format!(
                "  - {} ★ {} ⑂ {} ({})\n",
                repo.name,
                repo.stargazers_count,
                repo.forks_count,
                repo.language.as_deref().unwrap_or("Unknown")
            ));
            output.push_str(&format!(
                "    {}\n",
                repo.description.as_deref().unwrap_or("No description available")
            ));
        }
    }

    if let Some(text) = state.last_updated_text(Utc::now()) {
        output.push_str(&format!("\n{}\n", text));
    }

    output
}
