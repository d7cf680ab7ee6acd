use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use ghup::detect::{Detector, UpdateCandidate};
use ghup::platform::Platform;
use ghup::provider::GitHubSource;
use ghup::validate::SuffixValidator;

/// ghup - GitHub release update detector
///
/// Finds the release and binary asset a self-update should install for the
/// current platform.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for
/// authentication. This is useful for accessing private repositories or
/// avoiding rate limits.
///
/// Examples:
///   ghup latest owner/repo     # Find the newest suitable release
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// GitHub API token (also via GITHUB_TOKEN)
    #[arg(
        long = "token",
        env = "GITHUB_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    token: Option<String>,

    /// Only consider assets matching this pattern (repeatable)
    #[arg(long = "filter", value_name = "REGEX", global = true)]
    filters: Vec<String>,

    /// Require a companion validation asset with this suffix (e.g. ".sha256")
    #[arg(long = "validation-suffix", value_name = "SUFFIX", global = true)]
    validation_suffix: Option<String>,

    /// Override the detected operating system name
    #[arg(long = "os", value_name = "OS", global = true)]
    os: Option<String>,

    /// Override the detected CPU architecture name
    #[arg(long = "arch", value_name = "ARCH", global = true)]
    arch: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Find the newest suitable release
    Latest(LatestArgs),

    /// Find a release pinned to an exact tag
    Version(VersionArgs),

    /// List every release carrying a suitable asset
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
struct LatestArgs {
    /// The GitHub repository in the format "owner/repo"
    #[arg(value_name = "OWNER/REPO")]
    repo: String,
}

#[derive(clap::Args, Debug)]
struct VersionArgs {
    /// The GitHub repository in the format "owner/repo"
    #[arg(value_name = "OWNER/REPO")]
    repo: String,

    /// Exact release tag (e.g. "v1.2.3")
    #[arg(value_name = "TAG")]
    tag: String,
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// The GitHub repository in the format "owner/repo"
    #[arg(value_name = "OWNER/REPO")]
    repo: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let detector = build_detector(&cli)?;

    match &cli.command {
        Commands::Latest(args) => match detector.detect_latest(&args.repo).await? {
            Some(candidate) => print_candidate(&candidate),
            None => println!("No suitable release found for {}", args.repo),
        },
        Commands::Version(args) => {
            match detector.detect_version(&args.repo, &args.tag).await? {
                Some(candidate) => print_candidate(&candidate),
                None => println!("No release {} found for {}", args.tag, args.repo),
            }
        }
        Commands::List(args) => {
            let candidates = detector.detect_versions(&args.repo, None).await?;
            if candidates.is_empty() {
                println!("No suitable releases found for {}", args.repo);
            }
            for candidate in &candidates {
                println!(
                    "{}\t{}\t{} bytes",
                    candidate.version, candidate.asset_url, candidate.asset_size
                );
            }
        }
    }
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Detector> {
    let source = GitHubSource::new(reqwest::Client::new(), cli.api_url.clone())
        .with_token(cli.token.clone());

    let mut platform = Platform::detect();
    if let Some(os) = &cli.os {
        platform.os = os.clone();
    }
    if let Some(arch) = &cli.arch {
        platform.arch = arch.clone();
    }

    let mut detector = Detector::new(Arc::new(source)).with_platform(platform);
    if !cli.filters.is_empty() {
        detector = detector.with_filters(&cli.filters)?;
    }
    if let Some(suffix) = &cli.validation_suffix {
        detector = detector.with_validator(Arc::new(SuffixValidator::new(suffix)));
    }
    Ok(detector)
}

fn print_candidate(candidate: &UpdateCandidate) {
    println!("{}", candidate.version);
    println!("  url:   {}", candidate.asset_url);
    println!("  size:  {} bytes", candidate.asset_size);
    if let Some(name) = &candidate.release_name {
        println!("  name:  {}", name);
    }
    if let Some(published_at) = &candidate.published_at {
        println!("  date:  {}", published_at);
    }
    if let Some(id) = candidate.validation_asset_id {
        println!("  validation asset: {}", id);
    }
}
