//! Play Publisher CLI
//!
//! One-shot Google Play artifact publishing tool

use anyhow::Result;
use clap::Parser;
use play_publisher::{
    http_client, AndroidPublisherClient, CredentialProvider, PlayPublisher, RawRequest,
    RequestResolver,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process;

/// Upload an apk/aab to Google Play and assign it to release tracks
#[derive(Debug, Parser)]
#[command(name = "play-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Google Play artifact publishing tool", long_about = None)]
struct Cli {
    /// The name of your application, e.g. "MyCompany-Application/1.0"
    #[arg(short = 'n', long = "app-name")]
    app_name: String,

    /// The package name of the app
    #[arg(short = 'p', long = "package-name")]
    package_name: String,

    /// The service account key.json file path or file content as text
    #[arg(short = 'k', long = "json-key")]
    json_key: String,

    /// The file path to the apk/aab artifact
    #[arg(short = 'a', long = "artifact")]
    artifact: String,

    /// The file path to the deobfuscation file of the specified apk/aab
    #[arg(short = 'd', long = "deobfuscation")]
    deobfuscation: Option<String>,

    /// Recent changes listings: [BCP47 code]::[file path], comma-separated.
    /// Sample: en-US::./listing_en.txt,de-DE::./listing_de.txt
    #[arg(short = 'l', long = "listings")]
    listings: Option<String>,

    /// Comma-separated track names (internal, alpha, beta, production,
    /// rollout or any custom). If not set the artifact is not assigned
    /// to any track
    #[arg(short = 't', long = "tracks")]
    tracks: Option<String>,

    /// The rollout fraction, required for the rollout track (0 <= f < 1)
    #[arg(long)]
    fraction: Option<f64>,
}

#[tokio::main]
async fn main() {
    // Help and version exit 0, any parse error prints usage and exits 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let exit_code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(exit_code);
        }
    };

    match run(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    println!("\n📦 play-publisher\n");
    println!("Start deploy task for app {}", cli.app_name);

    let resolver = RequestResolver::new(program_dir());
    let raw = RawRequest {
        application_name: cli.app_name,
        package_name: cli.package_name,
        json_key: cli.json_key,
        artifact_path: cli.artifact,
        deobfuscation_path: cli.deobfuscation,
        listings: cli.listings,
        tracks: cli.tracks,
        rollout_fraction: cli.fraction,
    };
    let (request, key_source) = resolver.resolve(raw).await?;

    let client = http_client(&request.application_name)?;

    println!("🔑 Obtaining publishing credential...");
    let credential = CredentialProvider::new(client.clone())
        .fetch(&key_source)
        .await?;

    let publisher = PlayPublisher::new(AndroidPublisherClient::new(client, credential));
    let report = publisher.publish(&request).await?;

    println!("\n✅ Published successfully!");
    println!("   Package:      {}", report.package_name);
    println!("   Version code: {}", report.version_code);
    if report.tracks.is_empty() {
        println!("   Tracks:       (none)");
    } else {
        println!("   Tracks:       {}", report.tracks.join(", "));
    }
    println!("   Duration:     {}ms", report.duration_ms);

    Ok(0)
}

/// Directory containing the running executable
///
/// Relative artifact and key paths are resolved against this directory,
/// not the shell's current working directory.
fn program_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
