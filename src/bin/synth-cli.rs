use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "synth-cli")]
#[command(about = "Management CLI for telemetry-synth", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the server to a store
    Connect {
        #[arg(long)]
        cloud_id: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        /// Keep documents in memory on the server
        #[arg(long)]
        dry_run: bool,
    },
    /// List industries
    Industries,
    /// List scenarios for an industry
    Scenarios { industry: String },
    /// Start a generation run
    Start {
        industry: String,
        #[arg(short, long)]
        scenario: Option<String>,
        /// Minutes
        #[arg(short, long)]
        duration: Option<u64>,
        /// Events per second
        #[arg(short, long)]
        rate: Option<u32>,
    },
    /// Stop the active run
    Stop,
    /// Show generation counters
    Stats,
    /// Show server health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Connect { cloud_id, endpoint, api_key, dry_run } => {
            let body = json!({
                "cloud_id": cloud_id,
                "endpoint": endpoint,
                "api_key": api_key,
                "dry_run": dry_run,
            });
            client.post(format!("{}/api/connect", base)).json(&body).send().await?
        }
        Commands::Industries => client.get(format!("{}/api/industries", base)).send().await?,
        Commands::Scenarios { industry } => {
            client
                .get(format!("{}/api/scenarios", base))
                .query(&[("industry", industry)])
                .send()
                .await?
        }
        Commands::Start { industry, scenario, duration, rate } => {
            let body = json!({
                "industry": industry,
                "scenario": scenario,
                "duration": duration,
                "rate": rate,
            });
            client.post(format!("{}/api/generate", base)).json(&body).send().await?
        }
        Commands::Stop => client.post(format!("{}/api/stop", base)).send().await?,
        Commands::Stats => client.get(format!("{}/api/stats", base)).send().await?,
        Commands::Health => client.get(format!("{}/api/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
