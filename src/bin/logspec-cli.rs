use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use logspec::LevelSpec;

#[derive(Parser)]
#[command(name = "logspec-cli")]
#[command(about = "Inspect and change logging level specs", long_about = None)]
struct Cli {
    /// Admin API base URL.
    #[arg(short, long, default_value = "http://127.0.0.1:9400")]
    url: String,

    /// Bearer token for the admin API.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a spec offline and print its normalized form
    Check { spec: String },
    /// Resolve logger names against a spec offline
    Resolve {
        spec: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show the active spec
    Get,
    /// Activate a new spec
    Set { spec: String },
    /// List registered loggers and their levels
    Loggers,
    /// Show the effective level of one logger
    Level { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Check { spec } => {
            let parsed = LevelSpec::parse(spec)?;
            println!("{parsed}");
            return Ok(());
        }
        Commands::Resolve { spec, names } => {
            let parsed = LevelSpec::parse(spec)?;
            for name in names {
                println!("{name}={}", parsed.level(name).as_upper_str());
            }
            return Ok(());
        }
        _ => {}
    }

    let client = reqwest::Client::new();
    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
    }

    let request = match &cli.command {
        Commands::Get => client.get(format!("{}/logspec", cli.url)),
        Commands::Set { spec } => client
            .put(format!("{}/logspec", cli.url))
            .json(&json!({ "spec": spec })),
        Commands::Loggers => client.get(format!("{}/loggers", cli.url)),
        Commands::Level { name } => client.get(format!("{}/loggers/{}", cli.url, name)),
        Commands::Check { .. } | Commands::Resolve { .. } => unreachable!("handled offline"),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: admin API returned status {status}");
        if let Ok(text) = res.text().await {
            eprintln!("Response: {text}");
        }
        std::process::exit(1);
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("OK");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
