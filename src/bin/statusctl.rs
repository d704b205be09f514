use clap::Parser;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "statusctl")]
#[command(about = "Query a running statusd instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Exit non-zero if any host is red.
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/status", cli.url.trim_end_matches('/')))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: statusd returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(2);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if cli.strict && count_red(&json) > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Red entries in a `[{"host": "green"|"red"}, ...]` document.
fn count_red(doc: &Value) -> usize {
    doc.as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|entry| entry.values())
                .filter(|verdict| verdict.as_str() != Some("green"))
                .count()
        })
        .unwrap_or(0)
}
