use clap::{Parser, Subcommand};
use reqwest::Response;

#[derive(Parser)]
#[command(name = "watchlist-cli")]
#[command(about = "Command-line client for the watchlist gateway", long_about = None)]
struct Cli {
    /// Gateway endpoint.
    #[arg(short, long, default_value = "http://localhost:8080/watchlist")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty watchlist and print its URL
    New,
    /// Add an entry to a watchlist
    Add {
        /// Watchlist identifier or document URL
        #[arg(long)]
        db: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        done: bool,
        #[arg(long, default_value_t = 0)]
        prio: i64,
    },
    /// Remove an entry from a watchlist
    Remove {
        /// Watchlist identifier or document URL
        #[arg(long)]
        db: String,
        #[arg(long)]
        id: String,
    },
}

impl Commands {
    fn form(&self) -> Vec<(&'static str, String)> {
        match self {
            Commands::New => vec![("action", "new".to_string())],
            Commands::Add { db, id, title, done, prio } => vec![
                ("action", "add".to_string()),
                ("db", db.clone()),
                ("id", id.clone()),
                ("title", title.clone()),
                ("done", done.to_string()),
                ("prio", prio.to_string()),
            ],
            Commands::Remove { db, id } => vec![
                ("action", "remove".to_string()),
                ("db", db.clone()),
                ("id", id.clone()),
            ],
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client.post(&cli.url).form(&cli.command.form()).send().await?;
    print_response(res).await
}

async fn print_response(res: Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("ok");
    } else {
        println!("{}", text.trim_end());
    }
    Ok(())
}
