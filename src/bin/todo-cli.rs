use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command line client for the todo API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all todo items
    List,
    /// Create a todo item
    Add {
        title: String,
        #[arg(long)]
        order: Option<i64>,
    },
    /// Show one todo item
    Show { id: u64 },
    /// Mark a todo item as completed
    Complete { id: u64 },
    /// Change the title of a todo item
    Rename { id: u64, title: String },
    /// Delete a todo item
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let detail = |id: u64| format!("{}/todos/{}", base, id);

    let res = match cli.command {
        Commands::List => client.get(format!("{}/todos", base)).send().await?,
        Commands::Add { title, order } => {
            client
                .post(format!("{}/todos", base))
                .json(&json!({ "title": title, "order": order }))
                .send()
                .await?
        }
        Commands::Show { id } => client.get(detail(id)).send().await?,
        Commands::Complete { id } => {
            client
                .patch(detail(id))
                .json(&json!({ "completed": true }))
                .send()
                .await?
        }
        Commands::Rename { id, title } => {
            client
                .patch(detail(id))
                .json(&json!({ "title": title }))
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(detail(id)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("Deleted");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
