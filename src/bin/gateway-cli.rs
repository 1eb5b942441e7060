use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the user gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user
    AddUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Fetch one user by id
    GetUser { id: i64 },
    /// Delete one user by id
    DeleteUser { id: i64 },
    /// List every user
    ListUsers,
    /// Check the gateway is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::AddUser {
            username,
            password,
            name,
            age,
            email,
            role,
        } => {
            let mut body = Map::new();
            body.insert("username".into(), json!(username));
            body.insert("password".into(), json!(password));
            for (key, value) in [("name", name), ("email", email), ("role", role)] {
                if let Some(value) = value {
                    body.insert(key.into(), json!(value));
                }
            }
            if let Some(age) = age {
                body.insert("age".into(), json!(age));
            }

            client
                .post(format!("{}/add_user", base))
                .json(&Value::Object(body))
                .send()
                .await?
        }
        Commands::GetUser { id } => client.get(format!("{}/get_user/{}", base, id)).send().await?,
        Commands::DeleteUser { id } => {
            client
                .delete(format!("{}/delete_user/{}", base, id))
                .send()
                .await?
        }
        Commands::ListUsers => client.get(format!("{}/get_all_users", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("{}", rendered);
    }
    Ok(())
}
