use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod http;
mod mcp;
mod social;
mod tools;

use config::{FacebookCredentials, LinkedInCredentials, TelegramCredentials};
use http::{ReqwestTransport, Transport};
use mcp::contracts::Platform;
use social::facebook::FacebookClient;
use social::linkedin::LinkedInClient;
use social::telegram::TelegramClient;
use tools::Clients;

const DEFAULT_RECENT_POSTS: usize = 2;

#[derive(Parser)]
#[command(name = "mcp-social")]
#[command(
    version,
    about = "MCP server and CLI for Facebook, Instagram, LinkedIn and Telegram publishing"
)]
struct Cli {
    /// Dotenv file to load before reading credentials (defaults to ./.env when present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Facebook,
    Linkedin,
    Telegram,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Facebook => Platform::Facebook,
            PlatformArg::Linkedin => Platform::LinkedIn,
            PlatformArg::Telegram => Platform::Telegram,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
        /// Platforms to expose (repeatable; all when omitted)
        #[arg(long = "platform", value_enum)]
        platforms: Vec<PlatformArg>,
    },
    /// Invoke one tool with JSON arguments and print the result
    Call {
        /// Tool name, e.g. telegram_send_message
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },
    /// Look up the Instagram business account linked to the Facebook page
    InstagramAccountId,
    /// Show the latest posts of the Facebook page
    RecentPosts {
        /// Number of posts to show
        #[arg(long, default_value_t = DEFAULT_RECENT_POSTS)]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_file = config::load_env_file(cli.env_file.as_deref());
    init_logging();
    env_file.context("failed to load env file")?;

    match cli.command {
        Commands::Serve { stdio, platforms } => {
            if !stdio {
                anyhow::bail!("only --stdio transport is supported");
            }
            let platforms: Vec<Platform> = if platforms.is_empty() {
                Platform::ALL.to_vec()
            } else {
                platforms.into_iter().map(Platform::from).collect()
            };
            let clients = build_clients(&platforms)?;
            run_stdio_server(&clients)
        }
        Commands::Call { tool, arguments } => exit_on_error(run_call(&tool, &arguments)),
        Commands::InstagramAccountId => exit_on_error(run_instagram_account_id()),
        Commands::RecentPosts { count } => exit_on_error(run_recent_posts(count)),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn exit_on_error(result: Result<()>) -> Result<()> {
    if let Err(err) = result {
        eprintln!("{err:#}");
        process::exit(1);
    }
    Ok(())
}

fn transport() -> Result<Arc<dyn Transport>> {
    let timeout = config::http_timeout()?;
    Ok(Arc::new(ReqwestTransport::new(timeout)?))
}

fn facebook_client(transport: Arc<dyn Transport>) -> Result<FacebookClient> {
    let credentials = FacebookCredentials::from_env().context("facebook configuration")?;
    Ok(FacebookClient::new(credentials, transport))
}

fn build_clients(platforms: &[Platform]) -> Result<Clients> {
    let transport = transport()?;
    let mut clients = Clients::default();
    for platform in platforms {
        match platform {
            Platform::Facebook => {
                clients.facebook = Some(facebook_client(transport.clone())?);
            }
            Platform::LinkedIn => {
                let credentials =
                    LinkedInCredentials::from_env().context("linkedin configuration")?;
                clients.linkedin = Some(LinkedInClient::new(credentials, transport.clone()));
            }
            Platform::Telegram => {
                let credentials =
                    TelegramCredentials::from_env().context("telegram configuration")?;
                clients.telegram = Some(TelegramClient::new(credentials, transport.clone()));
            }
        }
    }
    let enabled: Vec<&str> = clients.platforms().iter().map(|p| p.as_str()).collect();
    info!(platforms = ?enabled, "platforms enabled");
    Ok(clients)
}

fn run_call(tool: &str, arguments: &str) -> Result<()> {
    let args: Value =
        serde_json::from_str(arguments).context("arguments must be valid JSON")?;
    let contract = mcp::contracts::find(tool)
        .ok_or_else(|| error::ToolError::UnknownTool(tool.to_string()))?;
    let clients = build_clients(&[contract.platform])?;
    let value = tools::dispatch(tool, &args, &clients)?;
    let output = serde_json::to_string_pretty(&value)?;
    println!("{output}");
    Ok(())
}

fn run_instagram_account_id() -> Result<()> {
    let client = facebook_client(transport()?)?;
    match client.instagram_business_account_id()? {
        Some(id) => {
            println!("Instagram business account id: {id}");
            println!("Set INSTAGRAM_ACCOUNT_ID={id} in your environment or .env file.");
            Ok(())
        }
        None => anyhow::bail!("no Instagram business account is connected to this page"),
    }
}

fn run_recent_posts(count: usize) -> Result<()> {
    let client = facebook_client(transport()?)?;
    let response = client.get_page_posts()?;
    let posts = social::comments::data_items(&response);
    if posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }
    for post in posts.iter().take(count) {
        let field = |name: &str| {
            post.get(name)
                .and_then(|value| value.as_str())
                .unwrap_or("")
                .to_string()
        };
        println!("Post ID: {}", field("id"));
        println!("Created: {}", field("created_time"));
        println!("Message: {}", field("message"));
        println!();
    }
    Ok(())
}

fn run_stdio_server(clients: &Clients) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = stdin.lock().lines();
    let mut writer = io::BufWriter::new(stdout.lock());

    info!("serving MCP over stdio");
    for line in reader {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                debug!(error = %err, "ignoring unparseable line");
                continue;
            }
        };

        let method = request.get("method").and_then(|value| value.as_str());
        let id = request.get("id").cloned();
        let response = match (method, id) {
            (Some("initialize"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-11-25",
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }
            })),
            (Some("ping"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {}
            })),
            (Some("tools/list"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "tools": mcp::tool_definitions(&clients.platforms())
                }
            })),
            (Some("tools/call"), Some(id)) => {
                let result = handle_tool_call(&request, clients);
                Some(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result
                }))
            }
            _ => None,
        };

        if let Some(response) = response {
            let serialized =
                serde_json::to_string(&response).context("failed to serialize response")?;
            writeln!(writer, "{serialized}").context("failed to write response")?;
            writer.flush().context("failed to flush response")?;
        }
    }

    Ok(())
}

fn handle_tool_call(request: &Value, clients: &Clients) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(mcp::errors::INVALID_INPUT, "params must be an object", None);
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(
            mcp::errors::INVALID_INPUT,
            "params.name must be a string",
            None,
        );
    };

    let args = params.get("arguments").cloned().unwrap_or(Value::Null);
    tools::call(name, &args, clients)
}
