use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use destinations_chat::app::App;
use destinations_chat::state::EntryKind;
use destinations_chat::tui::{self, EventHandler, Tui};
use destinations_chat::{handler, logging, ui, ChatClient, ChatController, Config};

#[derive(Parser)]
#[command(name = "destinations-chat")]
#[command(version, about = "Ask the destinations assistant from your terminal")]
struct Cli {
    /// Endpoint URL (overrides the saved configuration)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// Your question
        question: String,
    },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the configuration file location and resolved endpoint
    Show,
    /// Save the endpoint URL used when --endpoint is not given
    SetEndpoint { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Chat);

    // Logging first so a bad config file is reported
    match command {
        Commands::Chat => logging::init_file(&Config::get_config_dir()?.join("chat.log"))?,
        Commands::Ask { .. } | Commands::Config { .. } => logging::init_stderr(),
    }

    let config = Config::load_or_default();
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());

    match command {
        Commands::Chat => {
            tracing::info!(%endpoint, "starting chat");
            run_chat(ChatClient::new(&endpoint)).await
        }
        Commands::Ask { question } => ask_once(ChatClient::new(&endpoint), &question).await,
        Commands::Config { action } => match action {
            ConfigCommands::Show => {
                println!("config file: {}", Config::get_config_path()?.display());
                println!("endpoint:    {}", endpoint);
                Ok(())
            }
            ConfigCommands::SetEndpoint { url } => {
                Config::save_endpoint(&url)?;
                println!("endpoint saved: {}", url);
                Ok(())
            }
        },
    }
}

async fn run_chat(client: ChatClient) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(client);
    let mut events = EventHandler::new();

    let result = event_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn event_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await,
            None => break,
        }
    }
    Ok(())
}

async fn ask_once(client: ChatClient, question: &str) -> Result<()> {
    let mut chat = ChatController::new();
    chat.input = question.to_string();

    if !chat.submit(&client).await {
        return Err(anyhow!("question is empty"));
    }

    for entry in chat.view.entries() {
        match entry.kind {
            EntryKind::Assistant | EntryKind::Info => println!("{}", entry.text),
            EntryKind::Error => return Err(anyhow!("{}", entry.text)),
            EntryKind::User | EntryKind::Thinking => {}
        }
    }
    Ok(())
}
