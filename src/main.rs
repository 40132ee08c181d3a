use clap::{Parser, Subcommand};
use std::sync::Arc;

use repbot::application::messaging::{MessageHandler, MessageParser, Reply};
use repbot::application::repositories::{SessionRepository, StatsAggregator, UserRepository};
use repbot::application::services::{UserService, WorkoutService};
use repbot::domain::entities::Sender;
use repbot::domain::traits::{Bot, Cache, Store};
use repbot::infrastructure::adapters::console::ConsoleAdapter;
use repbot::infrastructure::adapters::telegram::TelegramAdapter;
use repbot::infrastructure::cache::MemoryCache;
use repbot::infrastructure::config::Config;
use repbot::infrastructure::database::SqliteStore;

#[derive(Parser)]
#[command(name = "repbot")]
#[command(about = "A pushup tracking bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("repbot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

/// Everything a message loop needs to process one incoming message
struct BotContext {
    parser: MessageParser,
    handler: MessageHandler,
}

impl BotContext {
    async fn reply_to(&self, chat_id: &str, text: &str, sender: Option<Sender>) -> Reply {
        let message = self.parser.parse(chat_id, text, sender);
        self.handler.handle(&message).await
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {}: {}, using env config", config_path, e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting {}", config.bot.name);

    // Durable store and cache
    let store: Arc<dyn Store> = match SqliteStore::new(&config.storage.database) {
        Ok(store) => {
            tracing::info!("Database initialized: {}", config.storage.database.display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            return;
        }
    };
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());

    // Repositories and services
    let user_repo = Arc::new(UserRepository::new(Arc::clone(&store), Arc::clone(&cache)));
    let session_repo = Arc::new(SessionRepository::new(Arc::clone(&store), Arc::clone(&cache)));
    let aggregator = Arc::new(StatsAggregator::new(Arc::clone(&store)));

    let users = Arc::new(UserService::new(user_repo));
    let workouts = Arc::new(WorkoutService::new(session_repo, aggregator));

    let context = BotContext {
        parser: MessageParser::new(config.bot.prefix.as_str()),
        handler: MessageHandler::new(users, workouts),
    };

    let rt = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");

    if let Some(token) = token_override.or_else(|| config.telegram_token()) {
        let poll_timeout = config
            .adapters
            .telegram
            .as_ref()
            .and_then(|t| t.poll_timeout)
            .unwrap_or(30);
        rt.block_on(async {
            let mut bot = TelegramAdapter::new(token);
            run_telegram_bot(&mut bot, &context, poll_timeout).await;
        });
    } else {
        // Run console bot (dev mode)
        rt.block_on(async {
            let bot = ConsoleAdapter::new();
            run_console_bot(bot, &context).await;
        });
    }
}

async fn run_telegram_bot(bot: &mut TelegramAdapter, context: &BotContext, poll_timeout: i64) {
    if let Err(e) = bot.fetch_bot_info().await {
        tracing::error!("Failed to fetch bot info: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    if let Err(e) = bot.register_commands().await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, poll_timeout).await {
            Ok(updates) => {
                for update in &updates {
                    let Some(msg) = &update.message else { continue };
                    let Some(text) = &msg.text else { continue };

                    let chat_id = msg.chat.id.to_string();
                    let sender = msg.from.as_ref().map(|from| Sender {
                        platform_id: from.id,
                        username: from.username.clone(),
                        first_name: from.first_name.clone(),
                    });

                    let reply = context.reply_to(&chat_id, text, sender).await;
                    let sent = match reply.keyboard {
                        Some(keyboard) => {
                            bot.send_with_keyboard(&chat_id, &reply.text, keyboard).await
                        }
                        None => bot.send_message(&chat_id, &reply.text).await,
                    };
                    if let Err(e) = sent {
                        tracing::error!("Failed to send reply: {}", e);
                    }
                }
                if !updates.is_empty() {
                    offset = TelegramAdapter::get_next_offset(&updates);
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(bot: ConsoleAdapter, context: &BotContext) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start console bot: {}", e);
        return;
    }
    println!("Console mode. Type /start to begin, Ctrl-D to quit.");

    // Fixed identity for the local dev user
    let sender = Sender {
        platform_id: 1,
        username: Some("console".to_string()),
        first_name: Some("Console".to_string()),
    };

    loop {
        let Some(line) = bot.read_line("> ").await else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let reply = context.reply_to("console", &line, Some(sender.clone())).await;
        let sent = match reply.keyboard {
            Some(keyboard) => bot.send_with_keyboard("console", &reply.text, keyboard).await,
            None => bot.send_message("console", &reply.text).await,
        };
        if let Err(e) = sent {
            tracing::error!("Failed to print reply: {}", e);
        }
    }
}

fn init_config() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).expect("default config always serializes");
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
}
