use clap::{Parser, Subcommand};

use fetchbot::application::messaging::{MessageParser, Reply, Router};
use fetchbot::domain::entities::User;
use fetchbot::domain::traits::{Bot, FailureLog};
use fetchbot::domain::traits::audit::NullFailureLog;
use fetchbot::infrastructure::adapters::console::ConsoleAdapter;
use fetchbot::infrastructure::adapters::telegram::TelegramAdapter;
use fetchbot::infrastructure::audit::FileFailureLog;
use fetchbot::infrastructure::config::Config;
use fetchbot::infrastructure::dogapi::DogApiClient;

#[derive(Parser)]
#[command(name = "fetchbot")]
#[command(about = "A Telegram bot serving dog pictures", long_about = None)]
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
            println!("fetchbot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new().expect("failed to build tokio runtime");
    rt.block_on(async {
        let proxy = config.network.proxy.as_deref();

        let api = match DogApiClient::new(&config.dog_api.base_url, proxy) {
            Ok(api) => api,
            Err(e) => {
                tracing::error!("Failed to build dog API client: {}", e);
                std::process::exit(1);
            }
        };

        // The catalog load happens once, before any message is accepted.
        // The bot cannot serve without it, so a failure here is fatal.
        let catalog = match api.load_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Failed to load breed catalog: {}", e);
                std::process::exit(1);
            }
        };

        let failure_log: Box<dyn FailureLog> = if config.audit.enabled {
            match FileFailureLog::new(&config.audit.path) {
                Ok(log) => Box::new(log),
                Err(e) => {
                    tracing::warn!("Audit log unavailable: {}, failures go unrecorded", e);
                    Box::new(NullFailureLog)
                }
            }
        } else {
            Box::new(NullFailureLog)
        };

        let mut router = Router::new(catalog, api, failure_log);
        let parser = MessageParser::new(&config.bot.prefix);

        if let Some(token) = config.telegram_token(token_override) {
            match TelegramAdapter::new(token, proxy) {
                Ok(mut bot) => run_telegram_bot(&mut bot, &mut router, &parser).await,
                Err(e) => {
                    tracing::error!("Failed to build Telegram adapter: {}", e);
                    std::process::exit(1);
                }
            }
        } else {
            // No token configured, run in dev mode on stdin.
            let bot = ConsoleAdapter::new();
            run_console_bot(bot, &mut router, &parser).await;
        }
    });
}

async fn run_telegram_bot(
    bot: &mut TelegramAdapter,
    router: &mut Router<DogApiClient>,
    parser: &MessageParser,
) {
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
    let timeout_seconds = 30;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                for update in &updates {
                    let Some(msg) = &update.message else {
                        continue;
                    };
                    let chat_id = msg.chat.id.to_string();
                    let Some(text) = msg.text.as_deref() else {
                        continue;
                    };
                    if text.is_empty() {
                        continue;
                    }

                    let sender = msg.from.as_ref().map(|u| {
                        let mut user = User::new(u.id.to_string());
                        if let Some(ref username) = u.username {
                            user = user.with_username(username.clone());
                        }
                        if let Some(ref first) = u.first_name {
                            user = user.with_first_name(first.clone());
                        }
                        user
                    });

                    let message = parser
                        .parse(&chat_id, text, sender)
                        .with_platform("telegram");
                    let reply = router.handle(&message).await;
                    relay(bot, &chat_id, reply).await;
                }

                if !updates.is_empty() {
                    offset = TelegramAdapter::get_next_offset(&updates);
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(
    bot: ConsoleAdapter,
    router: &mut Router<DogApiClient>,
    parser: &MessageParser,
) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    loop {
        let Some(input) = bot.read_line("> ") else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        let message = parser.parse("console", input, None).with_platform("console");
        let reply = router.handle(&message).await;
        relay(&bot, "console", reply).await;
    }
}

async fn relay<B: Bot>(bot: &B, chat_id: &str, reply: Reply) {
    let result = match reply {
        Reply::None => return,
        Reply::Text(text) => bot.send_message(chat_id, &text).await,
        Reply::Photo(url) => bot.send_photo(chat_id, &url).await,
        Reply::Keyboard { text, rows } => bot.send_with_keyboard(chat_id, &text, rows).await,
    };

    if let Err(e) = result {
        tracing::error!("Failed to send reply to {}: {}", chat_id, e);
    }
}

fn init_config() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).expect("default config serializes");
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
}
