use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio::time::Duration;

mod application;
mod domain;
mod infrastructure;

use application::dispatch::Dispatcher;
use application::services::ServiceRegistry;
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::adapters::mirai::MiraiAdapter;
use infrastructure::config::Config;
use infrastructure::scheduler::ScheduleSignal;

#[derive(Parser)]
#[command(name = "relay-bot")]
#[command(about = "A group chat relay bot with scheduled service windows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
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
            run_bot(cli.config);
        }
        Commands::Version => {
            println!("relay-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting relay-bot: {}", config.bot.name);
    if config.admins.is_empty() {
        tracing::warn!("No admin ids configured, admin commands will be ignored");
    }

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        // Scheduled triggers report back into the event loop over this channel
        let (schedule_tx, schedule_rx) = mpsc::channel(8);
        let registry = ServiceRegistry::standard(&config.admins, &config.chat, schedule_tx);
        let dispatcher = Dispatcher::new(registry);

        if let Some(mirai) = config.adapters.mirai.clone() {
            let mut adapter =
                MiraiAdapter::new(mirai.base_url, mirai.verify_key, mirai.qq, mirai.groups);
            if let Err(e) = adapter.connect().await {
                tracing::error!("Failed to connect to mirai: {}", e);
                return;
            }
            run_mirai_bot(adapter, dispatcher, schedule_rx).await;
        } else {
            // Console bot (dev mode)
            let admin = config.admins.first().copied().unwrap_or(0);
            run_console_bot(ConsoleAdapter::new(admin), dispatcher, schedule_rx).await;
        }
    });
}

async fn run_mirai_bot(
    adapter: MiraiAdapter,
    mut dispatcher: Dispatcher,
    mut schedule_rx: mpsc::Receiver<ScheduleSignal>,
) {
    tracing::info!("Starting message loop...");

    loop {
        // Apply any triggers that fired since the last poll
        while let Ok(signal) = schedule_rx.try_recv() {
            apply_signal(&mut dispatcher, signal);
        }

        match adapter.fetch_events(10).await {
            Ok(events) => {
                for event in &events {
                    dispatcher.dispatch(event, &adapter).await;
                }
                if events.is_empty() {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch messages: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(
    adapter: ConsoleAdapter,
    mut dispatcher: Dispatcher,
    mut schedule_rx: mpsc::Receiver<ScheduleSignal>,
) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    tracing::info!("Starting console bot (dev mode)");
    println!("Type a line to chat as friend; prefix with 'g ' for a group message.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(signal) = schedule_rx.recv() => {
                apply_signal(&mut dispatcher, signal);
            }
            line = lines.next_line() => match line {
                Ok(Some(input)) => {
                    if let Some(event) = adapter.parse_line(&input) {
                        dispatcher.dispatch(&event, &adapter).await;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("stdin error: {}", e);
                    break;
                }
            }
        }
    }
}

fn apply_signal(dispatcher: &mut Dispatcher, signal: ScheduleSignal) {
    match signal {
        ScheduleSignal::Open => {
            tracing::info!("Scheduled window start, opening all services");
            dispatcher.registry_mut().open_all();
        }
        ScheduleSignal::Close => {
            tracing::info!("Scheduled window end, closing all services");
            dispatcher.registry_mut().close_all();
        }
    }
}

fn init_config() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
}
