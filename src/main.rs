mod assistant;
mod common;
mod config;
mod protocol;
mod ui;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;

use common::Peer;
use protocol::{BroadcastBus, ChatSession};
use ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "rust_broadcast_chat",
    version,
    about = "Serverless chat room over an in-process broadcast medium"
)]
struct Cli {
    /// Display name shown to other peers
    #[arg(long)]
    name: Option<String>,
    /// Broadcast channel (room) to join
    #[arg(long)]
    channel: Option<String>,
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Spawn the generative assistant peer on the same channel
    #[arg(long)]
    assistant: bool,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(channel) = cli.channel {
        app_config.channel_id = channel;
    }

    let display_name = cli
        .name
        .or(app_config.display_name.clone())
        .unwrap_or_else(|| "guest".to_string());
    config::persist_display_name(&cli.config, &display_name);

    // Identity cấp một lần cho mỗi phiên; id là chuỗi opaque
    let user = Peer::new(display_name);
    let bus = BroadcastBus::open(&app_config.channel_id);

    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Session
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Session -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy phiên giao thức (Chạy ngầm)
    let session = ChatSession::new(user.clone(), &bus, event_tx, cmd_rx);
    tokio::spawn(async move {
        if let Err(err) = session.run().await {
            log::error!("Chat session terminated: {err}");
        }
    });

    // Peer trợ lý là một phiên độc lập trên cùng medium
    if cli.assistant {
        assistant::spawn(&bus, app_config.assistant_model.clone());
    }

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let channel_id = app_config.channel_id.clone();

    eframe::run_native(
        "Broadcast Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!("Client started on channel `{channel_id}`");

            Ok(Box::new(ChatApp::new(
                cc,
                user.clone(),
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}
