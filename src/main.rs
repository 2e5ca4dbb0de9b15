use clap::Parser;
use faqchat::core::config::{self, CliOverrides};
use faqchat::core::state::StaleReplies;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faqchat", about = "Terminal chat client for a FAQ help desk")]
struct Args {
    /// Help desk server, e.g. http://localhost:3000
    #[arg(short, long)]
    base_url: Option<String>,

    /// File holding the persisted session id
    #[arg(short, long)]
    storage: Option<PathBuf>,

    /// What to do with replies that arrive after a newer one
    #[arg(long, value_enum)]
    stale_replies: Option<StaleReplies>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to faqchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("faqchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable config: {}", e);
        config::FaqChatConfig::default()
    });
    let cli = CliOverrides {
        base_url: args.base_url,
        storage: args.storage,
        stale_replies: args.stale_replies,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "faqchat starting up against {} (storage: {})",
        resolved.base_url,
        resolved.storage_path.display()
    );

    faqchat::tui::run(resolved)
}
