use std::sync::Arc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kbtree::adapters::{FileSessionProvider, ReqwestHttpClient, StaticSession};
use kbtree::cli::{
    configure, handle_version_command, parse_args, print_notices, run_command, CliCommand, USAGE,
};
use kbtree::config::ManagerConfig;
use kbtree::manager::KnowledgeBaseManager;
use kbtree::notifications::NoticeLevel;
use kbtree::traits::SessionProvider;

/// Log filter used when `KBTREE_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KBTREE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let command = parse_args(std::env::args());
    match &command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Invalid(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
        _ => {}
    }

    color_eyre::install()?;
    init_tracing();

    let config = configure(&command, ManagerConfig::from_env());
    tracing::debug!("Using knowledge base at {}", config.base_url);

    let session: Arc<dyn SessionProvider> = match &config.token {
        Some(token) => Arc::new(StaticSession::new(token.clone())),
        None => Arc::new(
            FileSessionProvider::new()
                .ok_or_else(|| eyre!("Could not determine home directory; set KBTREE_TOKEN"))?,
        ),
    };
    let manager =
        KnowledgeBaseManager::with_adapters(config, Arc::new(ReqwestHttpClient::new()), session);

    let result = run_command(&manager, command).await;
    let notices = manager.notifier().take_history();
    print_notices(&notices);

    if let Err(e) = result {
        // Failures already shown as a notice are not repeated
        if !notices.iter().any(|n| n.level == NoticeLevel::Error) {
            eprintln!("Error: {}", e.user_message());
        }
        std::process::exit(1);
    }
    Ok(())
}
