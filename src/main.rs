use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use url::Url;

use waitlist_wizard::cli::{self, Command, Flow};
use waitlist_wizard::config::WizardConfig;
use waitlist_wizard::referral::capture_attribution;
use waitlist_wizard::store::{FileStore, KeyValueStore, MemoryStore};
use waitlist_wizard::submit::MockSubmitter;
use waitlist_wizard::wizard::Wizard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the form stays readable on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = WizardConfig::from_env().context("Invalid WAITLIST_* configuration")?;

    let store: Arc<dyn KeyValueStore> = match FileStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(
                dir = %config.data_dir.display(),
                error = %e,
                "Storage unavailable; progress will not survive a restart"
            );
            Arc::new(MemoryStore::new())
        }
    };

    if let Some(arg) = std::env::args().nth(1) {
        let landing = Url::parse(&arg).with_context(|| format!("Invalid landing URL: {arg}"))?;
        let outcome = capture_attribution(store.as_ref(), &landing);
        if let Some(cleaned) = outcome.cleaned_url {
            println!("Location: {cleaned}");
        }
    }

    let submitter = Arc::new(MockSubmitter::new(config.submit_delay));
    let mut wizard = Wizard::new(config, store, submitter);

    eprintln!("Talent Wharf waitlist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Type `help` for commands, `quit` to exit.\n");
    print!("{}", cli::render_status(&wizard));
    eprint!("> ");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => match cli::execute(&mut wizard, command).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue(Some(message))) => println!("{message}"),
                Ok(Flow::Continue(None)) => {}
                Err(e) => println!("! {e}"),
            },
            Err(e) => println!("! {e}"),
        }
        print!("{}", cli::render_status(&wizard));
        eprint!("> ");
    }

    Ok(())
}
