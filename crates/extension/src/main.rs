use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quick_listicle_core::{
    extract_domain,
    listing::{render_text, ListingView},
};
use quick_listicle_extension::{
    MessageKind, Popup, ProvidedTab, SiteApiClient, DEFAULT_API_URL,
};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "quick-listicle",
    about = "Save the current site to your Quick Listicle and browse the list",
    version,
    long_about = None
)]
struct Args {
    /// Sites API endpoint
    #[arg(long, global = true, env = "QUICK_LISTICLE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: Url,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the domain that would be saved for a URL
    Extract {
        /// URL of the active tab
        url: String,
    },
    /// Save the domain of a URL
    Save {
        /// URL of the active tab
        url: String,
    },
    /// Fetch and print every saved site
    List,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbose);
    tracing::debug!(api_url = %args.api_url, "using sites api");

    match args.command {
        Command::Extract { url } => match extract_domain(&url) {
            Ok(domain) => {
                println!("{domain}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("❌ Cannot parse this URL: {err}");
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Save { url } => {
            let api = SiteApiClient::new(args.api_url, reqwest::Client::builder().build()?);
            let mut popup = Popup::new();
            popup.init(&ProvidedTab::new(url));
            println!("{}", popup.domain_label());

            let saved = popup.save(&api).await;
            if let Some(message) = popup.message() {
                match message.kind {
                    MessageKind::Success => println!("{}", message.text),
                    MessageKind::Error => eprintln!("{}", message.text),
                }
            }
            Ok(if saved {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::List => {
            let api = SiteApiClient::new(args.api_url, reqwest::Client::builder().build()?);
            print!("{}", render_text(&ListingView::Loading));
            let view = ListingView::from_outcome(api.list_sites().await);
            print!("{}", render_text(&view));
            Ok(match view {
                ListingView::Error { .. } => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
    }
}
