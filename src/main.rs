// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so it never mixes with the page on stdout)
// 3. Load the configuration and apply the command-line overrides
// 4. Open the page the subcommand names
// 5. Interactive: hand over to the shell. Otherwise apply --pages and
//    --action, then print the page once
// 6. Exit with proper code (0 = clean page, 1 = page shows an error,
//    2 = internal error)
//
// Rust concepts used:
// - async/await: every page load is a sequence of HTTP requests
// - Box<dyn Page>: the four pages behind one trait
// - Result<T, E> and ?: errors bubble up to main and become exit code 2
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - defaults, config file, overrides
mod github; // src/github/ - API client, fetch helper, response types
mod pages; // src/pages/ - the profile, repo, commits and blob pages
mod route; // src/route.rs - links between pages
mod shell; // src/shell.rs - interactive mode
mod view; // src/view/ - document model and terminal rendering

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::{Config, Overrides};
use pages::Session;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use view::{render, Document, RenderOptions};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = the page rendered without error messages
//   Ok(1) = the page shows an error (e.g. unknown user, repo not found)
//   Err   = something broke before a page could be shown
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()
        .and_then(|config| {
            config.apply(Overrides {
                api_url: cli.api_url.clone(),
                per_page: cli.per_page,
                no_color: cli.no_color,
            })
        })
        .context("invalid configuration")?;
    debug!(?config, "configuration loaded");

    let options = RenderOptions {
        color: config.color,
        show_targets: !cli.interactive,
    };
    let session = Session::new(config).context("failed to set up the HTTP client")?;
    let route = cli.command.route(&session.fetcher)?;
    info!(route = %route, "starting");

    if cli.interactive {
        let page = shell::run(&session, route, options).await?;
        session.clipboard.finish();
        return Ok(exit_code(page.document()));
    }

    let mut page = pages::open(&route, &session).await;

    for _ in 0..cli.command.extra_pages() {
        if !page.load_more(&session).await {
            break;
        }
    }

    for n in &cli.actions {
        let actions = render(page.document(), &options).actions;
        if let Some(next) = shell::press(page.as_mut(), &session, &actions, *n).await? {
            page = pages::open(&next, &session).await;
        }
    }

    println!("{}", render(page.document(), &options).text);
    session.clipboard.finish();

    Ok(exit_code(page.document()))
}

// RUST_LOG wins; otherwise -v / -vv raise the level from the default "warn"
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let default_filter = format!("gh_glance={}", level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn exit_code(doc: &Document) -> i32 {
    let mut failed = false;
    for message in doc.failures() {
        debug!(id = %message.id, text = %message.text, "page shows a failure");
        failed = true;
    }
    if failed {
        1
    } else {
        0
    }
}
