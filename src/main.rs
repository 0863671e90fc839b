mod assessment;
mod browser;
mod cli;
mod config;
mod core;
mod csrf;
mod headers;
mod http;
mod injection;
mod payload;
mod reporting;
mod sqli;
mod submit;
mod xss;

use clap::{CommandFactory, Parser};
use cli::args::Cli;
use core::context::Context;
use core::engine::Engine;
use std::env;
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
 ╔════════════════════════════════════════════════════════════════════╗
 ║                                                                    ║
 ║    ███████╗ ██████╗ ██████╗ ███╗   ███╗                            ║
 ║    ██╔════╝██╔═══██╗██╔══██╗████╗ ████║                            ║
 ║    █████╗  ██║   ██║██████╔╝██╔████╔██║                            ║
 ║    ██╔══╝  ██║   ██║██╔══██╗██║╚██╔╝██║                            ║
 ║    ██║     ╚██████╔╝██║  ██║██║ ╚═╝ ██║   M O N K E Y              ║
 ║    ╚═╝      ╚═════╝ ╚═╝  ╚═╝╚═╝     ╚═╝                            ║
 ║                                                                    ║
 ║    Browser-driven web form submission and security testing        ║
 ║                                                                    ║
 ╚════════════════════════════════════════════════════════════════════╝
"#;

fn print_banner() {
    println!("\x1b[36m{}\x1b[0m", BANNER);
    println!("    Version {}\n", env!("CARGO_PKG_VERSION"));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let show_help = args.iter().any(|a| a == "--help" || a == "-h");
    let show_version = args.iter().any(|a| a == "--version" || a == "-V");
    let no_banner = args.iter().any(|a| a == "--no-banner");

    // Banner goes in front of help/version output unless --no-banner
    if (show_help || show_version) && !no_banner {
        print_banner();

        if show_version && !show_help {
            return Ok(());
        }

        if show_help {
            Cli::command().print_long_help()?;
            println!();
            return Ok(());
        }
    }

    let cli = Cli::parse();

    if !cli.no_banner && !cli.quiet {
        print_banner();
    }

    let ctx = Context::from_cli(&cli)?;

    // RUST_LOG wins over the configured verbosity
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(ctx.verbosity.filter_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    ctx.interrupt.watch_ctrl_c();

    let engine = Engine::new(ctx)?;
    engine.run().await?;

    Ok(())
}
