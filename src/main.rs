use clap::Parser;
use sitepass::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr; RUST_LOG overrides the default level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sitepass=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::New { copy } => sitepass::cli::commands::new::execute(&cli, copy),
        Commands::Show {
            ref site,
            alphabet,
            copy,
        } => sitepass::cli::commands::show::execute(&cli, site, alphabet, copy),
        Commands::List { json } => sitepass::cli::commands::list::execute(&cli, json),
        Commands::Check => sitepass::cli::commands::check::execute(&cli),
        #[cfg(feature = "audit-log")]
        Commands::History { last, ref since } => {
            sitepass::cli::commands::history::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => sitepass::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        sitepass::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
