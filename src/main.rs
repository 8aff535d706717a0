use clap::Parser;
use miette::Result;
use snippets::cli::{Cli, Commands};
use snippets::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let printer = Printer::new();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Expand(args) => snippets::cli::expand::run(args, config, &printer)?,
        Commands::Check(args) => snippets::cli::check::run(args, config, &printer)?,
        Commands::List(args) => snippets::cli::list::run(args, config, &printer)?,
        Commands::Parse(args) => snippets::cli::parse::run(args)?,
        Commands::Init(args) => snippets::cli::init::run(args, &printer)?,
        Commands::Completions(args) => snippets::cli::completions::run(args)?,
    }

    Ok(())
}
