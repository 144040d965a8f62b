use anyhow::Result;
use clap::Parser;
use vid2pdf::cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        // The only place failures are printed; logging may not be
        // initialized yet when dispatch fails (e.g. a bad config file).
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
