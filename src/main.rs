use clap::Parser;
use garagelayout::cli::{run, Cli};
use garagelayout::init_logging;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    tracing::debug!("garagelayout {} built {}", garagelayout::VERSION, garagelayout::BUILD_DATE);
    let output = run(cli)?;
    println!("{output}");

    Ok(())
}
