// src/bin/cli.rs
use cara_cracha::cli;

fn main() -> color_eyre::Result<()> {
    cli::run()
}
