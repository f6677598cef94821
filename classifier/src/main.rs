use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::error;

mod cli;
mod logging;

use cli::Dispatcher;
use cli::commands;

fn main() -> Result<ExitCode> {
    let argv: Vec<String> = env::args().skip(1).collect();
    let dispatcher = Dispatcher::new(commands::registry()?);

    let code = match dispatcher.run(argv) {
        Ok(code) => code,
        Err(e) => {
            if logging::is_active() {
                error!("{e:#}");
            } else {
                eprintln!("Error: {e:#}");
            }
            1
        }
    };
    logging::shutdown()?;

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
