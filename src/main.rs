use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;

pub use cli::*;
pub use commands::*;
pub use domain::constants::*;
pub use domain::models::*;
pub use services::branch::*;
pub use services::identity::*;
pub use services::logging::*;
pub use services::output::*;
pub use services::propagate::*;
pub use services::release::*;
pub use services::rewrite::*;
pub use services::settings::*;
pub use services::setup::*;
pub use services::storage::*;
pub use services::templates::*;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = load_settings(&cli.root, cli.config.as_deref())?;

    if handle_project_commands(&cli, &settings)? {
        return Ok(());
    }
    if handle_release_commands(&cli, &settings)? {
        return Ok(());
    }
    handle_runtime_commands(&cli, &settings)
}
