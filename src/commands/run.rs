//! Command dispatch logic for pipeleak

use super::{AnimateArgs, InitArgs, ValidateArgs, animate, init_config, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "pipeleak", author, version, long_about = None, display_name = "pipeleak")]
#[command(about = "A decorative progress bar that fills, springs a leak, drains, and gets patched")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: PipeleakSubcommand,
}

#[derive(Subcommand, Debug)]
enum PipeleakSubcommand {
    /// Run the leaking progress bar animation
    Animate(Box<AnimateArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);

    match &cli.command {
        PipeleakSubcommand::Animate(animate_args) => animate(host, animate_args).await,
        PipeleakSubcommand::Init(init_args) => init_config(host, init_args),
        PipeleakSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}
