use super::Host;
use super::common::{ColorMode, LogLevel, init_logging};
use super::config::Config;
use super::terminal_surface::TerminalSurface;
use crate::Result;
use crate::driver::{Command, SimulatedProgressDriver, Variant};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use ohno::IntoAppError;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

const LOG_TARGET: &str = "   animate";

#[derive(Args, Debug)]
pub struct AnimateArgs {
    /// Which animation to run (overrides the configuration file)
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<Variant>,

    /// Stop after this many leak cycles (0 runs forever)
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pub cycles: u64,

    /// Seed for the random number generator, for a reproducible animation
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to configuration file (default is `pipeleak.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Run the animation until it runs out of cycles or is told to quit.
pub async fn animate<H: Host>(host: &mut H, args: &AnimateArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let variant = args.variant.unwrap_or(config.variant);

    let surface = Arc::new(TerminalSurface::new(args.color.use_colors()));
    let mut driver = SimulatedProgressDriver::new(Arc::clone(&surface), config.settings(), variant, args.seed)
        .with_cycle_limit(args.cycles);

    let (commands, receiver) = mpsc::channel(8);
    if !variant.auto_restarts() {
        // Blocking reads can't be interrupted, so the reader thread is left detached and
        // dies with the process once the run is over.
        let commands = commands.clone();
        let _ = thread::Builder::new()
            .name("pipeleak-controls".into())
            .spawn(move || read_controls(std::io::stdin().lock(), &commands))
            .into_app_err("spawning the control reader")?;
    }
    drop(commands);

    let summary = driver.run(receiver).await;
    surface.finish();

    log::debug!(
        target: LOG_TARGET,
        "Run finished after {} fill tick(s) and {} drain tick(s)",
        summary.fill_ticks,
        summary.drain_ticks
    );
    let _ = writeln!(host.output(), "Completed {} leak cycle(s)", summary.cycles);
    Ok(())
}

/// Turn typed lines into start and shutdown commands until the input ends.
///
/// `q` quits, any other line (including an empty one) presses start. Returning drops
/// the sender, which closes the channel once nobody else holds it.
fn read_controls(input: impl BufRead, commands: &mpsc::Sender<Command>) {
    for line in input.lines() {
        let command = match line {
            Ok(line) if line.trim().eq_ignore_ascii_case("q") => Command::Shutdown,
            Ok(_) => Command::Start,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Unable to read controls from stdin: {e:#}");
                break;
            }
        };

        if commands.blocking_send(command).is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn controls_for(input: &str) -> Vec<Command> {
        let (tx, mut rx) = mpsc::channel(16);
        read_controls(Cursor::new(input.to_owned()), &tx);
        drop(tx);

        let mut received = Vec::new();
        while let Some(command) = rx.blocking_recv() {
            received.push(command);
        }
        received
    }

    #[test]
    fn test_any_line_presses_start() {
        assert_eq!(controls_for("\ngo\n  \n"), [Command::Start, Command::Start, Command::Start]);
    }

    #[test]
    fn test_q_quits() {
        assert_eq!(controls_for("q\n Q \n"), [Command::Shutdown, Command::Shutdown]);
        assert_eq!(controls_for("\nq\n"), [Command::Start, Command::Shutdown]);
    }

    #[test]
    fn test_end_of_input_closes_channel() {
        assert!(controls_for("").is_empty());

        let (tx, mut rx) = mpsc::channel(4);
        let handle = thread::spawn(move || read_controls(Cursor::new("\n"), &tx));
        handle.join().unwrap();

        assert_eq!(rx.blocking_recv(), Some(Command::Start));
        assert_eq!(rx.blocking_recv(), None, "the sender is gone once the input is exhausted");
    }

    #[test]
    fn test_stops_when_driver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        read_controls(Cursor::new("\n\n\n"), &tx);
        assert!(tx.is_closed());
    }
}
