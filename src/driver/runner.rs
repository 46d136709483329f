use super::LOG_TARGET;
use super::phase::Phase;
use super::progress_driver::SimulatedProgressDriver;
use super::surface::{Control, Surface};
use tokio::sync::mpsc;

/// Requests sent to a running driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Press the start (or restart) control
    Start,

    /// Stop the animation
    Shutdown,
}

/// What happened over the course of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub fill_ticks: u64,
    pub drain_ticks: u64,
}

impl<S: Surface + 'static> SimulatedProgressDriver<S> {
    /// Drive the animation until it is told to stop or runs out of cycles.
    ///
    /// Auto-restarting variants start on their own. The gated variant shows its start
    /// control and waits for [`Command::Start`]; if the command channel closes while it
    /// is idle there is nobody left to press start, so the run ends.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) -> RunSummary {
        self.surface.set_leak_position(self.leak_threshold());
        if self.variant.auto_restarts() {
            let _ = self.start();
        } else {
            self.idle(Control::Start);
        }

        let mut commands_open = true;
        loop {
            if self.cycle_limit_reached() {
                log::debug!(target: LOG_TARGET, "Reached {} completed cycle(s), stopping", self.cycles_completed);
                break;
            }

            if !commands_open && self.phase == Phase::Idle {
                log::debug!(target: LOG_TARGET, "Idle with no way to restart, stopping");
                break;
            }

            tokio::select! {
                kind = self.timer.tick() => self.on_timer(kind),
                command = commands.recv(), if commands_open => match command {
                    Some(Command::Start) => {
                        let _ = self.start();
                    }
                    Some(Command::Shutdown) => {
                        log::debug!(target: LOG_TARGET, "Shutdown requested while {}", self.phase);
                        break;
                    }
                    None => commands_open = false,
                },
            }
        }

        let _ = self.timer.cancel();
        RunSummary {
            cycles: self.cycles_completed,
            fill_ticks: self.fill_ticks,
            drain_ticks: self.drain_ticks,
        }
    }
}
