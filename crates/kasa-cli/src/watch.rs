use std::io;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use chrono::Local;
use kasa_client::commands::watch::RefreshPoller;
use kasa_client::contracts::envelope::success;
use kasa_client::{ClientResult, Ledger};

use crate::output::{self, OutputMode};

/// Runs the refresh loop until interrupted, for `count` checks, or until the
/// reader of stdout goes away.
///
/// Each check queries the ledger on a fresh connection, so entries added from
/// another process show up on the next tick. A closed stdout is only noticed
/// when a changed snapshot is written.
pub fn run(interval: Duration, count: Option<u64>, mode: OutputMode) -> Result<ExitCode, ExitCode> {
    let mut poller = match Ledger::open(None) {
        Ok(ledger) => RefreshPoller::new(ledger),
        Err(error) => return Err(report_failure(&error, mode)),
    };

    let mut checks = 0_u64;
    loop {
        match tick(&mut poller, mode) {
            Ok(Tick::Continue) => {}
            Ok(Tick::ReaderGone) => return Ok(ExitCode::SUCCESS),
            Ok(Tick::OutputFailed) => return Err(ExitCode::from(2)),
            Err(error) => return Err(report_failure(&error, mode)),
        }

        checks += 1;
        if count.is_some_and(|limit| checks >= limit) {
            return Ok(ExitCode::SUCCESS);
        }
        thread::sleep(interval);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Continue,
    ReaderGone,
    OutputFailed,
}

fn tick(poller: &mut RefreshPoller, mode: OutputMode) -> ClientResult<Tick> {
    let Some(snapshot) = poller.poll()? else {
        return Ok(Tick::Continue);
    };

    let envelope = success("watch", snapshot)?;
    let refreshed_at = Local::now().format("%H:%M:%S").to_string();
    Ok(classify_output(output::print_watch_snapshot(
        &envelope,
        mode,
        &refreshed_at,
    )))
}

fn classify_output(result: io::Result<()>) -> Tick {
    match result {
        Ok(()) => Tick::Continue,
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed, stopping watch");
            Tick::ReaderGone
        }
        Err(error) => {
            tracing::warn!(%error, "could not write refresh to stdout");
            Tick::OutputFailed
        }
    }
}

fn report_failure(error: &kasa_client::ClientError, mode: OutputMode) -> ExitCode {
    if output::print_failure(error, mode).is_err() {
        return ExitCode::from(2);
    }
    crate::exit_code_for_error(error)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{Tick, classify_output};

    #[test]
    fn closed_stdout_ends_the_loop_cleanly() {
        let closed = Err(io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(classify_output(closed), Tick::ReaderGone);
    }

    #[test]
    fn other_output_failures_stop_with_an_error() {
        assert_eq!(classify_output(Ok(())), Tick::Continue);
        let full = Err(io::Error::other("no space left"));
        assert_eq!(classify_output(full), Tick::OutputFailed);
    }
}
