pub mod console;

pub use console::ConsolePresenter;

use crate::display;
use crate::errors::PresenterError;
use crate::models::{PipelineSnapshot, RankedEntry};
use crate::scheduler::SchedulerHandle;
use std::sync::Arc;
use tokio::process::Command;
use tokio::task::JoinHandle;

/// The UI side. Gets every published snapshot and reacts to the user
/// picking an entry.
pub trait Presenter: Send + Sync {
    fn render(&self, snapshot: &PipelineSnapshot);

    fn on_select(&self, entry: &RankedEntry) -> Result<(), PresenterError>;
}

/// Calls `render` with the current snapshot and again whenever the
/// snapshot or the status title changes, until the scheduler goes away.
pub fn spawn_render_loop(presenter: Arc<dyn Presenter>, handle: &SchedulerHandle) -> JoinHandle<()> {
    let mut snapshots = handle.subscribe();
    let mut states = handle.subscribe_state();

    tokio::spawn(async move {
        let mut shown: Option<(Arc<PipelineSnapshot>, String)> = None;

        loop {
            let snapshot = Arc::clone(&snapshots.borrow_and_update());
            let state = *states.borrow_and_update();
            let title = display::status_title(&snapshot, state);

            let outdated = match &shown {
                Some((s, t)) => !Arc::ptr_eq(s, &snapshot) || *t != title,
                None => true,
            };
            if outdated {
                presenter.render(&snapshot);
                shown = Some((snapshot, title));
            }

            let closed = tokio::select! {
                r = snapshots.changed() => r.is_err(),
                r = states.changed() => r.is_err(),
            };
            if closed {
                break;
            }
        }
    })
}

/// Opens `url` in the default browser. Returns once the opener has been
/// started; its exit is only logged.
pub fn open_url(url: &str) -> Result<(), PresenterError> {
    launch(opener_command(url))
}

fn launch(mut command: Command) -> Result<(), PresenterError> {
    let mut child = command.spawn()?;

    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => {}
            Ok(status) => tracing::warn!("URL opener exited with {status}"),
            Err(e) => tracing::warn!("URL opener failed: {e}"),
        }
    });

    Ok(())
}

fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}
