use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

use crate::foundation::error::{GridError, GridResult};
use crate::grid::prepare::PreparedCell;
use crate::schedule::stop::StopSignal;

/// Draws one cell into its private buffer and publishes it.
///
/// Implementations are shared by every task of a page, so they must be `Sync`. Transient errors
/// returned from `render` are logged and the tick is skipped; any other error is fatal for the
/// page.
pub trait CellRender: Sync {
    /// Render `cell` once.
    fn render(&self, cell: &mut PreparedCell) -> GridResult<()>;
}

/// How long a page stays active once every cell has rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dwell {
    /// Until every recurring task has ended on its own (only a fatal error ends one).
    UntilIdle,
    /// For a fixed time, then drain.
    For(Duration),
}

/// Lifecycle points reported to the caller of [`run_page`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagePhase {
    /// Every one-shot cell has rendered and the recurring tasks are running.
    Running {
        /// Number of recurring tasks started.
        recurring: usize,
    },
    /// The stop signal has fired; waiting for tasks to finish.
    Draining,
}

/// Summary of one finished page activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Cells rendered exactly once.
    pub one_shot: usize,
    /// Cells that ran a recurring task.
    pub recurring: usize,
    /// Total successful renders, first renders included.
    pub renders: u64,
}

struct TaskExit {
    cell: usize,
    renders: u64,
    result: GridResult<()>,
}

/// Reports a task's end on the completion channel, also when the task unwinds.
struct ExitGuard {
    exit: Sender<TaskExit>,
    cell: usize,
    renders: u64,
    result: Option<GridResult<()>>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let result = self
            .result
            .take()
            .unwrap_or_else(|| Err(GridError::render(format!("task for cell {} panicked", self.cell))));
        let _ = self.exit.send(TaskExit {
            cell: self.cell,
            renders: self.renders,
            result,
        });
    }
}

/// Fires the stop signal when the page scope unwinds, so the scope can always join its tasks.
struct StopOnDrop<'a>(&'a StopSignal);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Starts the tasks of one page activation inside a [`std::thread::scope`].
///
/// Every task spawned through the group reports its end on the group's completion channel and
/// sleeps on the shared [`StopSignal`].
pub struct TaskGroup<'scope, 'env, R: CellRender + ?Sized> {
    scope: &'scope Scope<'scope, 'env>,
    renderer: &'env R,
    stop: &'env StopSignal,
    exit: Sender<TaskExit>,
    renders: Cell<u64>,
}

/// A running recurring task. Stopping goes through the group's [`StopSignal`].
pub struct TaskHandle<'scope> {
    cell: usize,
    join: ScopedJoinHandle<'scope, ()>,
}

impl TaskHandle<'_> {
    /// Arena index of the cell this task renders.
    pub fn cell(&self) -> usize {
        self.cell
    }

    /// Wait for the task to end. Returns `false` if it panicked.
    pub fn join(self) -> bool {
        self.join.join().is_ok()
    }
}

impl<'scope, 'env, R: CellRender + ?Sized> TaskGroup<'scope, 'env, R> {
    fn new(scope: &'scope Scope<'scope, 'env>, renderer: &'env R, stop: &'env StopSignal, exit: Sender<TaskExit>) -> Self {
        Self {
            scope,
            renderer,
            stop,
            exit,
            renders: Cell::new(0),
        }
    }

    /// Start `cell`: a one-shot cell renders once on the calling thread and returns `None`; a
    /// recurring cell gets its own task, which renders immediately and then ticks at
    /// `first + k * interval`, skipping ticks missed while a render overran.
    ///
    /// A slow or hung render of one recurring cell never holds up the cells started after it.
    pub fn start(&self, cell: &'env mut PreparedCell) -> GridResult<Option<TaskHandle<'scope>>> {
        if !cell.recurs() {
            if render_tick(self.renderer, cell)? {
                self.renders.set(self.renders.get() + 1);
            }
            return Ok(None);
        }

        let index = cell.index;
        let (renderer, stop, exit) = (self.renderer, self.stop, self.exit.clone());
        let join = thread::Builder::new()
            .name(format!("cell-{index}"))
            .spawn_scoped(self.scope, move || run_task(renderer, cell, stop, exit))
            .map_err(|e| GridError::render(format!("spawn task for cell {index}: {e}")))?;
        Ok(Some(TaskHandle { cell: index, join }))
    }
}

/// Run one page activation over `cells` to completion.
///
/// Each cell is [started](TaskGroup::start) in order. Once every one-shot cell has rendered and
/// every recurring task is running, the page dwells as requested, then the stop signal fires and every task is joined before this returns.
///
/// A fatal render error (initial or recurring) ends the dwell early, drains the page and is
/// returned.
pub fn run_page<R, F>(
    renderer: &R,
    cells: &mut [PreparedCell],
    dwell: Dwell,
    mut on_phase: F,
) -> GridResult<PageReport>
where
    R: CellRender + ?Sized,
    F: FnMut(PagePhase),
{
    let stop = StopSignal::new();
    let (exit_tx, exit_rx) = mpsc::channel();

    thread::scope(|scope| {
        let _stop_guard = StopOnDrop(&stop);
        let group = TaskGroup::new(scope, renderer, &stop, exit_tx);
        let mut report = PageReport::default();
        let mut handles = Vec::new();

        let mut outcome = Ok(());
        for cell in cells.iter_mut() {
            match group.start(cell) {
                Ok(Some(handle)) => {
                    handles.push(handle);
                    report.recurring += 1;
                }
                Ok(None) => report.one_shot += 1,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        report.renders = group.renders.get();
        drop(group);

        let mut exits = Vec::new();
        if outcome.is_ok() {
            on_phase(PagePhase::Running {
                recurring: report.recurring,
            });
            outcome = dwell_on(&exit_rx, dwell, &mut exits);
        }

        stop.stop();
        on_phase(PagePhase::Draining);
        for handle in handles {
            let cell = handle.cell();
            if !handle.join() {
                tracing::error!(cell, "cell task panicked");
            }
        }
        exits.extend(exit_rx.try_iter());

        for exit in exits {
            report.renders += exit.renders;
            if let Err(e) = exit.result {
                tracing::error!(cell = exit.cell, error = %e, "cell task failed");
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }

        tracing::debug!(
            one_shot = report.one_shot,
            recurring = report.recurring,
            renders = report.renders,
            "page drained"
        );
        outcome.map(|()| report)
    })
}

/// Wait out the dwell, returning early with the first fatal task error.
///
/// Exits received along the way are kept in `exits` with their error taken out.
fn dwell_on(exit_rx: &Receiver<TaskExit>, dwell: Dwell, exits: &mut Vec<TaskExit>) -> GridResult<()> {
    let deadline = match dwell {
        Dwell::UntilIdle => None,
        Dwell::For(d) => Some(Instant::now() + d),
    };
    loop {
        let exit = match deadline {
            None => match exit_rx.recv() {
                Ok(exit) => exit,
                Err(_) => return Ok(()),
            },
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match exit_rx.recv_timeout(wait) {
                    Ok(exit) => exit,
                    Err(RecvTimeoutError::Timeout) => return Ok(()),
                    Err(RecvTimeoutError::Disconnected) => {
                        // No tasks left to wake us; the page still shows for its full duration.
                        thread::sleep(deadline.saturating_duration_since(Instant::now()));
                        return Ok(());
                    }
                }
            }
        };
        let TaskExit { cell, renders, result } = exit;
        exits.push(TaskExit {
            cell,
            renders,
            result: Ok(()),
        });
        result?;
    }
}

fn run_task<R: CellRender + ?Sized>(
    renderer: &R,
    cell: &mut PreparedCell,
    stop: &StopSignal,
    exit: Sender<TaskExit>,
) {
    let mut guard = ExitGuard {
        exit,
        cell: cell.index,
        renders: 0,
        result: None,
    };
    if stop.is_stopped() {
        guard.result = Some(Ok(()));
        return;
    }
    let period = cell.refresh;
    let first = Instant::now();
    loop {
        match render_tick(renderer, cell) {
            Ok(true) => guard.renders += 1,
            Ok(false) => {}
            Err(e) => {
                guard.result = Some(Err(e));
                return;
            }
        }
        if stop.wait_until(next_deadline(first, period, Instant::now())) {
            guard.result = Some(Ok(()));
            return;
        }
    }
}

/// Render once. `Ok(false)` means a transient failure skipped the tick.
fn render_tick<R: CellRender + ?Sized>(renderer: &R, cell: &mut PreparedCell) -> GridResult<bool> {
    match renderer.render(cell) {
        Ok(()) => Ok(true),
        Err(e) if e.is_transient() => {
            tracing::warn!(cell = cell.index, kind = %cell.tag, error = %e, "render skipped");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// First tick `first + k * period` (k >= 1) strictly after `now`.
pub(crate) fn next_deadline(first: Instant, period: Duration, now: Instant) -> Instant {
    let period_ns = period.as_nanos().max(1);
    let elapsed_ns = now.saturating_duration_since(first).as_nanos();
    let k = elapsed_ns / period_ns + 1;
    let offset = u64::try_from(k * period_ns).unwrap_or(u64::MAX);
    first + Duration::from_nanos(offset)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
