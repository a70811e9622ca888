use std::fmt;

use crate::assets::font::FontProvider;
use crate::config::model::Config;
use crate::foundation::core::{BLACK, Canvas};
use crate::foundation::error::{GridError, GridResult};
use crate::grid::prepare::prepare_page;
use crate::output::compositor::Compositor;
use crate::schedule::{CellRender, Dwell, PagePhase, run_page};

/// Where the rotation currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationState {
    /// No page active.
    Idle,
    /// Preparing a page and rendering its cells for the first time.
    Activating {
        /// Page index.
        page: usize,
    },
    /// Every cell has rendered; recurring tasks are ticking.
    Running {
        /// Page index.
        page: usize,
    },
    /// Stop signalled; waiting for the page's tasks to end.
    Draining {
        /// Page index.
        page: usize,
    },
}

impl fmt::Display for RotationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Activating { page } => write!(f, "activating page {page}"),
            Self::Running { page } => write!(f, "running page {page}"),
            Self::Draining { page } => write!(f, "draining page {page}"),
        }
    }
}

/// Drives the pages of a [`Config`] in order, wrapping after the last.
///
/// A page only dwells for its `DurationSecs` when there is more than one page; otherwise it runs
/// until its tasks end on their own, which for a page without recurring cells is right after the
/// initial draw.
pub struct Rotation<'a, R: CellRender + ?Sized> {
    config: &'a Config,
    canvas: Canvas,
    fonts: &'a dyn FontProvider,
    renderer: &'a R,
    background: Option<&'a Compositor>,
    state: RotationState,
    next_page: usize,
}

impl<'a, R: CellRender + ?Sized> Rotation<'a, R> {
    /// Rotation over `config`'s pages laid out on `canvas`.
    pub fn new(config: &'a Config, canvas: Canvas, fonts: &'a dyn FontProvider, renderer: &'a R) -> Self {
        Self {
            config,
            canvas,
            fonts,
            renderer,
            background: None,
            state: RotationState::Idle,
            next_page: 0,
        }
    }

    /// Clear `compositor` to black before each page after the first.
    pub fn clear_between_pages(mut self, compositor: &'a Compositor) -> Self {
        self.background = Some(compositor);
        self
    }

    /// Current state.
    pub fn state(&self) -> RotationState {
        self.state
    }

    /// Index of the page the next activation will use.
    pub fn next_page(&self) -> usize {
        self.next_page
    }

    /// Rotate until a fatal error, or until a single page has nothing left to do.
    pub fn run(&mut self) -> GridResult<()> {
        self.run_activations(None).map(|_| ())
    }

    /// Like [`Rotation::run`], but stop after `limit` page activations when given.
    ///
    /// Returns the number of activations performed. The state is [`RotationState::Idle`] on
    /// return, error or not.
    pub fn run_activations(&mut self, limit: Option<usize>) -> GridResult<usize> {
        let mut activations = 0;
        let result = self.cycle(limit, &mut activations);
        enter(&mut self.state, RotationState::Idle);
        result.map(|()| activations)
    }

    fn cycle(&mut self, limit: Option<usize>, activations: &mut usize) -> GridResult<()> {
        let config = self.config;
        let pages = config.pages();
        if pages.is_empty() {
            return Err(GridError::config("configuration has no pages"));
        }
        let rotating = pages.len() > 1;

        while limit.is_none_or(|l| *activations < l) {
            let index = self.next_page % pages.len();
            let page = &pages[index];
            enter(&mut self.state, RotationState::Activating { page: index });

            if *activations > 0
                && let Some(compositor) = self.background
            {
                compositor.clear(BLACK)?;
            }
            let mut prepared = prepare_page(page, index, self.canvas, self.fonts, config.base_dir())?;
            *activations += 1;

            let dwell = match prepared.duration {
                Some(d) if rotating => Dwell::For(d),
                _ => Dwell::UntilIdle,
            };
            tracing::info!(page = %prepared.name, cells = prepared.cells.len(), ?dwell, "activating page");

            let state = &mut self.state;
            let report = run_page(self.renderer, &mut prepared.cells, dwell, |phase| match phase {
                PagePhase::Running { .. } => enter(state, RotationState::Running { page: index }),
                PagePhase::Draining => enter(state, RotationState::Draining { page: index }),
            })?;
            tracing::info!(
                page = %prepared.name,
                renders = report.renders,
                recurring = report.recurring,
                "page drained"
            );

            self.next_page = (index + 1) % pages.len();
            if !rotating {
                return Ok(());
            }
        }
        Ok(())
    }
}

fn enter(state: &mut RotationState, next: RotationState) {
    if *state != next {
        tracing::debug!(from = %state, to = %next, "rotation state");
        *state = next;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rotation/controller.rs"]
mod tests;
