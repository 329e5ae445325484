//! Traversal engine.
//!
//! Runs a [`Filter`] over every column of an image, reporting progress as
//! `100 * column / width` and checking a [`CancelToken`] before each column.
//! A cancelled run discards its partial output and returns
//! [`RunOutcome::Cancelled`]. Output is always a freshly zeroed image, so any
//! pixel a filter does not visit stays black.
//!
//! [`GlobalFilter`]s run to completion through [`Runner::invoke_global`]
//! without progress or cancellation.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::filters::levels;
use crate::filters::median::median_pixel;
use crate::filters::morphology::MORPH_MARGIN;
use crate::{Filter, FilterError, FilterResult, GlobalFilter, Operation, Rgb, RgbImage};

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation flag shared between a host and one run.
///
/// Clones share the same flag, so a host can keep one handle and move
/// another into the thread that drives the run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the run stops before its next column.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Processing mode for traversals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Single-threaded, one column at a time
    Sequential,
    /// Parallel over the global rayon pool
    Parallel,
    /// Parallel over a dedicated pool with the given number of threads
    ParallelWith(usize),
}

impl Default for ProcessingMode {
    fn default() -> Self {
        ProcessingMode::Parallel
    }
}

/// Options for a [`Runner`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: ProcessingMode,
}

/// Result of a cancellable run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RgbImage),
    /// The host requested cancellation; no image was produced
    Cancelled,
}

impl RunOutcome {
    pub fn into_image(self) -> Option<RgbImage> {
        match self {
            RunOutcome::Completed(image) => Some(image),
            RunOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }
}

/// Share of the 0-100 progress range covered by one traversal.
#[derive(Debug, Clone, Copy)]
struct ProgressSpan {
    offset: usize,
    span: usize,
}

impl ProgressSpan {
    const FULL: ProgressSpan = ProgressSpan {
        offset: 0,
        span: 100,
    };

    fn percent(self, column: usize, width: usize) -> u8 {
        (self.offset + self.span * column / width) as u8
    }
}

fn full_region(src: &RgbImage) -> (Range<usize>, Range<usize>) {
    (0..src.width(), 0..src.height())
}

fn interior_region(src: &RgbImage) -> (Range<usize>, Range<usize>) {
    let inner = |len: usize| MORPH_MARGIN..len.saturating_sub(MORPH_MARGIN).max(MORPH_MARGIN);
    (inner(src.width()), inner(src.height()))
}

// ============================================================================
// Runner
// ============================================================================

/// Executes filters in a fixed [`ProcessingMode`].
///
/// Every mode produces identical pixels. In parallel modes, columns are
/// processed in batches of one column per worker thread, and progress and
/// cancellation are handled on the calling thread between batches.
#[derive(Debug)]
pub struct Runner {
    mode: ProcessingMode,
    pool: Option<ThreadPool>,
}

impl Default for Runner {
    fn default() -> Self {
        Runner {
            mode: ProcessingMode::default(),
            pool: None,
        }
    }
}

impl Runner {
    pub fn new(options: RunOptions) -> FilterResult<Self> {
        let pool = match options.mode {
            ProcessingMode::ParallelWith(0) => {
                return Err(FilterError::InvalidParameters(
                    "thread count must be at least 1".into(),
                ))
            }
            ProcessingMode::ParallelWith(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?,
            ),
            _ => None,
        };
        Ok(Runner {
            mode: options.mode,
            pool,
        })
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    /// Run a pixel filter, reporting progress (0-99) and honoring `cancel`.
    ///
    /// Sequential runners report and check once per column; parallel
    /// runners once per batch of columns.
    pub fn invoke<P>(
        &self,
        filter: &Filter,
        src: &RgbImage,
        mut progress: P,
        cancel: &CancelToken,
    ) -> RunOutcome
    where
        P: FnMut(u8),
    {
        debug!(
            "{}: {}x{} image, {:?}",
            filter.name(),
            src.width(),
            src.height(),
            self.mode
        );
        match self.run_filter(filter, src, &mut progress, cancel) {
            Some(image) => {
                debug!("{}: completed", filter.name());
                RunOutcome::Completed(image)
            }
            None => {
                debug!("{}: cancelled", filter.name());
                RunOutcome::Cancelled
            }
        }
    }

    /// Run a whole-image filter to completion.
    pub fn invoke_global(&self, filter: &GlobalFilter, src: &RgbImage) -> RgbImage {
        let (width, height) = src.dimensions();
        debug!("{}: {}x{} image", filter.name(), width, height);

        let out = match filter {
            GlobalFilter::GrayWorld => levels::gray_world(src),
            GlobalFilter::ContrastStretch => levels::contrast_stretch(src),
            GlobalFilter::Median(window) => {
                let mut out = RgbImage::new(width, height);
                self.render(
                    &mut out,
                    window.interior(width),
                    window.interior(height),
                    &|x, y| median_pixel(src, *window, x, y),
                );
                out
            }
        };
        debug!("{}: completed", filter.name());
        out
    }

    /// Run any operation. Global operations always complete.
    pub fn run<P>(
        &self,
        operation: &Operation,
        src: &RgbImage,
        progress: P,
        cancel: &CancelToken,
    ) -> RunOutcome
    where
        P: FnMut(u8),
    {
        match operation {
            Operation::Pixel(filter) => self.invoke(filter, src, progress, cancel),
            Operation::Global(filter) => RunOutcome::Completed(self.invoke_global(filter, src)),
        }
    }

    fn run_filter(
        &self,
        filter: &Filter,
        src: &RgbImage,
        progress: &mut dyn FnMut(u8),
        cancel: &CancelToken,
    ) -> Option<RgbImage> {
        match filter {
            Filter::Morphology { op, element } => {
                let passes = op.passes();
                let span = 100 / passes.len();
                let mut output: Option<RgbImage> = None;
                for (k, pass) in passes.iter().enumerate() {
                    let input = output.as_ref().unwrap_or(src);
                    let next = self.traverse(
                        input,
                        interior_region(input),
                        ProgressSpan {
                            offset: k * span,
                            span,
                        },
                        progress,
                        cancel,
                        |x, y| pass.apply(input, element, x, y),
                    )?;
                    output = Some(next);
                }
                output
            }
            _ => self.traverse(
                src,
                full_region(src),
                ProgressSpan::FULL,
                progress,
                cancel,
                |x, y| filter.compute_color(src, x, y),
            ),
        }
    }

    /// One cancellable pass over `region`. Returns `None` when cancelled.
    fn traverse<F>(
        &self,
        src: &RgbImage,
        region: (Range<usize>, Range<usize>),
        span: ProgressSpan,
        progress: &mut dyn FnMut(u8),
        cancel: &CancelToken,
        pixel: F,
    ) -> Option<RgbImage>
    where
        F: Fn(usize, usize) -> Rgb + Sync,
    {
        let (columns, rows) = region;
        let width = src.width();
        let batch = self.batch_size();
        let mut out = RgbImage::new(width, src.height());

        let mut x = columns.start;
        loop {
            if cancel.is_cancelled() {
                debug!("cancellation requested at column {x}");
                return None;
            }
            if x >= columns.end {
                return Some(out);
            }
            progress(span.percent(x, width));
            let end = (x + batch).min(columns.end);
            self.render(&mut out, x..end, rows.clone(), &pixel);
            x = end;
        }
    }

    /// Compute `columns x rows` and write it into `out`.
    fn render<F>(&self, out: &mut RgbImage, columns: Range<usize>, rows: Range<usize>, pixel: &F)
    where
        F: Fn(usize, usize) -> Rgb + Sync,
    {
        let first = columns.start;
        let computed = self.map_columns(columns, |x| rows.clone().map(|y| pixel(x, y)).collect());
        for (x, column) in (first..).zip(computed) {
            for (y, color) in rows.clone().zip(column) {
                out.set(x, y, color);
            }
        }
    }

    fn map_columns<F>(&self, columns: Range<usize>, f: F) -> Vec<Vec<Rgb>>
    where
        F: Fn(usize) -> Vec<Rgb> + Sync + Send,
    {
        match (self.mode, &self.pool) {
            (ProcessingMode::Sequential, _) => columns.map(f).collect(),
            (_, Some(pool)) => pool.install(|| columns.into_par_iter().map(f).collect()),
            _ => columns.into_par_iter().map(f).collect(),
        }
    }

    fn batch_size(&self) -> usize {
        let threads = match (self.mode, &self.pool) {
            (ProcessingMode::Sequential, _) => 1,
            (_, Some(pool)) => pool.current_num_threads(),
            _ => rayon::current_num_threads(),
        };
        threads.max(1)
    }
}

/// Run a pixel filter on the default (parallel) runner.
///
/// Progress is reported and `cancel` is checked once per batch of columns
/// (one column per worker thread) rather than per column. Use a
/// [`ProcessingMode::Sequential`] [`Runner`] for per-column granularity.
///
/// # Arguments
/// * `filter` - Pixel filter to apply
/// * `src` - Source image, left unmodified
/// * `progress` - Called with `100 * column / width` before each batch
/// * `cancel` - Checked before each batch
///
/// # Returns
/// The filtered image, or [`RunOutcome::Cancelled`] with no image
pub fn invoke<P>(filter: &Filter, src: &RgbImage, progress: P, cancel: &CancelToken) -> RunOutcome
where
    P: FnMut(u8),
{
    Runner::default().invoke(filter, src, progress, cancel)
}

/// Run a whole-image filter on the default (parallel) runner.
pub fn invoke_global(filter: &GlobalFilter, src: &RgbImage) -> RgbImage {
    Runner::default().invoke_global(filter, src)
}
