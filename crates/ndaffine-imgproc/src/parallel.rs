use rayon::prelude::*;
use thiserror::Error;

use ndaffine_tensor::unravel_index;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The destination slice does not hold the number of cells of the shape.
    #[error("destination has {actual} cells but the shape requires {expected}")]
    SizeMismatch {
        /// Number of cells implied by the shape.
        expected: usize,
        /// Length of the destination slice.
        actual: usize,
    },
}

/// Controls how parallel operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small grids, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads, one contiguous block of
    /// the outermost axis per thread.
    ///
    /// # Warning
    /// Creates a new thread pool on every call.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// A fixed pool sized to the hardware concurrency of the machine.
    pub fn available() -> Self {
        let n = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        ExecutionStrategy::Fixed(n)
    }

    /// Number of workers the output is partitioned into.
    pub fn num_workers(&self) -> usize {
        match self {
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::Fixed(n) => *n,
        }
    }

    /// Checks the strategy can be executed.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        Self::available()
    }
}

/// Advance a row-major multi-index by one cell.
#[inline]
fn increment_index(index: &mut [usize], shape: &[usize]) {
    for k in (0..shape.len()).rev() {
        index[k] += 1;
        if index[k] < shape[k] {
            return;
        }
        index[k] = 0;
    }
}

fn fill_block<T, S, F>(block: &mut [T], start: usize, shape: &[usize], state: &mut S, f: &F)
where
    F: Fn(&mut S, &[usize]) -> T,
{
    let mut index = vec![0; shape.len()];
    unravel_index(start, shape, &mut index);
    for cell in block.iter_mut() {
        *cell = f(state, &index);
        increment_index(&mut index, shape);
    }
}

/// Fill every cell of a row-major n-dimensional buffer with `f(&index)`.
///
/// Same partitioning and guarantees as [`par_iter_cells_init`], for cell
/// functions that need no per-worker state.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::parallel::{par_iter_cells, ExecutionStrategy};
///
/// let mut dst = vec![0usize; 4];
/// par_iter_cells(&mut dst, &[4], ExecutionStrategy::Fixed(3), |idx| idx[0] * idx[0]).unwrap();
/// assert_eq!(dst, vec![0, 1, 4, 9]);
/// ```
pub fn par_iter_cells<T, F>(
    dst: &mut [T],
    shape: &[usize],
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(&[usize]) -> T + Sync + Send,
{
    par_iter_cells_init(dst, shape, strategy, || (), |_, idx| f(idx))
}

/// Fill every cell of a row-major n-dimensional buffer from its multi-index.
///
/// The buffer is split along the outermost axis into contiguous blocks of
/// `ceil(shape[0] / n)` outer slices for `n` workers; each block is owned by
/// exactly one worker, which creates its own state with `init` and then walks
/// its cells in order, writing `f(&mut state, &index)`. The call returns once
/// every block is done.
///
/// Rounding the block size up can leave fewer than `n` blocks, e.g. 9 outer
/// slices on 4 workers give blocks of 3, 3 and 3 and one idle worker. The
/// same happens whenever `n` exceeds `shape[0]`.
///
/// Results do not depend on the strategy as long as `f` depends only on the
/// index and shared read-only data.
///
/// # Arguments
///
/// * `dst` - The destination buffer, `shape.iter().product()` elements.
/// * `shape` - The shape of the destination.
/// * `strategy` - The execution strategy.
/// * `init` - Creates per-worker scratch state.
/// * `f` - Computes the value of one cell.
///
/// # Errors
///
/// The strategy and buffer size are checked and the thread pool is built
/// before any cell is written; on error `dst` is untouched.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::parallel::{par_iter_cells_init, ExecutionStrategy};
///
/// let mut dst = vec![0usize; 6];
/// par_iter_cells_init(&mut dst, &[2, 3], ExecutionStrategy::Fixed(2), || (), |_, idx| {
///     idx[0] * 10 + idx[1]
/// })
/// .unwrap();
/// assert_eq!(dst, vec![0, 1, 2, 10, 11, 12]);
/// ```
pub fn par_iter_cells_init<T, S, I, F>(
    dst: &mut [T],
    shape: &[usize],
    strategy: ExecutionStrategy,
    init: I,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    I: Fn() -> S + Sync + Send,
    F: Fn(&mut S, &[usize]) -> T + Sync + Send,
{
    strategy.validate()?;

    let numel = shape.iter().product::<usize>();
    if shape.is_empty() || numel != dst.len() {
        return Err(ParallelError::SizeMismatch {
            expected: numel,
            actual: dst.len(),
        });
    }
    if numel == 0 {
        return Ok(());
    }

    match strategy {
        ExecutionStrategy::Serial => {
            let mut state = init();
            fill_block(dst, 0, shape, &mut state, &f);
        }
        ExecutionStrategy::Fixed(n) => {
            let outer = shape[0];
            let inner = numel / outer;
            let rows_per_block = outer.div_ceil(n);
            let block_len = rows_per_block * inner;

            log::debug!(
                "splitting {outer} outer slices into blocks of {rows_per_block} across {n} threads"
            );

            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_mut(block_len)
                    .enumerate()
                    .for_each(|(block, chunk)| {
                        let start = block * block_len;
                        log::trace!("block {block}: cells {start}..{}", start + chunk.len());
                        let mut state = init();
                        fill_block(chunk, start, shape, &mut state, &f);
                    });
            });
        }
    }

    Ok(())
}
