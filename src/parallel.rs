//! Parallel evaluation
//!
//! The search loop only needs an order-preserving map over a slice. Which
//! executor runs it is chosen once per run from the `n_jobs` setting.

use crate::error::EvolutionError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Requested degree of parallelism
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    /// Evaluate on the calling thread
    Sequential,
    /// Evaluate on a dedicated pool with this many workers
    Threads(usize),
}

impl Parallelism {
    /// Resolve an `n_jobs` setting
    ///
    /// `1` is sequential, `n > 1` uses `n` workers, and negative values count
    /// back from the number of CPUs (`-1` uses all of them, `-2` all but one).
    /// Zero is rejected.
    pub fn from_n_jobs(n_jobs: i64) -> Result<Self, EvolutionError> {
        let workers = match n_jobs {
            0 => {
                return Err(EvolutionError::Configuration(
                    "n_jobs == 0 has no meaning".to_string(),
                ))
            }
            n if n > 0 => n as usize,
            n => {
                let cpus = num_cpus::get() as i64;
                (cpus + 1 + n).max(1) as usize
            }
        };
        Ok(if workers == 1 {
            Self::Sequential
        } else {
            Self::Threads(workers)
        })
    }

    /// Number of workers
    pub fn workers(&self) -> usize {
        match *self {
            Self::Sequential => 1,
            Self::Threads(n) => n,
        }
    }
}

/// Order-preserving map over a slice
///
/// `map(items, f)[i]` must equal `f(&items[i])` regardless of how the calls
/// are scheduled.
pub trait ParallelMap: Send + Sync {
    /// Apply `f` to every item
    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send;
}

/// Runs every call on the current thread
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialMap;

impl ParallelMap for SequentialMap {
    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        items.iter().map(f).collect()
    }
}

/// Runs calls on a dedicated rayon pool
#[cfg(feature = "parallel")]
#[derive(Debug)]
pub struct RayonMap {
    pool: rayon::ThreadPool,
}

#[cfg(feature = "parallel")]
impl RayonMap {
    /// Build a pool with `threads` workers
    pub fn new(threads: usize) -> Result<Self, EvolutionError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| EvolutionError::Configuration(format!("thread pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Number of workers in the pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(feature = "parallel")]
impl ParallelMap for RayonMap {
    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        self.pool.install(|| items.par_iter().map(f).collect())
    }
}

/// The executor a run was configured with
#[derive(Debug)]
pub enum Executor {
    /// Current-thread evaluation
    Sequential(SequentialMap),
    /// Pool evaluation
    #[cfg(feature = "parallel")]
    Rayon(RayonMap),
}

impl Executor {
    /// Build the executor for a parallelism setting
    ///
    /// Without the `parallel` feature every setting runs sequentially.
    pub fn new(parallelism: Parallelism) -> Result<Self, EvolutionError> {
        match parallelism {
            Parallelism::Sequential => Ok(Self::Sequential(SequentialMap)),
            #[cfg(feature = "parallel")]
            Parallelism::Threads(n) => Ok(Self::Rayon(RayonMap::new(n)?)),
            #[cfg(not(feature = "parallel"))]
            Parallelism::Threads(n) => {
                log::warn!("n_jobs requested {n} workers but the parallel feature is disabled");
                Ok(Self::Sequential(SequentialMap))
            }
        }
    }

    /// Resolve `n_jobs` and build the executor
    pub fn from_n_jobs(n_jobs: i64) -> Result<Self, EvolutionError> {
        Self::new(Parallelism::from_n_jobs(n_jobs)?)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::Sequential(SequentialMap)
    }
}

impl ParallelMap for Executor {
    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        match self {
            Self::Sequential(map) => map.map(items, f),
            #[cfg(feature = "parallel")]
            Self::Rayon(map) => map.map(items, f),
        }
    }
}
