//! Evaluation of the user function over the training set.
//!
//! This is the only step that runs concurrently. Each task carries the
//! subset it evaluates, and results are sorted back into canonical order
//! before anything reads them, so worker completion order never matters.

use crate::config::CompilerConfig;
use crate::sampling::{training_samples, SubsetIndex};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How the training set was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// On the calling thread.
    Sequential,
    /// On a scoped pool of `workers` threads.
    Parallel {
        /// Pool size
        workers: usize,
    },
}

/// Summary of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Mode actually used.
    pub mode: EvaluationMode,
    /// A pool was requested but could not be used.
    pub fell_back: bool,
    /// Number of function evaluations (one per training sample).
    pub evaluations: usize,
}

/// Outputs in canonical subset order.
pub(crate) type Outputs<T> = Vec<(SubsetIndex, T)>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Evaluator {
    parallel: bool,
    workers: Option<usize>,
    /// Refuse to spawn pool threads, so building the pool fails.
    #[cfg(test)]
    deny_threads: bool,
}

impl Evaluator {
    pub(crate) fn from_config(config: &CompilerConfig) -> Self {
        Self {
            parallel: config.parallel,
            workers: config.workers,
            #[cfg(test)]
            deny_threads: false,
        }
    }

    #[cfg(test)]
    fn threads_denied(&self) -> bool {
        self.deny_threads
    }

    #[cfg(not(test))]
    fn threads_denied(&self) -> bool {
        false
    }

    /// Decide the mode from static facts about the host; the flag is set
    /// when parallelism was requested but is unavailable.
    fn plan(&self) -> (EvaluationMode, bool) {
        if !self.parallel {
            return (EvaluationMode::Sequential, false);
        }
        if !cfg!(feature = "parallel") {
            tracing::debug!("built without the `parallel` feature, evaluating sequentially");
            return (EvaluationMode::Sequential, false);
        }
        let workers = match self.workers {
            Some(w) => w,
            None => match std::thread::available_parallelism() {
                Ok(w) => w.get(),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "cannot determine hardware concurrency, falling back to sequential evaluation"
                    );
                    return (EvaluationMode::Sequential, true);
                }
            },
        };
        if workers <= 1 {
            (EvaluationMode::Sequential, false)
        } else {
            (EvaluationMode::Parallel { workers }, false)
        }
    }

    /// Evaluate `f` on every training sample for `n` variables.
    ///
    /// The first error returned by `f` is passed through untouched.
    pub(crate) fn evaluate<T, E, F>(&self, f: &F, n: usize) -> Result<(Outputs<T>, EvaluationReport), E>
    where
        T: Send,
        E: Send,
        F: Fn(&[u8]) -> Result<T, E> + Sync,
    {
        let samples: Vec<(SubsetIndex, Vec<u8>)> = training_samples(n).collect();
        let (mode, mut fell_back) = self.plan();

        let parallel = match mode {
            EvaluationMode::Parallel { workers } => {
                let outputs = evaluate_on_pool(f, &samples, workers, self.threads_denied())?;
                if outputs.is_none() {
                    fell_back = true;
                }
                outputs.map(|o| (o, workers))
            }
            EvaluationMode::Sequential => None,
        };

        let (mut outputs, mode) = match parallel {
            Some((outputs, workers)) => (outputs, EvaluationMode::Parallel { workers }),
            None => (evaluate_sequential(f, &samples)?, EvaluationMode::Sequential),
        };
        outputs.sort_by_key(|(index, _)| *index);

        let report = EvaluationReport {
            mode,
            fell_back,
            evaluations: samples.len(),
        };
        Ok((outputs, report))
    }
}

fn evaluate_sequential<T, E, F>(f: &F, samples: &[(SubsetIndex, Vec<u8>)]) -> Result<Outputs<T>, E>
where
    F: Fn(&[u8]) -> Result<T, E>,
{
    samples
        .iter()
        .map(|(index, x)| f(x).map(|value| (*index, value)))
        .collect()
}

/// Runs on a pool that lives only for this call. Returns `Ok(None)` when
/// the pool cannot be built.
#[cfg(feature = "parallel")]
fn evaluate_on_pool<T, E, F>(
    f: &F,
    samples: &[(SubsetIndex, Vec<u8>)],
    workers: usize,
    deny_threads: bool,
) -> Result<Option<Outputs<T>>, E>
where
    T: Send,
    E: Send,
    F: Fn(&[u8]) -> Result<T, E> + Sync,
{
    let builder = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("qubify-eval-{i}"));
    let built = if deny_threads {
        builder
            .spawn_handler(|_| Err(std::io::Error::other("thread spawning denied")))
            .build()
    } else {
        builder.build()
    };
    let pool = match built {
        Ok(pool) => pool,
        Err(err) => {
            tracing::warn!(
                error = %err,
                workers,
                "cannot start evaluation pool, falling back to sequential evaluation"
            );
            return Ok(None);
        }
    };

    let outputs = pool.install(|| {
        samples
            .par_iter()
            .map(|(index, x)| f(x).map(|value| (*index, value)))
            .collect::<Result<Outputs<T>, E>>()
    })?;
    Ok(Some(outputs))
}

#[cfg(not(feature = "parallel"))]
fn evaluate_on_pool<T, E, F>(
    _f: &F,
    _samples: &[(SubsetIndex, Vec<u8>)],
    _workers: usize,
    _deny_threads: bool,
) -> Result<Option<Outputs<T>>, E>
where
    F: Fn(&[u8]) -> Result<T, E>,
{
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn f(x: &[u8]) -> Result<f64, Infallible> {
        Ok(x.iter().enumerate().map(|(i, &b)| (i as f64 + 1.0) * f64::from(b)).product())
    }

    #[test]
    fn test_sequential_when_disabled() {
        let evaluator = Evaluator::from_config(&CompilerConfig::default().with_parallel(false));
        let (outputs, report) = evaluator.evaluate(&f, 4).expect("infallible");
        assert_eq!(report.mode, EvaluationMode::Sequential);
        assert!(!report.fell_back);
        assert_eq!(outputs.len(), 11);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_pool_failure_falls_back_to_sequential() {
        let config = CompilerConfig::default().with_workers(3);
        let failing = Evaluator {
            deny_threads: true,
            ..Evaluator::from_config(&config)
        };
        let (outputs, report) = failing.evaluate(&f, 5).expect("infallible");
        assert_eq!(report.mode, EvaluationMode::Sequential);
        assert!(report.fell_back);
        assert_eq!(report.evaluations, 16);

        let sequential = Evaluator::from_config(&config.with_parallel(false));
        let (expected, _) = sequential.evaluate(&f, 5).expect("infallible");
        assert_eq!(outputs, expected);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_pool_outputs_are_in_canonical_order() {
        let evaluator = Evaluator::from_config(&CompilerConfig::default().with_workers(4));
        let (outputs, report) = evaluator.evaluate(&f, 6).expect("infallible");
        assert_eq!(report.mode, EvaluationMode::Parallel { workers: 4 });
        let order: Vec<SubsetIndex> = outputs.iter().map(|(index, _)| *index).collect();
        assert_eq!(order, crate::sampling::indices(6).collect::<Vec<_>>());
    }
}
