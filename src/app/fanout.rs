//! Concurrent per-target execution with an error sink.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::domain::AppError;

/// Thread-safe accumulator of task failures, in arrival order.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Mutex<Vec<AppError>>,
}

impl ErrorSink {
    pub fn push(&self, error: AppError) {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_errors(self) -> Vec<AppError> {
        self.errors.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// No errors is success, one is returned as-is, more are logged and summarized.
    pub fn into_result(self) -> Result<(), AppError> {
        let mut errors = self.into_errors();
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            count => {
                for error in &errors {
                    tracing::error!(%error, "task failed");
                    eprintln!("Error: {error}");
                }
                Err(AppError::Aggregate { count })
            }
        }
    }
}

/// Run `action` once per target concurrently and wait for every task.
pub fn fan_out<T, F>(targets: &[T], action: F) -> ErrorSink
where
    T: Sync,
    F: Fn(&T) -> Result<(), AppError> + Sync,
{
    fan_out_repeated(targets, 1, Duration::ZERO, |target, _| action(target))
}

/// Run `action` `iterations` times per target, pausing `gap` between
/// successive runs on the same target. Targets run concurrently; a failed
/// iteration is recorded and the target moves on to its next iteration.
pub fn fan_out_repeated<T, F>(targets: &[T], iterations: u32, gap: Duration, action: F) -> ErrorSink
where
    T: Sync,
    F: Fn(&T, u32) -> Result<(), AppError> + Sync,
{
    let sink = ErrorSink::default();
    thread::scope(|scope| {
        for target in targets {
            let sink = &sink;
            let action = &action;
            scope.spawn(move || {
                for iteration in 1..=iterations {
                    if iteration > 1 && !gap.is_zero() {
                        thread::sleep(gap);
                    }
                    if let Err(error) = action(target, iteration) {
                        sink.push(error);
                    }
                }
            });
        }
    });
    sink
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn every_task_runs_and_failures_are_counted() {
        let calls = AtomicUsize::new(0);
        let targets: Vec<i32> = (1..=10).collect();
        let sink = fan_out(&targets, |id| {
            calls.fetch_add(1, Ordering::SeqCst);
            if id % 3 == 0 { Err(AppError::Transport(format!("node {id}"))) } else { Ok(()) }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn aggregation_rules() {
        assert!(fan_out(&[1, 2], |_| Ok(())).into_result().is_ok());

        let single = fan_out(&[1, 2], |id| {
            if *id == 2 { Err(AppError::invalid("only two")) } else { Ok(()) }
        });
        assert!(matches!(single.into_result(), Err(AppError::InvalidArgument(m)) if m == "only two"));

        let many = fan_out(&[1, 2, 3], |_| Err(AppError::invalid("bad")));
        assert!(matches!(many.into_result(), Err(AppError::Aggregate { count: 3 })));
    }

    #[test]
    fn repeated_runs_each_iteration() {
        let calls = AtomicUsize::new(0);
        let sink = fan_out_repeated(&["a", "b"], 3, Duration::from_millis(1), |_, iteration| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!((1..=3).contains(&iteration));
            Ok(())
        });
        assert!(sink.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }
}
