//! The background execution slot: one thread, one engine, one search at
//! a time.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use gridpath_core::{CancelToken, Grid, Point};
use gridpath_search::{EngineConfig, PathEngine};

use crate::request::{PathEvent, Request};

/// One unit of work for the worker.
pub(crate) struct Job {
    pub(crate) request: Request,
    /// The start marker at dispatch time.
    pub(crate) origin: Point,
    /// Cell snapshot taken at dispatch time; later store mutations don't
    /// reach it.
    pub(crate) grid: Grid,
    pub(crate) cancel: CancelToken,
    /// `Some` for previews, `None` for finals.
    pub(crate) step_limit: Option<usize>,
}

/// Spawn the worker thread.
///
/// The worker owns a single [`PathEngine`] for its lifetime, so scratch
/// buffers warm up once and are reused across jobs. It processes jobs in
/// arrival order and exits when the job channel closes, or when nobody is
/// left to receive results.
pub(crate) fn spawn(
    engine_config: EngineConfig,
    jobs: Receiver<Job>,
    results: Sender<PathEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("gridpath-worker".into())
        .spawn(move || {
            let mut engine = PathEngine::new(engine_config);
            while let Ok(job) = jobs.recv() {
                let result = match job.step_limit {
                    Some(limit) => engine.bfs_path_bounded(
                        &job.grid,
                        job.origin,
                        job.request.target,
                        limit,
                        &job.cancel,
                    ),
                    None => engine.bfs_path(&job.grid, job.origin, job.request.target, &job.cancel),
                };
                let event = PathEvent {
                    kind: job.request.kind,
                    generation: job.request.generation,
                    result,
                };
                if results.send(event).is_err() {
                    break;
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestKind;
    use gridpath_search::PathResult;
    use std::sync::mpsc;

    fn job(generation: u64, target: Point, step_limit: Option<usize>) -> Job {
        Job {
            request: Request {
                kind: RequestKind::Final,
                target,
                generation,
            },
            origin: Point::new(0, 0),
            grid: Grid::new(5, 5),
            cancel: CancelToken::new(),
            step_limit,
        }
    }

    #[test]
    fn test_worker_processes_jobs_in_order() {
        let (job_tx, job_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn(EngineConfig::default(), job_rx, result_tx).unwrap();

        job_tx.send(job(1, Point::new(4, 4), None)).unwrap();
        job_tx.send(job(2, Point::new(0, 4), None)).unwrap();

        let first = result_rx.recv().unwrap();
        let second = result_rx.recv().unwrap();
        assert_eq!(first.generation, 1);
        assert_eq!(first.result.points().unwrap().len(), 9);
        assert_eq!(second.generation, 2);
        assert_eq!(second.result.points().unwrap().len(), 5);

        drop(job_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_honours_step_limit() {
        let (job_tx, job_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn(EngineConfig::default(), job_rx, result_tx).unwrap();

        job_tx.send(job(1, Point::new(4, 4), Some(3))).unwrap();
        let event = result_rx.recv().unwrap();
        assert!(matches!(event.result, PathResult::Partial(_)));

        drop(job_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_exits_when_jobs_close() {
        let (job_tx, job_rx) = mpsc::channel();
        let (result_tx, _result_rx) = mpsc::channel();
        let handle = spawn(EngineConfig::default(), job_rx, result_tx).unwrap();
        drop(job_tx);
        handle.join().unwrap();
    }
}
