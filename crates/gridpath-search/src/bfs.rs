use gridpath_core::{CancelToken, Grid, Point};

use crate::engine::{PathEngine, PathResult};

impl PathEngine {
    /// Shortest path from `from` to `to`, or why there is none.
    ///
    /// Neighbours expand in a fixed tie-break order (down, right, up,
    /// left), so equal-length paths resolve deterministically. The
    /// cancellation token is polled every
    /// [`cancel_check_interval`](crate::EngineConfig::cancel_check_interval)
    /// dequeues.
    pub fn bfs_path(
        &mut self,
        grid: &Grid,
        from: Point,
        to: Point,
        cancel: &CancelToken,
    ) -> PathResult {
        self.search(grid, from, to, None, cancel)
    }

    /// Like [`bfs_path`](Self::bfs_path), but gives up after
    /// `step_limit` dequeues. A search that runs out of budget returns
    /// [`PathResult::Partial`]: the path to the newest frontier node, a
    /// best-effort gesture toward the target used for previews.
    pub fn bfs_path_bounded(
        &mut self,
        grid: &Grid,
        from: Point,
        to: Point,
        step_limit: usize,
        cancel: &CancelToken,
    ) -> PathResult {
        self.search(grid, from, to, Some(step_limit), cancel)
    }

    fn search(
        &mut self,
        grid: &Grid,
        from: Point,
        to: Point,
        step_limit: Option<usize>,
        cancel: &CancelToken,
    ) -> PathResult {
        // Identical endpoints succeed before any validity checks.
        if from == to {
            return PathResult::Found(vec![from]);
        }
        if !grid.contains(from) || !grid.contains(to) || !grid.is_walkable(to) {
            return PathResult::NotFound;
        }
        if grid.len() > self.config.max_cells {
            return PathResult::NotFound;
        }

        let w = grid.width() as usize;
        let check = self.config.cancel_check_interval.max(1);
        let from_idx = from.y as usize * w + from.x as usize;
        let to_idx = to.y as usize * w + to.x as usize;

        self.prepare(grid.len());
        self.visited[from_idx] = true;
        self.queue.push_back(from_idx);

        let mut steps = 0usize;
        while let Some(current) = self.queue.pop_front() {
            steps += 1;
            if current == to_idx {
                return PathResult::Found(self.reconstruct(grid.width(), current));
            }
            if steps % check == 0 && cancel.is_cancelled() {
                return PathResult::Cancelled;
            }
            if step_limit.is_some_and(|limit| steps >= limit) {
                let tail = self.queue.back().copied().unwrap_or(current);
                return PathResult::Partial(self.reconstruct(grid.width(), tail));
            }

            let cp = Point::new((current % w) as i32, (current / w) as i32);
            for np in cp.neighbors_4() {
                if !grid.is_walkable(np) {
                    continue;
                }
                let ni = np.y as usize * w + np.x as usize;
                if self.visited[ni] {
                    continue;
                }
                self.visited[ni] = true;
                self.parent[ni] = current;
                self.queue.push_back(ni);
            }
        }
        PathResult::NotFound
    }
}
