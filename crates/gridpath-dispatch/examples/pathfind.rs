//! Headless tour of the pathfinding stack: scatter walls, place markers,
//! sweep a few preview targets through the debounce window, then commit a
//! final path.
//!
//! Run with `RUST_LOG=debug` to watch the dispatch decisions.

use std::sync::mpsc::Receiver;
use std::thread;
use std::time::{Duration, Instant};

use gridpath_core::{CellKind, DEFAULT_WALL_PROBABILITY, GridStore, Point};
use gridpath_dispatch::{Coordinator, CoordinatorConfig, PathEvent, RequestKind};
use gridpath_search::PathResult;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut store = GridStore::new(16, 10);
    let mut rng = SmallRng::seed_from_u64(2024);
    store.generate_random_walls(&mut rng, DEFAULT_WALL_PROBABILITY);

    let open: Vec<Point> = {
        let grid = store.grid();
        grid.points().filter(|&p| grid.at(p) == CellKind::Empty).collect()
    };
    let (Some(&start), Some(&end)) = (open.first(), open.last()) else {
        println!("the dice left no open cells; try another seed");
        return Ok(());
    };
    store.set_start(start);
    store.set_end(end);
    println!(
        "grid {}x{} with {} walls, start {start}, end {end}",
        store.width(),
        store.height(),
        store.grid().count(CellKind::Wall),
    );

    let mut coordinator = Coordinator::new(CoordinatorConfig::default())?;
    let events = coordinator.subscribe();

    // Sweep the pointer toward the end marker. The debounce window keeps
    // restarting, so only the last target actually gets searched.
    for &target in open.iter().rev().take(8) {
        coordinator.request_preview(target);
        coordinator.poll(&store);
        thread::sleep(Duration::from_millis(8));
    }
    pump(&mut coordinator, &store, &events, Duration::from_millis(150));

    // Commit. This pre-empts anything still in flight.
    coordinator.request_final(&store);
    pump(&mut coordinator, &store, &events, Duration::from_millis(250));

    coordinator.shutdown();
    Ok(())
}

/// Poll the coordinator and print whatever it delivers until `window`
/// elapses.
fn pump(
    coordinator: &mut Coordinator,
    store: &GridStore,
    events: &Receiver<PathEvent>,
    window: Duration,
) {
    let deadline = Instant::now() + window;
    while Instant::now() < deadline {
        coordinator.poll(store);
        while let Ok(event) = events.try_recv() {
            report(&event);
        }
        thread::sleep(Duration::from_millis(5));
    }
}

fn report(event: &PathEvent) {
    let kind = match event.kind {
        RequestKind::Preview => "preview",
        RequestKind::Final => "final",
    };
    match &event.result {
        PathResult::Found(path) => {
            let steps: Vec<String> = path.iter().map(|p| p.to_string()).collect();
            println!(
                "{kind} g{}: {} cells: {}",
                event.generation,
                path.len(),
                steps.join(" -> ")
            );
        }
        PathResult::Partial(path) => {
            if let Some(last) = path.last() {
                println!(
                    "{kind} g{}: budget ran out after {} cells, at {last}",
                    event.generation,
                    path.len()
                );
            }
        }
        PathResult::NotFound => println!("{kind} g{}: no path", event.generation),
        // The coordinator never delivers cancelled results.
        PathResult::Cancelled => {}
    }
}
