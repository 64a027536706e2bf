mod cli;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use kairos_engine::event::{EventPool, Stamped};
use kairos_engine::logging::{init_logging, LoggingConfig};
use kairos_engine::time::{FrameClock, Timeline, TimelineConfig};

use cli::{Cli, StudioConfig};

/// Character code captured on the input thread.
type CharEvent = Stamped<u32>;

#[derive(Debug, Default)]
struct WorkerStats {
    frames: u32,
    consumed: u64,
    max_latency_ns: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let config = StudioConfig::from(&cli);

    let timeline = Arc::new(Timeline::from_config(TimelineConfig {
        preference: config.clock,
    }));

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║          KAIROS EVENT STUDIO           ║");
    println!("  ║   input thread  ->  event pool  ->     ║");
    println!("  ║               slow worker              ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();
    println!(
        "  clock   > {} @ {} Hz{}",
        timeline.source_kind(),
        timeline.frequency(),
        if timeline.is_degraded() { " (reduced resolution)" } else { "" },
    );
    println!(
        "  worker  > {} frames x {} passes, {} ms per pass",
        config.frames,
        config.loops_per_frame,
        config.loop_delay.as_millis(),
    );
    println!();

    let pool: Arc<EventPool<CharEvent>> = Arc::new(EventPool::new());
    let running = Arc::new(AtomicBool::new(true));

    let worker = spawn_worker(&config, &timeline, &pool, &running)?;
    let input = spawn_input(&config, &timeline, &pool, &running)?;

    let stats = worker.join();
    // The worker clears the flag itself once its frames are done; this also
    // stops input if it panicked first.
    running.store(false, Ordering::Release);
    let stats = stats.map_err(|_| anyhow!("worker thread panicked"))?;

    let produced = input
        .join()
        .map_err(|_| anyhow!("input thread panicked"))?;

    // Events that arrived after the worker's last pass.
    let leftover = pool.begin_consume().count();

    println!();
    println!("  produced  > {produced}");
    println!("  consumed  > {}", stats.consumed);
    println!("  leftover  > {leftover}");
    println!("  frames    > {}", stats.frames);
    println!("  max wait  > {} us", stats.max_latency_ns / 1_000);
    println!("  uptime    > {:.3} s", timeline.now() as f64 / 1e9);
    println!();

    if stats.consumed + leftover as u64 != produced {
        return Err(anyhow!(
            "event accounting mismatch: produced {produced}, consumed {}, leftover {leftover}",
            stats.consumed,
        ));
    }

    Ok(())
}

/// Stands in for the OS input thread: emits lowercase character codes at a
/// steady pace until the budget is spent or shutdown is requested.
fn spawn_input(
    config: &StudioConfig,
    timeline: &Arc<Timeline>,
    pool: &Arc<EventPool<CharEvent>>,
    running: &Arc<AtomicBool>,
) -> Result<JoinHandle<u64>> {
    let (timeline, pool, running) = (Arc::clone(timeline), Arc::clone(pool), Arc::clone(running));
    let events = config.events;
    let interval = (config.loop_delay / 3).max(Duration::from_millis(1));

    thread::Builder::new()
        .name("kairos-input".into())
        .spawn(move || {
            let mut produced = 0_u64;
            for i in 0..events {
                if !running.load(Ordering::Acquire) {
                    log::debug!("input: shutdown requested after {produced} events");
                    break;
                }

                let code = u32::from(b'a') + i % 26;
                pool.add(timeline.stamp(code));
                produced += 1;

                thread::sleep(interval);
            }
            produced
        })
        .context("failed to spawn input thread")
}

/// Stands in for a render loop that runs slower than input arrives. Each
/// frame performs several short consumption passes.
fn spawn_worker(
    config: &StudioConfig,
    timeline: &Arc<Timeline>,
    pool: &Arc<EventPool<CharEvent>>,
    running: &Arc<AtomicBool>,
) -> Result<JoinHandle<WorkerStats>> {
    let (timeline, pool, running) = (Arc::clone(timeline), Arc::clone(pool), Arc::clone(running));
    let config = config.clone();

    thread::Builder::new()
        .name("kairos-worker".into())
        .spawn(move || {
            let mut stats = WorkerStats::default();
            // A simulated frame spans many passes; widen the default ceiling.
            let mut clock = FrameClock::with_clamps(
                &timeline,
                Duration::from_micros(100),
                Duration::from_secs(60),
            );

            while stats.frames < config.frames {
                for _ in 0..config.loops_per_frame {
                    let mut tx = pool.begin_consume();
                    let mut ev = CharEvent::default();
                    while tx.consume(&mut ev) {
                        let latency = ev.age(timeline.now());
                        stats.max_latency_ns = stats.max_latency_ns.max(latency);
                        stats.consumed += 1;

                        log::info!(
                            "got character with code: {} ({} us after capture)",
                            ev.payload,
                            latency / 1_000,
                        );
                    }
                    tx.end_consume();

                    thread::sleep(config.loop_delay);
                }

                let ft = clock.tick(&timeline);
                log::debug!("frame {} done, dt {:.3} s", ft.frame_index, ft.dt_secs());
                stats.frames += 1;
            }

            // Frame budget spent: tell the input thread to stop producing.
            running.store(false, Ordering::Release);
            stats
        })
        .context("failed to spawn worker thread")
}
