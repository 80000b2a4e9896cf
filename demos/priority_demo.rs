//! Priority pool walkthrough
//!
//! Demonstrates weighted scheduling, the three rejection policies, and
//! elastic growth and reclamation.
//!
//! Run with: RUST_LOG=debug cargo run --example priority_demo

use rust_priority_pool::prelude::*;
use std::thread;
use std::time::Duration;

fn log_task(name: &str) {
    println!(
        "  [Task: {}] executed by thread: {:?}",
        name,
        thread::current().name().unwrap_or("<unnamed>")
    );
}

fn print_status(pool: &ThreadPool, title: &str) {
    let status = pool.status();
    println!("\n--- {} ---", title);
    println!("  Total threads:  {}", status.current_threads);
    println!("  Idle threads:   {}", status.idle_threads);
    println!("  Active threads: {}", status.active_threads);
    println!("  Pending tasks:  {}", status.pending_tasks);
}

fn priority_section() -> Result<()> {
    println!("\n=== 1. Fixed mode and priorities ===");
    let pool = ThreadPool::new();
    pool.set_mode(PoolMode::Fixed);
    pool.start(2)?;
    print_status(&pool, "After start");

    for i in 0..4 {
        pool.submit_with_priority(1, move || {
            thread::sleep(Duration::from_millis(100));
            log_task(&format!("LOW priority {}", i));
        })?;
    }
    let high_a = pool.submit_with_priority(10, || {
        log_task("HIGH priority A");
        100
    })?;
    let high_b = pool.submit_with_priority(10, || {
        log_task("HIGH priority B");
        200
    })?;

    println!("Waiting for HIGH priority results...");
    println!("HIGH priority sum: {}", high_a.wait()? + high_b.wait()?);
    pool.shutdown()
}

fn rejection_section() -> Result<()> {
    println!("\n=== 2. Rejection policies ===");
    let pool = ThreadPool::new();
    pool.set_queue_capacity(1);
    pool.start(1)?;

    pool.submit(|| {
        log_task("Blocker (2s)");
        thread::sleep(Duration::from_secs(2));
    })?;
    thread::sleep(Duration::from_millis(50));
    pool.submit(|| log_task("Queued"))?;
    print_status(&pool, "Queue full");

    println!("\nAbort:");
    match pool.submit(|| log_task("ABORT (should not run)")) {
        Err(e) => println!("  rejected as expected: {}", e),
        Ok(_) => println!("  unexpectedly accepted"),
    }

    println!("\nDiscard:");
    pool.set_rejection_policy(RejectionPolicy::Discard);
    let discarded = pool.submit(|| log_task("DISCARD (should not run)"))?;
    println!("  accepted, discarded = {}", discarded.is_discarded());

    println!("\nRun in caller:");
    pool.set_rejection_policy(RejectionPolicy::RunInCaller);
    let caller = pool.submit(|| {
        log_task("RUN_IN_CALLER");
        "executed by the submitting thread"
    })?;
    println!("  ready on return = {}, result = {}", caller.is_ready(), caller.wait()?);

    pool.shutdown()
}

fn elastic_section() -> Result<()> {
    println!("\n=== 3. Elastic mode ===");
    let config = PoolConfig::new(2)
        .with_mode(PoolMode::Elastic)
        .with_thread_ceiling(10)
        .with_idle_timeout(Duration::from_secs(2));
    let pool = ThreadPool::with_config(config)?;
    pool.start(2)?;
    print_status(&pool, "After start");

    for i in 0..10 {
        pool.submit(move || {
            log_task(&format!("ELASTIC {}", i));
            thread::sleep(Duration::from_secs(1));
        })?;
    }
    thread::sleep(Duration::from_millis(200));
    print_status(&pool, "Under load");

    thread::sleep(Duration::from_secs(4));
    print_status(&pool, "After idle timeout");

    println!("\n{}", pool.status().to_json());
    pool.shutdown()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    priority_section()?;
    rejection_section()?;
    elastic_section()?;

    println!("\nAll sections complete.");
    Ok(())
}
