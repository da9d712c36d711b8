//! The four runtime probes
//!
//! Each probe builds its own [`Store`] and registers only the handlers it
//! needs, so probes share no state and can run in any order or repeatedly.
//! Probes print observations; they do not assert them. The expected answers
//! (ordering, thread identity, rollback inclusion) are properties of the
//! store library and are asserted in its test suite instead.

use crate::config::ProbeConfig;
use anyhow::Result;
use signal_store::{Rectangle, Store, StoreError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// One of the four runnable probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Sync,
    Thread,
    Transaction,
    Iteration,
}

impl Probe {
    /// All probes, in run_all order
    pub const ALL: [Probe; 4] = [
        Probe::Sync,
        Probe::Thread,
        Probe::Transaction,
        Probe::Iteration,
    ];

    /// Parse a probe name as given on the command line
    pub fn from_name(name: &str) -> Option<Probe> {
        match name {
            "sync" => Some(Probe::Sync),
            "thread" => Some(Probe::Thread),
            "transaction" => Some(Probe::Transaction),
            "iteration" => Some(Probe::Iteration),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Probe::Sync => "sync",
            Probe::Thread => "thread",
            Probe::Transaction => "transaction",
            Probe::Iteration => "iteration",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Probe::Sync => "does the caller regain control only after post-save handlers finish",
            Probe::Thread => "do post-save handlers run on the caller's thread",
            Probe::Transaction => "do handler writes roll back with the enclosing transaction",
            Probe::Iteration => "iterate a rectangle's dimensions as single-key entries",
        }
    }

    /// Run this probe with the given configuration
    pub fn run(self, cfg: &ProbeConfig) -> Result<()> {
        log::info!("running probe '{}'", self.name());
        match self {
            Probe::Sync => probe_synchronous_signal(cfg),
            Probe::Thread => probe_thread_identity(cfg),
            Probe::Transaction => probe_transaction_rollback(cfg),
            Probe::Iteration => probe_rectangle_iteration(cfg),
        }
    }
}

/// Run all four probes in order
///
/// No state is shared between probes and no errors are handled between them;
/// the first failing probe aborts the sequence.
pub fn run_all(cfg: &ProbeConfig) -> Result<()> {
    for probe in Probe::ALL {
        probe.run(cfg)?;
    }
    Ok(())
}

/// Probe 1: is post-save dispatch synchronous?
///
/// A deliberately slow handler sleeps before returning; the elapsed wall time
/// of the save shows whether the caller waited for it.
fn probe_synchronous_signal(cfg: &ProbeConfig) -> Result<()> {
    println!("\n=== Probe 1: Synchronous Signal ===");

    let mut store = Store::new();
    let sleep = Duration::from_millis(cfg.sleep_ms);
    store.connect("slow_handler", move |event, _ctx| {
        println!("[signal] started processing '{}'", event.user.username);
        thread::sleep(sleep);
        println!("[signal] finished processing");
        Ok(())
    });

    println!("[main]   creating user...");
    let started = Instant::now();
    let user = store.create_user(&cfg.usernames.sync)?;
    let elapsed = started.elapsed();

    println!(
        "[main]   user created after {:.3}s — control returned only once the handler finished",
        elapsed.as_secs_f64()
    );
    println!("[main]   record: {}", serde_json::to_string(&user)?);
    Ok(())
}

/// Probe 2: do handlers run on the caller's thread?
fn probe_thread_identity(cfg: &ProbeConfig) -> Result<()> {
    println!("\n=== Probe 2: Thread Identity ===");

    let mut store = Store::new();
    let captured = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&captured);
    store.connect("capture_thread", move |_event, _ctx| {
        *slot.lock().unwrap() = Some(thread::current().id());
        Ok(())
    });

    let caller = thread::current().id();
    println!("[main]   thread: {:?}", caller);
    store.create_user(&cfg.usernames.thread)?;

    match *captured.lock().unwrap() {
        Some(handler) => {
            println!("[signal] thread: {:?}", handler);
            println!(
                "[main]   same thread: {}",
                if handler == caller { "yes" } else { "no" }
            );
        }
        None => println!("[main]   handler never ran"),
    }
    Ok(())
}

/// Probe 3: do handler writes share the enclosing transactional scope?
///
/// Assertion-free diagnostic: the profile count after the forced rollback is
/// printed together with its interpretation.
fn probe_transaction_rollback(cfg: &ProbeConfig) -> Result<()> {
    println!("\n=== Probe 3: Transaction Rollback ===");

    let mut store = Store::new();
    store.connect("make_profile", |event, ctx| {
        let profile = ctx.create_profile(event.user.id)?;
        println!("[signal] {} created inside the save's scope", profile.id);
        Ok(())
    });

    let username = cfg.usernames.rollback.clone();
    let result: Result<(), StoreError> = store.transaction(|txn| {
        txn.create_user(&username)?;
        Err(StoreError::Aborted("forced rollback after save".to_string()))
    });

    match result {
        Err(err) => println!("[main]   error caught: {}", err),
        Ok(()) => println!("[main]   transaction unexpectedly committed"),
    }

    println!("[main]   profiles after rollback: {}", store.profile_count());
    println!("[main]   0 means the handler's write was part of the rolled-back scope");
    Ok(())
}

/// Probe 4: custom iteration over a rectangle's dimensions
fn probe_rectangle_iteration(cfg: &ProbeConfig) -> Result<()> {
    println!("\n=== Probe 4: Rectangle Iteration ===");

    let rect = Rectangle::new(cfg.rectangle.length, cfg.rectangle.width);
    for dim in &rect {
        println!("{}", dim);
    }
    Ok(())
}
