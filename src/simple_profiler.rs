//! Simple search profiling using thread-local counters
//!
//! Counters are kept per thread and merged into global atomics once a search
//! finishes, so rayon workers never contend while searching.
//! Enable with environment variable: OWARE_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

thread_local! {
    static MINIMAX_TIME: RefCell<u64> = RefCell::new(0);
    static MINIMAX_COUNT: RefCell<usize> = RefCell::new(0);
    static ALPHA_BETA_CUTOFFS: RefCell<usize> = RefCell::new(0);

    static EVAL_COUNT: RefCell<usize> = RefCell::new(0);
    static SIMULATE_COUNT: RefCell<usize> = RefCell::new(0);
    static REJECTED_COUNT: RefCell<usize> = RefCell::new(0);
}

// Global aggregators
static GLOBAL_MINIMAX_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_MINIMAX_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_ALPHA_BETA_CUTOFFS: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_EVAL_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SIMULATE_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_REJECTED_COUNT: AtomicUsize = AtomicUsize::new(0);

static FORCE_ENABLED: AtomicBool = AtomicBool::new(false);
static ENV_ENABLED: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn is_profiling_enabled() -> bool {
    FORCE_ENABLED.load(Ordering::Relaxed)
        || *ENV_ENABLED.get_or_init(|| std::env::var("OWARE_PROFILE").is_ok())
}

/// Turns profiling on regardless of the environment (from `[profiling] enabled`)
pub fn enable() {
    FORCE_ENABLED.store(true, Ordering::Relaxed);
}

/// Times one minimax node while alive
pub struct ProfileGuard {
    start: Instant,
}

impl ProfileGuard {
    pub fn new() -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        MINIMAX_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
        MINIMAX_COUNT.with(|c| *c.borrow_mut() += 1);
    }
}

#[inline]
pub fn record_alpha_beta_cutoff() {
    if is_profiling_enabled() {
        ALPHA_BETA_CUTOFFS.with(|c| *c.borrow_mut() += 1);
    }
}

#[inline]
pub fn record_evaluation() {
    if is_profiling_enabled() {
        EVAL_COUNT.with(|c| *c.borrow_mut() += 1);
    }
}

/// Counts one `simulate_move` expansion and whether the rules rejected it
#[inline]
pub fn record_simulation(rejected: bool) {
    if is_profiling_enabled() {
        SIMULATE_COUNT.with(|c| *c.borrow_mut() += 1);
        if rejected {
            REJECTED_COUNT.with(|c| *c.borrow_mut() += 1);
        }
    }
}

fn drain(local: &'static std::thread::LocalKey<RefCell<usize>>, global: &AtomicUsize) {
    local.with(|c| {
        global.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

/// Moves this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    MINIMAX_TIME.with(|t| {
        GLOBAL_MINIMAX_TIME.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
    drain(&MINIMAX_COUNT, &GLOBAL_MINIMAX_COUNT);
    drain(&ALPHA_BETA_CUTOFFS, &GLOBAL_ALPHA_BETA_CUTOFFS);
    drain(&EVAL_COUNT, &GLOBAL_EVAL_COUNT);
    drain(&SIMULATE_COUNT, &GLOBAL_SIMULATE_COUNT);
    drain(&REJECTED_COUNT, &GLOBAL_REJECTED_COUNT);
}

/// Global totals collected since the last `reset`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub nodes: usize,
    pub node_time_ns: u64,
    pub cutoffs: usize,
    pub evaluations: usize,
    pub simulations: usize,
    pub rejected: usize,
}

pub fn snapshot() -> ProfileSnapshot {
    ProfileSnapshot {
        nodes: GLOBAL_MINIMAX_COUNT.load(Ordering::Relaxed),
        node_time_ns: GLOBAL_MINIMAX_TIME.load(Ordering::Relaxed),
        cutoffs: GLOBAL_ALPHA_BETA_CUTOFFS.load(Ordering::Relaxed),
        evaluations: GLOBAL_EVAL_COUNT.load(Ordering::Relaxed),
        simulations: GLOBAL_SIMULATE_COUNT.load(Ordering::Relaxed),
        rejected: GLOBAL_REJECTED_COUNT.load(Ordering::Relaxed),
    }
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let stats = snapshot();
    let cutoff_rate = if stats.nodes > 0 {
        100.0 * stats.cutoffs as f64 / stats.nodes as f64
    } else {
        0.0
    };
    let avg_us = if stats.nodes > 0 {
        stats.node_time_ns as f64 / (stats.nodes * 1000) as f64
    } else {
        0.0
    };

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 SEARCH PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time:   {}ms\n", total_time_ms);
    eprintln!("Minimax:");
    eprintln!("  Nodes:      {}", stats.nodes);
    eprintln!("  Avg:        {:.2}µs/node (inclusive)", avg_us);
    eprintln!("  Cutoffs:    {} ({:.1}%)\n", stats.cutoffs, cutoff_rate);
    eprintln!("Rules:");
    eprintln!("  Evaluations: {}", stats.evaluations);
    eprintln!("  Simulations: {} ({} rejected)", stats.simulations, stats.rejected);
    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    GLOBAL_MINIMAX_TIME.store(0, Ordering::Relaxed);
    GLOBAL_MINIMAX_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_ALPHA_BETA_CUTOFFS.store(0, Ordering::Relaxed);
    GLOBAL_EVAL_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_SIMULATE_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_REJECTED_COUNT.store(0, Ordering::Relaxed);
}

#[macro_export]
macro_rules! profile {
    ($code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new();
        $code
    }};
}
