use crate::log_main;
use crate::scheduler::clock::{Clock, MonotonicClock};
use crate::simulation::Simulation;
use crate::verbose::{EVENT_SCHEDULER_BACKOFF, EVENT_SCHEDULER_START, EVENT_SCHEDULER_STOP};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Back-off sleep after a failed tick.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);
/// Granularity of cancellable sleeps.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cooperative cancellation signal shared between the host and the loop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken(Arc<AtomicBool>);

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; the loop stops at the next check point.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Fixed-rate tick loop driving a [`Simulation`] on a dedicated thread.
///
/// The loop never terminates on a transient failure: tick errors are logged
/// and followed by a one-second back-off sleep. Cancellation is cooperative
/// and checked before every sleep and between tick phases.
pub struct Scheduler {
    tick_interval_ms: i64,
    startup_delay_ms: i64,
    clock: Arc<dyn Clock>,
    token: ShutdownToken,
}

impl Scheduler {
    /// Creates a scheduler at the given tick rate with a wall clock.
    pub fn new(tick_rate_hz: f64) -> Self {
        Self {
            tick_interval_ms: (1000.0 / tick_rate_hz).round().max(1.0) as i64,
            startup_delay_ms: 0,
            clock: Arc::new(MonotonicClock::new()),
            token: ShutdownToken::new(),
        }
    }

    /// Replaces the clock; tests pass a [`ManualClock`](crate::scheduler::ManualClock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Delays the first tick, e.g. until the host finished loading.
    pub fn with_startup_delay(mut self, delay_ms: i64) -> Self {
        self.startup_delay_ms = delay_ms.max(0);
        self
    }

    /// The cancellation token; hand a clone to the host's shutdown path.
    pub fn token(&self) -> ShutdownToken {
        self.token.clone()
    }

    /// Starts the background worker and transfers the simulation into it.
    ///
    /// Runs until the token fires, then performs a clean shutdown and
    /// returns the simulation through [`SchedulerHandle::stop`].
    pub fn start(self, simulation: Simulation) -> SchedulerHandle {
        let token = self.token.clone();
        log_main!(
            EVENT_SCHEDULER_START,
            "Traffic scheduler started",
            tick_interval_ms = self.tick_interval_ms
        );
        let join = std::thread::spawn(move || {
            run_loop(
                simulation,
                self.clock,
                self.token,
                self.tick_interval_ms,
                self.startup_delay_ms,
            )
        });
        SchedulerHandle { token, join }
    }
}

/// Handle to a running scheduler; part of the host's graceful shutdown.
pub struct SchedulerHandle {
    token: ShutdownToken,
    join: JoinHandle<Simulation>,
}

impl SchedulerHandle {
    /// The cancellation token of the running loop.
    pub fn token(&self) -> ShutdownToken {
        self.token.clone()
    }

    /// Cancels the loop, waits for it to drain, and returns the simulation.
    pub fn stop(self) -> Simulation {
        self.token.cancel();
        match self.join.join() {
            Ok(simulation) => simulation,
            Err(_) => {
                // A panicking worker already logged its error; there is no
                // simulation left to hand back.
                panic!("traffic scheduler worker panicked")
            }
        }
    }
}

fn run_loop(
    mut simulation: Simulation,
    clock: Arc<dyn Clock>,
    token: ShutdownToken,
    tick_interval_ms: i64,
    startup_delay_ms: i64,
) -> Simulation {
    if startup_delay_ms > 0 {
        cancellable_sleep(&token, Duration::from_millis(startup_delay_ms as u64));
    }

    let mut last_update = clock.now_ms();
    while !token.is_cancelled() {
        let now = clock.now_ms();
        let dt = now - last_update;
        if dt >= tick_interval_ms {
            match simulation.tick_cooperative(now, Some(&token)) {
                Ok(_) => {
                    last_update = now;
                }
                Err(err) => {
                    tracing::error!(
                        event = EVENT_SCHEDULER_BACKOFF,
                        error = err.to_string().as_str(),
                        "Tick failed; backing off"
                    );
                    cancellable_sleep(&token, ERROR_BACKOFF);
                }
            }
        } else if !token.is_cancelled() {
            cancellable_sleep(&token, Duration::from_millis((tick_interval_ms - dt) as u64));
        }
    }

    simulation.shutdown();
    log_main!(
        EVENT_SCHEDULER_STOP,
        "Traffic scheduler stopped",
        ticks = simulation.get_ticks()
    );
    simulation
}

/// Sleeps in small slices so cancellation cuts the wait short.
fn cancellable_sleep(token: &ShutdownToken, total: Duration) {
    let mut remaining = total;
    while !token.is_cancelled() && remaining > Duration::ZERO {
        let slice = remaining.min(SLEEP_SLICE);
        std::thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
}
