//! Archer Survival Runner
//!
//! Drives a session headlessly with a scripted autopilot, then replays the
//! recorded input and checks the state digest matches.
//!
//! ```text
//! archer-survival [CONFIG.json] [--seed N] [--ticks N] [--realtime]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use archer_survival::{
    TICK_MS, TICK_RATE, VERSION,
    game::{
        config::GameConfig,
        events::GameEventData,
        input::{InputFrame, InputRecording, KeyboardState, FIRE_KEY},
        tick::{replay_session, SimulationLoop},
    },
};

const USAGE: &str = "usage: archer-survival [CONFIG.json] [--seed N] [--ticks N] [--realtime]";

const DEFAULT_SEED: u64 = 12345;

/// Ten minutes at 60 Hz
const DEFAULT_TICKS: u32 = 36_000;

/// Ticks between autopilot direction changes
const STRAFE_PERIOD_TICKS: u32 = 120;

/// Ticks between progress reports
const REPORT_INTERVAL_TICKS: u32 = 600;

#[derive(Debug, PartialEq)]
struct RunnerArgs {
    config_path: Option<PathBuf>,
    seed: u64,
    ticks: u32,
    realtime: bool,
}

fn parse_args<I>(args: I) -> Result<RunnerArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = RunnerArgs {
        config_path: None,
        seed: DEFAULT_SEED,
        ticks: DEFAULT_TICKS,
        realtime: false,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                parsed.seed = value
                    .parse()
                    .with_context(|| format!("invalid seed `{}`", value))?;
            }
            "--ticks" => {
                let value = args.next().context("--ticks needs a value")?;
                parsed.ticks = value
                    .parse()
                    .with_context(|| format!("invalid tick count `{}`", value))?;
            }
            "--realtime" => parsed.realtime = true,
            flag if flag.starts_with("--") => bail!("unknown option `{}`\n{}", flag, USAGE),
            path => {
                if parsed.config_path.is_some() {
                    bail!("more than one config path given\n{}", USAGE);
                }
                parsed.config_path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(parsed)
}

/// Scripted player: holds fire and strafes up and down by pressing keys the
/// way a host's key events would.
struct Autopilot {
    keys: KeyboardState,
}

impl Autopilot {
    fn new() -> Self {
        let mut keys = KeyboardState::new();
        keys.key_down(FIRE_KEY);
        keys.key_down("ArrowDown");
        Self { keys }
    }

    fn steer(&mut self, tick: u32) {
        if tick == 0 || tick % STRAFE_PERIOD_TICKS != 0 {
            return;
        }
        if self.keys.is_key_down("ArrowDown") {
            self.keys.key_up("ArrowDown");
            self.keys.key_down("ArrowUp");
        } else {
            self.keys.key_up("ArrowUp");
            self.keys.key_down("ArrowDown");
        }
    }

    fn frame(&self) -> InputFrame {
        self.keys.snapshot()
    }

    fn shutdown(&mut self) {
        self.keys.release_all();
    }
}

struct Runner {
    session: SimulationLoop,
    autopilot: Autopilot,
    recording: InputRecording,
    total_events: usize,
}

impl Runner {
    fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            session: SimulationLoop::new(config, seed),
            autopilot: Autopilot::new(),
            recording: InputRecording::new(),
            total_events: 0,
        }
    }

    /// Run one tick. Returns true once the session is over.
    fn step(&mut self, t: u32) -> bool {
        self.autopilot.steer(t);
        let frame = self.autopilot.frame();
        self.recording.record(t, frame);

        let result = self.session.update(&frame, u64::from(t) * TICK_MS);
        self.total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::PursuerKilled { pursuer_id, new_score, .. } => {
                    debug!("Tick {}: pursuer {} killed, score {}", event.tick, pursuer_id, new_score);
                }
                GameEventData::SessionEnded { final_score } => {
                    info!("Session ended at tick {} with score {}", event.tick, final_score);
                }
                _ => {}
            }
        }

        let tick = self.session.tick();
        if tick % REPORT_INTERVAL_TICKS == 0 {
            let snapshot = self.session.snapshot();
            info!(
                "Tick {}: health {}, score {}, {} pursuers, {} projectiles, {} events so far",
                tick,
                snapshot.actor.displayed_health,
                snapshot.score,
                snapshot.pursuers.len(),
                snapshot.projectiles.len(),
                self.total_events
            );
        }

        result.session_ended
    }

    fn run(&mut self, ticks: u32) {
        for t in 0..ticks {
            if self.step(t) {
                break;
            }
        }
    }

    async fn run_realtime(&mut self, ticks: u32) {
        let tick_duration = Duration::from_micros(1_000_000 / u64::from(TICK_RATE));
        let mut tick_interval = interval(tick_duration);
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        for t in 0..ticks {
            tick_interval.tick().await;
            if self.step(t) {
                break;
            }
        }
    }

    fn finish(mut self) -> (SimulationLoop, InputRecording, usize) {
        self.autopilot.shutdown();
        self.recording.finalize(self.session.tick());
        (self.session, self.recording, self.total_events)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config_path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    info!("Archer Survival v{}", VERSION);
    info!("Tick Rate: {} Hz, seed {}, budget {} ticks", TICK_RATE, args.seed, args.ticks);

    let mut runner = Runner::new(config, args.seed);
    if args.realtime {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("building tokio runtime")?;
        runtime.block_on(runner.run_realtime(args.ticks));
    } else {
        runner.run(args.ticks);
    }

    let (session, recording, total_events) = runner.finish();
    if !session.is_game_over() {
        warn!("Tick budget exhausted at tick {} with the actor still alive", session.tick());
    }

    let hash = session.compute_hash();
    info!("Total events: {}, input deltas: {}", total_events, recording.deltas().len());
    println!("final score: {}", session.score());
    println!("state digest: {}", hex::encode(hash));

    // Verify determinism by replaying
    let (replayed, _) = replay_session(config, args.seed, &recording, args.ticks, TICK_MS);
    let replay_hash = replayed.compute_hash();
    if replay_hash != hash {
        bail!(
            "replay digest mismatch: live {} vs replay {}",
            hex::encode(hash),
            hex::encode(replay_hash)
        );
    }
    info!("Replay verified: digests match");

    Ok(())
}
