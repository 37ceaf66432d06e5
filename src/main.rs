//! Typing Nebula entry point
//!
//! Native builds run a headless session: the autopilot types against the live
//! simulation and every presentation event is logged. Useful for balance work
//! (`--tuning`) and soak testing the word feed (`--latency-ms`).

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use clap::Parser;

    use typing_nebula::consts::TICK_MS;
    use typing_nebula::sim::{
        Autopilot, Game, GamePhase, GameSink, HitEvent, Letter, LetterId, NoWords, ThreadedWords,
    };
    use typing_nebula::tuning::Tuning;

    /// Headless Typing Nebula session driven by a simulated typist
    #[derive(Debug, Parser)]
    #[command(name = "typing-nebula", version, about)]
    pub struct Args {
        /// Run seed
        #[arg(long, default_value_t = 0x7e57_ab1e)]
        seed: u64,
        /// Seconds of simulated play
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,
        /// Chance the autopilot types the right key
        #[arg(long, default_value_t = 0.9)]
        accuracy: f32,
        /// Autopilot reaction time in ticks
        #[arg(long, default_value_t = 20.0)]
        reaction_ticks: f32,
        /// JSON tuning overrides
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Comma separated words to spell (random letters if empty)
        #[arg(long, value_delimiter = ',')]
        words: Vec<String>,
        /// Simulated word feed latency
        #[arg(long, default_value_t = 250)]
        latency_ms: u64,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    /// Logs presentation events and keeps a tally
    #[derive(Debug, Default)]
    struct LogSink {
        spawned: u32,
        hits: u32,
        misses: u32,
    }

    impl GameSink for LogSink {
        fn on_spawn(&mut self, letter: &Letter) {
            self.spawned += 1;
            log::debug!("spawn {} #{} at {:?}", letter.character, letter.id, letter.pos);
        }

        fn on_remove(&mut self, id: LetterId) {
            log::trace!("remove #{id}");
        }

        fn on_hit(&mut self, hit: &HitEvent) {
            self.hits += 1;
            log::debug!("hit {} #{}", hit.character, hit.id);
        }

        fn on_miss(&mut self) {
            self.misses += 1;
        }

        fn on_health_changed(&mut self, health: u32) {
            log::debug!("shield {health}");
        }

        fn on_combo_milestone(&mut self, streak: u32) {
            log::info!("Combo x{streak}!");
        }

        fn on_shield_critical(&mut self, health: u32) {
            log::warn!("Critical shield integrity: {health}");
        }

        fn on_level_transition_start(&mut self, next_level: u32) {
            log::info!("Warning - enemies ahead - level {next_level}");
        }

        fn on_game_over(&mut self, final_score: u64) {
            log::info!("Mission failed - final score {final_score}");
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let mut game = if args.words.is_empty() {
            Game::new(tuning, args.seed, NoWords)
        } else {
            let latency = Duration::from_millis(args.latency_ms);
            let source = ThreadedWords::new(args.words.clone(), 4, latency);
            Game::new(tuning, args.seed, source)
        };
        let mut pilot =
            Autopilot::new(args.seed.rotate_left(17), args.accuracy, args.reaction_ticks);
        let mut sink = LogSink::default();

        log::info!("Typing Nebula (headless) starting with seed {}", args.seed);
        game.start(&mut sink);

        let total_ticks = (args.seconds * 1000.0 / TICK_MS).max(0.0) as u64;
        for _ in 0..total_ticks {
            if let Some(key) = pilot.next_key(game.letters(), 1.0) {
                game.on_key(&key.to_string(), &mut sink);
            }
            game.tick(1.0, &mut sink);
            if game.phase() == GamePhase::GameOver {
                break;
            }
        }

        let state = game.state();
        log::info!(
            "Finished after {:.1}s: {:?}, score {}, level {}, shield {}, \
             {} spawned, {} hits, {} misses",
            game.clock_ms() / 1000.0,
            state.phase,
            state.score,
            state.level,
            state.health,
            sink.spawned,
            sink.hits,
            sink.misses
        );

        if args.json {
            let json = serde_json::to_string_pretty(&game.snapshot()).context("encoding snapshot")?;
            println!("{json}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end embeds the library directly
}
