//! Property tests for delivery accounting, innings end and speech scheduling.

use crease_cricket::audio::{AudioScheduler, SchedulerTiming};
use crease_cricket::commentary::CommentaryKind;
use crease_cricket::consts::SIM_DT;
use crease_cricket::settings::TargetRange;
use crease_cricket::sim::resolver::innings_result;
use crease_cricket::sim::{GameState, PlayerCharacter};
use crease_cricket::{AssetStatus, Engine, Settings, TickInput};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const TICK: f64 = 1.0 / 60.0;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cursor_never_moves_back(
        chunks in prop::collection::vec((0.0f64..1.0, 0.0f64..2.0), 1..40)
    ) {
        let mut scheduler: AudioScheduler<()> = AudioScheduler::new(SchedulerTiming::default());
        let mut audio_now = 0.0;
        let mut prev = scheduler.cursor();

        for (duration, gap) in chunks {
            audio_now += gap;
            let start = scheduler.enqueue(duration, audio_now);
            prop_assert!(start >= prev);
            prop_assert!(start >= audio_now);
            prop_assert!((scheduler.cursor() - (start + duration)).abs() < 1e-9);
            prev = scheduler.cursor();
        }
    }

    #[test]
    fn continuation_runs_exactly_once(
        duration in 0.05f64..6.0,
        timeout in 0.1f64..10.0,
        clock_rate in 0.0f64..1.5,
        external_net_at in proptest::option::of(0.0f64..12.0),
    ) {
        let mut scheduler = AudioScheduler::new(SchedulerTiming::default());
        scheduler.enqueue(duration, 0.0);
        prop_assert_eq!(scheduler.schedule_continuation(7u32, timeout, 0.0), None);
        let generation = scheduler.pending_generation().unwrap();

        let mut runs = 0;
        let mut now = 0.0;
        let mut external_fired = false;
        while now < 20.0 {
            now += TICK;
            // A clock rate of zero is an audio clock that never advances.
            if scheduler.tick(now, Some(now * clock_rate)).is_some() {
                runs += 1;
            }
            if let Some(at) = external_net_at {
                if !external_fired && now >= at {
                    external_fired = true;
                    if scheduler.on_safety_net(generation, now).is_some() {
                        runs += 1;
                    }
                }
            }
        }
        if scheduler.on_safety_net(generation, now).is_some() {
            runs += 1;
        }
        prop_assert_eq!(runs, 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn innings_accounting(
        seed in any::<u64>(),
        total_balls in 1u32..8,
        max_wickets in 1u32..3,
        target_min in 5u32..30,
        target_span in 0u32..10,
        autoplay in any::<bool>(),
        swing_noise in 0.0f64..0.03,
    ) {
        let settings = Settings {
            total_balls,
            max_wickets,
            target: TargetRange { min: target_min, max: target_min + target_span },
            commentary_enabled: false,
            ..Settings::default()
        };
        let mut engine = Engine::offline(settings, seed);
        engine.set_assets(AssetStatus::all_loaded());
        engine.select_character(PlayerCharacter::Finisher);
        engine.skip_tutorial();
        prop_assert!(engine.start_game());

        let mut noise = Pcg32::seed_from_u64(seed);
        let mut events = Vec::new();
        for _ in 0..(60 * 180) {
            let input = TickInput {
                swing: noise.random_bool(swing_noise),
                autoplay,
                ..TickInput::default()
            };
            engine.tick(&input, SIM_DT);
            events.extend(engine.take_commentary_events());

            // Game over exactly when an end condition holds, checked every tick
            let over = engine.state() == GameState::GameOver;
            prop_assert_eq!(innings_result(engine.counters()).is_some(), over);
            if over {
                break;
            }
        }
        prop_assert_eq!(engine.state(), GameState::GameOver);

        // One ball per delivery event, never zero, never two
        let deliveries: Vec<u32> = events
            .iter()
            .filter(|e| e.kind != CommentaryKind::GameStart && !e.kind.is_terminal())
            .map(|e| e.counters.balls_bowled)
            .collect();
        let expected: Vec<u32> = (1..=deliveries.len() as u32).collect();
        prop_assert_eq!(&deliveries, &expected);

        let terminal: Vec<_> = events.iter().filter(|e| e.kind.is_terminal()).collect();
        prop_assert_eq!(terminal.len(), 1);
        prop_assert!(events.last().is_some_and(|e| e.kind.is_terminal()));
        prop_assert_eq!(terminal[0].counters.balls_bowled, deliveries.len() as u32);
        prop_assert!(deliveries.len() as u32 <= total_balls);
    }
}
