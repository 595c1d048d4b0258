//! Memory Match entry point
//!
//! The browser build is driven from JavaScript through `platform::WebGame`.
//! Natively this plays one seeded demo round with a simple remembering player
//! and logs what happens (`RUST_LOG=debug` for every event).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use memory_match::consts::SETTLE_DELAY_MS;
    use memory_match::renderer::{Renderer, RoundView};
    use memory_match::sim::{CardState, Difficulty, GameEvent, RoundController};
    use memory_match::{MemoryScoreStore, format_clock};
    use std::collections::HashMap;

    /// Logs each frame at debug and phase changes at info
    struct LogRenderer;

    impl Renderer for LogRenderer {
        fn render(&mut self, view: &RoundView, cause: &GameEvent) {
            log::debug!(
                "{:?} | score {} moves {} clock {}",
                cause,
                view.score,
                view.moves_remaining,
                view.clock
            );
            if !view.status.is_empty() {
                log::info!("{}", view.status);
            }
        }
    }

    env_logger::init();
    log::info!("Memory Match (native) demo starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let difficulty = std::env::args()
        .nth(2)
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or(Difficulty::Easy);

    let mut game =
        RoundController::new(seed, Box::new(MemoryScoreStore::new())).with_renderer(LogRenderer);
    if let Err(err) = game.start_round(difficulty) {
        log::error!("{}", err);
        return;
    }

    // The player remembers every face it has seen
    let mut seen: HashMap<String, Vec<usize>> = HashMap::new();

    while game.phase() == memory_match::Phase::Running {
        // Thinking time between turns
        game.advance(1_500);
        game.take_events();

        let Some(round) = game.round() else { break };
        let hidden: Vec<usize> = round
            .cards
            .iter()
            .filter(|c| c.state == CardState::FaceDown)
            .map(|c| c.id)
            .collect();

        let known_pair = seen.values().find_map(|ids| {
            let open: Vec<usize> = ids.iter().copied().filter(|id| hidden.contains(id)).collect();
            (open.len() == 2).then(|| (open[0], open[1]))
        });

        let (first, second) = match known_pair {
            Some(pair) => pair,
            None => {
                let Some(&first) = hidden.iter().find(|id| !seen.values().flatten().any(|s| s == *id))
                else {
                    break;
                };
                if game.flip(first).is_err() {
                    continue;
                }
                let symbol = game.round().map(|r| r.cards[first].symbol.clone());
                let Some(symbol) = symbol else { break };
                let partner = seen
                    .get(&symbol)
                    .and_then(|ids| ids.iter().copied().find(|id| hidden.contains(id)));
                seen.entry(symbol).or_default().push(first);

                let second = partner.or_else(|| {
                    hidden
                        .iter()
                        .copied()
                        .find(|id| *id != first && !seen.values().flatten().any(|s| s == id))
                });
                match second {
                    Some(second) => {
                        let _ = game.flip(second);
                        if let Some(round) = game.round() {
                            let symbol = round.cards[second].symbol.clone();
                            let ids = seen.entry(symbol).or_default();
                            if !ids.contains(&second) {
                                ids.push(second);
                            }
                        }
                    }
                    None => break,
                }
                game.advance(SETTLE_DELAY_MS);
                continue;
            }
        };

        let _ = game.flip(first);
        let _ = game.flip(second);
        game.advance(SETTLE_DELAY_MS);
    }

    let view = game.snapshot();
    log::info!(
        "Finished {:?}: score {}, moves left {}, time left {}, best {}",
        view.phase,
        view.score,
        view.moves_remaining,
        format_clock(view.seconds_remaining),
        view.best_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm_start, this is just to satisfy the compiler
}
