//! Scripted drill session.
//!
//! Run with: `cargo run --example drill`
//! (set `RUST_LOG=blackjack_drill=debug` to watch draws and queue moves)
//!
//! A simulated player answers 40 hands in Critical mode and gets roughly one
//! in four wrong. The output shows:
//!
//! 1. **Each hand** - cards, whether it came from the mistake queue, the
//!    answer given and the grader's explanation.
//! 2. **Session and lifetime stats** after the run.
//! 3. **Weak spots** and the **mistake queue** as they stand at the end.
//!
//! The stats record is written to a JSON file in the temp directory, so a
//! second run picks up where the first left off.

use std::time::Duration;

use blackjack_drill::{
    client, Action, JsonFileStore, PresentedItem, Trainer, TrainerConfig, TrainingMode,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// A player who knows the chart most of the time.
fn simulated_answer(p: &PresentedItem, rng: &mut StdRng) -> Action {
    if rng.gen_bool(0.75) {
        return p.correct_action;
    }
    let others: Vec<Action> = p
        .available_actions
        .iter()
        .copied()
        .filter(|a| *a != p.correct_action)
        .collect();
    others[rng.gen_range(0..others.len())]
}

fn print_hand(n: usize, p: &PresentedItem) {
    let cards: Vec<String> = p.cards.player.iter().map(|c| c.to_string()).collect();
    let source = if p.served_from_queue { "  [review]" } else { "" };
    println!(
        "#{n:>2}  {:<28} cards {:<12} dealer {}{source}",
        p.item.label(),
        cards.join(" "),
        p.cards.dealer
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let path = std::env::temp_dir().join("blackjack_drill_demo.json");
    let mut trainer = Trainer::new(TrainerConfig::seeded(2024), JsonFileStore::new(&path));
    let mut player = StdRng::seed_from_u64(7);

    println!();
    println!("══ Critical-mode drill: 40 hands ══");
    println!();
    for n in 1..=40 {
        let hand = match trainer.next_item(TrainingMode::Critical) {
            Ok(hand) => hand,
            Err(e) => {
                eprintln!("draw failed: {e}");
                continue;
            }
        };
        print_hand(n, &hand);

        let answer = simulated_answer(&hand, &mut player);
        let think = Duration::from_millis(player.gen_range(600..4000));
        match trainer.submit_timed(answer, think) {
            Ok(result) => {
                let mark = if result.is_correct { "✓" } else { "✗" };
                println!(
                    "      {mark} {answer} (correct: {})  {}",
                    result.correct_action, result.explanation
                );
            }
            Err(e) => println!("      rejected: {e}"),
        }
    }

    let session = trainer.session_stats();
    let life = trainer.lifetime_stats();
    println!();
    println!(
        "Session:  {}/{} ({:.1}%), streak {}",
        session.correct, session.total, session.accuracy, session.streak
    );
    println!(
        "Lifetime: {}/{} ({:.1}%), best streak {}",
        life.total_correct, life.total_hands, life.accuracy, life.best_streak
    );

    println!();
    println!("Weak spots:");
    for spot in trainer.weak_spots(2, 5) {
        println!(
            "  {:<28} {:>5.1}%  ({} tries, {:.2}s avg)",
            spot.label, spot.accuracy, spot.attempts, spot.avg_time_secs
        );
    }

    println!();
    println!("Mistake queue (JSON for a client):");
    match serde_json::to_string_pretty(&client::queue_payload(&trainer.queue_stats())) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("could not render queue: {e}"),
    }
    println!();
    println!("Stats saved to {}", path.display());
}
