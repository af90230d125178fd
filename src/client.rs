use serde_json::{json, Value};
use crate::training_engine::models::{Action, Card, GradeResult, PresentedItem, QueueStats};

/// Card string for the client: "10h", "Ks", "As".
fn to_client_card(c: &Card) -> String {
    c.to_string()
}

fn action_entry(a: Action) -> Value {
    json!({ "code": a.code().to_string(), "label": a.to_string() })
}

/// Payload for a freshly drawn item. The correct action is left out so a
/// client cannot read the answer off the wire.
pub fn item_payload(presented: &PresentedItem) -> Value {
    let item = &presented.item;
    let player: Vec<String> = presented.cards.player.iter().map(to_client_card).collect();
    let actions: Vec<Value> =
        presented.available_actions.iter().copied().map(action_entry).collect();

    json!({
        "key": presented.key.as_str(),
        "handType": item.category.hand_type(),
        "handKey": item.category.hand_key(),
        "label": item.category.label(),
        "dealerCard": item.dealer_upcard.symbol(),
        "weight": item.base_weight,
        "hint": item.hint,
        "fromQueue": presented.served_from_queue,
        "cards": {
            "player": player,
            "dealer": to_client_card(&presented.cards.dealer),
        },
        "actions": actions,
    })
}

/// Payload for a graded answer.
pub fn grade_payload(result: &GradeResult) -> Value {
    json!({
        "isCorrect": result.is_correct,
        "userAction": result.user_action.code().to_string(),
        "correctAction": result.correct_action.code().to_string(),
        "correctLabel": result.correct_action.to_string(),
        "explanation": result.explanation,
        "responseTime": result.response_time_ms,
        "streak": result.streak,
        "sessionAccuracy": format!("{:.1}", result.session_accuracy),
        "fromQueue": result.served_from_queue,
    })
}

/// Payload for the review-queue panel.
pub fn queue_payload(stats: &QueueStats) -> Value {
    let entries: Vec<Value> = stats
        .entries
        .iter()
        .map(|e| {
            json!({
                "key": e.key.as_str(),
                "label": e.label,
                "consecutiveCorrect": e.consecutive_correct,
                "remaining": e.remaining,
            })
        })
        .collect();
    json!({ "count": stats.count, "entries": entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::{MemoryStore, Trainer, TrainerConfig, TrainingMode};
    use std::time::Duration;

    #[test]
    fn item_payload_hides_answer() {
        let mut trainer = Trainer::new(TrainerConfig::seeded(4), MemoryStore::new());
        let item = trainer.next_item(TrainingMode::Balanced).unwrap();
        let payload = item_payload(&item);

        assert_eq!(payload["key"], item.key.as_str());
        assert!(payload.get("correctAction").is_none());
        assert!(payload["cards"]["player"].as_array().unwrap().len() >= 2);
        assert_eq!(
            payload["actions"].as_array().unwrap().len(),
            item.available_actions.len()
        );
    }

    #[test]
    fn grade_payload_reports_answer() {
        let mut trainer = Trainer::new(TrainerConfig::seeded(4), MemoryStore::new());
        let item = trainer.next_item(TrainingMode::Balanced).unwrap();
        let result = trainer
            .submit_timed(item.correct_action, Duration::from_millis(900))
            .unwrap();
        let payload = grade_payload(&result);

        assert_eq!(payload["isCorrect"], true);
        assert_eq!(payload["correctAction"], item.correct_action.code().to_string());
        assert_eq!(payload["responseTime"], 900);
        assert_eq!(payload["sessionAccuracy"], "100.0");
    }

    #[test]
    fn queue_payload_lists_entries() {
        let mut trainer = Trainer::new(TrainerConfig::seeded(8), MemoryStore::new());
        let item = trainer.next_item(TrainingMode::Balanced).unwrap();
        let wrong = item
            .available_actions
            .iter()
            .copied()
            .find(|a| !crate::training_engine::stats::is_acceptable(*a, item.correct_action))
            .unwrap();
        trainer.submit_timed(wrong, Duration::ZERO).unwrap();

        let payload = queue_payload(&trainer.queue_stats());
        assert_eq!(payload["count"], 1);
        assert_eq!(payload["entries"][0]["key"], item.key.as_str());
        assert_eq!(payload["entries"][0]["remaining"], 3);
    }
}
