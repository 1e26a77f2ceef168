use std::collections::HashMap;

use crate::snapshot::RankedPlayer;

/// A current player paired with its entry from the previous run, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDelta {
    pub player: RankedPlayer,
    pub previous: Option<RankedPlayer>,
}

impl PlayerDelta {
    pub fn is_new(&self) -> bool {
        self.previous.is_none()
    }

    /// Previous local rank minus current; positive means the player climbed.
    /// `None` for first-seen players.
    pub fn local_rank_change(&self) -> Option<i64> {
        self.previous
            .as_ref()
            .map(|prev| i64::from(prev.local_rank) - i64::from(self.player.local_rank))
    }

    /// Score gained since the previous run. First-seen players count from zero.
    /// Saturates at the `i64` bounds.
    pub fn score_change(&self) -> i64 {
        let previous = self.previous.as_ref().map_or(0, |prev| prev.score);
        self.player.score.saturating_sub(previous)
    }
}

/// Join current against previous by player id, keeping current order.
pub fn diff_snapshots(current: &[RankedPlayer], previous: &[RankedPlayer]) -> Vec<PlayerDelta> {
    // First entry wins if a corrupt snapshot ever repeats an id.
    let mut by_id: HashMap<&str, &RankedPlayer> = HashMap::with_capacity(previous.len());
    for prev in previous {
        by_id.entry(prev.id.as_str()).or_insert(prev);
    }

    current
        .iter()
        .map(|player| PlayerDelta {
            player: player.clone(),
            previous: by_id.get(player.id.as_str()).map(|prev| (*prev).clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::diff_snapshots;
    use crate::snapshot::RankedPlayer;

    fn ranked(id: &str, score: i64, world_rank: u32, local_rank: u32) -> RankedPlayer {
        RankedPlayer {
            id: id.to_string(),
            name: id.to_uppercase(),
            region: "fi".to_string(),
            score,
            world_rank,
            local_rank,
        }
    }

    #[test]
    fn previous_order_does_not_matter() {
        let current = vec![ranked("a", 30, 1, 1), ranked("b", 20, 2, 2)];
        let previous = vec![ranked("b", 25, 1, 1), ranked("a", 10, 2, 2)];

        let deltas = diff_snapshots(&current, &previous);
        assert_eq!(deltas[0].local_rank_change(), Some(1));
        assert_eq!(deltas[0].score_change(), 20);
        assert_eq!(deltas[1].local_rank_change(), Some(-1));
        assert_eq!(deltas[1].score_change(), -5);
    }

    #[test]
    fn first_seen_player_counts_full_score() {
        let deltas = diff_snapshots(&[ranked("a", 500, 3, 1)], &[]);
        assert!(deltas[0].is_new());
        assert_eq!(deltas[0].local_rank_change(), None);
        assert_eq!(deltas[0].score_change(), 500);
    }

    #[test]
    fn extreme_scores_saturate() {
        let current = vec![ranked("a", i64::MAX, 1, 1), ranked("b", i64::MIN, 2, 2)];
        let previous = vec![ranked("a", -1, 1, 1), ranked("b", 1, 2, 2)];
        let deltas = diff_snapshots(&current, &previous);
        assert_eq!(deltas[0].score_change(), i64::MAX);
        assert_eq!(deltas[1].score_change(), i64::MIN);
    }
}
