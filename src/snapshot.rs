use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RankFilter;
use crate::leaderboard::RawRow;

const NAME_COL: usize = 1;
const REGION_COL: usize = 4;
const SCORE_COL: usize = 5;
const ID_COL: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("row {row}: missing {field} column (index {index})")]
    MissingField {
        row: usize,
        index: usize,
        field: &'static str,
    },
    #[error("row {row}: score {value:?} is not a base-10 integer")]
    InvalidScore { row: usize, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub region: String,
    pub score: i64,
}

/// A filtered player with both placements. This is also the persisted
/// snapshot record, so the field names are part of the stored format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    pub id: String,
    pub name: String,
    pub region: String,
    pub score: i64,
    pub world_rank: u32,
    pub local_rank: u32,
}

impl RankedPlayer {
    pub fn new(player: Player, world_rank: u32, local_rank: u32) -> Self {
        Self {
            id: player.id,
            name: player.name,
            region: player.region,
            score: player.score,
            world_rank,
            local_rank,
        }
    }
}

/// Survivors of the filters, ascending by local rank.
pub type RankedSnapshot = Vec<RankedPlayer>;

pub fn parse_player(row_index: usize, row: &RawRow) -> Result<Player, ParseError> {
    let field = |index: usize, field: &'static str| {
        row.get(index).ok_or(ParseError::MissingField {
            row: row_index,
            index,
            field,
        })
    };

    let raw_score = field(SCORE_COL, "score")?;
    let score = raw_score
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidScore {
            row: row_index,
            value: raw_score.clone(),
        })?;

    Ok(Player {
        id: field(ID_COL, "id")?.clone(),
        name: field(NAME_COL, "name")?.clone(),
        region: field(REGION_COL, "region")?.clone(),
        score,
    })
}

pub fn parse_players(rows: &[RawRow]) -> Result<Vec<Player>, ParseError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| parse_player(idx, row))
        .collect()
}

/// Rank the whole population by score, then keep the players the filter
/// admits. World rank counts everyone; local rank counts survivors only.
pub fn rank_players(mut players: Vec<Player>, filter: &RankFilter) -> RankedSnapshot {
    // Stable sort: equal scores keep source order.
    players.sort_by(|a, b| b.score.cmp(&a.score));

    let mut local_rank = 0u32;
    players
        .into_iter()
        .zip(1u32..)
        .filter_map(|(player, world_rank)| {
            if !filter.admits(&player.name, &player.region) {
                return None;
            }
            local_rank += 1;
            Some(RankedPlayer::new(player, world_rank, local_rank))
        })
        .collect()
}

pub fn build_snapshot(rows: &[RawRow], filter: &RankFilter) -> Result<RankedSnapshot, ParseError> {
    let players = parse_players(rows)?;
    Ok(rank_players(players, filter))
}
