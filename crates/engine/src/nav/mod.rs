mod field;
mod steering;
mod valuation;

pub use field::DistanceField;
pub(crate) use steering::choose_direction;
pub use steering::{
    corridor_direction, junction_scores, resolve_player_direction, select_scored_direction,
    NeighborScores, ScoreGoal,
};
pub use valuation::score;
