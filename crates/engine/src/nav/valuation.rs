use crate::world::EntityKind;

const HUNTER_REPULSION: i64 = 6_000_000;
const PLAYER_ATTRACTION: i64 = 15_000_000;

/// Signed attractiveness of a tile `distance` hops away from an entity of `claimant` kind.
///
/// Hunters repel with an inverse-square falloff, the player attracts with an
/// inverse falloff and prey contributes nothing. Hunters maximize the summed
/// score and prey minimize it.
pub fn score(claimant: EntityKind, distance: u32) -> i64 {
    let distance = i64::from(distance.max(1));
    match claimant {
        EntityKind::Hunter => -HUNTER_REPULSION / (distance * distance),
        EntityKind::Prey => 0,
        EntityKind::Player => PLAYER_ATTRACTION / distance,
    }
}
