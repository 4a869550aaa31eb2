use serde::{Deserialize, Serialize};

use crate::world::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

const ACTION_COUNT: usize = 4;

impl InputAction {
    /// Movement keys in the order the player policy consults them.
    pub const PRIORITY: [InputAction; ACTION_COUNT] = [
        InputAction::MoveUp,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::MoveDown,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            InputAction::MoveUp => Direction::Up,
            InputAction::MoveDown => Direction::Down,
            InputAction::MoveLeft => Direction::Left,
            InputAction::MoveRight => Direction::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Movement keys held during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn held_count(&self) -> usize {
        self.actions.down.iter().filter(|down| **down).count()
    }

    /// Directions of held keys, Up > Left > Right > Down.
    pub fn held_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        InputAction::PRIORITY
            .into_iter()
            .filter(move |action| self.is_down(*action))
            .map(InputAction::direction)
    }
}
