use chase_engine::{InputAction, InputSnapshot};
use serde::Deserialize;

const DEFAULT_IDLE_ELAPSED: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ScriptKey {
    Up,
    Down,
    Left,
    Right,
}

impl ScriptKey {
    fn action(self) -> InputAction {
        match self {
            Self::Up => InputAction::MoveUp,
            Self::Down => InputAction::MoveDown,
            Self::Left => InputAction::MoveLeft,
            Self::Right => InputAction::MoveRight,
        }
    }
}

/// `ticks` consecutive ticks of `elapsed` units with `keys` held.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptStep {
    pub(crate) ticks: u32,
    pub(crate) elapsed: u32,
    #[serde(default)]
    pub(crate) keys: Vec<ScriptKey>,
}

impl ScriptStep {
    fn snapshot(&self) -> InputSnapshot {
        self.keys
            .iter()
            .fold(InputSnapshot::empty(), |snapshot, key| {
                snapshot.with_action_down(key.action(), true)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputScript {
    #[serde(default)]
    pub(crate) steps: Vec<ScriptStep>,
    /// Elapsed units per tick once every step has played out.
    #[serde(default = "default_idle_elapsed")]
    pub(crate) idle_elapsed: u32,
}

impl Default for InputScript {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            idle_elapsed: DEFAULT_IDLE_ELAPSED,
        }
    }
}

fn default_idle_elapsed() -> u32 {
    DEFAULT_IDLE_ELAPSED
}

/// Plays an [`InputScript`] one tick at a time, then idles with no keys held.
#[derive(Debug, Clone)]
pub(crate) struct ScriptCursor<'a> {
    script: &'a InputScript,
    step: usize,
    ticks_into_step: u32,
}

impl<'a> ScriptCursor<'a> {
    pub(crate) fn new(script: &'a InputScript) -> Self {
        Self {
            script,
            step: 0,
            ticks_into_step: 0,
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.script
            .steps
            .iter()
            .enumerate()
            .skip(self.step)
            .all(|(index, step)| {
                let played = if index == self.step {
                    self.ticks_into_step
                } else {
                    0
                };
                step.ticks <= played
            })
    }

    /// Elapsed units and held keys for the next tick.
    pub(crate) fn next_frame(&mut self) -> (u32, InputSnapshot) {
        while let Some(step) = self.script.steps.get(self.step) {
            if self.ticks_into_step < step.ticks {
                self.ticks_into_step += 1;
                return (step.elapsed, step.snapshot());
            }
            self.step += 1;
            self.ticks_into_step = 0;
        }
        (self.script.idle_elapsed, InputSnapshot::empty())
    }
}
