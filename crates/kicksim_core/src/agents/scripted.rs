//! Fixed action sequences
//!
//! A [`ScriptedPlayer`] replays a queue of actions, one per call, then
//! answers [`Action::noop`] forever. Useful to build reproducible scenarios.

use crate::engine::action::Action;
use crate::engine::decision::{DecisionMaker, GameState};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    script: VecDeque<Action>,
}

impl ScriptedPlayer {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self { script: actions.into_iter().collect() }
    }

    /// Append `action` repeated `times` times.
    pub fn then(mut self, action: Action, times: usize) -> Self {
        self.script.extend(std::iter::repeat(action).take(times));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DecisionMaker for ScriptedPlayer {
    fn step(&mut self, _state: &GameState) -> Action {
        self.script.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::ActionType;
    use crate::engine::config::Settings;
    use crate::engine::environment::Environment;
    use crate::engine::pitch::Pitch;

    #[test]
    fn test_plays_script_then_noop() {
        let settings = Settings::default();
        let state = GameState { pitch: Pitch::new(&settings), settings, env: Environment::new(1, 0) };
        let mut player = ScriptedPlayer::new([Action::dash(0.0, 0.05)]).then(Action::kick(1.0, 0.3), 2);
        assert_eq!(player.remaining(), 3);
        assert_eq!(player.step(&state).kind, ActionType::Dash);
        assert_eq!(player.step(&state).kind, ActionType::Kick);
        assert_eq!(player.step(&state).kind, ActionType::Kick);
        assert_eq!(player.step(&state).kind, ActionType::NoOp);
        assert_eq!(player.remaining(), 0);
    }
}
