//! Decision-maker capability
//!
//! The engine asks every player for one [`Action`] per tick through
//! [`DecisionMaker::step`]. Implementations may be heuristic agents, scripted
//! sequences, or bridges to an external process; the engine never inspects
//! which one it holds.

use crate::engine::action::Action;
use crate::engine::config::Settings;
use crate::engine::environment::Environment;
use crate::engine::pitch::Pitch;
use serde::{Deserialize, Serialize};

/// Read-only snapshot handed to decision-makers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub env: Environment,
    pub pitch: Pitch,
}

/// One player's brain
pub trait DecisionMaker: Send {
    fn step(&mut self, state: &GameState) -> Action;
}

impl<F> DecisionMaker for F
where
    F: FnMut(&GameState) -> Action + Send,
{
    fn step(&mut self, state: &GameState) -> Action {
        self(state)
    }
}

/// Owning roster of decision-makers, index = shirt number (0 = goalkeeper)
pub type Roster = Vec<Box<dyn DecisionMaker>>;

/// Build a roster of `n` players from a factory receiving the shirt number.
pub fn build_team<D, F>(n: usize, mut factory: F) -> Roster
where
    D: DecisionMaker + 'static,
    F: FnMut(usize) -> D,
{
    (0..n).map(|i| Box::new(factory(i)) as Box<dyn DecisionMaker>).collect()
}

/// Roster with a distinct goalkeeper type in slot 0.
pub fn build_team_with_goalkeeper<G, D, FG, FD>(n: usize, goalkeeper: FG, mut outfield: FD) -> Roster
where
    G: DecisionMaker + 'static,
    D: DecisionMaker + 'static,
    FG: FnOnce() -> G,
    FD: FnMut(usize) -> D,
{
    let mut team: Roster = Vec::with_capacity(n);
    if n > 0 {
        team.push(Box::new(goalkeeper()));
    }
    for i in 1..n {
        team.push(Box::new(outfield(i)));
    }
    team
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::ActionType;

    #[test]
    fn test_closure_is_decision_maker() {
        let settings = Settings::default();
        let state = GameState {
            pitch: Pitch::new(&settings),
            settings,
            env: Environment::new(1, 1),
        };
        let mut calls = 0;
        let mut brain = |_: &GameState| {
            calls += 1;
            Action::dash(0.0, 0.01)
        };
        let a = brain.step(&state);
        assert_eq!(a.kind, ActionType::Dash);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_build_team_sizes() {
        let team = build_team(4, |_| |_: &GameState| Action::noop());
        assert_eq!(team.len(), 4);
        let team = build_team_with_goalkeeper(
            3,
            || |_: &GameState| Action::catch(),
            |_| |_: &GameState| Action::noop(),
        );
        assert_eq!(team.len(), 3);
        let empty = build_team_with_goalkeeper(
            0,
            || |_: &GameState| Action::catch(),
            |_| |_: &GameState| Action::noop(),
        );
        assert!(empty.is_empty());
    }
}
