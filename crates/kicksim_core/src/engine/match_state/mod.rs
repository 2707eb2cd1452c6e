//! # Match State Machine
//!
//! Each [`MatchState`] is described by one [`StateRules`] entry:
//!
//! - `setup`: runs at the start of a tick, before decisions (ball placement,
//!   hold countdown, per-tick resets)
//! - `accepts`: which action types the state resolves; others are ignored
//! - `resolve`: applies one accepted action
//! - `transition`: runs after all decisions (placement limits, collisions,
//!   next state)
//!
//! ## State flow
//! ```text
//! Kickoff -> Play -> (Goal -> Kickoff) | (Goalkick | Corner | Throwin -> Play)
//! ```
//! Restart states always hand over to `Play` after one tick. `Ready`,
//! `Stopped` and `Paused` are never entered by the engine itself.

pub mod out_of_play;
pub mod restarts;

use crate::engine::action::{Action, ActionType};
use crate::engine::environment::{MatchState, TeamSide};
use crate::engine::match_core::MatchCore;

type Hook = fn(&mut MatchCore);
type Resolver = fn(&mut MatchCore, &Action, TeamSide, usize);

/// Behavior of one match state
pub(crate) struct StateRules {
    pub setup: Hook,
    pub accepts: fn(ActionType) -> bool,
    pub resolve: Resolver,
    pub transition: Hook,
}

fn accepts_none(_: ActionType) -> bool {
    false
}

fn accepts_move(kind: ActionType) -> bool {
    kind == ActionType::Move
}

fn accepts_play(kind: ActionType) -> bool {
    matches!(kind, ActionType::Dash | ActionType::Kick | ActionType::Catch)
}

fn resolve_nothing(_: &mut MatchCore, _: &Action, _: TeamSide, _: usize) {}

fn resolve_play(core: &mut MatchCore, action: &Action, side: TeamSide, index: usize) {
    match action.kind {
        ActionType::Dash => core.action_dash(action, side, index),
        ActionType::Kick => core.action_kick(action, side, index),
        ActionType::Catch => core.action_catch(action, side, index),
        ActionType::NoOp | ActionType::Move => {}
    }
}

static IDLE: StateRules = StateRules {
    setup: MatchCore::setup_nothing,
    accepts: accepts_none,
    resolve: resolve_nothing,
    transition: MatchCore::keep_state,
};

static READY: StateRules = StateRules {
    setup: MatchCore::setup_nothing,
    accepts: accepts_move,
    resolve: MatchCore::action_move,
    transition: MatchCore::keep_state,
};

static KICKOFF: StateRules = StateRules {
    setup: MatchCore::setup_kickoff,
    accepts: accepts_move,
    resolve: MatchCore::action_move_kickoff,
    transition: MatchCore::finish_kickoff,
};

static PLAY: StateRules = StateRules {
    setup: MatchCore::setup_play,
    accepts: accepts_play,
    resolve: resolve_play,
    transition: MatchCore::update_collisions_and_movements,
};

static STOPPED: StateRules = StateRules {
    setup: MatchCore::setup_stopped,
    accepts: accepts_none,
    resolve: resolve_nothing,
    transition: MatchCore::keep_state,
};

static GOAL_KICK: StateRules = StateRules {
    setup: MatchCore::setup_goal_kick,
    accepts: accepts_move,
    resolve: MatchCore::action_move_goal_kick,
    transition: MatchCore::finish_goal_kick,
};

static CORNER: StateRules = StateRules {
    setup: MatchCore::setup_corner,
    accepts: accepts_move,
    resolve: MatchCore::action_move_corner,
    transition: MatchCore::finish_corner,
};

static THROW_IN: StateRules = StateRules {
    setup: MatchCore::setup_throw_in,
    accepts: accepts_move,
    resolve: MatchCore::action_move_throw_in,
    transition: MatchCore::finish_throw_in,
};

static HALFTIME: StateRules = StateRules {
    setup: MatchCore::setup_halftime,
    accepts: accepts_none,
    resolve: resolve_nothing,
    transition: MatchCore::keep_state,
};

static GOAL: StateRules = StateRules {
    setup: MatchCore::setup_nothing,
    accepts: accepts_none,
    resolve: resolve_nothing,
    transition: MatchCore::after_goal,
};

pub(crate) fn rules_for(state: MatchState) -> &'static StateRules {
    match state {
        MatchState::Inactive | MatchState::Paused | MatchState::Ended => &IDLE,
        MatchState::Ready => &READY,
        MatchState::Kickoff1 | MatchState::Kickoff2 => &KICKOFF,
        MatchState::Play => &PLAY,
        MatchState::Stopped => &STOPPED,
        MatchState::Goalkick1Up
        | MatchState::Goalkick1Down
        | MatchState::Goalkick2Up
        | MatchState::Goalkick2Down => &GOAL_KICK,
        MatchState::Corner1Up | MatchState::Corner1Down | MatchState::Corner2Up | MatchState::Corner2Down => {
            &CORNER
        }
        MatchState::Throwin1 | MatchState::Throwin2 => &THROW_IN,
        MatchState::Halftime => &HALFTIME,
        MatchState::Goal1 | MatchState::Goal2 => &GOAL,
    }
}

impl MatchCore {
    pub(crate) fn pre_state(&mut self) {
        (rules_for(self.env.state).setup)(self);
    }

    pub(crate) fn check_state(&mut self) {
        (rules_for(self.env.state).transition)(self);
    }

    /// Resolve one decision; actions the current state does not accept are
    /// dropped.
    pub(crate) fn process_action(&mut self, action: &Action, side: TeamSide, index: usize) {
        let rules = rules_for(self.env.state);
        if (rules.accepts)(action.kind) {
            (rules.resolve)(self, action, side, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::environment::PlayerInfo;
    use crate::engine::match_core::test_support::quiet_core;
    use crate::engine::vec2::Vec2;

    #[test]
    fn test_accepted_actions_per_state() {
        for state in MatchState::ALL {
            let rules = rules_for(state);
            let moves = (rules.accepts)(ActionType::Move);
            let dashes = (rules.accepts)(ActionType::Dash);
            assert_eq!(moves, state.is_restart() || state == MatchState::Ready, "{state}");
            assert_eq!(dashes, state == MatchState::Play, "{state}");
            assert!(!(rules.accepts)(ActionType::NoOp));
        }
    }

    #[test]
    fn test_move_ignored_in_play() {
        let mut core = quiet_core(&[PlayerInfo::at(-3.0, 0.0, 0.0)], &[]);
        core.process_action(&Action::move_to(5.0, 5.0, 0.0), TeamSide::Team1, 0);
        assert_eq!(core.env.teams[0][0].pos, Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_dash_ignored_in_restart() {
        let mut core = quiet_core(&[PlayerInfo::at(-3.0, 0.0, 0.0)], &[]);
        core.env.state = MatchState::Throwin2;
        core.process_action(&Action::dash(0.0, 0.05), TeamSide::Team1, 0);
        assert_eq!(core.env.teams[0][0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_restart_returns_to_play_in_one_tick() {
        let restarts: Vec<MatchState> = MatchState::ALL.into_iter().filter(|s| s.is_restart()).collect();
        for state in restarts {
            let mut core = quiet_core(&[PlayerInfo::at(-3.0, 0.0, 0.0)], &[PlayerInfo::at(3.0, 0.0, 0.0)]);
            core.env.state = state;
            core.pre_state();
            core.check_state();
            assert_eq!(core.env.state, MatchState::Play, "{state}");
            assert_eq!(core.prev.state, state, "{state}");
        }
    }

    #[test]
    fn test_idle_states_stay() {
        for state in [MatchState::Inactive, MatchState::Ended, MatchState::Halftime, MatchState::Paused] {
            let mut core = quiet_core(&[], &[]);
            core.env.state = state;
            core.pre_state();
            core.check_state();
            assert_eq!(core.env.state, state);
        }
    }
}
