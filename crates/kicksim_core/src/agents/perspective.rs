//! Team-relative view of a match
//!
//! Agents reason as if they were team 1 attacking the right goal. For a
//! team 2 agent the rosters, scores, last touch, catch owner and restart
//! states are swapped; whenever the agent's side defends the right goal
//! every coordinate is point-mirrored through the center spot (which also
//! swaps "up" and "down" restarts). Actions are mapped back with
//! [`to_world`].

use crate::engine::action::{Action, ActionType};
use crate::engine::environment::{Environment, MatchState, PlayerInfo, TeamSide};
use crate::engine::vec2::fix_angle_positive;
use std::f64::consts::PI;

/// Restart state seen from the other team.
fn swap_teams(state: MatchState) -> MatchState {
    use MatchState::*;
    match state {
        Kickoff1 => Kickoff2,
        Kickoff2 => Kickoff1,
        Goalkick1Up => Goalkick2Up,
        Goalkick1Down => Goalkick2Down,
        Goalkick2Up => Goalkick1Up,
        Goalkick2Down => Goalkick1Down,
        Corner1Up => Corner2Up,
        Corner1Down => Corner2Down,
        Corner2Up => Corner1Up,
        Corner2Down => Corner1Down,
        Throwin1 => Throwin2,
        Throwin2 => Throwin1,
        Goal1 => Goal2,
        Goal2 => Goal1,
        other => other,
    }
}

/// Restart state after mirroring the pitch upside down.
fn swap_up_down(state: MatchState) -> MatchState {
    use MatchState::*;
    match state {
        Goalkick1Up => Goalkick1Down,
        Goalkick1Down => Goalkick1Up,
        Goalkick2Up => Goalkick2Down,
        Goalkick2Down => Goalkick2Up,
        Corner1Up => Corner1Down,
        Corner1Down => Corner1Up,
        Corner2Up => Corner2Down,
        Corner2Down => Corner2Up,
        other => other,
    }
}

fn mirror_player(p: &PlayerInfo) -> PlayerInfo {
    PlayerInfo {
        pos: -p.pos,
        velocity: -p.velocity,
        direction: fix_angle_positive(p.direction + PI),
        acted: p.acted,
    }
}

/// Whether `side`'s view is point-mirrored.
pub fn is_mirrored(env: &Environment, side: TeamSide) -> bool {
    env.defends_right(side)
}

/// The environment as seen by `side`: own roster first, attacking right.
pub fn own_view(env: &Environment, side: TeamSide) -> Environment {
    let mut view = env.clone();

    if side.is_team2() {
        view.teams.swap(0, 1);
        std::mem::swap(&mut view.score1, &mut view.score2);
        view.last_touched = env.last_touched.other();
        view.catch_owner = env.catch_owner.other();
        view.state = swap_teams(env.state);
    }

    if is_mirrored(env, side) {
        view.state = swap_up_down(view.state);
        view.ball.pos = -view.ball.pos;
        view.ball.velocity = -view.ball.velocity;
        for team in view.teams.iter_mut() {
            for p in team.iter_mut() {
                *p = mirror_player(p);
            }
        }
    }

    view
}

/// Map an action chosen in `side`'s own view back to pitch coordinates.
pub fn to_world(mut action: Action, env: &Environment, side: TeamSide) -> Action {
    if !is_mirrored(env, side) {
        return action;
    }
    match action.kind {
        ActionType::Move => {
            action.data[0] = -action.data[0];
            action.data[1] = -action.data[1];
            action.data[2] = fix_angle_positive(action.data[2] + PI);
        }
        ActionType::Dash | ActionType::Kick => {
            action.data[0] = fix_angle_positive(action.data[0] + PI);
        }
        ActionType::NoOp | ActionType::Catch => {}
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::vec2::Vec2;

    fn sample_env() -> Environment {
        let mut env = Environment::new(2, 1);
        env.teams[0][0].pos = Vec2::new(-10.0, 1.0);
        env.teams[0][1].pos = Vec2::new(-2.0, -3.0);
        env.teams[1][0].pos = Vec2::new(12.0, 2.0);
        env.teams[1][0].direction = PI;
        env.ball.pos = Vec2::new(3.0, 4.0);
        env.score1 = 2;
        env.score2 = 1;
        env.state = MatchState::Corner1Up;
        env.last_touched = TeamSide::Team2;
        env
    }

    #[test]
    fn test_team1_first_half_unchanged() {
        let env = sample_env();
        assert_eq!(own_view(&env, TeamSide::Team1), env);
        let kick = Action::kick(0.5, 0.3);
        assert_eq!(to_world(kick, &env, TeamSide::Team1), kick);
    }

    #[test]
    fn test_team2_view_swaps_and_mirrors() {
        let env = sample_env();
        let view = own_view(&env, TeamSide::Team2);
        assert_eq!(view.teams[0].len(), 1);
        assert_eq!(view.teams[0][0].pos, Vec2::new(-12.0, -2.0));
        assert!(view.teams[0][0].direction.abs() < 1e-12);
        assert_eq!(view.ball.pos, Vec2::new(-3.0, -4.0));
        assert_eq!((view.score1, view.score2), (1, 2));
        assert_eq!(view.last_touched, TeamSide::Team1);
        assert_eq!(view.state, MatchState::Corner2Down);
    }

    #[test]
    fn test_team1_second_half_mirrors_only() {
        let mut env = sample_env();
        env.halftime_passed = true;
        let view = own_view(&env, TeamSide::Team1);
        assert_eq!(view.teams[0].len(), 2);
        assert_eq!(view.ball.pos, Vec2::new(-3.0, -4.0));
        assert_eq!(view.state, MatchState::Corner1Down);
        assert_eq!(view.score1, 2);
    }

    #[test]
    fn test_team2_second_half_not_mirrored() {
        let mut env = sample_env();
        env.halftime_passed = true;
        let view = own_view(&env, TeamSide::Team2);
        assert_eq!(view.ball.pos, env.ball.pos);
        assert_eq!(view.state, MatchState::Corner2Up);
    }

    #[test]
    fn test_move_mapped_back() {
        let env = sample_env();
        let world = to_world(Action::move_to(-5.0, 1.0, 0.0), &env, TeamSide::Team2);
        assert_eq!(world.data[0], 5.0);
        assert_eq!(world.data[1], -1.0);
        assert!((world.data[2] - PI).abs() < 1e-12);
        let dash = to_world(Action::dash(0.0, 0.05), &env, TeamSide::Team2);
        assert!((dash.data[0] - PI).abs() < 1e-12);
        assert_eq!(dash.data[1], 0.05);
    }
}
