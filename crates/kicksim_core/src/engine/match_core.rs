//! Mutable match core
//!
//! [`MatchCore`] bundles everything one tick mutates: the live environment,
//! the shadow copy of the previous sub-step, the random source and the
//! per-tick kick flag. Its behavior is split across `motion`, `collision`,
//! `rules` and `match_state`, each adding an `impl MatchCore` block.

use crate::engine::config::Settings;
use crate::engine::environment::{Environment, MatchState, TeamSide};
use crate::engine::pitch::Pitch;
use crate::engine::rng::SimRng;
use crate::engine::vec2::Vec2;

#[derive(Debug, Clone)]
pub(crate) struct MatchCore {
    pub(crate) settings: Settings,
    pub(crate) pitch: Pitch,
    pub(crate) env: Environment,
    /// Positions as of the start of the current sub-step
    pub(crate) prev: Environment,
    pub(crate) rng: SimRng,
    /// A kick already succeeded this tick
    pub(crate) ball_already_kicked: bool,
    pub(crate) cos_kickable_angle: f64,
    pub(crate) cos_catchable_angle: f64,
}

impl MatchCore {
    pub(crate) fn new(settings: Settings, n_players1: usize, n_players2: usize, seed: u64) -> Self {
        let pitch = Pitch::new(&settings);
        let env = Environment::new(n_players1, n_players2);
        Self {
            cos_kickable_angle: settings.kickable_angle.cos(),
            cos_catchable_angle: settings.catchable_angle.cos(),
            prev: env.clone(),
            env,
            pitch,
            settings,
            rng: SimRng::new(seed),
            ball_already_kicked: false,
        }
    }

    pub(crate) fn reset_players_acted(&mut self) {
        for team in self.env.teams.iter_mut() {
            for p in team.iter_mut() {
                p.acted = false;
            }
        }
    }

    /// First play tick right after a restart: the restart kick is being taken.
    pub(crate) fn is_any_team_kicking(&self) -> bool {
        self.env.state == MatchState::Play && self.prev.state.is_restart()
    }

    /// Center inside the penalty area the side defends.
    pub(crate) fn is_in_own_area(&self, pos: Vec2, side: TeamSide) -> bool {
        self.pitch.in_area(pos, self.env.defends_right(side))
    }

    /// Any part of the body overlaps the penalty area of `area_side`.
    pub(crate) fn body_in_area_of(&self, pos: Vec2, area_side: TeamSide) -> bool {
        self.pitch.body_in_area(pos, self.settings.player_radius, self.env.defends_right(area_side))
    }

    /// Goalkeeper of the side holding the ball, if a hold is active and the
    /// roster has a goalkeeper.
    pub(crate) fn holding_goalkeeper(&self) -> Option<(TeamSide, usize)> {
        let side = self.env.catch_owner;
        if self.env.team(side).is_empty() {
            None
        } else {
            Some((side, 0))
        }
    }

    pub(crate) fn sync_prev(&mut self) {
        self.prev.clone_from(&self.env);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Builders for engine unit tests

    use super::*;
    use crate::engine::environment::PlayerInfo;

    /// Core on the default pitch, noise disabled, play state, given rosters.
    pub(crate) fn quiet_core(team1: &[PlayerInfo], team2: &[PlayerInfo]) -> MatchCore {
        let mut settings = Settings::default();
        settings.player_random_noise = 0.0;
        settings.player_direction_noise = 0.0;
        let mut core = MatchCore::new(settings, team1.len(), team2.len(), 11);
        core.env.teams[0] = team1.to_vec();
        core.env.teams[1] = team2.to_vec();
        core.env.state = MatchState::Play;
        core.env.tick = 1;
        core.sync_prev();
        core
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::quiet_core;
    use super::*;
    use crate::engine::environment::PlayerInfo;

    #[test]
    fn test_kicking_only_right_after_restart() {
        let mut core = quiet_core(&[PlayerInfo::at(-1.0, 0.0, 0.0)], &[]);
        assert!(!core.is_any_team_kicking());
        core.prev.state = MatchState::Throwin1;
        assert!(core.is_any_team_kicking());
        core.env.state = MatchState::Throwin1;
        assert!(!core.is_any_team_kicking());
    }

    #[test]
    fn test_own_area_follows_halftime() {
        let mut core = quiet_core(&[PlayerInfo::at(-15.0, 0.0, 0.0)], &[]);
        let pos = Vec2::new(-15.0, 0.0);
        assert!(core.is_in_own_area(pos, TeamSide::Team1));
        core.env.halftime_passed = true;
        assert!(!core.is_in_own_area(pos, TeamSide::Team1));
        assert!(core.is_in_own_area(pos, TeamSide::Team2));
    }
}
