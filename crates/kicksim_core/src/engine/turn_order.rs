//! Decision order within a tick
//!
//! - While a restart is being set up, the restarting side's player closest to
//!   the ball decides first, then its teammates, then the other side. Each
//!   decision sees the placements made before it.
//! - On the first play tick after a restart the same closest player goes
//!   first, then everybody else in shuffled order, again with fresh snapshots.
//! - Otherwise the order is shuffled and everybody decides on the same frozen
//!   snapshot taken before anyone acts.

use crate::engine::environment::{Environment, MatchState, TeamSide};
use crate::engine::rng::SimRng;

/// How decision-makers see the world during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    /// Re-taken before every decision
    Fresh,
    /// Taken once before the first decision
    Frozen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    pub order: Vec<(TeamSide, usize)>,
    pub snapshot: Snapshot,
}

fn slot_of(flat: usize, n_team1: usize) -> (TeamSide, usize) {
    if flat < n_team1 {
        (TeamSide::Team1, flat)
    } else {
        (TeamSide::Team2, flat - n_team1)
    }
}

/// Order of this tick's decisions.
///
/// `shuffled` is the persistent permutation of flat player slots
/// (team 1 first); it is reshuffled in place whenever the order is random.
pub fn plan_turns(env: &Environment, prev_state: MatchState, shuffled: &mut [usize], rng: &mut SimRng) -> TurnPlan {
    let n_team1 = env.team(TeamSide::Team1).len();

    if let Some(kicker) = env.state.restarting_side() {
        let mut order = Vec::with_capacity(env.n_players());
        let closest = env.closest_to_ball(kicker);
        if let Some(first) = closest {
            order.push((kicker, first));
        }
        for n in 0..env.team(kicker).len() {
            if Some(n) != closest {
                order.push((kicker, n));
            }
        }
        let other = kicker.other();
        for n in 0..env.team(other).len() {
            order.push((other, n));
        }
        return TurnPlan { order, snapshot: Snapshot::Fresh };
    }

    rng.shuffle(shuffled);
    let all = shuffled.iter().map(|&flat| slot_of(flat, n_team1));

    if env.state == MatchState::Play {
        if let Some(kicker) = prev_state.restarting_side() {
            let first = env.closest_to_ball(kicker).map(|n| (kicker, n));
            let mut order: Vec<(TeamSide, usize)> = first.into_iter().collect();
            order.extend(all.filter(|slot| Some(*slot) != first));
            return TurnPlan { order, snapshot: Snapshot::Fresh };
        }
    }

    TurnPlan { order: all.collect(), snapshot: Snapshot::Frozen }
}
