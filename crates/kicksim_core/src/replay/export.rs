//! Text export of a match history
//!
//! Two comma-separated files per match:
//!
//! ## `*.states.txt`
//! ```text
//! <version>
//! <team 1 name>
//! <team 2 name>
//! <n1>,<n2>
//! <settings vector>
//! tick,score1,score2,state,ball x,y,vx,vy,{player x,y,vx,vy,dir}*,last_touched,restart_max_range,catch_ticks,catch_owner
//! ...
//! ```
//! Players are listed team 1 first. Sides and the state are written as their
//! integer tags.
//!
//! ## `*.actions.txt`
//! ```text
//! tick,team,player,type,d0,d1,d2
//! ```

use crate::engine::config::Settings;
use crate::engine::environment::Environment;
use crate::error::Result;
use crate::replay::history::History;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const STATES_SUFFIX: &str = ".states.txt";
pub const ACTIONS_SUFFIX: &str = ".actions.txt";

/// Names and constants written in the states header
#[derive(Debug, Clone, Copy)]
pub struct ExportHeader<'a> {
    pub team_names: [&'a str; 2],
    pub settings: &'a Settings,
}

fn settings_vector(s: &Settings) -> String {
    let values = [
        s.pitch_length,
        s.pitch_width,
        s.goal_width,
        s.center_radius,
        s.pole_radius,
        s.ball_radius,
        s.player_radius,
        s.catch_radius,
    ];
    let values2 = [
        s.kick_radius,
        s.kickable_distance,
        s.catchable_distance,
        s.kickable_angle,
        s.kickable_direction_angle,
        s.catchable_angle,
        s.net_length,
        s.catchable_area_length,
        s.catchable_area_width,
        s.corner_min_distance,
        s.throwin_min_distance,
        s.out_pitch_limit,
        s.max_dash_power,
        s.max_kick_power,
        s.player_velocity_decay,
        s.ball_velocity_decay,
        s.max_player_speed,
        s.max_ball_speed,
        s.catch_probability,
        s.player_random_noise,
        s.player_direction_noise,
        s.player_velocity_direction_mix,
        s.ball_inside_player_velocity_displace,
        s.after_catch_distance,
    ];

    let mut fields = Vec::with_capacity(values.len() + values2.len() + 2);
    fields.push(s.ticks_per_time.to_string());
    fields.extend(values.iter().map(f64::to_string));
    fields.push(s.catch_holding_ticks.to_string());
    fields.extend(values2.iter().map(f64::to_string));
    fields.join(",")
}

fn state_row(env: &Environment) -> String {
    let mut fields: Vec<String> = vec![
        env.tick.to_string(),
        env.score1.to_string(),
        env.score2.to_string(),
        env.state.as_u8().to_string(),
    ];
    for v in [env.ball.pos.x, env.ball.pos.y, env.ball.velocity.x, env.ball.velocity.y] {
        fields.push(v.to_string());
    }
    for (_, _, p) in env.players() {
        for v in [p.pos.x, p.pos.y, p.velocity.x, p.velocity.y, p.direction] {
            fields.push(v.to_string());
        }
    }
    fields.push(env.last_touched.index().to_string());
    fields.push(env.restart_max_range.to_string());
    fields.push(env.catch_ticks.to_string());
    fields.push(env.catch_owner.index().to_string());
    fields.join(",")
}

/// Write the header and one line per recorded environment.
pub fn write_states<W: Write>(out: &mut W, history: &History, header: &ExportHeader<'_>) -> Result<()> {
    let sizes = history
        .states()
        .next()
        .map(|env| (env.teams[0].len(), env.teams[1].len()))
        .unwrap_or((0, 0));

    writeln!(out, "{}", crate::VERSION)?;
    writeln!(out, "{}", header.team_names[0])?;
    writeln!(out, "{}", header.team_names[1])?;
    writeln!(out, "{},{}", sizes.0, sizes.1)?;
    writeln!(out, "{}", settings_vector(header.settings))?;
    for env in history.states() {
        writeln!(out, "{}", state_row(env))?;
    }
    Ok(())
}

/// Write one line per recorded action, in resolution order.
pub fn write_actions<W: Write>(out: &mut W, history: &History) -> Result<()> {
    for record in history.ticks() {
        for a in &record.actions {
            writeln!(
                out,
                "{},{},{},{},{},{},{}",
                record.env.tick,
                a.team.index(),
                a.player,
                a.action.kind as u8,
                a.action.data[0],
                a.action.data[1],
                a.action.data[2]
            )?;
        }
    }
    Ok(())
}

/// `"<date> <time>_<seed>"`, the common stem of both export files.
pub fn file_stem(time: DateTime<Local>, seed: u64) -> String {
    format!("{}_{}", time.format("%Y-%m-%d %H-%M-%S"), seed)
}

/// Write both files into `dir` and return their paths (states, actions).
pub fn save_history<P: AsRef<Path>>(
    dir: P,
    history: &History,
    header: &ExportHeader<'_>,
    seed: u64,
) -> Result<(PathBuf, PathBuf)> {
    let stem = file_stem(Local::now(), seed);
    let states_path = dir.as_ref().join(format!("{stem}{STATES_SUFFIX}"));
    let actions_path = dir.as_ref().join(format!("{stem}{ACTIONS_SUFFIX}"));

    let mut states = BufWriter::new(File::create(&states_path)?);
    write_states(&mut states, history, header)?;
    states.flush()?;

    let mut actions = BufWriter::new(File::create(&actions_path)?);
    write_actions(&mut actions, history)?;
    actions.flush()?;

    tracing::debug!(path = %states_path.display(), "history exported");
    Ok((states_path, actions_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::{Action, ActionRecord};
    use crate::engine::environment::{MatchState, TeamSide};
    use crate::engine::vec2::Vec2;
    use chrono::TimeZone;

    fn sample_history() -> History {
        let mut history = History::new();
        let mut env = Environment::new(1, 2);
        env.state = MatchState::Kickoff2;
        env.ball.pos = Vec2::new(0.5, -1.0);
        history.begin_tick(&env);
        history.record_action(ActionRecord { team: TeamSide::Team2, player: 1, action: Action::move_to(1.0, 2.0, 0.5) });
        history.record_action(ActionRecord { team: TeamSide::Team1, player: 0, action: Action::noop() });
        env.tick = 1;
        env.state = MatchState::Play;
        env.score2 = 1;
        history.finish(&env);
        history
    }

    #[test]
    fn test_states_layout() {
        let settings = Settings::default();
        let header = ExportHeader { team_names: ["Reds", "Blues"], settings: &settings };
        let mut buf = Vec::new();
        write_states(&mut buf, &sample_history(), &header).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], crate::VERSION);
        assert_eq!(lines[1], "Reds");
        assert_eq!(lines[2], "Blues");
        assert_eq!(lines[3], "1,2");
        let settings_fields: Vec<&str> = lines[4].split(',').collect();
        assert_eq!(settings_fields.len(), 34);
        assert_eq!(settings_fields[0], "3000");
        assert_eq!(settings_fields[9], "2");

        let row: Vec<&str> = lines[5].split(',').collect();
        assert_eq!(row.len(), 4 + 4 + 3 * 5 + 4);
        assert_eq!(&row[..4], &["0", "0", "0", "3"]);
        assert_eq!(row[4], "0.5");
        assert!(lines[6].starts_with("1,0,1,4,"));
    }

    #[test]
    fn test_actions_layout() {
        let mut buf = Vec::new();
        write_actions(&mut buf, &sample_history()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["0,1,1,1,1,2,0.5", "0,0,0,0,0,0,0"]);
    }

    #[test]
    fn test_file_stem_format() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(file_stem(time, 42), "2024-03-09 14-05-07_42");
    }

    #[test]
    fn test_save_history_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let header = ExportHeader { team_names: ["A", "B"], settings: &settings };
        let (states, actions) = save_history(dir.path(), &sample_history(), &header, 9).unwrap();

        assert!(states.to_string_lossy().ends_with("_9.states.txt"));
        assert!(actions.to_string_lossy().ends_with("_9.actions.txt"));
        let text = std::fs::read_to_string(&states).unwrap();
        assert_eq!(text.lines().count(), 7);
        assert_eq!(std::fs::read_to_string(&actions).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let settings = Settings::default();
        let header = ExportHeader { team_names: ["A", "B"], settings: &settings };
        let err = save_history(&missing, &History::new(), &header, 1).unwrap_err();
        assert!(matches!(err, crate::error::SimError::Io(_)));
    }
}
