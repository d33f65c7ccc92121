//! Offensive/defensive efficiency ratings: points per 100 possessions over
//! a player's stint windows, a pure downstream fold over events + stints.

use crate::domain::{EventKind, GameEvent, Stint, TeamNo};

/// Estimated possessions for `team` within the inclusive elapsed window,
/// using the standard `FGA − OREB + TOV + 0.44·FTA` approximation.
fn possessions_in_window(events: &[GameEvent], team: TeamNo, start: u32, end: u32) -> f64 {
    let mut fga = 0u32;
    let mut oreb = 0u32;
    let mut tov = 0u32;
    let mut fta = 0u32;
    for event in events {
        if event.team != Some(team)
            || event.elapsed_seconds < start
            || event.elapsed_seconds > end
        {
            continue;
        }
        match &event.kind {
            EventKind::Score { points: 2 | 3, .. } => fga += 1,
            EventKind::Score { points: 1, .. } => fta += 1,
            EventKind::Rebound { offensive: true } => oreb += 1,
            EventKind::Turnover => tov += 1,
            _ => {}
        }
    }
    fga as f64 - oreb as f64 + tov as f64 + 0.44 * fta as f64
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StintRating {
    pub possessions: f64,
    pub points_for: i32,
    pub points_against: i32,
    pub ortg: f64,
    pub drtg: f64,
}

pub fn rate_stint(stint: &Stint, events: &[GameEvent]) -> StintRating {
    let points_for = stint.score_team_out as i32 - stint.score_team_in as i32;
    let points_against = stint.score_opp_out as i32 - stint.score_opp_in as i32;

    let team_poss =
        possessions_in_window(events, stint.team, stint.time_in, stint.time_out);
    let opp_poss = possessions_in_window(
        events,
        stint.team.opponent(),
        stint.time_in,
        stint.time_out,
    );

    let ortg = if team_poss > 0.0 {
        points_for as f64 / team_poss * 100.0
    } else {
        0.0
    };
    let drtg = if opp_poss > 0.0 {
        points_against as f64 / opp_poss * 100.0
    } else {
        0.0
    };
    StintRating {
        possessions: team_poss,
        points_for,
        points_against,
        ortg,
        drtg,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerRating {
    pub possessions: f64,
    pub points_for: i32,
    pub points_against: i32,
    pub ortg: f64,
    pub drtg: f64,
    pub net_rating: f64,
}

/// Aggregates stint ratings into one per-player figure. Both rates are
/// normalized by the player's own team possessions, matching how the
/// surrounding site has always displayed them.
pub fn rate_player(stints: &[Stint], events: &[GameEvent]) -> PlayerRating {
    let mut rating = PlayerRating::default();
    for stint in stints {
        let stint_rating = rate_stint(stint, events);
        rating.possessions += stint_rating.possessions;
        rating.points_for += stint_rating.points_for;
        rating.points_against += stint_rating.points_against;
    }
    if rating.possessions > 0.0 {
        rating.ortg = rating.points_for as f64 / rating.possessions * 100.0;
        rating.drtg = rating.points_against as f64 / rating.possessions * 100.0;
        rating.net_rating = rating.ortg - rating.drtg;
    }
    rating
}
