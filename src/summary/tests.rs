use serde_json::json;

use super::*;

fn sample_raw() -> RawGame {
    let mut team1_players = serde_json::Map::new();
    for (id, shirt) in [(101, "4"), (102, "5"), (103, "6"), (104, "7"), (105, "8")] {
        team1_players.insert(
            id.to_string(),
            json!({"shirtNumber": shirt, "name": format!("P{shirt}"), "starter": 1}),
        );
    }
    team1_players.insert(
        "106".to_string(),
        json!({"shirtNumber": "9", "name": "P9", "starter": 0, "sMinutes": "35:00"}),
    );
    let mut team2_players = serde_json::Map::new();
    for (id, shirt) in [(201, "10"), (202, "11"), (203, "12"), (204, "13"), (205, "14")] {
        team2_players.insert(
            id.to_string(),
            json!({"shirtNumber": shirt, "name": format!("P{shirt}"), "starter": 1}),
        );
    }
    team2_players.insert(
        "206".to_string(),
        json!({"shirtNumber": "15", "name": "P15", "starter": 0}),
    );

    serde_json::from_value(json!({
        "tm": {
            "1": {"name": "Alphas", "code": "ALP", "pl": team1_players},
            "2": {"name": "Betas", "code": "BET", "pl": team2_players}
        },
        "pbp": [
            {"actionNumber": 1, "gt": "10:00", "period": 1, "tno": 0, "actionType": "period", "subType": "start"},
            {"actionNumber": 2, "gt": "08:00", "period": 1, "tno": 1, "actionType": "2pt", "success": 1, "shirtNumber": "4", "s1": "2", "s2": "0"},
            {"actionNumber": 3, "gt": "07:30", "period": 1, "tno": 2, "actionType": "3pt", "success": 1, "shirtNumber": "10", "s1": "2", "s2": "3"},
            {"actionNumber": 4, "gt": "05:00", "period": 1, "tno": 1, "actionType": "substitution", "subType": "out", "shirtNumber": "4"},
            {"actionNumber": 5, "gt": "05:00", "period": 1, "tno": 1, "actionType": "substitution", "subType": "in", "shirtNumber": "9"},
            {"actionNumber": 6, "gt": "02:00", "period": 1, "tno": 1, "actionType": "freethrow", "success": 1, "shirtNumber": "5", "s1": "3", "s2": "3"},
            {"actionNumber": 7, "gt": "00:00", "period": 1, "tno": 0, "actionType": "period", "subType": "end"},
            {"actionNumber": 8, "gt": "00:00", "period": 4, "tno": 0, "actionType": "period", "subType": "end"}
        ]
    }))
    .unwrap()
}

#[test]
fn assembles_the_game_result() {
    let result = analyze(&sample_raw(), "2418764").unwrap();
    assert_eq!("2418764", result.game_id);
    assert_eq!("Alphas", result.team1.name);
    assert_eq!("ALP", result.team1.code);
    assert_eq!(3, result.team1.score);
    assert_eq!(3, result.team2.score);
    assert_eq!(40, result.total_minutes);
    assert_eq!(0, result.num_ot);
    assert_eq!(4, result.periods.len());
    assert_eq!("Q1", result.periods[0].label);

    let keys: Vec<&str> = result.players.keys().map(String::as_str).collect();
    assert_eq!(vec!["1", "2"], keys);
}

#[test]
fn orders_starters_before_bench_by_court_time() {
    let result = analyze(&sample_raw(), "g").unwrap();
    let team1 = &result.players["1"];
    let shirts: Vec<&str> = team1
        .iter()
        .map(|player| player.shirt_number.as_str())
        .collect();
    // full-game starters first (tied, so by shirt), then the early-hook #4,
    // then the bench cover #9
    assert_eq!(vec!["5", "6", "7", "8", "4", "9"], shirts);
    assert!(team1[0].is_starter);
    assert!(!team1[5].is_starter);

    // bench players who never played are omitted
    let team2 = &result.players["2"];
    assert_eq!(5, team2.len());
    assert!(team2.iter().all(|player| player.shirt_number != "15"));
}

#[test]
fn court_time_and_stats_reconcile() {
    let result = analyze(&sample_raw(), "g").unwrap();
    let team1 = &result.players["1"];
    let hooked = team1.iter().find(|p| p.shirt_number == "4").unwrap();
    assert_eq!(300, hooked.total_seconds);
    assert_eq!(2, hooked.game_stats.pts);
    assert_eq!(1, hooked.game_stats.fgm);
    assert_eq!(40, hooked.minutes.len());
    assert_eq!(2, hooked.minutes[2].pts);
    let seconds: u32 = hooked.minutes.iter().map(|m| m.on_court_seconds).sum();
    assert_eq!(hooked.total_seconds, seconds);

    let cover = team1.iter().find(|p| p.shirt_number == "9").unwrap();
    assert_eq!(2100, cover.total_seconds);
    assert_eq!("106", cover.id);

    let shooter = team1.iter().find(|p| p.shirt_number == "5").unwrap();
    assert_eq!(1, shooter.game_stats.ftm);
    assert_eq!(1, shooter.game_stats.fta);
    assert_eq!(1, shooter.game_stats.pts);
}

#[test]
fn plus_minus_accrues_only_while_on_court() {
    let result = analyze(&sample_raw(), "g").unwrap();
    let team1 = &result.players["1"];
    let hooked = team1.iter().find(|p| p.shirt_number == "4").unwrap();
    // saw the 2-3 exchange in minute 2, left before the free throw
    assert_eq!(-1, hooked.minutes[2].plus_minus);
    assert_eq!(-1, hooked.total_plus_minus);
    let cover = team1.iter().find(|p| p.shirt_number == "9").unwrap();
    assert_eq!(1, cover.minutes[8].plus_minus);
    assert_eq!(1, cover.total_plus_minus);
    let stayer = team1.iter().find(|p| p.shirt_number == "5").unwrap();
    assert_eq!(0, stayer.total_plus_minus);
}

#[test]
fn team_plus_minus_mirrors_and_sums_to_the_margin() {
    let result = analyze(&sample_raw(), "g").unwrap();
    let team1 = &result.team_plus_minus["1"];
    let team2 = &result.team_plus_minus["2"];
    assert_eq!(40, team1.len());
    assert_eq!(-1, team1[2]);
    assert_eq!(1, team1[8]);
    for minute in 0..40 {
        assert_eq!(team1[minute], -team2[minute], "minute {minute}");
    }
    let margin = result.team1.score as i32 - result.team2.score as i32;
    assert_eq!(margin, team1.iter().sum::<i32>());
}

#[test]
fn lineups_list_on_court_names_per_minute() {
    let result = analyze(&sample_raw(), "g").unwrap();
    let lineups = &result.lineups["1"];
    assert_eq!(40, lineups.len());
    assert!(lineups[0].contains(&"P4".to_string()));
    assert!(!lineups[10].contains(&"P4".to_string()));
    assert!(lineups[10].contains(&"P9".to_string()));
    assert_eq!(5, lineups[10].len());
}

#[test]
fn ratings_ride_along_keyed_by_team_and_shirt() {
    let result = analyze(&sample_raw(), "g").unwrap();
    assert!(result.ratings.contains_key("1_4"));
    assert!(result.ratings.contains_key("2_10"));
    let rating = &result.ratings["1_4"];
    // a lone made two over one possession while on court
    assert_eq!(200.0, rating.ortg);
}

#[test]
fn emitted_json_preserves_the_compatibility_fields() {
    let result = analyze(&sample_raw(), "g").unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert!(value.get("teamPlusMinus").is_some());
    assert!(value.get("totalMinutes").is_some());
    assert!(value.get("numOT").is_some());
    let player = &value["players"]["1"][0];
    for field in [
        "id",
        "name",
        "shirtNumber",
        "isStarter",
        "totalSeconds",
        "totalPlusMinus",
        "gameStats",
        "minutes",
    ] {
        assert!(player.get(field).is_some(), "missing {field}");
    }
    let minute = &player["minutes"][0];
    for field in [
        "minute",
        "onCourt",
        "fullMinute",
        "onCourtSeconds",
        "pts",
        "plusMinus",
        "stats",
    ] {
        assert!(minute.get(field).is_some(), "missing {field}");
    }
    let period = &value["periods"][0];
    for field in ["period", "label", "startMinute", "endMinute", "duration"] {
        assert!(period.get(field).is_some(), "missing {field}");
    }
}

#[test]
fn reprocessing_is_byte_identical() {
    let raw = sample_raw();
    let first = serde_json::to_string(&analyze(&raw, "g").unwrap()).unwrap();
    let second = serde_json::to_string(&analyze(&raw, "g").unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn duplicate_shirt_numbers_collapse_instead_of_failing() {
    let raw: RawGame = serde_json::from_value(json!({
        "tm": {
            "1": {"name": "Alphas", "code": "ALP", "pl": {
                "101": {"name": "A", "starter": 1},
                "102": {"name": "B", "starter": 0}
            }},
            "2": {"name": "Betas", "code": "BET", "pl": {}}
        },
        "pbp": [
            {"actionNumber": 1, "gt": "10:00", "period": 1, "tno": 0, "actionType": "period", "subType": "start"},
            {"actionNumber": 2, "gt": "00:00", "period": 4, "tno": 0, "actionType": "period", "subType": "end"}
        ]
    }))
    .unwrap();
    let result = analyze(&raw, "g").unwrap();
    let team1 = &result.players["1"];
    assert_eq!(1, team1.len());
    assert_eq!("101", team1[0].id);
    assert_eq!(2400, team1[0].total_seconds);
    assert_eq!(40, team1[0].minutes.len());
    assert_eq!(40, result.lineups["1"].len());
}

#[test]
fn malformed_stream_fails_the_game() {
    let raw: RawGame = serde_json::from_value(json!({
        "tm": {},
        "pbp": [{"actionNumber": 1, "gt": "10:00", "actionType": "2pt", "tno": 1}]
    }))
    .unwrap();
    assert!(analyze(&raw, "g").is_err());
}
