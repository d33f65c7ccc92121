use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use courtflow::data::{GameLog, RawGame, RawTeam};
use courtflow::domain::TeamNo;
use courtflow::periods::PeriodTable;
use courtflow::summary::GameResult;
use courtflow::{print, rotation, summary};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// raw game JSON file to process
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// directory of raw game JSON files to process as a batch
    #[clap(short = 'd', long)]
    dir: Option<PathBuf>,

    /// directory to write per-game result JSON into
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,

    /// print the box score tables
    #[clap(long = "box")]
    box_score: bool,

    /// print the per-player stint tables
    #[clap(long)]
    stints: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.file.is_none() && self.dir.is_none()
            || self.file.is_some() && self.dir.is_some()
        {
            bail!("either the -f or the -d flag must be specified");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    if let Some(out) = &args.out {
        fs::create_dir_all(out)?;
    }

    let files = gather_files(&args)?;
    let mut processed = 0;
    let mut skipped = 0;
    for path in &files {
        // a malformed game is skipped and reported; the batch carries on
        match process_game(path, &args) {
            Ok(()) => processed += 1,
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                skipped += 1;
            }
        }
    }
    info!("{processed} game(s) processed, {skipped} skipped");
    Ok(())
}

fn gather_files(args: &Args) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = vec![];
    if let Some(file) = &args.file {
        files.push(file.clone());
    }
    if let Some(dir) = &args.dir {
        for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                files.push(path);
            }
        }
        files.sort();
    }
    if files.is_empty() {
        bail!("no game files found");
    }
    Ok(files)
}

fn process_game(path: &Path, args: &Args) -> anyhow::Result<()> {
    let game_id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "game".to_string());
    let raw: RawGame = serde_json::from_reader(File::open(path)?)
        .with_context(|| format!("decoding {}", path.display()))?;

    let result = summary::analyze(&raw, &game_id)?;
    info!(
        "{game_id}: {} {} : {} {} over {} periods",
        result.team1.name,
        result.team1.score,
        result.team2.score,
        result.team2.name,
        result.periods.len()
    );
    reconcile_minutes(&raw, &result);

    if args.box_score {
        for (key, team_name) in [("1", &result.team1.name), ("2", &result.team2.name)] {
            let table = print::tabulate_box_score(&result.players[key]);
            println!("{team_name}:\n{}", Console::default().render(&table));
        }
    }
    if args.stints {
        print_stints(&raw)?;
    }

    if let Some(out) = &args.out {
        let out_path = out.join(format!("{game_id}.json"));
        serde_json::to_writer_pretty(File::create(&out_path)?, &result)?;
        info!("wrote {}", out_path.display());
    }
    Ok(())
}

fn print_stints(raw: &RawGame) -> anyhow::Result<()> {
    let mut log = GameLog::try_from(raw)?;
    let table = PeriodTable::from_events(&log.events);
    table.localize(&mut log.events);
    let rotations = rotation::replay(&log.events, &log.roster, &table);
    for team in [TeamNo::One, TeamNo::Two] {
        let players: Vec<_> = log
            .roster_for(team)
            .map(|player| {
                (
                    format!("#{} {}", player.shirt_number, player.name),
                    rotations.stints(team, &player.shirt_number).to_vec(),
                )
            })
            .filter(|(_, stints)| !stints.is_empty())
            .collect();
        let stint_table = print::tabulate_stints(&players);
        println!(
            "{}:\n{}",
            log.teams[team.index()].name,
            Console::default().render(&stint_table)
        );
    }
    Ok(())
}

/// Compares the derived court time against the `sMinutes` figure the feed
/// carries per player and flags divergence beyond two minutes, which almost
/// always means the feed's substitution records were incomplete.
fn reconcile_minutes(raw: &RawGame, result: &GameResult) {
    for (key, players) in &result.players {
        let Some(raw_team) = raw.tm.get(key.as_str()) else {
            continue;
        };
        for player in players {
            if let Some(reported) = reported_minutes(raw_team, &player.id) {
                let derived = player.total_seconds as f64 / 60.0;
                let diff = (derived - reported).abs();
                if diff > 2.0 {
                    warn!(
                        "#{} {}: derived {derived:.1} min vs reported {reported:.1} min",
                        player.shirt_number, player.name
                    );
                }
            }
        }
    }
}

// roster entries are keyed by id in the raw document; shirt numbers may be
// blank or duplicated, so the lookup goes by id
fn reported_minutes(team: &RawTeam, id: &str) -> Option<f64> {
    team.pl
        .get(id)
        .and_then(|pl| pl.s_minutes.as_deref())
        .and_then(parse_stat_minutes)
}

fn parse_stat_minutes(raw: &str) -> Option<f64> {
    match raw.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: f64 = minutes.trim().parse().ok()?;
            let seconds: f64 = seconds.trim().parse().ok()?;
            Some(minutes + seconds / 60.0)
        }
        None => raw.trim().parse().ok(),
    }
}
