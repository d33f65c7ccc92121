//! Console tables for box scores and rotation stints.

use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Cell, Col, Row, Table};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::boxscore::BoxStat;
use crate::domain::Stint;
use crate::summary::PlayerSummary;

#[derive(Clone, Copy, Debug, Display, EnumIter)]
pub enum StatCol {
    #[strum(serialize = "PTS")]
    Pts,
    #[strum(serialize = "REB")]
    Reb,
    #[strum(serialize = "AST")]
    Ast,
    #[strum(serialize = "STL")]
    Stl,
    #[strum(serialize = "BLK")]
    Blk,
    #[strum(serialize = "FGM")]
    Fgm,
    #[strum(serialize = "FGA")]
    Fga,
    #[strum(serialize = "3PM")]
    Fg3m,
    #[strum(serialize = "3PA")]
    Fg3a,
    #[strum(serialize = "FTM")]
    Ftm,
    #[strum(serialize = "FTA")]
    Fta,
    #[strum(serialize = "TO")]
    Tov,
    #[strum(serialize = "PF")]
    Pf,
}
impl StatCol {
    fn extract(&self, stats: &BoxStat) -> u32 {
        match self {
            StatCol::Pts => stats.pts,
            StatCol::Reb => stats.reb,
            StatCol::Ast => stats.ast,
            StatCol::Stl => stats.stl,
            StatCol::Blk => stats.blk,
            StatCol::Fgm => stats.fgm,
            StatCol::Fga => stats.fga,
            StatCol::Fg3m => stats.fg3m,
            StatCol::Fg3a => stats.fg3a,
            StatCol::Ftm => stats.ftm,
            StatCol::Fta => stats.fta,
            StatCol::Tov => stats.tov,
            StatCol::Pf => stats.pf,
        }
    }
}

pub fn tabulate_box_score(players: &[PlayerSummary]) -> Table {
    let mut cols = vec![
        Col::new(Styles::default().with(MinWidth(20)).with(Left)),
        Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
        Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Right)),
    ];
    cols.extend(
        StatCol::iter().map(|_| Col::new(Styles::default().with(MinWidth(4)).with(HAlign::Right))),
    );
    let mut table = Table::default().with_cols(cols);

    let mut header: Vec<Cell> = vec!["Player".into(), "MIN".into(), "+/-".into()];
    header.extend(StatCol::iter().map(|col| col.to_string().into()));
    table.push_row(Row::new(Styles::default().with(Header(true)), header));

    for player in players {
        let mut cells: Vec<Cell> = vec![
            format!("#{} {}", player.shirt_number, player.name).into(),
            format!("{}:{:02}", player.total_seconds / 60, player.total_seconds % 60).into(),
            format!("{:+}", player.total_plus_minus).into(),
        ];
        cells.extend(
            StatCol::iter().map(|col| col.extract(&player.game_stats).to_string().into()),
        );
        table.push_row(Row::new(Styles::default(), cells));
    }
    table
}

pub fn tabulate_stints(players: &[(String, Vec<Stint>)]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Player".into(),
                "In".into(),
                "Out".into(),
                "MIN".into(),
                "+/-".into(),
            ],
        ));
    for (name, stints) in players {
        for stint in stints {
            table.push_row(Row::new(
                Styles::default(),
                vec![
                    name.clone().into(),
                    clock(stint.time_in).into(),
                    clock(stint.time_out).into(),
                    clock(stint.duration()).into(),
                    format!("{:+}", stint.plus_minus()).into(),
                ],
            ));
        }
    }
    table
}

fn clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
