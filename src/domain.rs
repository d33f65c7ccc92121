use serde::{Deserialize, Serialize};

/// One of the two sides in a game. The raw feed numbers teams `1` and `2`;
/// that numbering is preserved all the way to the emitted result, where the
/// per-team maps are keyed `"1"` and `"2"`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamNo {
    One,
    Two,
}
impl TeamNo {
    pub fn from_tno(tno: u8) -> Option<TeamNo> {
        match tno {
            1 => Some(TeamNo::One),
            2 => Some(TeamNo::Two),
            _ => None,
        }
    }

    /// Zero-based index for addressing per-team arrays.
    pub fn index(&self) -> usize {
        match self {
            TeamNo::One => 0,
            TeamNo::Two => 1,
        }
    }

    /// The key under which this team appears in the emitted result.
    pub fn key(&self) -> &'static str {
        match self {
            TeamNo::One => "1",
            TeamNo::Two => "2",
        }
    }

    pub fn opponent(&self) -> TeamNo {
        match self {
            TeamNo::One => TeamNo::Two,
            TeamNo::Two => TeamNo::One,
        }
    }
}

/// The decoded kind of a play-by-play event. Unknown action types map to
/// [`EventKind::Other`] rather than failing, so feed evolution degrades to
/// ignored events instead of broken games.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A substitution names the incoming player, the outgoing player, or
    /// both. The raw feed emits one record per direction, so normally
    /// exactly one side is populated.
    Substitution {
        player_in: Option<String>,
        player_out: Option<String>,
    },
    Score {
        points: u8,
        made: bool,
    },
    Rebound {
        offensive: bool,
    },
    Assist,
    Steal,
    Block,
    Turnover,
    Foul,
    PeriodStart,
    PeriodEnd,
    Other,
}

/// A single normalized play-by-play occurrence, positioned on the monotonic
/// elapsed-game-time axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// 1-based period number; 5 and above are overtimes.
    pub period: u8,
    /// Remaining game-clock seconds within the period (counts down).
    pub clock_seconds: u32,
    /// Seconds since the opening tip, monotonic across periods. Assigned
    /// once the period table is known.
    pub elapsed_seconds: u32,
    pub team: Option<TeamNo>,
    /// Shirt number of the acting player, where the event names one.
    pub player: Option<String>,
    pub kind: EventKind,
    /// Feed sequence number; tie-break for same-timestamp events.
    pub sequence: u32,
}

/// A period of play with its position on the elapsed-minute axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub period: u8,
    pub label: String,
    pub start_minute: u32,
    pub end_minute: u32,
    pub duration: u32,
}

/// A continuous on-court interval for one player: the half-open elapsed
/// range `[time_in, time_out)` plus the running score captured at both
/// boundaries, from which plus-minus is differenced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub team: TeamNo,
    pub shirt_number: String,
    pub time_in: u32,
    pub time_out: u32,
    pub score_team_in: u16,
    pub score_opp_in: u16,
    pub score_team_out: u16,
    pub score_opp_out: u16,
}
impl Stint {
    pub fn duration(&self) -> u32 {
        self.time_out - self.time_in
    }

    pub fn contains(&self, elapsed: u32) -> bool {
        self.time_in <= elapsed && elapsed < self.time_out
    }

    pub fn score_diff_in(&self) -> i32 {
        self.score_team_in as i32 - self.score_opp_in as i32
    }

    pub fn score_diff_out(&self) -> i32 {
        self.score_team_out as i32 - self.score_opp_out as i32
    }

    /// Margin swing over the stint from the owning team's perspective.
    pub fn plus_minus(&self) -> i32 {
        self.score_diff_out() - self.score_diff_in()
    }
}

/// One player entry of the game roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: String,
    pub name: String,
    pub shirt_number: String,
    pub team: TeamNo,
    pub is_starter: bool,
    /// Court time as reported by the feed's own stats ("MM:SS"), kept for
    /// reconciliation against the derived figure.
    pub stats_minutes: Option<String>,
}
