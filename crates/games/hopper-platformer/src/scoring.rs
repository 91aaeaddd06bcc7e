//! Level score and the leaderboard wire formats. Transport is the host's job.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Points per collected star.
pub const STAR_POINTS: u32 = 100;
/// Points per tenth of a second left on the clock.
pub const TIME_POINTS_PER_SEC: f32 = 10.0;
/// Highest score the leaderboard accepts.
pub const MAX_SUBMITTED_SCORE: i64 = 2000;
/// Entries requested when the caller does not say.
pub const LEADERBOARD_MAX_ENTRIES: u32 = 10;

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 15;

/// Everything but ASCII alphanumerics and `-_.` is escaped in path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Score for finishing a level: `stars * 100 + floor(time_remaining * 10)`.
/// Negative or NaN remaining time earns no bonus.
pub fn level_score(stars: u32, time_remaining: f32) -> i64 {
    let bonus = (time_remaining * TIME_POINTS_PER_SEC).floor();
    let bonus = if bonus.is_finite() && bonus > 0.0 { bonus as i64 } else { 0 };
    i64::from(stars) * i64::from(STAR_POINTS) + bonus
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: i64,
}

/// Parse a pipe-delimited listing (`NAME|SCORE|...` per line). Extra fields
/// are ignored; lines without a numeric score are skipped.
pub fn parse_listing(body: &str) -> Vec<LeaderboardEntry> {
    body.split(['\n', '\r'])
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut fields = line.split('|');
            let name = fields.next()?.trim();
            let score = fields.next()?.trim().parse().ok()?;
            Some(LeaderboardEntry {
                player_name: name.to_string(),
                score,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    NameLength(usize),
    NameCharacter(char),
    ScoreOutOfRange(i64),
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameLength(len) => write!(
                f,
                "player name must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters, got {len}"
            ),
            Self::NameCharacter(c) => write!(f, "player name contains invalid character {c:?}"),
            Self::ScoreOutOfRange(score) => {
                write!(f, "score {score} outside 0..={MAX_SUBMITTED_SCORE}")
            },
        }
    }
}

impl std::error::Error for ScoreError {}

/// Names are 3-15 letters, digits or underscores. Letters and digits from any
/// script are fine (`Núñez`); they get escaped in [`submission_path`].
pub fn validate_player_name(name: &str) -> Result<(), ScoreError> {
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(ScoreError::NameLength(len));
    }
    match name.chars().find(|c| !(c.is_alphanumeric() || *c == '_')) {
        Some(c) => Err(ScoreError::NameCharacter(c)),
        None => Ok(()),
    }
}

/// Path for submitting a finished run: `{private_key}/add/{name}/{score}`,
/// with the name percent-encoded as UTF-8.
pub fn submission_path(
    private_key: &str,
    player_name: &str,
    stars: u32,
    time_remaining: f32,
) -> Result<String, ScoreError> {
    validate_player_name(player_name)?;
    let score = level_score(stars, time_remaining);
    if !(0..=MAX_SUBMITTED_SCORE).contains(&score) {
        return Err(ScoreError::ScoreOutOfRange(score));
    }
    let name = utf8_percent_encode(player_name, PATH_SEGMENT);
    Ok(format!("{private_key}/add/{name}/{score}"))
}

/// Path segment for fetching the top `max_entries` (0 means the default).
pub fn listing_path(public_key: &str, max_entries: u32) -> String {
    let max_entries = if max_entries == 0 {
        LEADERBOARD_MAX_ENTRIES
    } else {
        max_entries
    };
    format!("{public_key}/pipe/{max_entries}")
}
