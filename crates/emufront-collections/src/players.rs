//! Player count parsing for the player-bucket collections

/// Upper bound used for open ranges such as "2+"
pub const OPEN_UPPER_BOUND: i64 = 999;

/// A parsed `players` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRange {
    /// Lower bound, `None` for a bare number
    pub min: Option<i64>,
    pub max: i64,
}

impl PlayerRange {
    /// Parse `N`, `N-M` or `N+`. Empty text has no range.
    pub fn parse(players: &str) -> Option<Self> {
        let players = players.trim();
        if players.is_empty() {
            return None;
        }

        let expanded = players.replace('+', &format!("-{}", OPEN_UPPER_BOUND));
        let (min, max) = match expanded.rfind('-') {
            Some(split) => (Some(leading_int(&expanded[..split])), &expanded[split + 1..]),
            None => (None, expanded.as_str()),
        };

        Some(Self {
            min,
            max: leading_int(max),
        })
    }

    /// Whether `count` players fall in the range.
    ///
    /// Without a positive minimum only an exact match on `max` counts.
    pub fn includes(&self, count: i64) -> bool {
        match self.min {
            Some(min) if min > 0 => min <= count && count <= self.max,
            _ => count == self.max,
        }
    }
}

/// Whether a free-text players field admits `count` players
pub fn players_include(players: Option<&str>, count: i64) -> bool {
    players
        .and_then(PlayerRange::parse)
        .is_some_and(|range| range.includes(count))
}

/// Leading integer of a string, 0 when there is none
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
