use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Coarse time bucket used to group entries for display.
///
/// Variants are declared in display order, so the derived `Ord` is the
/// sort precedence (`Pinned` first, `Older` last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyBand {
    Pinned,
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    Older,
}

impl RecencyBand {
    pub const ALL: [RecencyBand; 8] = [
        RecencyBand::Pinned,
        RecencyBand::Today,
        RecencyBand::Yesterday,
        RecencyBand::ThisWeek,
        RecencyBand::LastWeek,
        RecencyBand::ThisMonth,
        RecencyBand::LastMonth,
        RecencyBand::Older,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RecencyBand::Pinned => "Pinned",
            RecencyBand::Today => "Today",
            RecencyBand::Yesterday => "Yesterday",
            RecencyBand::ThisWeek => "This week",
            RecencyBand::LastWeek => "Last week",
            RecencyBand::ThisMonth => "This month",
            RecencyBand::LastMonth => "Last month",
            RecencyBand::Older => "Older",
        }
    }
}

impl fmt::Display for RecencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecencyBand {
    type Err = String;

    /// Accepts `this-week`, `this_week`, `thisweek` and `This week`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "pinned" => Ok(RecencyBand::Pinned),
            "today" => Ok(RecencyBand::Today),
            "yesterday" => Ok(RecencyBand::Yesterday),
            "thisweek" => Ok(RecencyBand::ThisWeek),
            "lastweek" => Ok(RecencyBand::LastWeek),
            "thismonth" => Ok(RecencyBand::ThisMonth),
            "lastmonth" => Ok(RecencyBand::LastMonth),
            "older" => Ok(RecencyBand::Older),
            _ => Err(format!("unknown band: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_follows_declaration() {
        let mut shuffled = vec![
            RecencyBand::Older,
            RecencyBand::Today,
            RecencyBand::Pinned,
            RecencyBand::LastMonth,
            RecencyBand::ThisWeek,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                RecencyBand::Pinned,
                RecencyBand::Today,
                RecencyBand::ThisWeek,
                RecencyBand::LastMonth,
                RecencyBand::Older,
            ]
        );
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("this-week".parse(), Ok(RecencyBand::ThisWeek));
        assert_eq!("LAST_MONTH".parse(), Ok(RecencyBand::LastMonth));
        assert_eq!("This week".parse(), Ok(RecencyBand::ThisWeek));
        assert!("fortnight".parse::<RecencyBand>().is_err());
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for band in RecencyBand::ALL {
            assert_eq!(band.label().parse(), Ok(band));
        }
    }
}
