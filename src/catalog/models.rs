use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub number: String,
    pub name: String,
    pub country: Option<String>,
    /// Stream URI: http(s) progressive or HLS playlist.
    pub url: String,
    pub logo: Option<String>,
    pub current_show: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_live: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub channel_id: String,
    pub title: String,
    /// Wall-clock slot boundaries, "HH:MM".
    pub start: String,
    pub end: String,
    pub description: Option<String>,
    pub genre: Option<String>,
}

impl Program {
    fn slot(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(&self.start, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end, "%H:%M").ok()?;
        Some((start, end))
    }

    /// Whether this program is on air at the given wall-clock time.
    /// Slots ending after midnight wrap around.
    pub fn is_airing_at(&self, now: NaiveTime) -> bool {
        let Some((start, end)) = self.slot() else {
            return false;
        };
        if start <= end {
            now >= start && now < end
        } else {
            now >= start || now < end
        }
    }

    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub programs: Vec<Program>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchHitKind {
    Channel,
    Program,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub kind: SearchHitKind,
    pub title: String,
    pub subtitle: String,
    /// Channel the hit plays on, so a result can be tuned directly.
    pub channel_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(start: &str, end: &str) -> Program {
        Program {
            channel_id: "tf1".into(),
            title: "Journal".into(),
            start: start.into(),
            end: end.into(),
            description: None,
            genre: None,
        }
    }

    #[test]
    fn airing_inside_slot() {
        let p = program("20:00", "21:00");
        let t = |s| NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        assert!(p.is_airing_at(t("20:00")));
        assert!(p.is_airing_at(t("20:59")));
        assert!(!p.is_airing_at(t("21:00")));
        assert!(!p.is_airing_at(t("19:59")));
    }

    #[test]
    fn overnight_slot_wraps_past_midnight() {
        let p = program("23:30", "01:00");
        let t = |s| NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        assert!(p.is_airing_at(t("23:45")));
        assert!(p.is_airing_at(t("00:30")));
        assert!(!p.is_airing_at(t("01:30")));
    }

    #[test]
    fn unparseable_slot_never_airs() {
        let p = program("soon", "later");
        let t = NaiveTime::parse_from_str("12:00", "%H:%M").unwrap();
        assert!(!p.is_airing_at(t));
    }
}
