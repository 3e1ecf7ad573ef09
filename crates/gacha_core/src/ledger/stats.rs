//! Per-session pull statistics derived from the ledger history

use super::format::{format_timestamp, SessionRecord};
use crate::banner::Rarity;
use crate::gacha::PityState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullStatistics {
    pub total_pulls: u64,
    pub five_star: u64,
    pub four_star: u64,
    pub three_star: u64,
    pub five_star_rate_up: u64,
    pub four_star_rate_up: u64,

    /// Mean pulls from one 5★ to the next, counting the first from the start
    pub average_pulls_per_five_star: Option<f64>,

    pub current_pity: PityState,
    pub last_pull_at: Option<u64>,
}

impl PullStatistics {
    pub fn from_session(session: &SessionRecord) -> Self {
        let mut stats = PullStatistics {
            total_pulls: session.total_pulls,
            five_star: 0,
            four_star: 0,
            three_star: 0,
            five_star_rate_up: 0,
            four_star_rate_up: 0,
            average_pulls_per_five_star: None,
            current_pity: session.pity,
            last_pull_at: session.history.last().map(|r| r.pulled_at),
        };

        let mut gap_total = 0u64;
        let mut since_five_star = 0u64;
        for record in &session.history {
            since_five_star += 1;
            match record.rarity {
                Rarity::FiveStar => {
                    stats.five_star += 1;
                    stats.five_star_rate_up += record.is_rate_up as u64;
                    gap_total += since_five_star;
                    since_five_star = 0;
                }
                Rarity::FourStar => {
                    stats.four_star += 1;
                    stats.four_star_rate_up += record.is_rate_up as u64;
                }
                Rarity::ThreeStar => stats.three_star += 1,
            }
        }

        if stats.five_star > 0 {
            stats.average_pulls_per_five_star = Some(gap_total as f64 / stats.five_star as f64);
        }
        stats
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Total pulls: {}\n", self.total_pulls));
        out.push_str(&format!(
            "5★: {} ({} rate-up)  4★: {} ({} rate-up)  3★: {}\n",
            self.five_star,
            self.five_star_rate_up,
            self.four_star,
            self.four_star_rate_up,
            self.three_star
        ));
        if let Some(avg) = self.average_pulls_per_five_star {
            out.push_str(&format!("Average pulls per 5★: {:.1}\n", avg));
        }
        out.push_str(&format!(
            "Pity: {} since 5★{}, {} since 4★{}\n",
            self.current_pity.pulls_since_5star,
            if self.current_pity.guaranteed_5star_up { " (next 5★ is rate-up)" } else { "" },
            self.current_pity.pulls_since_4star,
            if self.current_pity.guaranteed_4star_up { " (next 4★ is rate-up)" } else { "" },
        ));
        if let Some(at) = self.last_pull_at {
            out.push_str(&format!("Last pull: {}\n", format_timestamp(at)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::format::PullRecord;

    fn record(rarity: Rarity, is_rate_up: bool, pulled_at: u64) -> PullRecord {
        PullRecord {
            item_id: "x".to_string(),
            rarity,
            is_rate_up,
            banner_id: "moon".to_string(),
            pulled_at,
        }
    }

    #[test]
    fn test_counts_and_average() {
        let mut history = vec![record(Rarity::ThreeStar, false, 1); 9];
        history.push(record(Rarity::FiveStar, false, 2));
        history.push(record(Rarity::FourStar, true, 3));
        history.push(record(Rarity::ThreeStar, false, 3));
        history.push(record(Rarity::FiveStar, true, 4));

        let session = SessionRecord {
            pity: PityState::new(),
            total_pulls: history.len() as u64,
            history,
        };
        let stats = PullStatistics::from_session(&session);

        assert_eq!(stats.total_pulls, 13);
        assert_eq!(stats.five_star, 2);
        assert_eq!(stats.five_star_rate_up, 1);
        assert_eq!(stats.four_star_rate_up, 1);
        assert_eq!(stats.three_star, 10);
        assert_eq!(stats.average_pulls_per_five_star, Some(6.5));
        assert_eq!(stats.last_pull_at, Some(4));
    }

    #[test]
    fn test_empty_session() {
        let stats = PullStatistics::from_session(&SessionRecord::default());
        assert_eq!(stats.total_pulls, 0);
        assert_eq!(stats.average_pulls_per_five_star, None);
        assert!(!stats.summary().contains("Last pull"));
    }
}
