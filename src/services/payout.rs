// Contest winner ranking and prize split

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::PRIZE_SHARES_PERCENT;
use crate::services::money::{percent_of, round2};
use crate::services::validation::calculate_platform_fee;

/// An entry together with the number of votes it received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalliedEntry {
    pub entry_id: i32,
    pub user_id: i32,
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub entry_id: i32,
    pub user_id: i32,
    pub vote_count: i64,
    pub place: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub prize: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub platform_fee: Decimal,
    pub prize_pool: Decimal,
    pub results: Vec<Placement>,
}

/// Orders entries by votes, most first. Ties go to the earlier entry, then the lower id.
pub fn rank_entries(mut entries: Vec<TalliedEntry>) -> Vec<TalliedEntry> {
    entries.sort_by(|a, b| {
        b.vote_count
            .cmp(&a.vote_count)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.entry_id.cmp(&b.entry_id))
    });
    entries
}

/// Splits the pot between the platform and up to three winners (50/30/20).
///
/// Places without an entry are not paid and their share is not handed to
/// the other winners.
pub fn compute_payout(total_pot: Decimal, platform_fee_bp: i32, entries: Vec<TalliedEntry>) -> Payout {
    let platform_fee = calculate_platform_fee(total_pot, platform_fee_bp);
    let prize_pool = round2(total_pot - platform_fee);

    let results = rank_entries(entries)
        .into_iter()
        .zip(PRIZE_SHARES_PERCENT.iter())
        .enumerate()
        .map(|(index, (entry, share))| Placement {
            entry_id: entry.entry_id,
            user_id: entry.user_id,
            vote_count: entry.vote_count,
            place: index as u32 + 1,
            prize: percent_of(prize_pool, *share),
        })
        .collect();

    Payout {
        platform_fee,
        prize_pool,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(entry_id: i32, vote_count: i64, minute: i64) -> TalliedEntry {
        TalliedEntry {
            entry_id,
            user_id: entry_id * 10,
            vote_count,
            created_at: Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minute),
        }
    }

    #[test]
    fn test_three_winners_split_fifty_thirty_twenty() {
        let payout = compute_payout(
            d("100.00"),
            2000,
            vec![entry(1, 1, 0), entry(2, 10, 1), entry(3, 5, 2)],
        );

        assert_eq!(payout.platform_fee, d("20.00"));
        assert_eq!(payout.prize_pool, d("80.00"));

        let summary: Vec<(i32, u32, Decimal)> = payout
            .results
            .iter()
            .map(|p| (p.entry_id, p.place, p.prize))
            .collect();
        assert_eq!(
            summary,
            vec![(2, 1, d("40.00")), (3, 2, d("24.00")), (1, 3, d("16.00"))]
        );
    }

    #[test]
    fn test_single_entry_takes_only_first_share() {
        let payout = compute_payout(d("10.00"), 1000, vec![entry(7, 0, 0)]);

        assert_eq!(payout.platform_fee, d("1.00"));
        assert_eq!(payout.prize_pool, d("9.00"));
        assert_eq!(payout.results.len(), 1);
        assert_eq!(payout.results[0].place, 1);
        assert_eq!(payout.results[0].prize, d("4.50"));
    }

    #[test]
    fn test_only_top_three_are_paid() {
        let entries = (1..=5).map(|i| entry(i, i as i64, 0)).collect();
        let payout = compute_payout(d("5.00"), 3000, entries);

        assert_eq!(payout.results.len(), 3);
        assert_eq!(payout.results[0].entry_id, 5);
        assert_eq!(payout.prize_pool, d("3.50"));
        assert_eq!(payout.results[0].prize, d("1.75"));
        assert_eq!(payout.results[1].prize, d("1.05"));
        assert_eq!(payout.results[2].prize, d("0.70"));
    }

    #[test]
    fn test_ties_go_to_earliest_entry() {
        let ranked = rank_entries(vec![entry(3, 4, 5), entry(9, 4, 1), entry(4, 4, 1)]);
        let order: Vec<i32> = ranked.iter().map(|e| e.entry_id).collect();
        assert_eq!(order, vec![4, 9, 3]);
    }

    #[test]
    fn test_empty_contest_keeps_whole_pool_unpaid() {
        let payout = compute_payout(d("0"), 2000, vec![]);
        assert!(payout.results.is_empty());
        assert_eq!(payout.platform_fee, d("0"));
        assert_eq!(payout.prize_pool, d("0"));
    }
}
