use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::api::{BettingStats, Match, MatchDetails, MatchStatus, Team};
use crate::state::Selection;

/// Cached view of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub id: i64,
    pub team1: Team,
    pub team2: Team,
    pub team1_odds: Decimal,
    pub team2_odds: Decimal,
    pub status: MatchStatus,
    pub tournament_name: Option<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub stats: Option<BettingStats>,
}

impl MatchSummary {
    /// Team and its current odds, if `team_id` plays in this match.
    pub fn team(&self, team_id: i64) -> Option<(&Team, Decimal)> {
        if self.team1.id == team_id {
            Some((&self.team1, self.team1_odds))
        } else if self.team2.id == team_id {
            Some((&self.team2, self.team2_odds))
        } else {
            None
        }
    }

    /// Case-insensitive match on team names and tournament name.
    /// `query` must already be lowercase.
    fn matches_query(&self, query: &str) -> bool {
        self.team1.team_name.to_lowercase().contains(query)
            || self.team2.team_name.to_lowercase().contains(query)
            || self
                .tournament_name
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(query))
    }
}

impl From<Match> for MatchSummary {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            team1: m.team1,
            team2: m.team2,
            team1_odds: m.team1_odds,
            team2_odds: m.team2_odds,
            status: m.status,
            tournament_name: m.tournament.map(|t| t.tournament_name),
            starts_at: m.match_date,
            stats: None,
        }
    }
}

/// Client-side cache of matches, keyed by id.
///
/// Refreshes from different feeds land here independently; whatever
/// arrives last wins.
#[derive(Debug, Default)]
pub struct MatchBoard {
    matches: BTreeMap<i64, MatchSummary>,
}

impl MatchBoard {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // UPDATES
    // =========================================================================

    /// Insert or overwrite one match. Keeps previously fetched stats.
    pub fn upsert(&mut self, m: Match) {
        let mut summary = MatchSummary::from(m);
        if let Some(existing) = self.matches.get(&summary.id) {
            summary.stats = existing.stats.clone();
        }
        self.matches.insert(summary.id, summary);
    }

    /// Apply a list refresh (upcoming matches feed).
    pub fn apply_matches(&mut self, list: Vec<Match>) {
        for m in list {
            self.upsert(m);
        }
    }

    /// Apply a single-match detail fetch. Returns the updated id.
    pub fn apply_details(&mut self, details: MatchDetails) -> Option<i64> {
        let m = details.fixture?;
        let id = m.id;
        self.upsert(m);
        if let (Some(summary), Some(stats)) = (self.matches.get_mut(&id), details.betting_stats) {
            summary.stats = Some(stats);
        }
        Some(id)
    }

    /// Mark every listed match live. Unknown matches are added.
    /// Returns ids whose status changed.
    pub fn mark_live(&mut self, list: Vec<Match>) -> Vec<i64> {
        let mut changed = Vec::new();
        for m in list {
            let id = m.id;
            let was_live = self
                .matches
                .get(&id)
                .is_some_and(|s| s.status == MatchStatus::Live);
            self.upsert(m);
            if let Some(summary) = self.matches.get_mut(&id) {
                summary.status = MatchStatus::Live;
            }
            if !was_live {
                changed.push(id);
            }
        }
        changed
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn get(&self, match_id: i64) -> Option<&MatchSummary> {
        self.matches.get(&match_id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// All matches in id order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchSummary> {
        self.matches.values()
    }

    /// Build a selection from the board's current odds.
    pub fn selection(&self, match_id: i64, team_id: i64) -> Option<Selection> {
        let summary = self.matches.get(&match_id)?;
        let (team, odds) = summary.team(team_id)?;
        Some(Selection::new(match_id, team_id, team.team_name.clone(), odds))
    }

    /// Matches whose team or tournament name contains `query`.
    /// An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&MatchSummary> {
        let query = query.trim().to_lowercase();
        self.matches
            .values()
            .filter(|m| query.is_empty() || m.matches_query(&query))
            .collect()
    }

    /// Matches not yet started, for countdown display.
    pub fn scheduled(&self) -> impl Iterator<Item = &MatchSummary> {
        self.matches
            .values()
            .filter(|m| m.status == MatchStatus::Scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::sample_match;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_matches_last_write_wins() {
        let mut board = MatchBoard::new();
        board.apply_matches(vec![sample_match(1, dec!(1.50), dec!(2.50))]);
        board.apply_matches(vec![sample_match(1, dec!(1.40), dec!(2.80))]);

        assert_eq!(board.len(), 1);
        let m = board.get(1).unwrap();
        assert_eq!(m.team1_odds, dec!(1.40));
        assert_eq!(m.team2_odds, dec!(2.80));
    }

    #[test]
    fn test_apply_details_keeps_stats_on_later_list_refresh() {
        let mut board = MatchBoard::new();
        let details = MatchDetails {
            fixture: Some(sample_match(3, dec!(1.9), dec!(1.9))),
            betting_stats: Some(BettingStats {
                total_bets: Some(12),
                ..Default::default()
            }),
        };
        assert_eq!(board.apply_details(details), Some(3));

        board.apply_matches(vec![sample_match(3, dec!(1.8), dec!(2.0))]);
        let m = board.get(3).unwrap();
        assert_eq!(m.team1_odds, dec!(1.8));
        assert_eq!(m.stats.as_ref().unwrap().total_bets, Some(12));
    }

    #[test]
    fn test_apply_details_without_match() {
        let mut board = MatchBoard::new();
        assert_eq!(board.apply_details(MatchDetails::default()), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_mark_live_reports_changes_once() {
        let mut board = MatchBoard::new();
        board.apply_matches(vec![sample_match(1, dec!(1.5), dec!(2.5))]);

        let changed = board.mark_live(vec![sample_match(1, dec!(1.5), dec!(2.5))]);
        assert_eq!(changed, vec![1]);
        assert_eq!(board.get(1).unwrap().status, MatchStatus::Live);

        let changed = board.mark_live(vec![sample_match(1, dec!(1.5), dec!(2.5))]);
        assert!(changed.is_empty());
    }

    #[test]
    fn test_selection_uses_board_odds() {
        let mut board = MatchBoard::new();
        board.apply_matches(vec![sample_match(2, dec!(1.75), dec!(2.10))]);

        let sel = board.selection(2, 22).unwrap();
        assert_eq!(sel.team_name, "Vipers 2");
        assert_eq!(sel.odds, dec!(2.10));

        assert!(board.selection(2, 99).is_none()); // Not in this match
        assert!(board.selection(9, 21).is_none()); // Unknown match
    }

    #[test]
    fn test_search() {
        let mut board = MatchBoard::new();
        board.apply_matches(vec![
            sample_match(1, dec!(1.5), dec!(2.5)),
            sample_match(2, dec!(1.5), dec!(2.5)),
        ]);

        assert_eq!(board.search("").len(), 2);
        assert_eq!(board.search("VIPERS 2").len(), 1);
        assert_eq!(board.search("spring").len(), 2); // Tournament name
        assert!(board.search("dragons").is_empty());
    }

    #[test]
    fn test_scheduled_excludes_live() {
        let mut board = MatchBoard::new();
        board.apply_matches(vec![
            sample_match(1, dec!(1.5), dec!(2.5)),
            sample_match(2, dec!(1.5), dec!(2.5)),
        ]);
        board.mark_live(vec![sample_match(2, dec!(1.5), dec!(2.5))]);

        let ids: Vec<i64> = board.scheduled().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }
}
