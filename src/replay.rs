// Replay module for checking logged games against the current rules and search
//
// This module provides functionality to:
// 1. Parse JSONL move logs written by the debug logger
// 2. Re-apply every logged move and compare the resulting position
// 3. Re-run the search for AI moves and compare the chosen house
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::{MoveLogEntry, MoveSource};
use crate::rules;
use crate::search;
use crate::types::{Player, TOTAL_SEEDS};

/// Result of replaying a single logged move
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub ply: usize,
    pub player: Player,
    pub house: u8,
    pub source: MoveSource,
    /// Re-applying the move reproduced the logged `after` position
    pub rules_match: bool,
    /// Search output, AI moves only
    pub replayed_move: Option<u8>,
    pub replayed_score: Option<i32>,
    pub search_depth: Option<u8>,
    pub search_match: Option<bool>,
    pub computation_time_ms: u128,
}

impl ReplayResult {
    pub fn matches(&self) -> bool {
        self.rules_match && self.search_match != Some(false)
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default, PartialEq)]
pub struct ReplayStats {
    pub total_moves: usize,
    pub rules_mismatches: usize,
    pub ai_moves: usize,
    pub search_matches: usize,
    pub search_mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing move logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
    depth_override: Option<u8>,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            config,
            verbose,
            depth_override: None,
        }
    }

    /// Searches AI moves at `depth` instead of the logged depth
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth_override = Some(depth);
        self
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<MoveLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: MoveLogEntry = serde_json::from_str(&line).map_err(|e| {
                format!("Failed to parse JSON on line {}: {}", line_num + 1, e)
            })?;

            if !entry.before.is_well_formed() || !entry.after.is_well_formed() {
                return Err(format!(
                    "Failed to parse position on line {}: more than {} beads",
                    line_num + 1,
                    TOTAL_SEEDS
                ));
            }

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Depth used to replay an AI entry, capped at `max_depth`
    fn depth_for(&self, entry: &MoveLogEntry) -> u8 {
        let requested = self
            .depth_override
            .or(entry.depth)
            .unwrap_or(self.config.search.default_depth);
        let depth = self.config.search.clamp_depth(requested);
        if depth < requested {
            warn!(
                "Ply {}: depth {} exceeds max_depth, replaying at {}",
                entry.ply, requested, depth
            );
        }
        depth
    }

    /// Latest entry logged for `ply`
    ///
    /// Undone moves and earlier games in the same log reuse ply numbers;
    /// the entry written last wins.
    fn find_ply<'a>(entries: &'a [MoveLogEntry], ply: usize) -> Option<&'a MoveLogEntry> {
        entries.iter().rev().find(|e| e.ply == ply)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &MoveLogEntry) -> ReplayResult {
        let start_time = Instant::now();

        let well_formed = entry.before.is_well_formed();
        let rules_match = well_formed
            && rules::simulate_move(entry.house, &entry.before, entry.player)
                .map(|after| after == entry.after)
                .unwrap_or(false);

        let mut result = ReplayResult {
            ply: entry.ply,
            player: entry.player,
            house: entry.house,
            source: entry.source,
            rules_match,
            replayed_move: None,
            replayed_score: None,
            search_depth: None,
            search_match: None,
            computation_time_ms: 0,
        };

        if entry.source == MoveSource::Ai && well_formed {
            let depth = self.depth_for(entry);
            let strategy = search::determine_strategy(depth, &self.config.search);
            let searched = search::choose_move(&entry.before, entry.player, depth, strategy);

            result.replayed_move = searched.best_move;
            result.replayed_score = Some(searched.score);
            result.search_depth = Some(depth);
            result.search_match = Some(searched.best_move == Some(entry.house));
        }
        result.computation_time_ms = start_time.elapsed().as_millis();

        if !result.rules_match {
            warn!(
                "Ply {}: ✗ RULES MISMATCH - player '{}' house {} no longer reproduces the logged position",
                entry.ply, entry.player, entry.house
            );
        } else if self.verbose {
            match result.search_match {
                Some(true) | None => info!(
                    "Ply {}: ✓ MATCH - player '{}' house {} ({:?})",
                    entry.ply, entry.player, entry.house, entry.source
                ),
                Some(false) => warn!(
                    "Ply {}: ✗ SEARCH MISMATCH - logged house {}, replayed {:?} (score: {:?}, depth: {:?})",
                    entry.ply, entry.house, result.replayed_move, result.replayed_score, result.search_depth
                ),
            }
        }

        result
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[MoveLogEntry]) -> Vec<ReplayResult> {
        entries.iter().map(|entry| self.replay_entry(entry)).collect()
    }

    /// Replays specific plies from a log file
    pub fn replay_plies(
        &self,
        entries: &[MoveLogEntry],
        plies: &[usize],
    ) -> Result<Vec<ReplayResult>, String> {
        plies
            .iter()
            .map(|ply| {
                Self::find_ply(entries, *ply)
                    .map(|entry| self.replay_entry(entry))
                    .ok_or_else(|| format!("Ply {} not found in log file", ply))
            })
            .collect()
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_moves = results.len();
        let rules_mismatches = results.iter().filter(|r| !r.rules_match).count();
        let ai_moves = results.iter().filter(|r| r.search_match.is_some()).count();
        let search_matches = results
            .iter()
            .filter(|r| r.search_match == Some(true))
            .count();
        let search_mismatches = ai_moves - search_matches;
        let match_rate = if total_moves > 0 {
            (results.iter().filter(|r| r.matches()).count() as f64 / total_moves as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_moves,
            rules_mismatches,
            ai_moves,
            search_matches,
            search_mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Moves:        {}", stats.total_moves);
        println!("Fully Matching:     {:.1}%", stats.match_rate);
        println!("Rules Mismatches:   {}", stats.rules_mismatches);
        println!("AI Moves:           {}", stats.ai_moves);
        println!("  Search Matches:   {}", stats.search_matches);
        println!("  Search Mismatches: {}", stats.search_mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        let searched: Vec<_> = results.iter().filter(|r| r.search_depth.is_some()).collect();
        if !searched.is_empty() {
            let avg_time: f64 = searched
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / searched.len() as f64;
            println!("Average Search Time: {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches()).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                if !result.rules_match {
                    println!(
                        "Ply {}: player '{}' house {} does not reproduce the logged position",
                        result.ply, result.player, result.house
                    );
                } else {
                    println!(
                        "Ply {}: house {} → {:?} (score: {:?}, depth: {:?}, time: {}ms)",
                        result.ply,
                        result.house,
                        result.replayed_move,
                        result.replayed_score,
                        result.search_depth,
                        result.computation_time_ms
                    );
                }
            }
            println!();
        }
    }

    /// Validates that specific expected houses were played
    pub fn validate_expected_moves(
        &self,
        entries: &[MoveLogEntry],
        expected_moves: &[(usize, Vec<u8>)], // (ply, acceptable houses)
    ) -> Result<(), String> {
        for (ply, acceptable) in expected_moves {
            let entry = Self::find_ply(entries, *ply)
                .ok_or_else(|| format!("Ply {} not found in log", ply))?;

            if !acceptable.contains(&entry.house) {
                return Err(format!(
                    "Ply {}: Expected one of {:?}, but got {}",
                    ply, acceptable, entry.house
                ));
            }
        }

        Ok(())
    }

    /// Helper to parse a house number (1-6)
    pub fn parse_house(s: &str) -> Result<u8, String> {
        match s.trim().parse::<u8>() {
            Ok(house) if (1..=6).contains(&house) => Ok(house),
            _ => Err(format!("Invalid house: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn human_entry(ply: usize, player: Player, house: u8, before: Position) -> MoveLogEntry {
        let after = rules::simulate_move(house, &before, player).unwrap();
        MoveLogEntry::new(ply, player, house, MoveSource::Human, None, before, after)
    }

    #[test]
    fn test_parse_house() {
        assert_eq!(ReplayEngine::parse_house("1").unwrap(), 1);
        assert_eq!(ReplayEngine::parse_house(" 6 ").unwrap(), 6);
        assert!(ReplayEngine::parse_house("0").is_err());
        assert!(ReplayEngine::parse_house("7").is_err());
        assert!(ReplayEngine::parse_house("up").is_err());
    }

    #[test]
    fn test_human_entry_reproduces() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entry = human_entry(1, Player::Bottom, 3, Position::initial());

        let result = engine.replay_entry(&entry);
        assert!(result.rules_match);
        assert_eq!(result.search_match, None);
        assert!(result.matches());
    }

    #[test]
    fn test_tampered_entry_is_flagged() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let mut entry = human_entry(1, Player::Bottom, 3, Position::initial());
        entry.after.bottom += 1;

        let results = engine.replay_all(&[entry]);
        let stats = engine.generate_stats(&results);
        assert_eq!(stats.rules_mismatches, 1);
        assert_eq!(stats.match_rate, 0.0);
    }

    #[test]
    fn test_overflowing_entry_is_a_mismatch() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let mut board = [0; crate::types::HOUSE_COUNT];
        board[0] = 1;
        board[1] = u32::MAX;
        let before = Position::new(board, 0, 0);
        let entry = MoveLogEntry::new(1, Player::Bottom, 1, MoveSource::Ai, Some(2), before, before);

        let result = engine.replay_entry(&entry);
        assert!(!result.rules_match);
        assert_eq!(result.search_depth, None);
    }

    #[test]
    fn test_replay_depth_is_capped() {
        let mut config = Config::default_hardcoded();
        config.search.max_depth = 2;
        let engine = ReplayEngine::new(config.clone(), false);
        let before = Position::initial();
        let after = rules::simulate_move(1, &before, Player::Bottom).unwrap();
        let entry = MoveLogEntry::new(1, Player::Bottom, 1, MoveSource::Ai, Some(60), before, after);

        assert_eq!(engine.replay_entry(&entry).search_depth, Some(2));

        let engine = ReplayEngine::new(config, false).with_depth(60);
        assert_eq!(engine.replay_entry(&entry).search_depth, Some(2));
    }

    #[test]
    fn test_latest_entry_wins_for_repeated_ply() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let undone = human_entry(1, Player::Bottom, 3, Position::initial());
        let replayed = human_entry(1, Player::Bottom, 4, Position::initial());
        let entries = vec![undone, replayed];

        assert!(engine.validate_expected_moves(&entries, &[(1, vec![4])]).is_ok());
        assert!(engine.validate_expected_moves(&entries, &[(1, vec![3])]).is_err());

        let results = engine.replay_plies(&entries, &[1]).unwrap();
        assert_eq!(results[0].house, 4);
    }

    #[test]
    fn test_ai_entry_is_searched_at_override_depth() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false).with_depth(1);
        let before = Position::initial();
        let after = rules::simulate_move(1, &before, Player::Bottom).unwrap();
        let entry = MoveLogEntry::new(1, Player::Bottom, 1, MoveSource::Ai, Some(5), before, after);

        let result = engine.replay_entry(&entry);
        assert_eq!(result.search_depth, Some(1));
        // every opening move scores 0 at depth 1, so the first house is kept
        assert_eq!(result.replayed_move, Some(1));
        assert_eq!(result.search_match, Some(true));
    }
}
