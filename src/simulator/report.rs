//! Simulation report generation.

use serde::Serialize;

use super::config::SimConfig;
use crate::character::CharacterClass;
use crate::combat::BattleOutcome;

/// One simulated battle.
#[derive(Debug, Clone, Copy)]
pub struct BattleStats {
    pub outcome: BattleOutcome,
    pub rounds: u32,
    pub health_left: u32,
    pub max_health: u32,
}

/// Aggregated results for one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub class: CharacterClass,
    pub runs: u32,
    pub wins: u32,
    pub losses: u32,
    pub escapes: u32,
    pub avg_rounds: f64,
    /// Average fraction of max health left after a win (0.0-1.0)
    pub avg_health_left_on_win: f64,
}

impl ClassReport {
    fn from_runs(class: CharacterClass, runs: &[BattleStats]) -> Self {
        let count = |outcome| runs.iter().filter(|r| r.outcome == outcome).count() as u32;
        let wins = count(BattleOutcome::PlayerWon);

        let avg_rounds =
            runs.iter().map(|r| r.rounds as f64).sum::<f64>() / runs.len().max(1) as f64;
        let avg_health_left_on_win = runs
            .iter()
            .filter(|r| r.outcome == BattleOutcome::PlayerWon)
            .map(|r| r.health_left as f64 / r.max_health.max(1) as f64)
            .sum::<f64>()
            / wins.max(1) as f64;

        Self {
            class,
            runs: runs.len() as u32,
            wins,
            losses: count(BattleOutcome::EnemyWon),
            escapes: count(BattleOutcome::Escaped),
            avg_rounds,
            avg_health_left_on_win,
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.runs.max(1) as f64
    }
}

/// Aggregated results from a whole simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub enemy: String,
    pub level: u32,
    pub runs_per_class: u32,
    pub classes: Vec<ClassReport>,
}

impl SimReport {
    pub fn from_runs(config: &SimConfig, per_class: Vec<(CharacterClass, Vec<BattleStats>)>) -> Self {
        Self {
            enemy: config.enemy.to_string(),
            level: config.level,
            runs_per_class: config.num_runs,
            classes: per_class
                .iter()
                .map(|(class, runs)| ClassReport::from_runs(*class, runs))
                .collect(),
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Enemy: {}   Level: {}   Runs per class: {}\n\n",
            self.enemy, self.level, self.runs_per_class
        ));

        report.push_str("── RESULTS ──────────────────────────────────────────────────────\n");
        report.push_str("  Class     Win%   Loss  Escape  Rounds  HP left\n");
        for class in &self.classes {
            let bar: String = "█".repeat((class.win_rate() * 20.0) as usize);
            report.push_str(&format!(
                "  {:<8} {:>5.1}% {:>5} {:>7} {:>7.1} {:>7.0}%  {}\n",
                class.class.name(),
                class.win_rate() * 100.0,
                class.losses,
                class.escapes,
                class.avg_rounds,
                class.avg_health_left_on_win * 100.0,
                bar
            ));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(outcome: BattleOutcome, rounds: u32, health_left: u32) -> BattleStats {
        BattleStats {
            outcome,
            rounds,
            health_left,
            max_health: 100,
        }
    }

    #[test]
    fn test_class_report_aggregates() {
        let runs = vec![
            stats(BattleOutcome::PlayerWon, 4, 80),
            stats(BattleOutcome::PlayerWon, 6, 40),
            stats(BattleOutcome::EnemyWon, 5, 0),
            stats(BattleOutcome::Escaped, 1, 100),
        ];
        let report = ClassReport::from_runs(CharacterClass::Rogue, &runs);
        assert_eq!(report.runs, 4);
        assert_eq!(report.wins, 2);
        assert_eq!(report.losses, 1);
        assert_eq!(report.escapes, 1);
        assert_eq!(report.avg_rounds, 4.0);
        assert!((report.avg_health_left_on_win - 0.6).abs() < 1e-9);
        assert_eq!(report.win_rate(), 0.5);
    }

    #[test]
    fn test_empty_runs_do_not_divide_by_zero() {
        let report = ClassReport::from_runs(CharacterClass::Mage, &[]);
        assert_eq!(report.avg_rounds, 0.0);
        assert_eq!(report.win_rate(), 0.0);
    }

    #[test]
    fn test_text_and_json() {
        let report = SimReport {
            enemy: "Goblin".to_string(),
            level: 1,
            runs_per_class: 1,
            classes: vec![ClassReport::from_runs(
                CharacterClass::Warrior,
                &[stats(BattleOutcome::PlayerWon, 4, 105)],
            )],
        };
        let text = report.to_text();
        assert!(text.contains("Warrior"));
        assert!(text.contains("Goblin"));
        let json = report.to_json();
        assert!(json.contains("\"wins\": 1"));
    }
}
