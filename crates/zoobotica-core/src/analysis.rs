//! Demo-mode performance analysis.
//!
//! There is no performance model behind these numbers. Every field is drawn
//! uniformly from fixed candidate tables and the result is tagged
//! [`AnalysisMode::Demo`] so nothing downstream mistakes it for a real
//! evaluation.

use crate::error::{Result, ZoobotError};
use crate::types::{AnalysisMode, PerformanceAnalysis, PerformanceScore, PerformanceScores};
use rand::seq::SliceRandom;
use rand::Rng;

type Candidate = (u32, &'static str);

const MOBILITY: [Candidate; 4] = [
    (85, "Excellent agility and speed"),
    (70, "Good movement but limited turning radius"),
    (95, "Superior maneuverability in all directions"),
    (60, "Stable but slower movement"),
];

const DURABILITY: [Candidate; 4] = [
    (90, "Highly resistant to environmental damage"),
    (75, "Good structural integrity"),
    (65, "Moderate protection against impacts"),
    (85, "Strong armor and reinforced joints"),
];

const EFFICIENCY: [Candidate; 4] = [
    (80, "Optimal power consumption"),
    (95, "Exceptional energy management"),
    (70, "Standard operational efficiency"),
    (88, "Advanced power distribution"),
];

const TASK_SUITABILITY: [Candidate; 4] = [
    (92, "Perfect match for intended task"),
    (78, "Well-suited with minor limitations"),
    (85, "Strong performance capabilities"),
    (73, "Good but could be optimized"),
];

const STRENGTHS: [&str; 10] = [
    "Advanced stabilization system",
    "High-performance actuators",
    "Reinforced structural design",
    "Efficient power management",
    "Superior sensor integration",
    "Adaptive movement patterns",
    "Enhanced grip mechanisms",
    "Quick response time",
    "Modular component design",
    "Environmental adaptability",
];

const LIMITATIONS: [&str; 10] = [
    "Limited operational range",
    "Higher power consumption",
    "Weather sensitivity",
    "Maintenance complexity",
    "Size constraints",
    "Speed limitations",
    "Weight distribution issues",
    "Specialized terrain requirements",
    "Temperature sensitivity",
    "Component wear rate",
];

const RECOMMENDATIONS: [&str; 10] = [
    "Add weather protection",
    "Optimize power systems",
    "Enhance sensor coverage",
    "Upgrade actuator efficiency",
    "Improve stability control",
    "Reinforce weak points",
    "Add redundant systems",
    "Streamline movement patterns",
    "Balance weight distribution",
    "Include backup power",
];

pub const OVERALL_MIN: u32 = 75;
pub const OVERALL_SPAN: u32 = 20;

/// Candidate score tables, exposed so callers can check results against them.
pub fn candidates(metric: &str) -> Option<&'static [Candidate]> {
    match metric {
        "mobility" => Some(&MOBILITY),
        "durability" => Some(&DURABILITY),
        "efficiency" => Some(&EFFICIENCY),
        "task_suitability" => Some(&TASK_SUITABILITY),
        _ => None,
    }
}

/// Produces randomized [`PerformanceAnalysis`] values.
#[derive(Debug, Clone, Copy)]
pub struct DemoAnalyzer {
    pub strengths: usize,
    pub limitations: usize,
    pub recommendations: usize,
}

impl Default for DemoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoAnalyzer {
    pub fn new() -> Self {
        Self {
            strengths: 3,
            limitations: 2,
            recommendations: 2,
        }
    }

    /// Validate client-supplied robot data: it must carry a `parts` array.
    /// Returns the number of parts.
    pub fn validate(robot_data: &serde_json::Value) -> Result<usize> {
        robot_data
            .get("parts")
            .and_then(serde_json::Value::as_array)
            .map(Vec::len)
            .ok_or_else(|| ZoobotError::invalid_robot_data("Invalid robot data format"))
    }

    /// Validate `robot_data` and draw an analysis for it.
    pub fn analyze_robot<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        robot_data: &serde_json::Value,
    ) -> Result<PerformanceAnalysis> {
        Self::validate(robot_data)?;
        Ok(self.analyze(rng))
    }

    pub fn analyze<R: Rng + ?Sized>(&self, rng: &mut R) -> PerformanceAnalysis {
        PerformanceAnalysis {
            performance_scores: PerformanceScores {
                mobility: pick_score(rng, &MOBILITY),
                durability: pick_score(rng, &DURABILITY),
                efficiency: pick_score(rng, &EFFICIENCY),
                task_suitability: pick_score(rng, &TASK_SUITABILITY),
            },
            strengths: pick_distinct(rng, &STRENGTHS, self.strengths),
            limitations: pick_distinct(rng, &LIMITATIONS, self.limitations),
            overall_score: OVERALL_MIN + rng.gen_range(0..OVERALL_SPAN),
            recommendations: pick_distinct(rng, &RECOMMENDATIONS, self.recommendations),
            mode: AnalysisMode::Demo,
        }
    }
}

fn pick_score<R: Rng + ?Sized>(rng: &mut R, table: &[Candidate]) -> PerformanceScore {
    let (score, explanation) = table[rng.gen_range(0..table.len())];
    PerformanceScore::new(score, explanation)
}

fn pick_distinct<R: Rng + ?Sized>(rng: &mut R, table: &[&str], count: usize) -> Vec<String> {
    table
        .choose_multiple(rng, count)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn in_table(table: &[Candidate], score: &PerformanceScore) -> bool {
        table
            .iter()
            .any(|(s, e)| *s == score.score && *e == score.explanation)
    }

    #[test]
    fn overall_score_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let analyzer = DemoAnalyzer::new();
        for _ in 0..500 {
            let a = analyzer.analyze(&mut rng);
            assert!((75..=95).contains(&a.overall_score), "{}", a.overall_score);
        }
    }

    #[test]
    fn sub_scores_come_from_their_tables() {
        let mut rng = StdRng::seed_from_u64(11);
        let analyzer = DemoAnalyzer::new();
        for _ in 0..200 {
            let a = analyzer.analyze(&mut rng);
            let s = &a.performance_scores;
            assert!(in_table(&MOBILITY, &s.mobility));
            assert!(in_table(&DURABILITY, &s.durability));
            assert!(in_table(&EFFICIENCY, &s.efficiency));
            assert!(in_table(&TASK_SUITABILITY, &s.task_suitability));
        }
    }

    #[test]
    fn lists_are_distinct_and_sized() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = DemoAnalyzer::new().analyze(&mut rng);
        assert_eq!(a.strengths.len(), 3);
        assert_eq!(a.limitations.len(), 2);
        assert_eq!(a.recommendations.len(), 2);
        assert_eq!(a.strengths.iter().collect::<HashSet<_>>().len(), 3);
        assert_eq!(a.mode, AnalysisMode::Demo);
    }

    #[test]
    fn robot_data_needs_parts_array() {
        let mut rng = StdRng::seed_from_u64(1);
        let analyzer = DemoAnalyzer::new();
        assert!(analyzer
            .analyze_robot(&mut rng, &serde_json::json!({"parts": []}))
            .is_ok());
        assert!(analyzer
            .analyze_robot(&mut rng, &serde_json::json!({"parts": "legs"}))
            .is_err());
        assert!(analyzer.analyze_robot(&mut rng, &serde_json::json!({})).is_err());
    }

    #[test]
    fn serialized_analysis_is_labeled_demo() {
        let mut rng = StdRng::seed_from_u64(5);
        let json = serde_json::to_value(DemoAnalyzer::new().analyze(&mut rng)).unwrap();
        assert_eq!(json["mode"], "demo");
        assert!(json["performance_scores"]["task_suitability"]["score"].is_u64());
    }
}
