//! Score Matrix - requirement weights and per-method baseline scores.
//!
//! The matrix is a read-only table loaded once at process start. Each
//! [`Environment`] carries an ordered list of [`Requirement`]s; a requirement
//! has a percentage weight and one baseline score per [`Method`].
//!
//! # JSON layout
//!
//! ```text
//! {
//!   "urban":    [{ "requirement": "Noise", "weight": 8.24, "SOP": 7, "ML": 5, "AStar": 5 }, ...],
//!   "suburban": [...],
//!   "airport":  [...]
//! }
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Weight totals further than this from 100% are reported (never rejected).
const WEIGHT_TOTAL_TOLERANCE: f64 = 0.5;

/// Decision-making strategy under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Method {
    /// Rule-based baseline
    #[serde(rename = "SOP")]
    Sop,

    /// Machine-learning-based decision method
    #[serde(rename = "ML")]
    Ml,

    /// Heuristic search-based decision method
    #[serde(rename = "AStar")]
    AStar,
}

impl Method {
    /// All methods in table order.
    pub const ALL: [Method; 3] = [Method::Sop, Method::Ml, Method::AStar];

    /// Returns a list of all methods.
    pub fn all() -> [Method; 3] {
        Self::ALL
    }

    /// Dense index used for fixed-size per-method storage.
    pub fn index(self) -> usize {
        match self {
            Method::Sop => 0,
            Method::Ml => 1,
            Method::AStar => 2,
        }
    }

    /// Returns the method name.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Sop => "SOP",
            Method::Ml => "ML",
            Method::AStar => "AStar",
        }
    }

    /// Column heading used in summary tables.
    pub fn column_label(&self) -> &'static str {
        match self {
            Method::Sop => "SOP",
            Method::Ml => "ML",
            Method::AStar => "CF-A*",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sop" => Ok(Method::Sop),
            "ml" => Ok(Method::Ml),
            "astar" | "a*" | "cf-a*" => Ok(Method::AStar),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

/// Deployment context with its own requirement weight profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Urban,
    Suburban,
    Airport,
}

impl Environment {
    /// All environments in table order.
    pub const ALL: [Environment; 3] = [Environment::Urban, Environment::Suburban, Environment::Airport];

    /// Returns a list of all environments.
    pub fn all() -> [Environment; 3] {
        Self::ALL
    }

    /// Dense index used for fixed-size per-environment storage.
    pub fn index(self) -> usize {
        match self {
            Environment::Urban => 0,
            Environment::Suburban => 1,
            Environment::Airport => 2,
        }
    }

    /// Returns the environment name.
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Urban => "urban",
            Environment::Suburban => "suburban",
            Environment::Airport => "airport",
        }
    }

    /// Capitalized name for report headings.
    pub fn title(&self) -> &'static str {
        match self {
            Environment::Urban => "Urban",
            Environment::Suburban => "Suburban",
            Environment::Airport => "Airport",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urban" => Ok(Environment::Urban),
            "suburban" => Ok(Environment::Suburban),
            "airport" => Ok(Environment::Airport),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Baseline score of each method for one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodScores {
    #[serde(rename = "SOP")]
    pub sop: f64,

    #[serde(rename = "ML")]
    pub ml: f64,

    #[serde(rename = "AStar")]
    pub astar: f64,
}

impl MethodScores {
    pub fn new(sop: f64, ml: f64, astar: f64) -> Self {
        Self { sop, ml, astar }
    }

    /// Returns the score for `method`.
    pub fn get(&self, method: Method) -> f64 {
        match method {
            Method::Sop => self.sop,
            Method::Ml => self.ml,
            Method::AStar => self.astar,
        }
    }
}

/// A named evaluation criterion with a weight and per-method baseline scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Criterion name (e.g. "Safety")
    #[serde(rename = "requirement")]
    pub name: String,

    /// Weight in percent; weights within an environment sum to ~100
    pub weight: f64,

    /// Baseline score per method, typically integers in [0, 10]
    #[serde(flatten)]
    pub scores: MethodScores,
}

impl Requirement {
    /// Creates a requirement from its weight and SOP/ML/AStar scores.
    pub fn new(name: &str, weight: f64, sop: f64, ml: f64, astar: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            scores: MethodScores::new(sop, ml, astar),
        }
    }

    /// Weighted contribution of this requirement for `method`, without noise.
    pub fn weighted_score(&self, method: Method) -> f64 {
        self.scores.get(method) * self.weight / 100.0
    }
}

/// Read-only table of requirements per environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    pub urban: Vec<Requirement>,
    pub suburban: Vec<Requirement>,
    pub airport: Vec<Requirement>,
}

/// Reference criteria: (name, [urban, suburban, airport] weights, SOP, ML, AStar).
const REFERENCE_TABLE: [(&str, [f64; 3], f64, f64, f64); 14] = [
    ("Noise", [8.24, 7.14, 5.46], 7.0, 5.0, 5.0),
    ("Safety", [14.29, 14.29, 14.21], 9.0, 7.0, 8.0),
    ("Social Acceptance", [7.69, 5.49, 4.37], 7.0, 3.0, 5.0),
    ("Efficiency", [6.59, 8.24, 8.20], 5.0, 8.0, 8.0),
    ("Costs", [6.04, 4.40, 6.01], 8.0, 2.0, 4.0),
    ("Environmental Impact", [6.04, 6.59, 7.10], 5.0, 8.0, 7.0),
    ("Infrastructure Readiness", [8.24, 10.44, 5.46], 8.0, 4.0, 5.0),
    ("Scalability", [8.24, 7.69, 7.10], 4.0, 8.0, 7.0),
    ("Adaptability", [6.59, 6.59, 6.56], 2.0, 8.0, 6.0),
    ("Feasibility", [5.49, 6.59, 6.56], 8.0, 3.0, 4.0),
    ("Security", [7.69, 6.59, 7.10], 8.0, 4.0, 4.0),
    ("Interoperability", [3.30, 3.85, 9.29], 8.0, 5.0, 5.0),
    ("Regulations", [7.14, 5.49, 6.56], 8.0, 4.0, 4.0),
    ("Comfort", [4.40, 6.59, 6.01], 8.0, 6.0, 6.0),
];

impl ScoreMatrix {
    /// Builds the reference matrix shipped with the tool.
    pub fn builtin() -> Self {
        let column = |env: Environment| -> Vec<Requirement> {
            REFERENCE_TABLE
                .iter()
                .map(|(name, weights, sop, ml, astar)| {
                    Requirement::new(name, weights[env.index()], *sop, *ml, *astar)
                })
                .collect()
        };

        Self {
            urban: column(Environment::Urban),
            suburban: column(Environment::Suburban),
            airport: column(Environment::Airport),
        }
    }

    /// Parses a matrix from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let matrix: ScoreMatrix = serde_json::from_str(json)?;
        matrix.check_weights();
        Ok(matrix)
    }

    /// Loads a matrix from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns the ordered requirements of `env`.
    pub fn requirements(&self, env: Environment) -> &[Requirement] {
        match env {
            Environment::Urban => &self.urban,
            Environment::Suburban => &self.suburban,
            Environment::Airport => &self.airport,
        }
    }

    /// Noise-free utility: Σ score·weight/100 over the environment's requirements.
    pub fn baseline_utility(&self, env: Environment, method: Method) -> f64 {
        self.requirements(env)
            .iter()
            .map(|r| r.weighted_score(method))
            .sum()
    }

    /// Sum of requirement weights for `env` (nominally 100).
    pub fn weight_total(&self, env: Environment) -> f64 {
        self.requirements(env).iter().map(|r| r.weight).sum()
    }

    /// Logs environments whose weights stray from 100%. The table is trusted,
    /// so this never fails.
    pub fn check_weights(&self) {
        for env in Environment::all() {
            let total = self.weight_total(env);
            if (total - 100.0).abs() > WEIGHT_TOTAL_TOLERANCE {
                warn!("Weights for {} sum to {:.2}%, expected ~100%", env, total);
            }
        }
    }
}

impl Default for ScoreMatrix {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_weights_near_hundred() {
        let matrix = ScoreMatrix::builtin();
        for env in Environment::all() {
            assert_eq!(matrix.requirements(env).len(), 14);
            assert!((matrix.weight_total(env) - 100.0).abs() < WEIGHT_TOTAL_TOLERANCE);
        }
    }

    #[test]
    fn test_baseline_utility_matches_manual_sum() {
        let matrix = ScoreMatrix::builtin();
        let expected: f64 = REFERENCE_TABLE
            .iter()
            .map(|(_, w, sop, _, _)| sop * w[0] / 100.0)
            .sum();

        assert_relative_eq!(
            matrix.baseline_utility(Environment::Urban, Method::Sop),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_from_json_accepts_integer_scores() {
        let json = r#"{
            "urban": [{ "requirement": "Noise", "weight": 60, "SOP": 7, "ML": 5, "AStar": 5 },
                      { "requirement": "Safety", "weight": 40, "SOP": 9, "ML": 7, "AStar": 8 }],
            "suburban": [{ "requirement": "Noise", "weight": 100, "SOP": 1, "ML": 2, "AStar": 3 }],
            "airport": []
        }"#;

        let matrix = ScoreMatrix::from_json(json).unwrap();

        assert_eq!(matrix.urban[1].name, "Safety");
        assert_eq!(matrix.urban[1].scores.get(Method::AStar), 8.0);
        assert_relative_eq!(matrix.baseline_utility(Environment::Urban, Method::Sop), 7.8, epsilon = 1e-12);
        assert_eq!(matrix.baseline_utility(Environment::Airport, Method::Ml), 0.0);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = ScoreMatrix::from_json("{ \"urban\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::MatrixParse(_)));
    }

    #[test]
    fn test_json_roundtrip_of_builtin() {
        let matrix = ScoreMatrix::builtin();
        let json = serde_json::to_string(&matrix).unwrap();
        assert!(json.contains("\"requirement\":\"Safety\""));
        assert_eq!(ScoreMatrix::from_json(&json).unwrap(), matrix);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("AStar".parse::<Method>().unwrap(), Method::AStar);
        assert_eq!("sop".parse::<Method>().unwrap(), Method::Sop);
        assert_eq!("Airport".parse::<Environment>().unwrap(), Environment::Airport);
        assert!("dijkstra".parse::<Method>().is_err());
        assert!("rural".parse::<Environment>().is_err());
    }
}
