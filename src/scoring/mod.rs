pub mod classify;
pub mod engine;
pub mod error;
pub mod table;
pub mod validation;
pub mod whatif;

pub use classify::{classify, ClassificationResult};
pub use engine::{score, ScoredResult, DEFAULT_THRESHOLD};
pub use error::ScoringError;
pub use table::{ScaledScore, ScoreTable, ScoreTableEntry, SubjectTable, Tier};
pub use validation::validate_tables;
pub use whatif::{simulate, simulate_many, ScoreGain, SimulationResult};
