pub mod load;
pub mod types;

pub use load::{discover_attempt_files, load_attempts, load_score_tables};
pub use types::{QuestionRecord, SubjectRef, TopicRef, UNKNOWN_TOPIC};
