pub mod progress;
pub mod review;
pub mod word;

pub use progress::{ItemProgress, ReviewState};
pub use review::{Quality, ReviewLog, StudyMode};
pub use word::WordItem;
