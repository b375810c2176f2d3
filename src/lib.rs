pub mod builtin;
pub mod hint;
pub mod offline;
pub mod question;
pub mod session;
pub mod settings;
pub mod shuffle;
pub mod stats;
pub mod ticker;
pub mod wasm;
pub mod worker;

pub use builtin::builtin_bank;
pub use hint::{HintSchedule, HintScheduleError, HintStep};
pub use offline::{CacheBackend, CacheManifest, OfflineCache, OfflineError, Served, WorkerState};
pub use question::{Question, QuestionBank, QuestionError, QuizDocument};
pub use session::{
    AdvanceOutcome, Feedback, Phase, QuizSummary, Session, SessionAction, Transition,
};
pub use settings::{QuizSettings, SettingsError};
pub use shuffle::shuffle_items;
pub use stats::QuestionStats;
pub use ticker::{Ticker, TimerHandle};
