pub use attempt_record::{
    AttemptKey, AttemptKeyFields, AttemptRecord, LockScope, LockScopeFields, LockedQuestion,
};
pub use question::{Question, QuestionType};

mod attempt_record;
mod question;
