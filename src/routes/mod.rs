pub mod attempt;
pub mod lock;
pub mod question;
