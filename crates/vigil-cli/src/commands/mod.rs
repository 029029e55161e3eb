pub mod check;
pub mod history;
pub mod log;
pub mod session;
