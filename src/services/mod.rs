pub mod ai;
pub mod billing;
pub mod formatter;
