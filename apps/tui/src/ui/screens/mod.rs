pub mod compare;
pub mod dashboard;
pub mod help;
pub mod sentiment;
