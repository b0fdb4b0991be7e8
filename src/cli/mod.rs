pub mod convert;
pub mod dashboard;
pub mod ui;
pub mod watch;
