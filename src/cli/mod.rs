pub mod history;
pub mod ledger;
pub mod quotes;
pub mod setup;
pub mod ui;
pub mod watch;
