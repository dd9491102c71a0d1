pub(crate) mod charts;
pub(crate) mod health;
pub(crate) mod watch_records;
