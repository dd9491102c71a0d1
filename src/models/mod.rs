mod chart;
mod price_point;
mod watch_record;
pub mod watch_request;

pub use chart::{ChartArtifact, ChartFigure, ChartKind};
pub use price_point::PricePoint;
pub use watch_record::{CreateWatchRecord, UpdateWatchRecord, WatchRecord};
pub use watch_request::{DateWindow, Granularity, RequestError, WatchRequest, WatchRequestForm};
