pub mod chart_renderer;
pub mod chart_service;
pub mod query_mapper;
pub mod series_normalizer;
pub mod symbol_validator;
pub mod watch_record_service;
