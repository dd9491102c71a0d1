use std::sync::Arc;
use crate::external::price_provider::SeriesProvider;
use crate::services::chart_renderer::ChartBackend;
use crate::services::symbol_validator::SymbolSet;
use crate::store::WatchRecordStore;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn WatchRecordStore>,
    pub symbols: Arc<SymbolSet>,
    pub price_provider: Arc<dyn SeriesProvider>,
    pub chart_backend: Arc<dyn ChartBackend>,
    pub api_key: Arc<str>,
}
