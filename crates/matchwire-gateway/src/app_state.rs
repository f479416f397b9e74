//! Shared application state for the matchwire gateway.
//!
//! Built once at startup and cloned into every handler; nothing here is
//! reached through ambient globals. The match directory is injected by the
//! caller so the gateway never owns the relational store.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::infra::MatchDirectory;
use crate::obs::GatewayMetrics;
use crate::realtime::{Registry, RoomDirectory};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: Arc<Registry>,
    rooms: Arc<RoomDirectory>,
    metrics: Arc<GatewayMetrics>,
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(cfg: GatewayConfig, matches: Arc<dyn MatchDirectory>) -> Self {
        let registry = Arc::new(Registry::new());
        let rooms = Arc::new(RoomDirectory::new());
        let metrics = Arc::new(GatewayMetrics::default());
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            matches,
            Arc::clone(&rooms),
            Arc::clone(&metrics),
        ));

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                rooms,
                metrics,
                dispatcher,
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    pub fn rooms(&self) -> &Arc<RoomDirectory> {
        &self.inner.rooms
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.inner.metrics
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.inner.dispatcher
    }
}
