//! The set of enabled widgets and how they are loaded.

use std::sync::Arc;

use crate::client::ServiceClient;
use crate::config::Config;
use crate::error::{DashError, Result};
use crate::widgets::{LoaderRegistry, RenderContext, WidgetId, WidgetView};

#[derive(Clone)]
pub struct Dashboard {
    config: Arc<Config>,
    client: ServiceClient,
    registry: LoaderRegistry,
    enabled: Vec<WidgetId>,
}

impl Dashboard {
    /// Validate the configured widget list against `registry`. An id with no
    /// loader is an error here rather than a silently empty container later.
    pub fn new(config: Arc<Config>, client: ServiceClient, registry: LoaderRegistry) -> Result<Self> {
        let enabled = registry.resolve(&config.widgets)?;
        tracing::info!(
            "Dashboard widgets: {}",
            enabled
                .iter()
                .map(|w| w.module_id())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self {
            config,
            client,
            registry,
            enabled,
        })
    }

    pub fn enabled(&self) -> &[WidgetId] {
        &self.enabled
    }

    pub fn is_enabled(&self, widget: WidgetId) -> bool {
        self.enabled.contains(&widget)
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(self.config.webdir.clone())
    }

    /// Run a widget's loader. A widget that is not enabled yields `Ok(None)`
    /// without any request going out.
    pub async fn load(&self, widget: WidgetId) -> Result<Option<WidgetView>> {
        if !self.is_enabled(widget) {
            return Ok(None);
        }
        let loader = self
            .registry
            .get(widget)
            .ok_or_else(|| DashError::UnknownWidget(widget.module_id().to_string()))?;

        let ctx = self.render_context();
        match loader.load(widget, &self.client, &ctx).await {
            Ok(view) => Ok(Some(view)),
            Err(e) => {
                tracing::warn!("Widget {} failed to load: {}", widget, e);
                Err(e)
            }
        }
    }
}
