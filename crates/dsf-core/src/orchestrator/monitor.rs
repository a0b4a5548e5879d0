use tracing::{debug, info};

use super::{Orchestrator, path};
use crate::error::Result;
use crate::model::{Monitor, MonitorAttrs, MonitorRequest};

impl Orchestrator {
    /// Create a monitor; monitors belong to the account, not to a service
    pub async fn create_monitor(&self, attrs: &MonitorAttrs) -> Result<Monitor> {
        attrs.validate()?;
        info!("Creating {} monitor {}", attrs.protocol, attrs.label);

        let body = MonitorRequest::new(attrs, self.publish_block());
        self.create_entity("DSFMonitor".to_string(), &body).await
    }

    pub async fn read_monitor(&self, monitor_id: &str) -> Result<Monitor> {
        debug!("Reading monitor {}", monitor_id);
        self.fetch(path("DSFMonitor", &[monitor_id])?).await
    }

    pub async fn update_monitor(&self, monitor_id: &str, attrs: &MonitorAttrs) -> Result<Monitor> {
        attrs.validate()?;
        info!("Updating monitor {}", monitor_id);

        let body = MonitorRequest::new(attrs, self.publish_block());
        self.update_entity(path("DSFMonitor", &[monitor_id])?, &body)
            .await
    }

    pub async fn delete_monitor(&self, monitor_id: &str) -> Result<()> {
        info!("Deleting monitor {}", monitor_id);
        self.delete_entity("monitor", path("DSFMonitor", &[monitor_id])?)
            .await
    }
}
