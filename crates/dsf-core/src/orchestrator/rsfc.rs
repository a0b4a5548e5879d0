use tracing::{debug, info};

use super::{Orchestrator, path};
use crate::error::Result;
use crate::model::{RecordSetFailoverChain, RsfcAttrs, RsfcRequest};

const COLLECTION: &str = "DSFRecordSetFailoverChain";

impl Orchestrator {
    /// Create a failover chain inside a response pool
    pub async fn create_rsfc(
        &self,
        service_id: &str,
        response_pool_id: &str,
        attrs: &RsfcAttrs,
    ) -> Result<RecordSetFailoverChain> {
        attrs.validate()?;
        info!(
            "Creating failover chain {} in pool {}/{}",
            attrs.label, service_id, response_pool_id
        );

        let body = RsfcRequest::new(attrs, self.publish_block());
        self.create_entity(path(COLLECTION, &[service_id, response_pool_id])?, &body)
            .await
    }

    pub async fn read_rsfc(&self, service_id: &str, rsfc_id: &str) -> Result<RecordSetFailoverChain> {
        debug!("Reading failover chain {}/{}", service_id, rsfc_id);
        self.fetch(path(COLLECTION, &[service_id, rsfc_id])?).await
    }

    pub async fn update_rsfc(
        &self,
        service_id: &str,
        rsfc_id: &str,
        attrs: &RsfcAttrs,
    ) -> Result<RecordSetFailoverChain> {
        attrs.validate()?;
        info!("Updating failover chain {}/{}", service_id, rsfc_id);

        let body = RsfcRequest::new(attrs, self.publish_block());
        self.update_entity(path(COLLECTION, &[service_id, rsfc_id])?, &body)
            .await
    }

    pub async fn delete_rsfc(&self, service_id: &str, rsfc_id: &str) -> Result<()> {
        info!("Deleting failover chain {}/{}", service_id, rsfc_id);
        self.delete_entity(
            "record set failover chain",
            path(COLLECTION, &[service_id, rsfc_id])?,
        )
        .await
    }
}
