use tracing::{debug, info};

use super::{Orchestrator, path};
use crate::error::Result;
use crate::model::{ResponsePool, ResponsePoolAttrs, ResponsePoolRequest};

impl Orchestrator {
    pub async fn create_response_pool(
        &self,
        service_id: &str,
        attrs: &ResponsePoolAttrs,
    ) -> Result<ResponsePool> {
        attrs.validate()?;
        info!("Creating response pool {} in service {}", attrs.label, service_id);

        let body = ResponsePoolRequest::new(attrs, self.publish_block());
        self.create_entity(path("DSFResponsePool", &[service_id])?, &body)
            .await
    }

    pub async fn read_response_pool(&self, service_id: &str, pool_id: &str) -> Result<ResponsePool> {
        debug!("Reading response pool {}/{}", service_id, pool_id);
        self.fetch(path("DSFResponsePool", &[service_id, pool_id])?)
            .await
    }

    pub async fn update_response_pool(
        &self,
        service_id: &str,
        pool_id: &str,
        attrs: &ResponsePoolAttrs,
    ) -> Result<ResponsePool> {
        attrs.validate()?;
        info!("Updating response pool {}/{}", service_id, pool_id);

        let body = ResponsePoolRequest::new(attrs, self.publish_block());
        self.update_entity(path("DSFResponsePool", &[service_id, pool_id])?, &body)
            .await
    }

    pub async fn delete_response_pool(&self, service_id: &str, pool_id: &str) -> Result<()> {
        info!("Deleting response pool {}/{}", service_id, pool_id);
        self.delete_entity(
            "response pool",
            path("DSFResponsePool", &[service_id, pool_id])?,
        )
        .await
    }
}
