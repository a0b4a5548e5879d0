use tracing::{debug, info};

use super::{Lookup, Orchestrator, classify, decode, path};
use crate::error::Result;
use crate::model::{Node, NodeRequest, PublishBlock, Service, ServiceAttrs, ServiceRequest};
use crate::traits::ApiRequest;

impl Orchestrator {
    /// Create a service, then attach its nodes if any were given
    pub async fn create_service(&self, attrs: &ServiceAttrs) -> Result<Service> {
        attrs.validate()?;
        info!("Creating service: {}", attrs.label);

        let body = ServiceRequest::new(attrs, self.publish_block());
        let mut service: Service = self.create_entity("DSF".to_string(), &body).await?;

        if !attrs.nodes.is_empty() {
            service.nodes = self.replace_nodes(&service.id, &attrs.nodes).await?;
        }

        info!("Created service {} ({})", service.label, service.id);
        Ok(service)
    }

    pub async fn read_service(&self, service_id: &str) -> Result<Service> {
        debug!("Reading service {}", service_id);
        self.fetch(path("DSF", &[service_id])?).await
    }

    /// Update label/TTL, then replace the whole node set
    ///
    /// The node list is always sent in full, an empty list included: the
    /// server replaces its set with exactly `attrs.nodes`.
    pub async fn update_service(&self, service_id: &str, attrs: &ServiceAttrs) -> Result<Service> {
        attrs.validate()?;
        info!("Updating service {}", service_id);

        let body = ServiceRequest::new(attrs, self.publish_block());
        let mut service: Service = self.update_entity(path("DSF", &[service_id])?, &body).await?;
        service.nodes = self.replace_nodes(service_id, &attrs.nodes).await?;
        Ok(service)
    }

    pub async fn delete_service(&self, service_id: &str) -> Result<()> {
        info!("Deleting service {}", service_id);
        self.delete_entity("service", path("DSF", &[service_id])?).await
    }

    /// All services of the account, with details
    pub async fn list_services(&self) -> Result<Vec<Service>> {
        debug!("Listing services");
        let envelope = self.execute(ApiRequest::get("DSF?detail=Y")).await?;
        if envelope.data.is_null() {
            return Ok(Vec::new());
        }
        decode(envelope.data)
    }

    pub async fn read_nodes(&self, service_id: &str) -> Result<Vec<Node>> {
        let node_path = path("DSFNode", &[service_id])?;
        let envelope = self
            .execute(ApiRequest::get(&node_path))
            .await
            .map_err(|e| classify(e, Lookup::Existing, "service nodes", &node_path))?;
        decode_nodes(envelope.data)
    }

    /// Replace the node set of a service
    pub async fn replace_nodes(&self, service_id: &str, nodes: &[Node]) -> Result<Vec<Node>> {
        info!("Replacing nodes of service {} ({} node(s))", service_id, nodes.len());

        let node_path = path("DSFNode", &[service_id])?;
        let body = NodeRequest {
            publish: self.publish_block(),
            nodes: nodes.to_vec(),
        };
        let envelope = self
            .execute(ApiRequest::put(&node_path, &body)?)
            .await
            .map_err(|e| classify(e, Lookup::Existing, "service nodes", &node_path))?;
        decode_nodes(envelope.data)
    }

    /// Commit every pending change of a service
    pub async fn publish(&self, service_id: &str) -> Result<Service> {
        info!("Publishing service {}", service_id);
        self.update_entity(path("DSF", &[service_id])?, &PublishBlock::now())
            .await
    }
}

fn decode_nodes(data: serde_json::Value) -> Result<Vec<Node>> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    decode(data)
}
