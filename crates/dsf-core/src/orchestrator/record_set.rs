use tracing::{debug, info};

use super::{Orchestrator, path};
use crate::error::{Error, Result};
use crate::model::{ApiMessage, NewRecordSet, RecordSet, RecordSetAttrs, RecordSetRequest};

impl Orchestrator {
    /// Create a record set in a failover chain
    ///
    /// Without a TTL the record set inherits the service TTL. When both a
    /// monitor and a TTL are given, the monitor is read first and its probe
    /// interval must be at least twice the TTL.
    pub async fn create_record_set(&self, service_id: &str, new: &NewRecordSet) -> Result<RecordSet> {
        new.validate()?;
        self.check_monitor_ttl(&new.attrs).await?;
        info!(
            "Creating {} record set {} in chain {}/{}",
            new.rdata_class, new.attrs.label, service_id, new.rsfc_id
        );

        let body = RecordSetRequest::for_create(new, self.publish_block());
        self.create_entity(path("DSFRecordSet", &[service_id])?, &body)
            .await
    }

    pub async fn read_record_set(&self, service_id: &str, record_set_id: &str) -> Result<RecordSet> {
        debug!("Reading record set {}/{}", service_id, record_set_id);
        self.fetch(path("DSFRecordSet", &[service_id, record_set_id])?)
            .await
    }

    /// Update the mutable attributes; rdata class and parents stay as created
    pub async fn update_record_set(
        &self,
        service_id: &str,
        record_set_id: &str,
        attrs: &RecordSetAttrs,
    ) -> Result<RecordSet> {
        attrs.validate()?;
        self.check_monitor_ttl(attrs).await?;
        info!("Updating record set {}/{}", service_id, record_set_id);

        let body = RecordSetRequest::for_update(attrs, self.publish_block());
        self.update_entity(path("DSFRecordSet", &[service_id, record_set_id])?, &body)
            .await
    }

    pub async fn delete_record_set(&self, service_id: &str, record_set_id: &str) -> Result<()> {
        info!("Deleting record set {}/{}", service_id, record_set_id);
        self.delete_entity(
            "record set",
            path("DSFRecordSet", &[service_id, record_set_id])?,
        )
        .await
    }

    /// The monitor is a referenced sibling: its absence is a missing
    /// dependency of this record set, on create and update alike.
    async fn check_monitor_ttl(&self, attrs: &RecordSetAttrs) -> Result<()> {
        let (Some(monitor_id), Some(ttl)) = (&attrs.monitor_id, attrs.ttl) else {
            return Ok(());
        };
        let monitor = match self.read_monitor(monitor_id).await {
            Err(Error::NotFound(_)) => {
                return Err(Error::DependencyNotFound {
                    messages: vec![ApiMessage {
                        info: format!("dsf_monitor_id: monitor {monitor_id} not found"),
                        source: "DSF".to_string(),
                        err_code: "NOT_FOUND".to_string(),
                        level: "ERROR".to_string(),
                    }],
                });
            }
            other => other?,
        };
        monitor.check_ttl(ttl)
    }
}
