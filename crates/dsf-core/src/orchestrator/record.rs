use tracing::{debug, info};

use super::{Orchestrator, path};
use crate::error::Result;
use crate::model::{NewRecord, Record, RecordAttrs, RecordRequest};

impl Orchestrator {
    pub async fn create_record(&self, service_id: &str, new: &NewRecord) -> Result<Record> {
        new.validate()?;
        info!(
            "Creating record {} in record set {}/{}",
            new.attrs.master_line, service_id, new.record_set_id
        );

        let body = RecordRequest::new(&new.attrs, self.publish_block());
        self.create_entity(path("DSFRecord", &[service_id, new.record_set_id.as_str()])?, &body)
            .await
    }

    pub async fn read_record(&self, service_id: &str, record_id: &str) -> Result<Record> {
        debug!("Reading record {}/{}", service_id, record_id);
        self.fetch(path("DSFRecord", &[service_id, record_id])?)
            .await
    }

    pub async fn update_record(
        &self,
        service_id: &str,
        record_id: &str,
        attrs: &RecordAttrs,
    ) -> Result<Record> {
        attrs.validate()?;
        info!("Updating record {}/{}", service_id, record_id);

        let body = RecordRequest::new(attrs, self.publish_block());
        self.update_entity(path("DSFRecord", &[service_id, record_id])?, &body)
            .await
    }

    pub async fn delete_record(&self, service_id: &str, record_id: &str) -> Result<()> {
        info!("Deleting record {}/{}", service_id, record_id);
        self.delete_entity("record", path("DSFRecord", &[service_id, record_id])?)
            .await
    }
}
