use tracing::{debug, info};

use super::{Orchestrator, path};
use crate::error::Result;
use crate::model::{Ruleset, RulesetAttrs, RulesetRequest};

impl Orchestrator {
    /// Create a ruleset; every referenced response pool must already exist
    pub async fn create_ruleset(&self, service_id: &str, attrs: &RulesetAttrs) -> Result<Ruleset> {
        attrs.validate()?;
        info!("Creating ruleset {} in service {}", attrs.label, service_id);

        let body = RulesetRequest::new(attrs, self.publish_block());
        self.create_entity(path("DSFRuleset", &[service_id])?, &body)
            .await
    }

    pub async fn read_ruleset(&self, service_id: &str, ruleset_id: &str) -> Result<Ruleset> {
        debug!("Reading ruleset {}/{}", service_id, ruleset_id);
        self.fetch(path("DSFRuleset", &[service_id, ruleset_id])?)
            .await
    }

    pub async fn update_ruleset(
        &self,
        service_id: &str,
        ruleset_id: &str,
        attrs: &RulesetAttrs,
    ) -> Result<Ruleset> {
        attrs.validate()?;
        info!("Updating ruleset {}/{}", service_id, ruleset_id);

        let body = RulesetRequest::new(attrs, self.publish_block());
        self.update_entity(path("DSFRuleset", &[service_id, ruleset_id])?, &body)
            .await
    }

    pub async fn delete_ruleset(&self, service_id: &str, ruleset_id: &str) -> Result<()> {
        info!("Deleting ruleset {}/{}", service_id, ruleset_id);
        self.delete_entity("ruleset", path("DSFRuleset", &[service_id, ruleset_id])?)
            .await
    }
}
