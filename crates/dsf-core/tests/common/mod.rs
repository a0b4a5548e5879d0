//! Test doubles and common utilities for lifecycle contract tests
//!
//! [`FakeDynApi`] is an in-memory stand-in for the DynECT control plane. It
//! speaks the wire format (stringified integers, `Y`/`N` and `true`/`false`
//! booleans, NOT_FOUND rejections) so the orchestrator's codec and error
//! mapping are exercised end to end without HTTP.

#![allow(dead_code)]

use async_trait::async_trait;
use dsf_core::error::{Error, Result};
use dsf_core::model::{ApiMessage, Envelope};
use dsf_core::traits::{ApiRequest, Method, Session, SessionFactory, SessionState};
use dsf_core::{Orchestrator, PoolConfig, SessionPool};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory DynECT API; clones share state
#[derive(Clone, Default)]
pub struct FakeDynApi {
    state: Arc<Mutex<FakeState>>,
    logins: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl FakeDynApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pool over this API
    pub fn pool(&self, max_idle: usize) -> Arc<SessionPool> {
        Arc::new(SessionPool::new(
            Arc::new(self.clone()),
            &PoolConfig { max_idle },
        ))
    }

    /// An orchestrator with its own pool over this API
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.pool(4))
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The last request received for `method`
    pub fn last_request(&self, method: Method) -> Option<ApiRequest> {
        self.requests().into_iter().rev().find(|r| r.method == method)
    }

    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Fail the next request with `status: failure` and these messages
    pub fn reject_next(&self, messages: Vec<ApiMessage>) {
        self.state.lock().unwrap().pending_rejection = Some(messages);
    }

    /// Invalidate every token issued so far
    pub fn expire_tokens(&self) {
        self.state.lock().unwrap().token_generation += 1;
    }

    /// Reject all future logins
    pub fn refuse_logins(&self) {
        self.state.lock().unwrap().refuse_logins = true;
    }
}

#[async_trait]
impl SessionFactory for FakeDynApi {
    async fn connect(&self) -> Result<Box<dyn Session>> {
        let mut session = FakeSession {
            api: self.clone(),
            state: SessionState::Unauthenticated,
            generation: 0,
        };
        session.login().await?;
        Ok(Box::new(session))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeSession {
    api: FakeDynApi,
    state: SessionState,
    generation: u64,
}

#[async_trait]
impl Session for FakeSession {
    async fn login(&mut self) -> Result<()> {
        let state = self.api.state.lock().unwrap();
        if state.refuse_logins {
            return Err(Error::auth(
                "login: Credentials you entered did not match those in our database",
            ));
        }
        self.generation = state.token_generation;
        self.state = SessionState::Authenticated;
        self.api.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(&mut self, request: ApiRequest) -> Result<Envelope> {
        if self.state != SessionState::Authenticated {
            return Err(Error::invalid_state("session is not authenticated"));
        }

        // Let other tasks interleave between acquire and execute.
        tokio::task::yield_now().await;

        let mut state = self.api.state.lock().unwrap();
        if self.generation != state.token_generation {
            self.state = SessionState::Unauthenticated;
            return Err(Error::auth("token: This session has expired"));
        }

        state.requests.push(request.clone());
        if let Some(messages) = state.pending_rejection.take() {
            return Err(Error::rejected(messages));
        }

        let body = request.body.clone().unwrap_or(Value::Null);
        state
            .handle(request.method, &request.path, &body)
            .map(Envelope::success)
    }

    async fn close(&mut self) -> Result<()> {
        self.state = SessionState::Closed;
        self.api.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn state(&self) -> SessionState {
        self.state
    }

    fn api_version(&self) -> Option<&str> {
        Some("3.7.0")
    }
}

/// `status: failure` with a NOT_FOUND message, as the API reports missing ids
pub fn missing(field: &str) -> Error {
    Error::rejected(vec![ApiMessage {
        info: format!("{field}: No such object"),
        source: "BLL".to_string(),
        err_code: "NOT_FOUND".to_string(),
        level: "ERROR".to_string(),
    }])
}

pub fn invalid(info: impl Into<String>) -> Error {
    Error::rejected(vec![ApiMessage {
        info: info.into(),
        source: "BLL".to_string(),
        err_code: "INVALID_DATA".to_string(),
        level: "ERROR".to_string(),
    }])
}

type Table = BTreeMap<String, Value>;

#[derive(Default)]
struct FakeState {
    next_id: u64,
    services: Table,
    nodes: HashMap<String, Vec<Value>>,
    rulesets: Table,
    pools: Table,
    chains: Table,
    record_sets: Table,
    records: Table,
    monitors: Table,
    unpublished: HashSet<String>,
    requests: Vec<ApiRequest>,
    pending_rejection: Option<Vec<ApiMessage>>,
    token_generation: u64,
    refuse_logins: bool,
}

impl FakeState {
    fn handle(&mut self, method: Method, path: &str, body: &Value) -> Result<Value> {
        let path = path.split('?').next().unwrap_or(path);
        let segments: Vec<&str> = path.split('/').collect();

        if method != Method::Get && body.get("publish").is_none() {
            return Err(invalid("publish: A publish flag is required"));
        }

        let touches_service = method != Method::Get && segments[0] != "DSFMonitor";
        if touches_service && body["publish"] == "Y" {
            if let Some(service_id) = segments.get(1) {
                self.unpublished.remove(*service_id);
            }
        }

        let data = match (method, segments.as_slice()) {
            (Method::Get, ["DSF"]) => Ok(Value::Array(
                self.services
                    .keys()
                    .map(|id| self.render_service(id))
                    .collect::<Result<Vec<_>>>()?,
            )),
            (Method::Post, ["DSF"]) => self.create_service(body),
            (Method::Get, ["DSF", id]) => self.render_service(id),
            (Method::Put, ["DSF", id]) => {
                update(&mut self.services, id, None, body, "service_id")?;
                self.render_service(id)
            }
            (Method::Delete, ["DSF", id]) => remove(&mut self.services, id, None, "service_id"),

            (Method::Get, ["DSFNode", svc]) => self.nodes_of(svc),
            (Method::Put, ["DSFNode", svc]) => {
                self.require_service(svc)?;
                let nodes = body["nodes"].as_array().cloned().unwrap_or_default();
                self.nodes.insert(svc.to_string(), nodes);
                self.nodes_of(svc)
            }

            (Method::Post, ["DSFRuleset", svc]) => self.create_ruleset(svc, body),
            (Method::Get, ["DSFRuleset", svc, id]) => {
                let ruleset = owned(&self.rulesets, id, Some(*svc), "dsf_ruleset_id")?;
                Ok(self.render_ruleset(ruleset))
            }
            (Method::Put, ["DSFRuleset", svc, id]) => {
                update(&mut self.rulesets, id, Some(*svc), body, "dsf_ruleset_id")?;
                let ruleset = owned(&self.rulesets, id, Some(*svc), "dsf_ruleset_id")?;
                Ok(self.render_ruleset(ruleset))
            }
            (Method::Delete, ["DSFRuleset", svc, id]) => {
                remove(&mut self.rulesets, id, Some(*svc), "dsf_ruleset_id")
            }

            (Method::Post, ["DSFResponsePool", svc]) => self.create_pool(svc, body),
            (Method::Get, ["DSFResponsePool", svc, id]) => self.render_pool(svc, id),
            (Method::Put, ["DSFResponsePool", svc, id]) => {
                update(&mut self.pools, id, Some(*svc), body, "dsf_response_pool_id")?;
                self.render_pool(svc, id)
            }
            (Method::Delete, ["DSFResponsePool", svc, id]) => {
                remove(&mut self.pools, id, Some(*svc), "dsf_response_pool_id")
            }

            (Method::Post, ["DSFRecordSetFailoverChain", svc, pool]) => {
                self.create_chain(svc, pool, body)
            }
            (Method::Get, ["DSFRecordSetFailoverChain", svc, id]) => self.render_chain(svc, id),
            (Method::Put, ["DSFRecordSetFailoverChain", svc, id]) => {
                update(
                    &mut self.chains,
                    id,
                    Some(*svc),
                    body,
                    "dsf_record_set_failover_chain_id",
                )?;
                self.render_chain(svc, id)
            }
            (Method::Delete, ["DSFRecordSetFailoverChain", svc, id]) => remove(
                &mut self.chains,
                id,
                Some(*svc),
                "dsf_record_set_failover_chain_id",
            ),

            (Method::Post, ["DSFRecordSet", svc]) => self.create_record_set(svc, body),
            (Method::Get, ["DSFRecordSet", svc, id]) => self.render_record_set(svc, id),
            (Method::Put, ["DSFRecordSet", svc, id]) => {
                self.require_monitor(body)?;
                update(&mut self.record_sets, id, Some(*svc), body, "dsf_record_set_id")?;
                self.render_record_set(svc, id)
            }
            (Method::Delete, ["DSFRecordSet", svc, id]) => {
                remove(&mut self.record_sets, id, Some(*svc), "dsf_record_set_id")
            }

            (Method::Post, ["DSFRecord", svc, record_set]) => {
                self.create_record(svc, record_set, body)
            }
            (Method::Get, ["DSFRecord", svc, id]) => {
                owned(&self.records, id, Some(*svc), "dsf_record_id").cloned()
            }
            (Method::Put, ["DSFRecord", svc, id]) => {
                update(&mut self.records, id, Some(*svc), body, "dsf_record_id")?;
                owned(&self.records, id, Some(*svc), "dsf_record_id").cloned()
            }
            (Method::Delete, ["DSFRecord", svc, id]) => {
                remove(&mut self.records, id, Some(*svc), "dsf_record_id")
            }

            (Method::Post, ["DSFMonitor"]) => self.create_monitor(body),
            (Method::Get, ["DSFMonitor", id]) => {
                owned(&self.monitors, id, None, "dsf_monitor_id").cloned()
            }
            (Method::Put, ["DSFMonitor", id]) => {
                update(&mut self.monitors, id, None, body, "dsf_monitor_id")?;
                owned(&self.monitors, id, None, "dsf_monitor_id").cloned()
            }
            (Method::Delete, ["DSFMonitor", id]) => {
                remove(&mut self.monitors, id, None, "dsf_monitor_id")
            }

            _ => Err(invalid(format!("{} {}: unknown endpoint", method, path))),
        }?;

        if touches_service && body["publish"] != "Y" {
            let service_id = match segments.get(1) {
                Some(id) => id.to_string(),
                None => data["service_id"].as_str().unwrap_or_default().to_string(),
            };
            self.unpublished.insert(service_id);
        }

        Ok(data)
    }

    fn mint(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:04}", self.next_id)
    }

    fn require_service(&self, svc: &str) -> Result<()> {
        if self.services.contains_key(svc) {
            Ok(())
        } else {
            Err(missing("service_id"))
        }
    }

    fn require_monitor(&self, body: &Value) -> Result<()> {
        match body["dsf_monitor_id"].as_str() {
            Some(id) if !id.is_empty() && !self.monitors.contains_key(id) => {
                Err(missing("dsf_monitor_id"))
            }
            _ => Ok(()),
        }
    }

    fn create_service(&mut self, body: &Value) -> Result<Value> {
        let id = self.mint("svc");
        let ttl = body.get("ttl").cloned().unwrap_or(json!("30"));
        self.services.insert(
            id.clone(),
            json!({"service_id": id, "label": body["label"], "active": "Y", "ttl": ttl}),
        );
        self.nodes.insert(id.clone(), Vec::new());
        self.render_service(&id)
    }

    fn render_service(&self, id: &str) -> Result<Value> {
        let mut service = owned(&self.services, id, None, "service_id")?.clone();
        let rulesets: Vec<Value> = self
            .rulesets
            .values()
            .filter(|r| r["service_id"] == id)
            .map(|r| self.render_ruleset(r))
            .collect();
        service["rulesets"] = json!(rulesets);
        service["nodes"] = self.nodes_of(id)?;
        service["notifiers"] = json!([]);
        service["pending_change"] = json!(if self.unpublished.contains(id) { "Y" } else { "" });
        Ok(service)
    }

    fn nodes_of(&self, svc: &str) -> Result<Value> {
        self.require_service(svc)?;
        Ok(json!(self.nodes.get(svc).cloned().unwrap_or_default()))
    }

    fn create_ruleset(&mut self, svc: &str, body: &Value) -> Result<Value> {
        self.require_service(svc)?;
        let mut pool_ids = Vec::new();
        for pool in body["response_pools"].as_array().cloned().unwrap_or_default() {
            let pool_id = pool["dsf_response_pool_id"].as_str().unwrap_or_default();
            owned(&self.pools, pool_id, Some(svc), "dsf_response_pool_id")?;
            pool_ids.push(pool_id.to_string());
        }

        let id = self.mint("rs");
        let ruleset = json!({
            "dsf_ruleset_id": id,
            "label": body["label"],
            "criteria_type": body["criteria_type"],
            "criteria": {},
            "ordering": "1",
            "eligible": "true",
            "service_id": svc,
            "pool_ids": pool_ids,
        });
        self.rulesets.insert(id, ruleset.clone());
        Ok(self.render_ruleset(&ruleset))
    }

    fn render_ruleset(&self, ruleset: &Value) -> Value {
        let mut rendered = ruleset.clone();
        let pools: Vec<Value> = ruleset["pool_ids"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .iter()
            .filter_map(|id| id.as_str().and_then(|id| self.pools.get(id)).cloned())
            .collect();
        if let Some(map) = rendered.as_object_mut() {
            map.remove("pool_ids");
        }
        rendered["response_pools"] = json!(pools);
        rendered
    }

    fn create_pool(&mut self, svc: &str, body: &Value) -> Result<Value> {
        self.require_service(svc)?;
        check_eligible(None, body)?;

        let id = self.mint("pool");
        self.pools.insert(
            id.clone(),
            json!({
                "dsf_response_pool_id": id,
                "label": body["label"],
                "automation": body.get("automation").cloned().unwrap_or(json!("auto")),
                "eligible": body.get("eligible").cloned().unwrap_or(json!("true")),
                "core_set_count": "1",
                "service_id": svc,
                "status": "ok",
            }),
        );
        self.render_pool(svc, &id)
    }

    fn render_pool(&self, svc: &str, id: &str) -> Result<Value> {
        let mut pool = owned(&self.pools, id, Some(svc), "dsf_response_pool_id")?.clone();
        let chains = self
            .chains
            .values()
            .filter(|c| c["dsf_response_pool_id"] == id)
            .map(|c| self.render_chain(svc, c["dsf_record_set_failover_chain_id"].as_str().unwrap_or_default()))
            .collect::<Result<Vec<_>>>()?;
        pool["rs_chains"] = json!(chains);
        Ok(pool)
    }

    fn create_chain(&mut self, svc: &str, pool: &str, body: &Value) -> Result<Value> {
        self.require_service(svc)?;
        owned(&self.pools, pool, Some(svc), "dsf_response_pool_id")?;

        let id = self.mint("rsfc");
        self.chains.insert(
            id.clone(),
            json!({
                "dsf_record_set_failover_chain_id": id,
                "label": body["label"],
                "core": "false",
                "dsf_response_pool_id": pool,
                "service_id": svc,
                "status": "ok",
            }),
        );
        self.render_chain(svc, &id)
    }

    fn render_chain(&self, svc: &str, id: &str) -> Result<Value> {
        let mut chain = owned(&self.chains, id, Some(svc), "dsf_record_set_failover_chain_id")?.clone();
        let sets = self
            .record_sets
            .values()
            .filter(|s| s["dsf_record_set_failover_chain_id"] == id)
            .map(|s| self.render_record_set(svc, s["dsf_record_set_id"].as_str().unwrap_or_default()))
            .collect::<Result<Vec<_>>>()?;
        chain["record_sets"] = json!(sets);
        Ok(chain)
    }

    fn create_record_set(&mut self, svc: &str, body: &Value) -> Result<Value> {
        self.require_service(svc)?;
        let chain_id = body["dsf_record_set_failover_chain_id"].as_str().unwrap_or_default();
        let chain = owned(&self.chains, chain_id, Some(svc), "dsf_record_set_failover_chain_id")?;
        let pool_id = body["dsf_response_pool_id"].as_str().unwrap_or_default();
        owned(&self.pools, pool_id, Some(svc), "dsf_response_pool_id")?;
        if chain["dsf_response_pool_id"] != pool_id {
            return Err(missing("dsf_record_set_failover_chain_id"));
        }
        self.require_monitor(body)?;
        check_eligible(None, body)?;

        let ttl = match body.get("ttl") {
            Some(ttl) => ttl.clone(),
            None => self.services[svc]["ttl"].clone(),
        };
        let id = self.mint("set");
        self.record_sets.insert(
            id.clone(),
            json!({
                "dsf_record_set_id": id,
                "label": body["label"],
                "rdata_class": body["rdata_class"],
                "ttl": ttl,
                "automation": body.get("automation").cloned().unwrap_or(json!("auto")),
                "eligible": body.get("eligible").cloned().unwrap_or(json!("true")),
                "serve_count": body.get("serve_count").cloned().unwrap_or(json!("1")),
                "fail_count": body.get("fail_count").cloned().unwrap_or(json!("")),
                "trouble_count": body.get("trouble_count").cloned().unwrap_or(json!("")),
                "dsf_monitor_id": body["dsf_monitor_id"],
                "dsf_record_set_failover_chain_id": chain_id,
                "dsf_response_pool_id": pool_id,
                "service_id": svc,
                "status": "ok",
            }),
        );
        self.render_record_set(svc, &id)
    }

    fn render_record_set(&self, svc: &str, id: &str) -> Result<Value> {
        let mut set = owned(&self.record_sets, id, Some(svc), "dsf_record_set_id")?.clone();
        let records: Vec<Value> = self
            .records
            .values()
            .filter(|r| r["dsf_record_set_id"] == id)
            .cloned()
            .collect();
        set["records"] = json!(records);
        Ok(set)
    }

    fn create_record(&mut self, svc: &str, record_set: &str, body: &Value) -> Result<Value> {
        let set = owned(&self.record_sets, record_set, Some(svc), "dsf_record_set_id")?.clone();
        check_eligible(None, body)?;

        let id = self.mint("rec");
        let record = json!({
            "dsf_record_id": id,
            "label": body["label"],
            "weight": body.get("weight").cloned().unwrap_or(json!(1)),
            "automation": body.get("automation").cloned().unwrap_or(json!("auto")),
            "eligible": body.get("eligible").cloned().unwrap_or(json!("true")),
            "master_line": body["master_line"],
            "rdata_class": set["rdata_class"],
            "endpoints": [body["master_line"]],
            "endpoint_up_count": 0,
            "torpidity": 0,
            "response_time": 0,
            "last_monitored": 0,
            "ttl": set["ttl"],
            "dsf_record_set_id": record_set,
            "service_id": svc,
            "status": "ok",
        });
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn create_monitor(&mut self, body: &Value) -> Result<Value> {
        let id = self.mint("mon");
        let mut monitor = body.clone();
        if let Some(map) = monitor.as_object_mut() {
            map.remove("publish");
        }
        monitor["dsf_monitor_id"] = json!(id);
        self.monitors.insert(id, monitor.clone());
        Ok(monitor)
    }
}

/// Look up an entity, checking it belongs to `svc` when given
fn owned<'a>(table: &'a Table, id: &str, svc: Option<&str>, field: &str) -> Result<&'a Value> {
    match table.get(id) {
        Some(entity) if svc.is_none_or(|svc| entity["service_id"] == svc) => Ok(entity),
        _ => Err(missing(field)),
    }
}

fn update(table: &mut Table, id: &str, svc: Option<&str>, body: &Value, field: &str) -> Result<()> {
    let current = owned(table, id, svc, field)?;
    check_eligible(current.get("automation"), body)?;

    let Some(entity) = table.get_mut(id).and_then(Value::as_object_mut) else {
        return Err(missing(field));
    };
    for (key, value) in body.as_object().into_iter().flatten() {
        if key != "publish" {
            entity.insert(key.clone(), value.clone());
        }
    }
    Ok(())
}

fn remove(table: &mut Table, id: &str, svc: Option<&str>, field: &str) -> Result<Value> {
    owned(table, id, svc, field)?;
    table.remove(id);
    Ok(json!({}))
}

/// The API refuses `eligible` unless the effective automation is manual
fn check_eligible(current_automation: Option<&Value>, body: &Value) -> Result<()> {
    if body.get("eligible").is_none() {
        return Ok(());
    }
    let automation = body
        .get("automation")
        .or(current_automation)
        .and_then(Value::as_str)
        .unwrap_or("auto");
    if automation != "manual" {
        return Err(invalid(format!(
            "eligible: cannot be set when automation is {automation}"
        )));
    }
    Ok(())
}
