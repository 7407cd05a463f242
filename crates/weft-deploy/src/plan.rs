//! Compiled deployment plan
//!
//! The plan is the single artifact handed to an external provisioning
//! engine: per-entity resource requests plus the ordered firewall
//! allow-list. Once emitted it is never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weft_core::{EntityRef, MachineSize, PortSpec, Role};

/// A compiled, validated deployment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Namespace name this plan was compiled for
    pub namespace: String,

    /// Administrator identities allowed to manage the deployment
    pub admin_acl: Vec<String>,

    /// When the plan was compiled
    pub created_at: DateTime<Utc>,

    /// Resource requests, in deploy-registration order
    pub resources: Vec<ResourceSpec>,

    /// Concrete firewall rules, in rule-registration order
    pub firewall: Vec<FirewallRule>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.firewall.is_empty()
    }

    /// Summary of the plan contents
    pub fn summary(&self) -> PlanSummary {
        let machines = self
            .resources
            .iter()
            .filter(|r| matches!(r, ResourceSpec::Machine { .. }))
            .count();
        PlanSummary {
            machines,
            containers: self.resources.len() - machines,
            rules: self.firewall.len(),
        }
    }
}

/// Resource request for a single deployable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceSpec {
    /// A virtual machine to boot
    Machine {
        /// Instance name ("{template}.{role}")
        name: String,
        role: Role,
        provider: String,
        size: MachineSize,
        ssh_keys: Vec<String>,
    },
    /// A container to run
    Container {
        name: String,
        /// Owning service, if the container was deployed through one
        service: Option<String>,
        image: String,
        env: BTreeMap<String, String>,
        files: BTreeMap<String, String>,
    },
}

impl ResourceSpec {
    pub fn name(&self) -> &str {
        match self {
            ResourceSpec::Machine { name, .. } => name,
            ResourceSpec::Container { name, .. } => name,
        }
    }
}

/// A concrete directed firewall rule
///
/// After compilation service endpoints have been flattened away, so
/// `from`/`to` only name containers, machines or the public internet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub from: EntityRef,
    pub to: EntityRef,
    pub port: PortSpec,
}

impl std::fmt::Display for FirewallRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} :{}", self.from, self.to, self.port)
    }
}

/// Counts of plan contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub machines: usize,
    pub containers: usize,
    pub rules: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} machines, {} containers, {} firewall rules",
            self.machines, self.containers, self.rules
        )
    }
}
