//! Namespace: the unit of one provisioning run
//!
//! A namespace collects deploy targets and moves through
//! `Empty -> Populated -> Compiled`. Compiled is terminal: a caller that
//! needs a different plan builds a new namespace.

use crate::error::{DeployError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use weft_core::{EntityRef, MachineInstance, Registry};

/// Something that can be registered for deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deployable {
    /// A registered container or service (or a bare machine ref, which
    /// is rejected at deploy time for lacking a role)
    Entity(EntityRef),
    /// A role-assigned machine instance
    Machine(MachineInstance),
}

impl Deployable {
    /// Display name of the deploy target
    pub fn name(&self) -> String {
        match self {
            Deployable::Entity(entity) => entity.to_string(),
            Deployable::Machine(instance) => instance.id(),
        }
    }
}

impl From<EntityRef> for Deployable {
    fn from(entity: EntityRef) -> Self {
        Deployable::Entity(entity)
    }
}

impl From<MachineInstance> for Deployable {
    fn from(instance: MachineInstance) -> Self {
        Deployable::Machine(instance)
    }
}

/// Lifecycle state of a namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceState {
    Empty,
    Populated,
    Compiled,
}

/// Container for all entities destined for one provisioning run
#[derive(Debug, Clone)]
pub struct Namespace {
    name: String,
    admin_acl: Vec<String>,
    targets: Vec<Deployable>,
    state: NamespaceState,
}

impl Namespace {
    pub fn new(
        name: impl Into<String>,
        admin_acl: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            admin_acl: admin_acl.into_iter().map(Into::into).collect(),
            targets: Vec::new(),
            state: NamespaceState::Empty,
        }
    }

    /// Register a target for deployment
    ///
    /// Fails when the target is not in the registry, when a bare machine
    /// is registered without a role, or when the namespace has already
    /// been compiled. Registering an identical target twice is a no-op.
    pub fn deploy(&mut self, registry: &Registry, target: impl Into<Deployable>) -> Result<()> {
        if self.state == NamespaceState::Compiled {
            return Err(DeployError::Sealed(self.name.clone()));
        }

        let target = target.into();
        match &target {
            Deployable::Entity(EntityRef::PublicInternet) => {
                return Err(DeployError::PublicInternetNotDeployable);
            }
            Deployable::Entity(EntityRef::Machine(name)) => {
                // The template exists or not; either way a bare machine
                // carries no role and cannot be booted.
                if !registry.contains(&EntityRef::Machine(name.clone())) {
                    return Err(DeployError::UnknownEntity(name.clone()));
                }
                return Err(DeployError::MissingRole(name.clone()));
            }
            Deployable::Entity(entity) => {
                if !registry.contains(entity) {
                    return Err(DeployError::UnknownEntity(entity.to_string()));
                }
            }
            Deployable::Machine(instance) => {
                if registry.machine(&instance.machine).is_none() {
                    return Err(DeployError::UnknownEntity(instance.machine.clone()));
                }
            }
        }

        if self.targets.contains(&target) {
            debug!(namespace = %self.name, target = %target.name(), "Target already deployed, skipping");
            return Ok(());
        }

        debug!(namespace = %self.name, target = %target.name(), "Deployed target");
        self.targets.push(target);
        self.state = NamespaceState::Populated;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin_acl(&self) -> &[String] {
        &self.admin_acl
    }

    /// Deploy targets in registration order
    pub fn targets(&self) -> &[Deployable] {
        &self.targets
    }

    pub fn state(&self) -> NamespaceState {
        self.state
    }

    /// Mark the namespace compiled. Called by the compiler on success only.
    pub(crate) fn seal(&mut self) {
        self.state = NamespaceState::Compiled;
    }
}
