//! Deployment compiler
//!
//! Turns a registry, a connectivity graph and a populated namespace into
//! a validated [`Plan`]. Compilation is deterministic: output ordering
//! follows registration order, never map traversal order, so repeated
//! compiles of the same blueprint produce identically ordered plans.

use crate::error::{DeployError, Result};
use crate::namespace::{Deployable, Namespace, NamespaceState};
use crate::plan::{FirewallRule, Plan, ResourceSpec};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use weft_core::{EntityRef, Graph, Registry};

/// Compiles namespaces against one registry and graph
pub struct Compiler<'a> {
    registry: &'a Registry,
    graph: &'a Graph,
}

/// How a deployed container entered the namespace
#[derive(Debug, Clone, PartialEq)]
enum Owner {
    Direct,
    Service(String),
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a Registry, graph: &'a Graph) -> Self {
        Self { registry, graph }
    }

    /// Compile the namespace into a plan and seal it
    ///
    /// Runs, in order: reference validation of every connection rule,
    /// flattening of service endpoints into per-container rules, and
    /// emission of resource specs. On any error the namespace is left
    /// untouched and no partial plan escapes. An empty namespace compiles
    /// to an empty plan.
    #[instrument(skip_all, fields(namespace = %namespace.name()))]
    pub fn compile(&self, namespace: &mut Namespace) -> Result<Plan> {
        // Compiled is terminal; a caller wanting a new plan rebuilds
        if namespace.state() == NamespaceState::Compiled {
            return Err(DeployError::Sealed(namespace.name().to_string()));
        }

        // 1. Collect deployed identities and detect ownership conflicts
        debug!("Step 1: Collecting deployed identities");
        let containers = self.deployed_containers(namespace)?;

        // 2. Reference validation: every rule endpoint must be deployed
        //    or be the public internet
        debug!("Step 2: Validating connection rule endpoints");
        for rule in self.graph.rules() {
            self.check_deployed(namespace, &containers, &rule.from)?;
            self.check_deployed(namespace, &containers, &rule.to)?;
        }

        // 3. Flatten service endpoints into per-container rules
        debug!("Step 3: Flattening service rules");
        let firewall = self.flatten_rules();

        // 4. Emit resource specs in deploy order
        debug!("Step 4: Emitting resource specs");
        let resources = self.emit_resources(namespace)?;

        let plan = Plan {
            namespace: namespace.name().to_string(),
            admin_acl: namespace.admin_acl().to_vec(),
            created_at: Utc::now(),
            resources,
            firewall,
        };

        namespace.seal();
        info!(summary = %plan.summary(), "Compiled deployment plan");
        Ok(plan)
    }

    /// Map of deployed container name -> how it was deployed
    ///
    /// A container reached both directly and through a service, or through
    /// two services, has no single resource spec and is a conflict.
    fn deployed_containers(&self, namespace: &Namespace) -> Result<HashMap<String, Owner>> {
        let mut owners: HashMap<String, Owner> = HashMap::new();

        let mut claim = |name: &str, owner: Owner| -> Result<()> {
            match owners.get(name) {
                None => {
                    owners.insert(name.to_string(), owner);
                    Ok(())
                }
                Some(existing) if *existing == owner => Ok(()),
                Some(existing) => Err(DeployError::Conflict(format!(
                    "container '{name}' is deployed both as {} and as {}",
                    describe(existing),
                    describe(&owner),
                ))),
            }
        };

        for target in namespace.targets() {
            match target {
                Deployable::Entity(EntityRef::Container(name)) => {
                    claim(name, Owner::Direct)?;
                }
                Deployable::Entity(EntityRef::Service(name)) => {
                    let service = self
                        .registry
                        .service(name)
                        .ok_or_else(|| DeployError::UnknownEntity(name.clone()))?;
                    for member in &service.containers {
                        claim(member, Owner::Service(name.clone()))?;
                    }
                }
                _ => {}
            }
        }
        Ok(owners)
    }

    /// Check a rule endpoint against the deployed set
    fn check_deployed(
        &self,
        namespace: &Namespace,
        containers: &HashMap<String, Owner>,
        endpoint: &EntityRef,
    ) -> Result<()> {
        let deployed = match endpoint {
            EntityRef::PublicInternet => true,
            EntityRef::Container(name) => containers.contains_key(name),
            EntityRef::Service(name) => namespace
                .targets()
                .contains(&Deployable::Entity(EntityRef::Service(name.clone()))),
            EntityRef::Machine(name) => namespace.targets().iter().any(|t| {
                matches!(t, Deployable::Machine(instance) if instance.machine == *name)
            }),
        };
        if deployed {
            Ok(())
        } else {
            Err(DeployError::UndeployedEndpoint(endpoint.to_string()))
        }
    }

    /// Expand service endpoints to member containers, cross-product when
    /// both ends are services, dropping duplicates keep-first
    fn flatten_rules(&self) -> Vec<FirewallRule> {
        let mut firewall: Vec<FirewallRule> = Vec::new();
        for rule in self.graph.rules() {
            for from in self.flatten_endpoint(&rule.from) {
                for to in self.flatten_endpoint(&rule.to) {
                    let flat = FirewallRule {
                        from: from.clone(),
                        to,
                        port: rule.port,
                    };
                    if !firewall.contains(&flat) {
                        firewall.push(flat);
                    }
                }
            }
        }
        firewall
    }

    fn flatten_endpoint(&self, endpoint: &EntityRef) -> Vec<EntityRef> {
        match endpoint {
            EntityRef::Service(name) => match self.registry.service(name) {
                Some(service) => service
                    .containers
                    .iter()
                    .map(|member| EntityRef::Container(member.clone()))
                    .collect(),
                // Validated earlier; an unknown service has no members
                None => Vec::new(),
            },
            other => vec![other.clone()],
        }
    }

    /// Resource specs in deploy-registration order; services expand to
    /// their member containers in member order
    fn emit_resources(&self, namespace: &Namespace) -> Result<Vec<ResourceSpec>> {
        let mut resources = Vec::new();
        for target in namespace.targets() {
            match target {
                Deployable::Machine(instance) => {
                    let machine = self
                        .registry
                        .machine(&instance.machine)
                        .ok_or_else(|| DeployError::UnknownEntity(instance.machine.clone()))?;
                    resources.push(ResourceSpec::Machine {
                        name: instance.id(),
                        role: instance.role,
                        provider: machine.provider.clone(),
                        size: machine.size.clone(),
                        ssh_keys: machine.ssh_keys.clone(),
                    });
                }
                Deployable::Entity(EntityRef::Container(name)) => {
                    resources.push(self.container_spec(name, None)?);
                }
                Deployable::Entity(EntityRef::Service(name)) => {
                    let service = self
                        .registry
                        .service(name)
                        .ok_or_else(|| DeployError::UnknownEntity(name.clone()))?;
                    for member in &service.containers {
                        resources.push(self.container_spec(member, Some(name.clone()))?);
                    }
                }
                // deploy() rejects these up front
                Deployable::Entity(EntityRef::Machine(name)) => {
                    return Err(DeployError::MissingRole(name.clone()));
                }
                Deployable::Entity(EntityRef::PublicInternet) => {
                    return Err(DeployError::PublicInternetNotDeployable);
                }
            }
        }
        Ok(resources)
    }

    fn container_spec(&self, name: &str, service: Option<String>) -> Result<ResourceSpec> {
        let container = self
            .registry
            .container(name)
            .ok_or_else(|| DeployError::UnknownEntity(name.to_string()))?;
        Ok(ResourceSpec::Container {
            name: container.name.clone(),
            service,
            image: container.image.clone(),
            env: container.env.clone(),
            files: container.files.clone(),
        })
    }
}

fn describe(owner: &Owner) -> String {
    match owner {
        Owner::Direct => "a direct target".to_string(),
        Owner::Service(name) => format!("a member of service '{name}'"),
    }
}
