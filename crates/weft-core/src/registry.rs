//! エンティティレジストリ
//!
//! 構築済みエンティティの唯一の置き場。名前は種別をまたいで一意で、
//! 登録順を記録します。登録順はコンパイル出力の安定した並び順の基準になります。

use crate::error::{ModelError, Result};
use crate::model::{Container, EntityRef, Machine, Service};
use std::collections::HashMap;
use tracing::debug;

/// エンティティレジストリ
///
/// `PublicInternet` は登録不要の番兵として常に「存在する」扱いです。
#[derive(Debug, Clone, Default)]
pub struct Registry {
    containers: HashMap<String, Container>,
    services: HashMap<String, Service>,
    machines: HashMap<String, Machine>,
    /// 登録順
    order: Vec<EntityRef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// コンテナを登録
    pub fn register_container(&mut self, container: Container) -> Result<EntityRef> {
        self.claim_name(&container.name)?;
        let entity = container.entity_ref();
        debug!(container = %container.name, image = %container.image, "Registered container");
        self.containers.insert(container.name.clone(), container);
        self.order.push(entity.clone());
        Ok(entity)
    }

    /// サービスを登録
    ///
    /// メンバーコンテナが未登録の場合は `ReferenceError` 系で失敗し、
    /// レジストリは変更されません。
    pub fn register_service(&mut self, service: Service) -> Result<EntityRef> {
        self.claim_name(&service.name)?;
        for member in &service.containers {
            if !self.containers.contains_key(member) {
                return Err(ModelError::UnknownEntity(EntityRef::Container(
                    member.clone(),
                )));
            }
        }
        let entity = service.entity_ref();
        debug!(service = %service.name, members = service.containers.len(), "Registered service");
        self.services.insert(service.name.clone(), service);
        self.order.push(entity.clone());
        Ok(entity)
    }

    /// マシンテンプレートを登録
    pub fn register_machine(&mut self, machine: Machine) -> Result<EntityRef> {
        self.claim_name(&machine.name)?;
        let entity = machine.entity_ref();
        debug!(machine = %machine.name, provider = %machine.provider, "Registered machine");
        self.machines.insert(machine.name.clone(), machine);
        self.order.push(entity.clone());
        Ok(entity)
    }

    /// 名前の重複チェック（種別をまたいで一意）
    fn claim_name(&self, name: &str) -> Result<()> {
        let taken = self.containers.contains_key(name)
            || self.services.contains_key(name)
            || self.machines.contains_key(name);
        if taken {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// エンティティが登録済みか
    pub fn contains(&self, entity: &EntityRef) -> bool {
        match entity {
            EntityRef::Container(name) => self.containers.contains_key(name),
            EntityRef::Service(name) => self.services.contains_key(name),
            EntityRef::Machine(name) => self.machines.contains_key(name),
            EntityRef::PublicInternet => true,
        }
    }

    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    /// コンパイル前の env / files 拡張用
    pub fn container_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.containers.get_mut(name)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    pub fn machine(&self, name: &str) -> Option<&Machine> {
        self.machines.get(name)
    }

    /// 登録順のエンティティ参照一覧
    pub fn entities(&self) -> &[EntityRef] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MachineSize;

    fn sample_container(name: &str) -> Container {
        Container::new(name, "nginx:latest").unwrap()
    }

    #[test]
    fn test_registration_order_is_recorded() {
        let mut registry = Registry::new();
        registry.register_container(sample_container("b")).unwrap();
        registry.register_container(sample_container("a")).unwrap();
        registry
            .register_service(Service::new("s", ["a", "b"]).unwrap())
            .unwrap();

        let names: Vec<&str> = registry.entities().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["b", "a", "s"]);
    }

    #[test]
    fn test_duplicate_name_across_kinds_rejected() {
        let mut registry = Registry::new();
        registry.register_container(sample_container("bot")).unwrap();

        // 別種別でも同名は不可
        let machine = Machine::new(
            "bot",
            "amazon",
            MachineSize::Plan("m5.large".to_string()),
            Vec::<String>::new(),
        )
        .unwrap();
        let result = registry.register_machine(machine);
        assert!(matches!(result, Err(ModelError::DuplicateName(name)) if name == "bot"));
    }

    #[test]
    fn test_service_with_unknown_member_rejected() {
        let mut registry = Registry::new();
        let result = registry.register_service(Service::new("s", ["ghost"]).unwrap());
        assert!(matches!(result, Err(ModelError::UnknownEntity(_))));
        // 失敗時はレジストリ不変
        assert!(registry.is_empty());
    }

    #[test]
    fn test_public_internet_always_present() {
        let registry = Registry::new();
        assert!(registry.contains(&EntityRef::PublicInternet));
        assert!(!registry.contains(&EntityRef::Container("ghost".to_string())));
    }

    #[test]
    fn test_container_mut_allows_env_extension() {
        let mut registry = Registry::new();
        registry.register_container(sample_container("bot")).unwrap();

        registry
            .container_mut("bot")
            .unwrap()
            .merge_env([("TOKEN", "x")])
            .unwrap();
        assert_eq!(
            registry.container("bot").unwrap().env.get("TOKEN"),
            Some(&"x".to_string())
        );
    }
}
