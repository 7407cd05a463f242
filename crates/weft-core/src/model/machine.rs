//! マシン定義
//!
//! 仮想ホストのサイジングテンプレート。ロール（master / worker）は構築時ではなく
//! デプロイ時に `as_master` / `as_worker` で付与され、同一テンプレートから
//! 独立した複数のデプロイ対象を生成できます。

use crate::error::{ModelError, Result};
use crate::model::entity::EntityRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// リソースレンジ
///
/// CPUコア数やRAM(GB)の希望範囲。`max` 未指定は「min以上ならいくつでも」。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl ResourceRange {
    /// 下限のみのレンジを構築
    pub fn at_least(min: f64) -> Result<Self> {
        Self::new(min, None)
    }

    /// レンジを構築
    pub fn new(min: f64, max: Option<f64>) -> Result<Self> {
        if !min.is_finite() || min <= 0.0 {
            return Err(ModelError::InvalidRange(format!(
                "下限は正の数で指定してください: {min}"
            )));
        }
        if let Some(max) = max
            && (!max.is_finite() || max < min)
        {
            return Err(ModelError::InvalidRange(format!(
                "上限が下限を下回っています: {min}..{max}"
            )));
        }
        Ok(Self { min, max })
    }
}

/// マシンサイジング
///
/// プロバイダーのプラン名、または CPU / RAM の独立レンジのいずれか。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineSize {
    /// 名前付きプラン（例: "2core-4gb"）
    Plan(String),
    /// CPU / RAM レンジ指定
    Ranges {
        cpu: ResourceRange,
        ram: ResourceRange,
    },
}

/// クラスタ内ロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Master,
    Worker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

/// マシン定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// テンプレート名
    pub name: String,
    /// プロバイダー識別子（例: "amazon", "sakura-cloud"）
    pub provider: String,
    /// サイジング
    pub size: MachineSize,
    /// SSH公開鍵
    pub ssh_keys: Vec<String>,
}

impl Machine {
    /// マシンテンプレートを構築
    ///
    /// プラン名が空文字の場合は失敗。レンジの検証は `ResourceRange` 構築時に済んでいる。
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        size: MachineSize,
        ssh_keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let name = name.into();
        let provider = provider.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if provider.trim().is_empty() {
            return Err(ModelError::EmptyProvider(name));
        }
        if let MachineSize::Plan(plan) = &size
            && plan.trim().is_empty()
        {
            return Err(ModelError::EmptyPlan(name));
        }

        Ok(Self {
            name,
            provider,
            size,
            ssh_keys: ssh_keys.into_iter().map(Into::into).collect(),
        })
    }

    /// master ロールを付与したインスタンスを生成（純粋変換、テンプレートは不変）
    pub fn as_master(&self) -> MachineInstance {
        MachineInstance {
            machine: self.name.clone(),
            role: Role::Master,
        }
    }

    /// worker ロールを付与したインスタンスを生成
    pub fn as_worker(&self) -> MachineInstance {
        MachineInstance {
            machine: self.name.clone(),
            role: Role::Worker,
        }
    }

    /// このテンプレートへのエンティティ参照
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::Machine(self.name.clone())
    }
}

/// ロール付与済みマシン
///
/// テンプレート名とロールの組。同一テンプレートから生成した master と worker は
/// サイジングを共有しつつ、別個のデプロイ対象として区別されます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineInstance {
    /// テンプレート名
    pub machine: String,
    /// 付与されたロール
    pub role: Role,
}

impl MachineInstance {
    /// デプロイ対象としての識別子（例: "base.master"）
    pub fn id(&self) -> String {
        format!("{}.{}", self.machine, self.role)
    }
}

impl fmt::Display for MachineInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_with_plan() {
        let machine = Machine::new(
            "base",
            "sakura-cloud",
            MachineSize::Plan("2core-4gb".to_string()),
            ["ssh-ed25519 AAAA..."],
        )
        .unwrap();
        assert_eq!(machine.provider, "sakura-cloud");
        assert_eq!(machine.ssh_keys.len(), 1);
    }

    #[test]
    fn test_machine_with_ranges() {
        let size = MachineSize::Ranges {
            cpu: ResourceRange::at_least(1.0).unwrap(),
            ram: ResourceRange::new(1.0, Some(2.0)).unwrap(),
        };
        let machine = Machine::new("base", "amazon", size, Vec::<String>::new()).unwrap();
        assert!(matches!(machine.size, MachineSize::Ranges { .. }));
    }

    #[test]
    fn test_empty_plan_rejected() {
        let result = Machine::new(
            "base",
            "amazon",
            MachineSize::Plan("  ".to_string()),
            Vec::<String>::new(),
        );
        assert!(matches!(result, Err(ModelError::EmptyPlan(_))));
    }

    #[test]
    fn test_empty_provider_rejected() {
        let result = Machine::new(
            "base",
            "  ",
            MachineSize::Plan("m5.large".to_string()),
            Vec::<String>::new(),
        );
        assert!(matches!(result, Err(ModelError::EmptyProvider(name)) if name == "base"));
    }

    #[test]
    fn test_invalid_range_rejected() {
        assert!(ResourceRange::at_least(0.0).is_err());
        assert!(ResourceRange::new(2.0, Some(1.0)).is_err());
        assert!(ResourceRange::new(1.0, Some(1.0)).is_ok());
    }

    #[test]
    fn test_role_assignment_is_pure() {
        let machine = Machine::new(
            "base",
            "amazon",
            MachineSize::Plan("m5.large".to_string()),
            Vec::<String>::new(),
        )
        .unwrap();

        let master = machine.as_master();
        let worker = machine.as_worker();

        // テンプレートは共有、識別子は別
        assert_eq!(master.machine, worker.machine);
        assert_ne!(master, worker);
        assert_eq!(master.id(), "base.master");
        assert_eq!(worker.id(), "base.worker");
    }
}
