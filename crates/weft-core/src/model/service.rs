//! サービス定義

use crate::error::{ModelError, Result};
use crate::model::entity::EntityRef;
use serde::{Deserialize, Serialize};

/// サービス定義
///
/// 名前付きのコンテナグループ。接続ポリシー上は1つのエンドポイントとして
/// 扱われ、「このサービス内のいずれかのコンテナ」を意味します。
/// メンバーの並び順は保持され、コンパイル時の展開順になります。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// サービス名
    pub name: String,
    /// メンバーコンテナ名（順序あり）
    pub containers: Vec<String>,
}

impl Service {
    /// サービスを構築
    ///
    /// 名前が空、またはメンバーリストが空の場合は失敗。
    pub fn new<M>(name: impl Into<String>, containers: impl IntoIterator<Item = M>) -> Result<Self>
    where
        M: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }

        let containers: Vec<String> = containers.into_iter().map(Into::into).collect();
        if containers.is_empty() {
            return Err(ModelError::EmptyService(name));
        }

        Ok(Self { name, containers })
    }

    /// このサービスへのエンティティ参照
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::Service(self.name.clone())
    }
}
