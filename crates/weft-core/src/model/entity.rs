//! エンティティ参照
//!
//! モデル内のすべての名詞（コンテナ、サービス、マシン、パブリックインターネット）を
//! 指し示すための識別子。接続グラフとデプロイ登録はこの参照単位で行われます。

use serde::{Deserialize, Serialize};
use std::fmt;

/// パブリックインターネットの表示名
pub const PUBLIC_INTERNET_NAME: &str = "public";

/// エンティティ参照
///
/// `PublicInternet` はデプロイ境界の外側を表す番兵で、レジストリに登録せず
/// 常に「存在する」ものとして扱われます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum EntityRef {
    Container(String),
    Service(String),
    Machine(String),
    PublicInternet,
}

impl EntityRef {
    /// エンティティ名を返す
    pub fn name(&self) -> &str {
        match self {
            EntityRef::Container(name) => name,
            EntityRef::Service(name) => name,
            EntityRef::Machine(name) => name,
            EntityRef::PublicInternet => PUBLIC_INTERNET_NAME,
        }
    }

    pub fn is_public_internet(&self) -> bool {
        matches!(self, EntityRef::PublicInternet)
    }

    /// 種別の表示名
    pub fn kind(&self) -> &'static str {
        match self {
            EntityRef::Container(_) => "container",
            EntityRef::Service(_) => "service",
            EntityRef::Machine(_) => "machine",
            EntityRef::PublicInternet => "public-internet",
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::PublicInternet => write!(f, "public-internet"),
            other => write!(f, "{}:{}", other.kind(), other.name()),
        }
    }
}
