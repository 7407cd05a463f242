//! 接続グラフ
//!
//! エンティティ間の有向・ポート付き許可エッジの集合。デフォルトは全拒否で、
//! 明示的に許可した方向・ポートだけが通ります。双方向にしたい場合は
//! 2本のエッジを張ります（`connect` はその糖衣）。

use crate::error::{ModelError, Result};
use crate::model::{EntityRef, PortSpec};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// 許可ルール（有向エッジ）
///
/// 「from が to へ port で送信してよい」。対称性は一切暗黙に持ちません。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowRule {
    pub from: EntityRef,
    pub to: EntityRef,
    pub port: PortSpec,
}

impl fmt::Display for AllowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} :{}", self.from, self.to, self.port)
    }
}

/// 接続グラフ
///
/// エッジは登録順を保持した多重グラフ（同一エッジは冪等に1本）。
/// 循環は正当（相互に通信する2サービスなど）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    rules: Vec<AllowRule>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 単一ポートの有向許可エッジを登録
    pub fn allow(
        &mut self,
        registry: &Registry,
        from: EntityRef,
        to: EntityRef,
        port: u16,
    ) -> Result<()> {
        self.allow_spec(registry, from, to, PortSpec::Single(port))
    }

    /// 有向の許可エッジを登録（レンジ対応）
    ///
    /// 冪等: 同一の (from, to, port) は1本のまま。どちらかの端点が未登録なら
    /// `ReferenceError` 系で失敗し、グラフは変更されません。
    pub fn allow_spec(
        &mut self,
        registry: &Registry,
        from: EntityRef,
        to: EntityRef,
        port: PortSpec,
    ) -> Result<()> {
        port.validate()?;
        if !registry.contains(&from) {
            return Err(ModelError::UnknownEntity(from));
        }
        if !registry.contains(&to) {
            return Err(ModelError::UnknownEntity(to));
        }

        let rule = AllowRule { from, to, port };
        if self.rules.contains(&rule) {
            debug!(rule = %rule, "Allow rule already present, skipping");
            return Ok(());
        }
        debug!(rule = %rule, "Added allow rule");
        self.rules.push(rule);
        Ok(())
    }

    /// 旧来の対称コネクト（糖衣）
    ///
    /// 定義は正確に `allow(a, b, port)` + `allow(b, a, port)`。独立した2本の
    /// エッジとして保存されるため、片方向だけの取り消しが後から可能です。
    pub fn connect(
        &mut self,
        registry: &Registry,
        port: u16,
        a: EntityRef,
        b: EntityRef,
    ) -> Result<()> {
        self.allow(registry, a.clone(), b.clone(), port)?;
        self.allow(registry, b, a, port)
    }

    /// 有向エッジを1本だけ取り消す
    ///
    /// 逆方向のエッジには影響しません。取り消せた場合 true。
    pub fn revoke(&mut self, from: &EntityRef, to: &EntityRef, port: &PortSpec) -> bool {
        let before = self.rules.len();
        self.rules
            .retain(|r| !(r.from == *from && r.to == *to && r.port == *port));
        let removed = self.rules.len() < before;
        if removed {
            debug!(from = %from, to = %to, port = %port, "Revoked allow rule");
        }
        removed
    }

    /// 登録順の全ルール
    pub fn rules(&self) -> &[AllowRule] {
        &self.rules
    }

    /// 指定エンティティが端点となる全ルール（コンパイラ用クエリ）
    pub fn rules_for(&self, entity: &EntityRef) -> Vec<&AllowRule> {
        self.rules
            .iter()
            .filter(|r| r.from == *entity || r.to == *entity)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
