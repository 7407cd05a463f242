//! ポート定義

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ポート指定
///
/// 単一ポートまたは連続レンジ。ポート0は不正、レンジは from <= to が必須。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortSpec {
    Single(u16),
    Range { from: u16, to: u16 },
}

impl PortSpec {
    /// 単一ポートを構築
    pub fn single(port: u16) -> Result<Self> {
        let spec = PortSpec::Single(port);
        spec.validate()?;
        Ok(spec)
    }

    /// ポートレンジを構築
    pub fn range(from: u16, to: u16) -> Result<Self> {
        let spec = PortSpec::Range { from, to };
        spec.validate()?;
        Ok(spec)
    }

    /// 値の検証
    pub fn validate(&self) -> Result<()> {
        match *self {
            PortSpec::Single(0) => Err(ModelError::InvalidPort(
                "ポート0は使用できません".to_string(),
            )),
            PortSpec::Single(_) => Ok(()),
            PortSpec::Range { from: 0, .. } | PortSpec::Range { to: 0, .. } => Err(
                ModelError::InvalidPort("ポート0を含むレンジは使用できません".to_string()),
            ),
            PortSpec::Range { from, to } if from > to => Err(ModelError::InvalidPort(format!(
                "レンジの下限が上限を超えています: {from}-{to}"
            ))),
            PortSpec::Range { .. } => Ok(()),
        }
    }
}

impl From<u16> for PortSpec {
    fn from(port: u16) -> Self {
        PortSpec::Single(port)
    }
}

impl From<(u16, u16)> for PortSpec {
    fn from((from, to): (u16, u16)) -> Self {
        PortSpec::Range { from, to }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Single(port) => write!(f, "{port}"),
            PortSpec::Range { from, to } => write!(f, "{from}-{to}"),
        }
    }
}
