//! コンテナ定義

use crate::error::{ModelError, Result};
use crate::model::entity::EntityRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// イメージ参照のパターン
///
/// `registry/repo:tag` 形式のサブセット。レジストリホストとポート、
/// ネストしたリポジトリパス、タグを許容します。
const IMAGE_PATTERN: &str =
    r"^[a-z0-9]+([._-][a-z0-9]+)*(:[0-9]+)?(/[a-z0-9]+([._-][a-z0-9]+)*)*(:[A-Za-z0-9][A-Za-z0-9._-]*)?$";

/// コンテナ定義
///
/// 1つのデプロイ可能なプロセス単位。イメージと環境変数、注入ファイルを持ちます。
/// 名前とイメージは構築後は不変、env / files はコンパイルまで拡張可能です。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// コンテナ名
    pub name: String,
    /// イメージ参照（例: ghcr.io/owner/bot:1.2）
    pub image: String,
    /// 環境変数（値は後からシークレット参照に差し替え可能な不透明文字列）
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// 注入ファイル（絶対パス → リテラル内容）
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl Container {
    /// コンテナを構築
    ///
    /// 名前が空、またはイメージ参照が不正な場合は `ValidationError` 系で失敗。
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let image = image.into();

        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        validate_image(&image)?;

        Ok(Self {
            name,
            image,
            env: BTreeMap::new(),
            files: BTreeMap::new(),
        })
    }

    /// 環境変数を追加して返す（ビルダー）
    pub fn with_env<K, V>(mut self, env: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.merge_env(env)?;
        Ok(self)
    }

    /// 注入ファイルを追加して返す（ビルダー）
    pub fn with_files<K, V>(mut self, files: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.merge_files(files)?;
        Ok(self)
    }

    /// 環境変数をマージする（既存キーは上書き）
    pub fn merge_env<K, V>(&mut self, env: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in env {
            let key = key.into();
            if key.trim().is_empty() {
                return Err(ModelError::EmptyEnvKey(self.name.clone()));
            }
            self.env.insert(key, value.into());
        }
        Ok(())
    }

    /// 注入ファイルをマージする（既存パスは上書き）
    pub fn merge_files<K, V>(&mut self, files: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (path, content) in files {
            let path = path.into();
            if !path.starts_with('/') {
                return Err(ModelError::RelativeFilePath(path));
            }
            self.files.insert(path, content.into());
        }
        Ok(())
    }

    /// このコンテナへのエンティティ参照
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::Container(self.name.clone())
    }
}

/// イメージ参照を検証
fn validate_image(image: &str) -> Result<()> {
    if image.trim().is_empty() {
        return Err(ModelError::InvalidImage("(空)".to_string()));
    }
    let re = Regex::new(IMAGE_PATTERN).map_err(|e| ModelError::InvalidPattern(e.to_string()))?;
    if !re.is_match(image) {
        return Err(ModelError::InvalidImage(image.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_creation() {
        let container = Container::new("bot", "quilt/bot").unwrap();
        assert_eq!(container.name, "bot");
        assert_eq!(container.image, "quilt/bot");
        assert!(container.env.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Container::new("  ", "quilt/bot");
        assert!(matches!(result, Err(ModelError::EmptyName)));
    }

    #[test]
    fn test_image_validation() {
        assert!(Container::new("a", "nginx").is_ok());
        assert!(Container::new("a", "nginx:1.27").is_ok());
        assert!(Container::new("a", "ghcr.io/owner/bot:v2").is_ok());
        assert!(Container::new("a", "registry.local:5000/app").is_ok());

        assert!(Container::new("a", "").is_err());
        assert!(Container::new("a", "UPPERCASE").is_err());
        assert!(Container::new("a", "spaces in image").is_err());
        assert!(Container::new("a", "/leading-slash").is_err());
    }

    #[test]
    fn test_env_builder_and_merge() {
        let mut container = Container::new("bot", "quilt/bot")
            .unwrap()
            .with_env([("TOKEN", "x")])
            .unwrap();
        assert_eq!(container.env.get("TOKEN"), Some(&"x".to_string()));

        // 後からのマージは既存キーを上書き
        container.merge_env([("TOKEN", "y"), ("EXTRA", "1")]).unwrap();
        assert_eq!(container.env.get("TOKEN"), Some(&"y".to_string()));
        assert_eq!(container.env.len(), 2);
    }

    #[test]
    fn test_files_must_be_absolute() {
        let result = Container::new("bot", "quilt/bot")
            .unwrap()
            .with_files([("relative/path.json", "{}")]);
        assert!(matches!(result, Err(ModelError::RelativeFilePath(_))));

        let container = Container::new("bot", "quilt/bot")
            .unwrap()
            .with_files([("/etc/secret.json", "{}")])
            .unwrap();
        assert_eq!(container.files.len(), 1);
    }
}
