use crate::model::EntityRef;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("エンティティ名が空です")]
    EmptyName,

    #[error("イメージ参照が不正です: {0}")]
    InvalidImage(String),

    #[error("環境変数名が空です（コンテナ: {0}）")]
    EmptyEnvKey(String),

    #[error("注入ファイルのパスは絶対パスで指定してください: {0}")]
    RelativeFilePath(String),

    #[error("無効なポート指定: {0}")]
    InvalidPort(String),

    #[error("サービス '{0}' にコンテナが1つも指定されていません")]
    EmptyService(String),

    #[error("マシン '{0}' のプロバイダーが空です")]
    EmptyProvider(String),

    #[error("マシン '{0}' のプラン名が空です")]
    EmptyPlan(String),

    #[error("無効なリソースレンジ: {0}")]
    InvalidRange(String),

    #[error("未登録のエンティティを参照しています: {0}")]
    UnknownEntity(EntityRef),

    #[error("エンティティ名が重複しています: {0}")]
    DuplicateName(String),

    #[error("正規表現のコンパイルエラー: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
