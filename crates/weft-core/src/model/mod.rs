//! モデル定義
//!
//! Weftブループリントで使用されるデータモデルを定義します。
//! 各モデルは機能ごとにモジュールに分離されています。

mod container;
mod entity;
mod machine;
mod port;
mod service;

// Re-exports
pub use container::*;
pub use entity::*;
pub use machine::*;
pub use port::*;
pub use service::*;
