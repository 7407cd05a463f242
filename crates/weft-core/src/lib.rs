//! Weft Core
//!
//! 小規模分散デプロイの宣言的ブループリントを表現するコアモデル。
//! エンティティ（コンテナ / サービス / マシン / パブリックインターネット）と、
//! それらの間のポート付き有向許可グラフを提供します。
//!
//! コンパイルとプラン出力は `weft-deploy` クレート側です。

pub mod error;
pub mod graph;
pub mod model;
pub mod registry;

// Re-exports
pub use error::{ModelError, Result};
pub use graph::{AllowRule, Graph};
pub use model::{
    Container, EntityRef, Machine, MachineInstance, MachineSize, PortSpec, ResourceRange, Role,
    Service,
};
pub use registry::Registry;
