//! 编排层（Runner Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `pool` - 固定并发任务池
//! - 以固定并发上限执行一批独立任务
//! - 捕获单个任务的失败并记录终态
//! - 每个任务结算后触发进度回调
//! - 支持对失败 key 的独立重试
//!
//! ### `batch_generator` - 批量场景处理器
//! - 管理应用生命周期（初始化、运行、清理）
//! - 批量加载场景请求（Vec<SceneRequest>）
//! - 管理生成客户端资源（ImageClient）
//! - 输出全局统计信息
//!
//! ### `scene_processor` - 单个场景处理器
//! - 校验单个场景请求
//! - 把角度列表交给任务池并发生成
//! - 重试失败的角度、记录失败清单
//! - 清理文件、输出单个场景的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_generator (处理 Vec<SceneRequest>)
//!     ↓
//! scene_processor (处理 Vec<AngleSpec>，经由 pool 并发)
//!     ↓
//! workflow::AngleFlow (处理单个 AngleSpec)
//!     ↓
//! services (能力层：prompt / image / manifest)
//!     ↓
//! infrastructure (基础设施：ImageClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_generator 管批量，scene_processor 管单个
//! 2. **资源隔离**：只有编排层持有 ImageClient
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_generator;
pub mod pool;
pub mod scene_processor;

// 重新导出主要类型
pub use batch_generator::App;
pub use pool::{run_pool, run_single};
pub use scene_processor::{process_scene, SceneStats};
