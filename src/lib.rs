//! # Product Scene Gen
//!
//! 一个用于批量生成电商产品场景图的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（网络客户端），只暴露能力
//! - `ImageClient` - 唯一的客户端 owner，提供 generate() / download() 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个角度
//! - `PromptService` - 提示词构建能力
//! - `ImageService` - 图片生成能力（重试 / 超时 / URL 提取）
//! - `ManifestWriter` - 写结果清单与失败记录能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个角度"的完整处理流程
//! - `AngleCtx` - 上下文封装（产品 + 场景索引 + 角度索引）
//! - `AngleFlow` - 流程编排（prompt → generate → download → manifest）
//!
//! ### ④ 编排层（Runner）
//! - `runner/pool` - 固定并发任务池，批次调度的核心
//! - `runner/batch_generator` - 批量场景处理器，管理资源和生命周期
//! - `runner/scene_processor` - 单个场景处理器，组装角度任务
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod runner;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ImageClient;
pub use models::job::{BatchReport, Job, JobState};
pub use models::scene::{AngleSpec, SceneRequest};
pub use runner::{run_pool, run_single, App};
pub use workflow::{AngleCtx, AngleFlow};
