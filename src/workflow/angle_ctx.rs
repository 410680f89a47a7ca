//! 角度处理上下文
//!
//! 封装"我正在处理哪个场景的哪个角度"这一信息

use std::fmt::Display;

/// 角度处理上下文
///
/// 包含处理单个角度所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct AngleCtx {
    /// 产品名称
    pub product_name: String,

    /// 场景索引（仅用于日志显示）
    pub scene_index: usize,

    /// 角度在场景中的索引（从1开始）
    pub angle_index: usize,

    /// 角度 ID（任务 key）
    pub angle_id: String,
}

impl AngleCtx {
    /// 创建新的角度上下文
    pub fn new(
        product_name: String,
        scene_index: usize,
        angle_index: usize,
        angle_id: String,
    ) -> Self {
        Self {
            product_name,
            scene_index,
            angle_index,
            angle_id,
        }
    }
}

impl Display for AngleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[产品#{} 角度#{} ({})]",
            self.product_name, self.angle_index, self.angle_id
        )
    }
}
