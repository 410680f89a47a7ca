//! 内置角度预设
//!
//! 场景请求中的角度可以直接引用这些预设 ID，
//! 也可以在 TOML 里提供自定义的提示词片段。

use phf::phf_map;

/// 角度预设枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AnglePreset {
    /// 正面棚拍
    FrontStudio,
    /// 侧面轮廓
    SideProfile,
    /// 俯视
    TopDown,
    /// 细节特写
    CloseUpDetail,
    /// 生活场景
    Lifestyle,
    /// 手持展示
    InHand,
    /// 户外自然光
    OutdoorNatural,
    /// 平铺摆拍
    FlatLay,
}

/// 预设 ID 到枚举的静态映射
static PRESETS_BY_ID: phf::Map<&'static str, AnglePreset> = phf_map! {
    "front-studio" => AnglePreset::FrontStudio,
    "side-profile" => AnglePreset::SideProfile,
    "top-down" => AnglePreset::TopDown,
    "close-up" => AnglePreset::CloseUpDetail,
    "lifestyle" => AnglePreset::Lifestyle,
    "in-hand" => AnglePreset::InHand,
    "outdoor" => AnglePreset::OutdoorNatural,
    "flat-lay" => AnglePreset::FlatLay,
};

impl AnglePreset {
    /// 获取预设 ID（用作任务 key 与输出文件名）
    pub fn id(self) -> &'static str {
        match self {
            AnglePreset::FrontStudio => "front-studio",
            AnglePreset::SideProfile => "side-profile",
            AnglePreset::TopDown => "top-down",
            AnglePreset::CloseUpDetail => "close-up",
            AnglePreset::Lifestyle => "lifestyle",
            AnglePreset::InHand => "in-hand",
            AnglePreset::OutdoorNatural => "outdoor",
            AnglePreset::FlatLay => "flat-lay",
        }
    }

    /// 获取显示名称
    pub fn label(self) -> &'static str {
        match self {
            AnglePreset::FrontStudio => "正面棚拍",
            AnglePreset::SideProfile => "侧面轮廓",
            AnglePreset::TopDown => "俯视",
            AnglePreset::CloseUpDetail => "细节特写",
            AnglePreset::Lifestyle => "生活场景",
            AnglePreset::InHand => "手持展示",
            AnglePreset::OutdoorNatural => "户外自然光",
            AnglePreset::FlatLay => "平铺摆拍",
        }
    }

    /// 获取提示词片段（描述镜头与场景）
    pub fn hint(self) -> &'static str {
        match self {
            AnglePreset::FrontStudio => "正面平视视角，纯色摄影棚背景，柔和的主光与补光",
            AnglePreset::SideProfile => "侧面 90 度视角，突出产品轮廓线条，浅景深背景虚化",
            AnglePreset::TopDown => "正上方俯视视角，产品居中摆放，背景干净简洁",
            AnglePreset::CloseUpDetail => "微距特写视角，聚焦产品材质与工艺细节",
            AnglePreset::Lifestyle => "真实生活场景中自然摆放，有人居环境氛围感",
            AnglePreset::InHand => "一只手自然持握产品，体现产品实际大小比例",
            AnglePreset::OutdoorNatural => "户外自然光环境，黄金时段光线，背景为自然景观",
            AnglePreset::FlatLay => "平铺在桌面上与相关配饰一起摆拍，俯视构图",
        }
    }

    /// 从预设 ID 解析（精确匹配）
    pub fn from_id(id: &str) -> Option<Self> {
        PRESETS_BY_ID.get(id).copied()
    }

    /// 智能查找预设（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        if let Some(preset) = Self::from_id(s) {
            return Some(preset);
        }

        // 模糊匹配：ID 片段或显示名称
        let s_lower = s.to_lowercase();
        PRESETS_BY_ID
            .entries()
            .find(|(id, preset)| s_lower.contains(*id) || s.contains(preset.label()))
            .map(|(_, preset)| *preset)
    }

    /// 所有内置预设
    pub fn all() -> impl Iterator<Item = AnglePreset> {
        PRESETS_BY_ID.values().copied()
    }
}

impl std::fmt::Display for AnglePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_exact() {
        assert_eq!(AnglePreset::from_id("front-studio"), Some(AnglePreset::FrontStudio));
        assert_eq!(AnglePreset::from_id("flat-lay"), Some(AnglePreset::FlatLay));
        assert_eq!(AnglePreset::from_id("unknown"), None);
    }

    #[test]
    fn test_find_fuzzy() {
        assert_eq!(AnglePreset::find("lifestyle"), Some(AnglePreset::Lifestyle));
        assert_eq!(AnglePreset::find("my-top-down-shot"), Some(AnglePreset::TopDown));
        assert_eq!(AnglePreset::find("细节特写"), Some(AnglePreset::CloseUpDetail));
        assert_eq!(AnglePreset::find("不存在的角度"), None);
    }

    #[test]
    fn test_id_roundtrip() {
        for preset in AnglePreset::all() {
            assert_eq!(AnglePreset::from_id(preset.id()), Some(preset));
        }
    }
}
