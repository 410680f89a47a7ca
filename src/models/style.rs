//! 整体风格枚举
//!
//! 对应场景请求中可选的 `style` 字段，影响所有角度的提示词。

/// 风格枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Style {
    /// 写实
    Photorealistic,
    /// 棚拍
    Studio,
    /// 生活方式
    Lifestyle,
    /// 极简
    Minimalist,
    /// 节日
    Festive,
}

impl Style {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Style::Photorealistic => "写实",
            Style::Studio => "棚拍",
            Style::Lifestyle => "生活方式",
            Style::Minimalist => "极简",
            Style::Festive => "节日",
        }
    }

    /// 获取提示词片段
    pub fn fragment(self) -> &'static str {
        match self {
            Style::Photorealistic => "照片级写实风格，真实的光影与材质质感",
            Style::Studio => "专业摄影棚风格，商业电商主图质感",
            Style::Lifestyle => "生活方式风格，温暖自然的居家氛围",
            Style::Minimalist => "极简风格，大量留白，低饱和度配色",
            Style::Festive => "节日促销风格，喜庆的装饰元素与配色",
        }
    }

    /// 尝试从字符串解析风格（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "写实" | "photorealistic" | "realistic" => Some(Style::Photorealistic),
            "棚拍" | "studio" => Some(Style::Studio),
            "生活方式" | "lifestyle" => Some(Style::Lifestyle),
            "极简" | "minimalist" => Some(Style::Minimalist),
            "节日" | "festive" => Some(Style::Festive),
            _ => None,
        }
    }

    /// 智能查找风格（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        if let Some(style) = Self::from_str(s) {
            return Some(style);
        }

        let s_lower = s.to_lowercase();
        if s_lower.contains("写实") || s_lower.contains("realistic") {
            return Some(Style::Photorealistic);
        }
        if s_lower.contains("棚拍") || s_lower.contains("studio") {
            return Some(Style::Studio);
        }
        if s_lower.contains("生活") || s_lower.contains("lifestyle") {
            return Some(Style::Lifestyle);
        }
        if s_lower.contains("极简") || s_lower.contains("minimal") {
            return Some(Style::Minimalist);
        }
        if s_lower.contains("节日") || s_lower.contains("festive") {
            return Some(Style::Festive);
        }

        None
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
