//! 着色模式

/// 模型着色模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// 材质颜色 × 漫反射贴图
    #[default]
    Textured,
    /// 统一纯色（场景配置中的 `solid_color`）
    Solid,
    /// 法线可视化
    Normals,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 3] = [ShadingMode::Textured, ShadingMode::Solid, ShadingMode::Normals];

    /// 传给着色器的编号
    pub fn as_u32(self) -> u32 {
        match self {
            ShadingMode::Textured => 0,
            ShadingMode::Solid => 1,
            ShadingMode::Normals => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShadingMode::Textured => "Textured",
            ShadingMode::Solid => "Solid",
            ShadingMode::Normals => "Normals",
        }
    }
}
