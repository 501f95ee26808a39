/// 模型加载器模块
///
/// 提供统一的模型加载接口和各种格式的具体实现。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式（使用 tobj crate）
/// - **glTF / GLB**: 使用 gltf crate
/// - **STL**: 使用 stl_io crate
/// - **FBX**: Autodesk FBX 格式（使用 russimp/Assimp，需要 `assimp` feature）
///
/// # 使用示例
///
/// ```rust,no_run
/// use gripxel::geometry::loaders::load_model;
/// use std::path::Path;
///
/// let model = load_model(Path::new("model.obj"))?;
/// println!("三角形数: {}", model.total_triangles());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::model::ModelData;
use std::path::Path;

pub mod obj_loader;
pub mod gltf_loader;
pub mod stl_loader;
pub mod fbx_loader;

// 重新导出加载器
pub use obj_loader::ObjLoader;
pub use gltf_loader::GltfLoader;
pub use stl_loader::StlLoader;
pub use fbx_loader::FbxLoader;

/// 导入对话框中列出的扩展名
pub const IMPORT_EXTENSIONS: &[&str] = &["obj", "fbx", "glb", "gltf", "stl"];

/// 模型加载器 trait
///
/// 所有格式的加载器都实现此 trait。
///
/// # 实现要求
///
/// - 加载器是无状态的（使用关联函数）
/// - 返回 CPU 侧的 `ModelData`，不涉及 GPU 资源
/// - 不含三角形的文件视为错误
pub trait MeshLoader {
    /// 从文件路径加载模型
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误或损坏
    /// - 数据验证失败
    fn load_from_file(path: &Path) -> Result<ModelData>;

    /// 从内存数据加载模型
    ///
    /// 外部引用（MTL、外部缓冲区、贴图文件）无法解析，按缺失处理。
    fn load_from_memory(data: &[u8]) -> Result<ModelData>;

    /// 支持的文件扩展名（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 文件的小写扩展名
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// 扩展名是否可以导入
pub fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMPORT_EXTENSIONS.contains(&ext.as_str()))
}

/// 根据文件扩展名选择合适的加载器
///
/// # 返回
///
/// - `Ok(ModelData)`: 成功加载
/// - `Err(GripxelError)`: 不支持的格式或加载失败
pub fn load_model(path: &Path) -> Result<ModelData> {
    let extension = extension_of(path).ok_or_else(|| {
        MeshLoadError::UnsupportedFormat(format!("no file extension: {}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), format = %extension, "Loading model");

    match extension.as_str() {
        ext if ObjLoader::supported_extensions().contains(&ext) => ObjLoader::load_from_file(path),
        ext if GltfLoader::supported_extensions().contains(&ext) => GltfLoader::load_from_file(path),
        ext if StlLoader::supported_extensions().contains(&ext) => StlLoader::load_from_file(path),
        ext if FbxLoader::supported_extensions().contains(&ext) => FbxLoader::load_from_file(path),
        _ => Err(MeshLoadError::UnsupportedFormat(format!(".{}", extension)).into()),
    }
}
