/// 几何体加载和处理模块
///
/// 提供3D模型加载功能，支持 OBJ、glTF/GLB、STL 和（可选）FBX。
///
/// # 模块结构
///
/// - `vertex`: 顶点数据结构定义
/// - `mesh`: 网格数据
/// - `material`: 材质与解码后的贴图
/// - `model`: 一次导入的完整结果
/// - `bounds`: 轴对齐包围盒
/// - `texture`: 贴图解码缓存
/// - `math_utils`: 法线重建
/// - `loaders`: 各种格式的模型加载器
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ/glTF/STL/FBX)
///     ↓
/// Loader (ObjLoader/GltfLoader/StlLoader/FbxLoader)
///     ↓
/// ModelData (CPU侧数据)
///     ↓
/// Renderer (上传到GPU)
/// ```

pub mod vertex;
pub mod mesh;
pub mod material;
pub mod model;
pub mod bounds;
pub mod texture;
pub mod math_utils;
pub mod loaders;

// 重新导出常用类型
pub use vertex::Vertex;
pub use mesh::MeshData;
pub use material::{ImageData, MaterialData, TextureRef};
pub use model::ModelData;
pub use bounds::Aabb;
pub use texture::TextureCache;
pub use loaders::{load_model, IMPORT_EXTENSIONS};
