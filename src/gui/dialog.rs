//! 文件对话框

use std::path::PathBuf;

use crate::geometry::IMPORT_EXTENSIONS;

/// 打开"导入模型"对话框，取消时返回 `None`
///
/// 阻塞调用，在 GUI 帧结束之后调用。
pub fn pick_model_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Import Model")
        .add_filter("3D Model Files", IMPORT_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .pick_file()
}
