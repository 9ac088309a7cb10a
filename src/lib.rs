//! DirectX 11 滤镜工具库
//!
//! 枚举 GPU 适配器，在指定适配器上创建设备和上下文，创建滤镜所需的输入/输出纹理，
//! 并提供若干基于着色器的颜色转换与缩放滤镜。
//!
//! DirectX 相关功能仅在 Windows 上可用；格式、颜色矩阵与配置等类型与平台无关。

pub mod color;
pub mod common;
pub mod config;
pub mod error;
pub mod filter_kind;
pub mod platform;

pub use common::{ColorFormat, TextureDesc};
pub use config::DeviceConfig;
pub use error::{DxFilterError, Result};

#[cfg(windows)]
pub use platform::win::{
    shader, ConvertARGBToAYUV, ConvertARGBToNV12, ConvertARGBToYUV444, DxFilter,
    ScaleARGBOrAYUV, Texture, TextureReader,
};

/// 设置 DirectX 环境的工具函数
///
/// 已经自行管理设备和纹理的程序通常不需要这些函数，简单的程序可以直接使用。
#[cfg(windows)]
pub mod utils {
    pub use crate::platform::win::adapter::{Adapter, AdapterFactory, Output, OutputIter};
    pub use crate::platform::win::device::{create_device_context, create_device_context_with};
    pub use crate::platform::win::texture::{
        create_input_texture, create_output_texture, create_staging_texture,
    };
}
