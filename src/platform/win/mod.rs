//! Windows 平台 DirectX 11 实现
//!
//! 本模块提供适配器枚举、设备与纹理创建以及基于着色器的滤镜

pub mod adapter;
pub mod device;
pub mod filter;
pub mod filters;
pub mod reader;
pub mod shader;
pub mod texture;

// 重新导出主要类型
pub use adapter::{Adapter, AdapterFactory, Output, OutputIter};
pub use device::{create_device_context, create_device_context_with};
pub use filter::DxFilter;
pub use filters::{ConvertARGBToAYUV, ConvertARGBToNV12, ConvertARGBToYUV444, ScaleARGBOrAYUV};
pub use reader::TextureReader;
pub use texture::{create_input_texture, create_output_texture, create_staging_texture, Texture};
