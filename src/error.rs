//! 错误类型定义

use crate::common::ColorFormat;
use thiserror::Error;

/// 本库所有操作返回的错误类型
#[derive(Error, Debug)]
pub enum DxFilterError {
    /// 参数错误或不符合预期
    #[error("Invalid parameter: {0}")]
    BadParam(String),

    /// 适配器未找到
    #[error("Adapter not found")]
    AdapterNotFound,

    /// 滤镜不支持该格式
    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(ColorFormat),

    /// 设备返回了未请求的特性级别
    #[error("Unsupported feature level: {0:#x}")]
    UnsupportedFeatureLevel(i32),

    /// HLSL 编译失败
    #[error("Shader compilation failed: {0}")]
    ShaderCompilation(String),

    /// 配置无效
    #[error("Invalid config: {0}")]
    Config(String),

    /// 内部错误，通常只在本库存在缺陷时出现
    #[error("Unexpected error: {0}")]
    Unknown(String),

    /// DirectX / DXGI 调用失败
    #[cfg(windows)]
    #[error("DirectX call failed: {0}")]
    Windows(#[from] windows::core::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, DxFilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DxFilterError::BadParam("unexpected texture format".to_owned()).to_string(),
            "Invalid parameter: unexpected texture format"
        );
        assert_eq!(
            DxFilterError::UnsupportedFormat(ColorFormat::NV12).to_string(),
            "Unsupported format: NV12"
        );
        assert_eq!(
            DxFilterError::UnsupportedFeatureLevel(0xa000).to_string(),
            "Unsupported feature level: 0xa000"
        );
        assert_eq!(DxFilterError::AdapterNotFound.to_string(), "Adapter not found");
    }
}
