//! D3D11 设备创建参数

use crate::error::{DxFilterError, Result};
use serde_derive::{Deserialize, Serialize};

/// D3D 特性级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum FeatureLevel {
    Level10_0,
    Level10_1,
    Level11_0,
    Level11_1,
}

impl FeatureLevel {
    /// 对应 `D3D_FEATURE_LEVEL` 的数值
    pub fn raw(&self) -> i32 {
        match self {
            FeatureLevel::Level10_0 => 0xa000,
            FeatureLevel::Level10_1 => 0xa100,
            FeatureLevel::Level11_0 => 0xb000,
            FeatureLevel::Level11_1 => 0xb100,
        }
    }

    /// 由 `D3D_FEATURE_LEVEL` 数值得到特性级别
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0xa000 => Some(FeatureLevel::Level10_0),
            0xa100 => Some(FeatureLevel::Level10_1),
            0xb000 => Some(FeatureLevel::Level11_0),
            0xb100 => Some(FeatureLevel::Level11_1),
            _ => None,
        }
    }
}

/// 创建设备时使用的配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// 按优先级排列的特性级别
    pub feature_levels: Vec<FeatureLevel>,
    /// 启用 D3D11 调试层（需要安装 Graphics Tools）
    pub debug_layer: bool,
    pub bgra_support: bool,
    pub video_support: bool,
    /// 通过 ID3D10Multithread 串行化对立即上下文的访问
    pub multithread_protected: bool,
    /// D3D11_CREATE_DEVICE_SINGLETHREADED
    pub single_threaded: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            feature_levels: vec![FeatureLevel::Level11_1, FeatureLevel::Level11_0],
            debug_layer: false,
            bgra_support: true,
            video_support: false,
            multithread_protected: true,
            single_threaded: false,
        }
    }
}

impl DeviceConfig {
    /// 检查配置项之间是否冲突
    pub fn validate(&self) -> Result<()> {
        if self.feature_levels.is_empty() {
            return Err(DxFilterError::Config(
                "at least one feature level is required".to_owned(),
            ));
        }
        if self.single_threaded && self.multithread_protected {
            return Err(DxFilterError::Config(
                "single_threaded and multithread_protected are mutually exclusive".to_owned(),
            ));
        }
        Ok(())
    }

    /// 从 JSON 读取并检查配置
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| DxFilterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为格式化的 JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DxFilterError::Config(e.to_string()))
    }

    /// 请求的特性级别是否包含 `raw`
    pub fn accepts(&self, raw: i32) -> bool {
        self.feature_levels.iter().any(|l| l.raw() == raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DeviceConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.accepts(0xb100));
        assert!(config.accepts(0xb000));
        assert!(!config.accepts(0xa100));
    }

    #[test]
    fn test_invalid_configs() {
        let config = DeviceConfig {
            feature_levels: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DxFilterError::Config(_))));

        let config = DeviceConfig {
            single_threaded: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DeviceConfig {
            single_threaded: true,
            multithread_protected: false,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_partial() {
        let config = DeviceConfig::from_json(r#"{"debug_layer": true}"#).unwrap();
        assert!(config.debug_layer);
        assert_eq!(config.feature_levels, DeviceConfig::default().feature_levels);

        let config =
            DeviceConfig::from_json(r#"{"feature_levels": ["Level10_1"], "bgra_support": false}"#)
                .unwrap();
        assert_eq!(config.feature_levels, vec![FeatureLevel::Level10_1]);
        assert!(!config.bgra_support);
    }

    #[test]
    fn test_json_rejects_invalid() {
        assert!(DeviceConfig::from_json(r#"{"feature_levels": []}"#).is_err());
        assert!(DeviceConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_defaults() {
        let json = DeviceConfig::default().to_json().unwrap();
        assert_eq!(DeviceConfig::from_json(&json).unwrap(), DeviceConfig::default());
    }

    #[test]
    fn test_feature_level_raw() {
        for level in [
            FeatureLevel::Level10_0,
            FeatureLevel::Level10_1,
            FeatureLevel::Level11_0,
            FeatureLevel::Level11_1,
        ] {
            assert_eq!(FeatureLevel::from_raw(level.raw()), Some(level));
        }
        assert_eq!(FeatureLevel::from_raw(0xc000), None);
    }
}
