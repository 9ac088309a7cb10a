//! 各滤镜接受的输入/输出格式

use crate::common::ColorFormat;
use crate::error::{DxFilterError, Result};

/// 内置滤镜种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    ArgbToAyuv,
    ArgbToNv12,
    ArgbToYuv444,
    Scale,
}

impl FilterKind {
    /// 滤镜是否接受该输入格式
    pub fn accepts_input(&self, format: ColorFormat) -> bool {
        match self {
            FilterKind::ArgbToAyuv | FilterKind::ArgbToNv12 | FilterKind::ArgbToYuv444 => {
                matches!(format, ColorFormat::ARGB8UNorm | ColorFormat::ABGR8UNorm)
            }
            FilterKind::Scale => matches!(
                format,
                ColorFormat::ARGB8UNorm | ColorFormat::ABGR8UNorm | ColorFormat::AYUV
            ),
        }
    }

    /// 滤镜是否接受该输出格式
    pub fn accepts_output(&self, format: ColorFormat) -> bool {
        match self {
            FilterKind::ArgbToAyuv => format == ColorFormat::AYUV,
            FilterKind::ArgbToNv12 => format == ColorFormat::NV12,
            FilterKind::ArgbToYuv444 => format == ColorFormat::YUV444,
            FilterKind::Scale => matches!(
                format,
                ColorFormat::ARGB8UNorm | ColorFormat::ABGR8UNorm | ColorFormat::AYUV
            ),
        }
    }

    /// 输入格式不受支持时返回 `UnsupportedFormat`
    pub fn check_input(&self, format: ColorFormat) -> Result<()> {
        if self.accepts_input(format) {
            Ok(())
        } else {
            Err(DxFilterError::UnsupportedFormat(format))
        }
    }

    /// 输出格式不受支持时返回 `UnsupportedFormat`
    pub fn check_output(&self, format: ColorFormat) -> Result<()> {
        if self.accepts_output(format) {
            Ok(())
        } else {
            Err(DxFilterError::UnsupportedFormat(format))
        }
    }

    /// 检查输入输出组合；缩放滤镜不做颜色转换，两端必须同为 RGB 或同为 AYUV
    pub fn check(&self, input: ColorFormat, output: ColorFormat) -> Result<()> {
        self.check_input(input)?;
        self.check_output(output)?;
        if *self == FilterKind::Scale && input.is_rgb() != output.is_rgb() {
            return Err(DxFilterError::BadParam(format!(
                "cannot scale {:?} into {:?} without color conversion",
                input, output
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_inputs() {
        for kind in [
            FilterKind::ArgbToAyuv,
            FilterKind::ArgbToNv12,
            FilterKind::ArgbToYuv444,
        ] {
            assert!(kind.accepts_input(ColorFormat::ARGB8UNorm));
            assert!(kind.accepts_input(ColorFormat::ABGR8UNorm));
            assert!(!kind.accepts_input(ColorFormat::AYUV));
            assert!(!kind.accepts_input(ColorFormat::ARGB16Float));
        }
    }

    #[test]
    fn test_outputs() {
        assert!(FilterKind::ArgbToNv12.accepts_output(ColorFormat::NV12));
        assert!(!FilterKind::ArgbToNv12.accepts_output(ColorFormat::P010));
        assert!(FilterKind::ArgbToAyuv.accepts_output(ColorFormat::AYUV));
        assert!(FilterKind::ArgbToYuv444.accepts_output(ColorFormat::YUV444));
        assert!(!FilterKind::ArgbToYuv444.accepts_output(ColorFormat::YUV420));
    }

    #[test]
    fn test_check_reports_format() {
        match FilterKind::ArgbToNv12.check(ColorFormat::ARGB8UNorm, ColorFormat::AYUV) {
            Err(DxFilterError::UnsupportedFormat(f)) => assert_eq!(f, ColorFormat::AYUV),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(FilterKind::ArgbToNv12
            .check(ColorFormat::ABGR8UNorm, ColorFormat::NV12)
            .is_ok());
    }

    #[test]
    fn test_scale_families() {
        let scale = FilterKind::Scale;
        assert!(scale.check(ColorFormat::ARGB8UNorm, ColorFormat::ABGR8UNorm).is_ok());
        assert!(scale.check(ColorFormat::AYUV, ColorFormat::AYUV).is_ok());
        assert!(matches!(
            scale.check(ColorFormat::AYUV, ColorFormat::ARGB8UNorm),
            Err(DxFilterError::BadParam(_))
        ));
        assert!(scale.check(ColorFormat::NV12, ColorFormat::NV12).is_err());
    }
}
