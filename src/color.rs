//! RGB 到 YUV 的转换矩阵
//!
//! GPU 着色器与 CPU 参考实现共用同一组系数：系数通过 HLSL 宏注入着色器，
//! [`YuvMatrix::rgb_to_yuv`] 用于在主机端校验滤镜输出。

use serde_derive::{Deserialize, Serialize};

/// 色彩空间（决定亮度权重 Kr / Kb）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ColorSpace {
    #[default]
    Bt601,
    Bt709,
    Bt2020,
}

impl ColorSpace {
    fn kr_kb(&self) -> (f32, f32) {
        match self {
            ColorSpace::Bt601 => (0.299, 0.114),
            ColorSpace::Bt709 => (0.2126, 0.0722),
            ColorSpace::Bt2020 => (0.2627, 0.0593),
        }
    }
}

/// 取值范围：Limited 为 16-235 / 16-240，Full 为 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ColorRange {
    #[default]
    Limited,
    Full,
}

/// 每行为 `[r, g, b, offset]`，输入输出均为归一化值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YuvMatrix {
    pub y: [f32; 4],
    pub u: [f32; 4],
    pub v: [f32; 4],
}

impl YuvMatrix {
    /// 由色彩空间与量化范围计算矩阵
    pub fn new(space: ColorSpace, range: ColorRange) -> Self {
        let (kr, kb) = space.kr_kb();
        let kg = 1.0 - kr - kb;
        let (y_scale, c_scale, y_offset) = match range {
            ColorRange::Limited => (219.0 / 255.0, 224.0 / 255.0, 16.0 / 255.0),
            ColorRange::Full => (1.0, 1.0, 0.0),
        };
        let c_offset = 128.0 / 255.0;
        let cb = 2.0 * (1.0 - kb);
        let cr = 2.0 * (1.0 - kr);

        Self {
            y: [kr * y_scale, kg * y_scale, kb * y_scale, y_offset],
            u: [
                -kr / cb * c_scale,
                -kg / cb * c_scale,
                0.5 * c_scale,
                c_offset,
            ],
            v: [
                0.5 * c_scale,
                -kg / cr * c_scale,
                -kb / cr * c_scale,
                c_offset,
            ],
        }
    }

    /// CPU 参考实现，输入为 `[r, g, b]`，输出为 `[y, u, v]`
    pub fn rgb_to_yuv(&self, rgb: [u8; 3]) -> [u8; 3] {
        let n = [
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        ];
        let apply = |row: &[f32; 4]| {
            let value = row[0] * n[0] + row[1] * n[1] + row[2] * n[2] + row[3];
            (value * 255.0).round().clamp(0.0, 255.0) as u8
        };
        [apply(&self.y), apply(&self.u), apply(&self.v)]
    }

    /// 传给 HLSL 编译器的宏定义
    pub fn shader_defines(&self) -> Vec<(String, String)> {
        let float4 = |row: &[f32; 4]| {
            format!(
                "float4({:.6}, {:.6}, {:.6}, {:.6})",
                row[0], row[1], row[2], row[3]
            )
        };
        vec![
            ("Y_COEFF".to_owned(), float4(&self.y)),
            ("U_COEFF".to_owned(), float4(&self.u)),
            ("V_COEFF".to_owned(), float4(&self.v)),
        ]
    }
}

impl Default for YuvMatrix {
    fn default() -> Self {
        Self::new(ColorSpace::default(), ColorRange::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bt601_limited_reference_colors() {
        let m = YuvMatrix::default();
        assert_eq!(m.rgb_to_yuv([0, 0, 0]), [16, 128, 128]);
        assert_eq!(m.rgb_to_yuv([255, 255, 255]), [235, 128, 128]);
        assert_eq!(m.rgb_to_yuv([255, 0, 0]), [81, 90, 240]);
        assert_eq!(m.rgb_to_yuv([10, 10, 10]), [25, 128, 128]);
    }

    #[test]
    fn test_full_range() {
        let m = YuvMatrix::new(ColorSpace::Bt709, ColorRange::Full);
        assert_eq!(m.rgb_to_yuv([0, 0, 0]), [0, 128, 128]);
        assert_eq!(m.rgb_to_yuv([255, 255, 255]), [255, 128, 128]);
        // 纯蓝的 U 分量达到上限并被截断
        assert_eq!(m.rgb_to_yuv([0, 0, 255])[1], 255);
    }

    #[test]
    fn test_gray_has_neutral_chroma() {
        for space in [ColorSpace::Bt601, ColorSpace::Bt709, ColorSpace::Bt2020] {
            let m = YuvMatrix::new(space, ColorRange::Limited);
            let [_, u, v] = m.rgb_to_yuv([128, 128, 128]);
            assert_eq!((u, v), (128, 128), "{:?}", space);
        }
    }

    #[test]
    fn test_shader_defines() {
        let defines = YuvMatrix::default().shader_defines();
        let names: Vec<_> = defines.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Y_COEFF", "U_COEFF", "V_COEFF"]);
        assert!(defines[0].1.starts_with("float4(0.256"));
        assert!(defines[0].1.ends_with("0.062745)"));
    }
}
