//! 平台无关的公共类型：像素格式、纹理描述、厂商 ID 以及枚举游标

use crate::error::{DxFilterError, Result};
use serde_derive::{Deserialize, Serialize};

/// D3D11 二维纹理单边的最大尺寸（`D3D11_REQ_TEXTURE2D_U_OR_V_DIMENSION`）
pub const MAX_TEXTURE_DIMENSION: u32 = 16384;

/// 纹理像素格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ColorFormat {
    /// B8G8R8A8，内存中的字节顺序为 B, G, R, A
    ARGB8UNorm,
    /// R8G8B8A8
    ABGR8UNorm,
    /// R10G10B10A2
    ARGB10UNorm,
    /// R16G16B16A16 半精度浮点
    ARGB16Float,
    /// 打包 YUV 4:4:4，字节顺序为 V, U, Y, A
    AYUV,
    /// 打包 10bit YUV 4:4:4
    Y410,
    /// Y 平面 + 交错 UV 平面（4:2:0）
    NV12,
    /// 10bit 版本的 NV12
    P010,
    /// 三个全尺寸 R8 平面纵向排列（Y, U, V）
    YUV444,
    /// I420：全尺寸 Y 平面 + 1/4 尺寸 U、V 平面，按 R8 存储
    YUV420,
    /// 无法识别的格式
    Unknown,
}

impl ColorFormat {
    /// 第一个平面中单个元素的字节数
    pub fn bytes_per_sample(&self) -> Option<u32> {
        match self {
            ColorFormat::ARGB8UNorm
            | ColorFormat::ABGR8UNorm
            | ColorFormat::ARGB10UNorm
            | ColorFormat::AYUV
            | ColorFormat::Y410 => Some(4),
            ColorFormat::ARGB16Float => Some(8),
            ColorFormat::NV12 | ColorFormat::YUV444 | ColorFormat::YUV420 => Some(1),
            ColorFormat::P010 => Some(2),
            ColorFormat::Unknown => None,
        }
    }

    /// 是否为 RGB 格式
    pub fn is_rgb(&self) -> bool {
        matches!(
            self,
            ColorFormat::ARGB8UNorm
                | ColorFormat::ABGR8UNorm
                | ColorFormat::ARGB10UNorm
                | ColorFormat::ARGB16Float
        )
    }

    /// 是否为 YUV 格式（打包或平面）
    pub fn is_yuv(&self) -> bool {
        matches!(
            self,
            ColorFormat::AYUV
                | ColorFormat::Y410
                | ColorFormat::NV12
                | ColorFormat::P010
                | ColorFormat::YUV444
                | ColorFormat::YUV420
        )
    }

    /// 宽高是否必须为偶数（色度子采样格式）
    pub fn is_subsampled(&self) -> bool {
        matches!(self, ColorFormat::NV12 | ColorFormat::P010 | ColorFormat::YUV420)
    }
}

/// 纹理描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
}

impl TextureDesc {
    /// 创建纹理描述，不做检查
    pub fn new(width: u32, height: u32, format: ColorFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// 检查尺寸与格式是否可用于创建纹理
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DxFilterError::BadParam(format!(
                "texture size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.format == ColorFormat::Unknown {
            return Err(DxFilterError::BadParam("unexpected texture format".to_owned()));
        }
        if self.format.is_subsampled() && (self.width % 2 == 1 || self.height % 2 == 1) {
            return Err(DxFilterError::BadParam(format!(
                "{:?} texture size {}x{} must be even",
                self.format, self.width, self.height
            )));
        }
        let rows = self.allocation_height()?;
        if self.width > MAX_TEXTURE_DIMENSION || rows > MAX_TEXTURE_DIMENSION {
            return Err(DxFilterError::BadParam(format!(
                "{:?} texture size {}x{} ({} rows) exceeds {}",
                self.format, self.width, self.height, rows, MAX_TEXTURE_DIMENSION
            )));
        }
        Ok(())
    }

    /// 第一个平面每行的字节数
    pub fn row_pitch(&self) -> Result<u32> {
        let bytes = self
            .format
            .bytes_per_sample()
            .ok_or_else(|| DxFilterError::BadParam("unexpected texture format".to_owned()))?;
        self.width
            .checked_mul(bytes)
            .ok_or_else(|| self.too_large())
    }

    /// 底层 D3D 纹理实际需要的行数
    pub fn allocation_height(&self) -> Result<u32> {
        let rows = match self.format {
            ColorFormat::YUV444 => self.height.checked_mul(3),
            ColorFormat::YUV420 => self.height.checked_mul(3).map(|h| h / 2),
            _ => Some(self.height),
        };
        rows.ok_or_else(|| self.too_large())
    }

    fn too_large(&self) -> DxFilterError {
        DxFilterError::BadParam(format!(
            "{:?} texture size {}x{} is too large",
            self.format, self.width, self.height
        ))
    }

    /// 完整初始化纹理所需的字节数（包含全部平面）
    pub fn byte_size(&self) -> Result<usize> {
        let pitch = self.row_pitch()? as usize;
        let rows = match self.format {
            // NV12/P010 的 UV 平面紧跟在 Y 平面之后，行距相同、行数减半
            ColorFormat::NV12 | ColorFormat::P010 => {
                self.height as usize + self.height as usize / 2
            }
            _ => self.allocation_height()? as usize,
        };
        pitch.checked_mul(rows).ok_or_else(|| self.too_large())
    }
}

/// GPU 厂商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u32)]
pub enum AdapterVendor {
    Amd = 0x1002,
    Intel = 0x8086,
    Nvidia = 0x10DE,
    Unknown = 0,
}

impl AdapterVendor {
    /// 由 PCI 厂商 ID 得到厂商
    pub fn from_vendor_id(vendor_id: u32) -> Self {
        match vendor_id {
            0x1002 => AdapterVendor::Amd,
            0x8086 => AdapterVendor::Intel,
            0x10DE => AdapterVendor::Nvidia,
            _ => AdapterVendor::Unknown,
        }
    }
}

/// 自动复位的枚举游标
///
/// 每次 `advance` 以当前下标调用闭包；闭包返回 `None` 表示枚举结束，
/// 此时游标回到 0，下一次调用会重新从第一个元素开始。
#[derive(Debug, Default, Clone)]
pub struct EnumCursor {
    index: u32,
}

impl EnumCursor {
    /// 从下标 0 开始的游标
    pub fn new() -> Self {
        Self::default()
    }

    /// 取当前下标的元素并前进一步
    pub fn advance<T, F>(&mut self, mut f: F) -> Option<T>
    where
        F: FnMut(u32) -> Option<T>,
    {
        match f(self.index) {
            Some(item) => {
                self.index += 1;
                Some(item)
            }
            None => {
                self.index = 0;
                None
            }
        }
    }

    /// 回到下标 0
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// 下一次 `advance` 使用的下标
    pub fn position(&self) -> u32 {
        self.index
    }
}

/// 将 LUID 的高低位合并为 i64
pub fn luid_to_i64(low: u32, high: i32) -> i64 {
    ((high as i64) << 32) | low as i64
}

/// 解码以 NUL 结尾的 UTF-16 缓冲区
pub fn wide_to_string(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

/// 按行拷贝并去掉行尾填充
///
/// `src` 中每行占 `src_pitch` 字节，其中前 `row_bytes` 字节为有效数据。
pub fn pack_rows(src: &[u8], src_pitch: usize, row_bytes: usize, rows: usize, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(row_bytes * rows);
    for row in 0..rows {
        let start = row * src_pitch;
        out.extend_from_slice(&src[start..start + row_bytes]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_pitch() {
        let desc = TextureDesc::new(1920, 1080, ColorFormat::ARGB8UNorm);
        assert_eq!(desc.row_pitch().unwrap(), 1920 * 4);

        let desc = TextureDesc::new(1920, 1080, ColorFormat::ARGB16Float);
        assert_eq!(desc.row_pitch().unwrap(), 1920 * 8);

        let desc = TextureDesc::new(1280, 720, ColorFormat::P010);
        assert_eq!(desc.row_pitch().unwrap(), 1280 * 2);

        let desc = TextureDesc::new(1280, 720, ColorFormat::Unknown);
        assert!(matches!(desc.row_pitch(), Err(DxFilterError::BadParam(_))));
    }

    #[test]
    fn test_byte_size_planar() {
        assert_eq!(
            TextureDesc::new(1280, 720, ColorFormat::NV12).byte_size().unwrap(),
            1280 * 720 * 3 / 2
        );
        assert_eq!(
            TextureDesc::new(1280, 720, ColorFormat::YUV420).byte_size().unwrap(),
            1280 * 720 * 3 / 2
        );
        assert_eq!(
            TextureDesc::new(64, 32, ColorFormat::YUV444).byte_size().unwrap(),
            64 * 32 * 3
        );
        assert_eq!(
            TextureDesc::new(64, 32, ColorFormat::P010).byte_size().unwrap(),
            64 * 2 * 48
        );
        assert_eq!(
            TextureDesc::new(64, 32, ColorFormat::AYUV).byte_size().unwrap(),
            64 * 32 * 4
        );
    }

    #[test]
    fn test_allocation_height() {
        assert_eq!(TextureDesc::new(10, 10, ColorFormat::YUV444).allocation_height().unwrap(), 30);
        assert_eq!(TextureDesc::new(10, 10, ColorFormat::YUV420).allocation_height().unwrap(), 15);
        assert_eq!(TextureDesc::new(10, 10, ColorFormat::NV12).allocation_height().unwrap(), 10);
    }

    #[test]
    fn test_oversized_width() {
        let desc = TextureDesc::new(0x4000_0000, 2, ColorFormat::ARGB16Float);
        assert!(matches!(desc.validate(), Err(DxFilterError::BadParam(_))));
        assert!(matches!(desc.row_pitch(), Err(DxFilterError::BadParam(_))));
        assert!(matches!(desc.byte_size(), Err(DxFilterError::BadParam(_))));

        let desc = TextureDesc::new(MAX_TEXTURE_DIMENSION + 1, 16, ColorFormat::ARGB8UNorm);
        assert!(desc.validate().is_err());
        let desc = TextureDesc::new(MAX_TEXTURE_DIMENSION, 16, ColorFormat::ARGB8UNorm);
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_oversized_height() {
        let desc = TextureDesc::new(2, 0x6000_0000, ColorFormat::YUV444);
        assert!(matches!(desc.validate(), Err(DxFilterError::BadParam(_))));
        assert!(matches!(desc.allocation_height(), Err(DxFilterError::BadParam(_))));
        assert!(matches!(desc.byte_size(), Err(DxFilterError::BadParam(_))));

        // 平面格式按实际分配的行数计算上限
        let desc = TextureDesc::new(1920, 6000, ColorFormat::YUV444);
        assert!(desc.validate().is_err());
        let desc = TextureDesc::new(1920, 10000, ColorFormat::YUV420);
        assert!(desc.validate().is_ok());
        let desc = TextureDesc::new(1920, 12000, ColorFormat::YUV420);
        assert!(desc.validate().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(TextureDesc::new(1920, 1080, ColorFormat::NV12).validate().is_ok());
        assert!(TextureDesc::new(0, 1080, ColorFormat::ARGB8UNorm).validate().is_err());
        assert!(TextureDesc::new(1921, 1080, ColorFormat::NV12).validate().is_err());
        // 打包格式允许奇数尺寸
        assert!(TextureDesc::new(1921, 1081, ColorFormat::ARGB8UNorm).validate().is_ok());
        assert!(TextureDesc::new(16, 16, ColorFormat::Unknown).validate().is_err());
    }

    #[test]
    fn test_format_classes() {
        assert!(ColorFormat::ARGB8UNorm.is_rgb());
        assert!(!ColorFormat::ARGB8UNorm.is_yuv());
        assert!(ColorFormat::NV12.is_yuv());
        assert!(!ColorFormat::Unknown.is_rgb() && !ColorFormat::Unknown.is_yuv());
    }

    #[test]
    fn test_vendor() {
        assert_eq!(AdapterVendor::from_vendor_id(0x10DE), AdapterVendor::Nvidia);
        assert_eq!(AdapterVendor::from_vendor_id(0x8086), AdapterVendor::Intel);
        assert_eq!(AdapterVendor::from_vendor_id(0x1414), AdapterVendor::Unknown);
        assert_eq!(AdapterVendor::Amd as u32, 0x1002);
    }

    #[test]
    fn test_cursor_auto_reset() {
        let items = ["a", "b"];
        let mut cursor = EnumCursor::new();
        let next = |c: &mut EnumCursor| c.advance(|i| items.get(i as usize).copied());

        assert_eq!(next(&mut cursor), Some("a"));
        assert_eq!(next(&mut cursor), Some("b"));
        assert_eq!(cursor.position(), 2);
        assert_eq!(next(&mut cursor), None);
        assert_eq!(cursor.position(), 0);
        // 枚举结束后自动从头开始
        assert_eq!(next(&mut cursor), Some("a"));
    }

    #[test]
    fn test_cursor_manual_reset() {
        let mut cursor = EnumCursor::new();
        assert_eq!(cursor.advance(|i| Some(i)), Some(0));
        assert_eq!(cursor.advance(|i| Some(i)), Some(1));
        cursor.reset();
        assert_eq!(cursor.advance(|i| Some(i)), Some(0));
    }

    #[test]
    fn test_cursor_empty() {
        let mut cursor = EnumCursor::new();
        assert_eq!(cursor.advance(|_| None::<u32>), None);
        assert_eq!(cursor.advance(|_| None::<u32>), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_luid() {
        assert_eq!(luid_to_i64(0x1234, 0), 0x1234);
        assert_eq!(luid_to_i64(0, 1), 1 << 32);
        assert_eq!(luid_to_i64(0xFFFF_FFFF, 0), 0xFFFF_FFFF);
    }

    #[test]
    fn test_wide_to_string() {
        let mut buf = [0u16; 16];
        for (i, c) in "GPU 0".encode_utf16().enumerate() {
            buf[i] = c;
        }
        assert_eq!(wide_to_string(&buf), "GPU 0");
        let full: Vec<u16> = "abc".encode_utf16().collect();
        assert_eq!(wide_to_string(&full), "abc");
    }

    #[test]
    fn test_pack_rows() {
        // 2 行，每行 3 字节有效数据，行距 4
        let src = [1, 2, 3, 0, 4, 5, 6, 0];
        let mut out = vec![9; 10];
        pack_rows(&src, 4, 3, 2, &mut out);
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);

        pack_rows(&src, 4, 4, 2, &mut out);
        assert_eq!(out, src);
    }

    #[test]
    fn test_pack_rows_short_last_row() {
        // 映射内存的最后一行只有 row_bytes 字节
        let src = [1, 2, 3, 0, 0, 4, 5, 6];
        let mut out = Vec::new();
        pack_rows(&src, 5, 3, 2, &mut out);
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);
    }
}
