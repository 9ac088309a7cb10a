//! 纹理封装与创建

use crate::common::{ColorFormat, TextureDesc};
use crate::error::{DxFilterError, Result};
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

/// D3D11 二维纹理及其描述
#[derive(Clone)]
pub struct Texture {
    tex: ID3D11Texture2D,
    desc: TextureDesc,
}

impl Texture {
    /// 包装已有纹理，描述从 D3D 纹理推断
    ///
    /// 平面 YUV 格式（YUV444 / YUV420）以 R8 存储，无法推断，得到 `ColorFormat::Unknown`。
    pub fn new(tex: ID3D11Texture2D) -> Self {
        let raw = raw_desc(&tex);
        let desc = TextureDesc {
            width: raw.Width,
            height: raw.Height,
            format: color_format(raw.Format),
        };
        Self { tex, desc }
    }

    pub(crate) fn with_desc(tex: ID3D11Texture2D, desc: TextureDesc) -> Self {
        Self { tex, desc }
    }

    /// 纹理描述
    pub fn desc(&self) -> TextureDesc {
        self.desc
    }

    /// 底层 D3D11 纹理
    pub fn as_raw_ref(&self) -> &ID3D11Texture2D {
        &self.tex
    }
}

/// 创建滤镜输入纹理（着色器资源）
pub fn create_input_texture(
    device: &ID3D11Device,
    desc: TextureDesc,
    initial_data: Option<&[u8]>,
) -> Result<Texture> {
    create_texture(
        device,
        desc,
        D3D11_USAGE_DEFAULT,
        D3D11_BIND_SHADER_RESOURCE.0 as u32,
        0,
        initial_data,
    )
}

/// 创建滤镜输出纹理（渲染目标）
pub fn create_output_texture(
    device: &ID3D11Device,
    desc: TextureDesc,
    initial_data: Option<&[u8]>,
) -> Result<Texture> {
    create_texture(
        device,
        desc,
        D3D11_USAGE_DEFAULT,
        D3D11_BIND_RENDER_TARGET.0 as u32,
        0,
        initial_data,
    )
}

/// 创建 CPU 可读的 staging 纹理
pub fn create_staging_texture(device: &ID3D11Device, desc: TextureDesc) -> Result<Texture> {
    create_texture(
        device,
        desc,
        D3D11_USAGE_STAGING,
        0,
        D3D11_CPU_ACCESS_READ.0 as u32,
        None,
    )
}

fn create_texture(
    device: &ID3D11Device,
    desc: TextureDesc,
    usage: D3D11_USAGE,
    bind_flags: u32,
    cpu_access_flags: u32,
    initial_data: Option<&[u8]>,
) -> Result<Texture> {
    desc.validate()?;
    let pitch = desc.row_pitch()?;
    let height = desc.allocation_height()?;

    let tex_desc = D3D11_TEXTURE2D_DESC {
        Width: desc.width,
        Height: height,
        MipLevels: 1,
        ArraySize: 1,
        Format: dxgi_format(desc.format),
        SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
        Usage: usage,
        BindFlags: bind_flags,
        CPUAccessFlags: cpu_access_flags,
        MiscFlags: Default::default(),
    };

    let mut texture = None;
    match initial_data {
        Some(data) => {
            let needed = desc.byte_size()?;
            if data.len() < needed {
                return Err(DxFilterError::BadParam(format!(
                    "initial data has {} bytes, {:?} {}x{} needs {}",
                    data.len(),
                    desc.format,
                    desc.width,
                    desc.height,
                    needed
                )));
            }
            let init = D3D11_SUBRESOURCE_DATA {
                pSysMem: data.as_ptr() as *const _,
                SysMemPitch: pitch,
                SysMemSlicePitch: 0,
            };
            unsafe { device.CreateTexture2D(&tex_desc, Some(&init), Some(&mut texture))? };
        }
        None => unsafe { device.CreateTexture2D(&tex_desc, None, Some(&mut texture))? },
    }

    let texture =
        texture.ok_or_else(|| DxFilterError::Unknown("CreateTexture2D returned no texture".to_owned()))?;
    Ok(Texture::with_desc(texture, desc))
}

/// 获取 D3D11 纹理描述
pub(crate) fn raw_desc(texture: &ID3D11Texture2D) -> D3D11_TEXTURE2D_DESC {
    let mut desc = D3D11_TEXTURE2D_DESC::default();
    unsafe { texture.GetDesc(&mut desc) };
    desc
}

/// 纹理底层存储格式
pub fn dxgi_format(format: ColorFormat) -> DXGI_FORMAT {
    match format {
        ColorFormat::ARGB8UNorm => DXGI_FORMAT_B8G8R8A8_UNORM,
        ColorFormat::ABGR8UNorm => DXGI_FORMAT_R8G8B8A8_UNORM,
        ColorFormat::ARGB10UNorm => DXGI_FORMAT_R10G10B10A2_UNORM,
        ColorFormat::ARGB16Float => DXGI_FORMAT_R16G16B16A16_FLOAT,
        ColorFormat::AYUV => DXGI_FORMAT_AYUV,
        ColorFormat::Y410 => DXGI_FORMAT_Y410,
        ColorFormat::NV12 => DXGI_FORMAT_NV12,
        ColorFormat::P010 => DXGI_FORMAT_P010,
        ColorFormat::YUV444 | ColorFormat::YUV420 => DXGI_FORMAT_R8_UNORM,
        ColorFormat::Unknown => DXGI_FORMAT_UNKNOWN,
    }
}

/// 着色器读写时使用的视图格式
pub fn view_format(format: ColorFormat) -> DXGI_FORMAT {
    match format {
        ColorFormat::AYUV => DXGI_FORMAT_R8G8B8A8_UNORM,
        ColorFormat::Y410 => DXGI_FORMAT_R10G10B10A2_UNORM,
        other => dxgi_format(other),
    }
}

fn color_format(format: DXGI_FORMAT) -> ColorFormat {
    match format {
        DXGI_FORMAT_B8G8R8A8_UNORM => ColorFormat::ARGB8UNorm,
        DXGI_FORMAT_R8G8B8A8_UNORM => ColorFormat::ABGR8UNorm,
        DXGI_FORMAT_R10G10B10A2_UNORM => ColorFormat::ARGB10UNorm,
        DXGI_FORMAT_R16G16B16A16_FLOAT => ColorFormat::ARGB16Float,
        DXGI_FORMAT_AYUV => ColorFormat::AYUV,
        DXGI_FORMAT_Y410 => ColorFormat::Y410,
        DXGI_FORMAT_NV12 => ColorFormat::NV12,
        DXGI_FORMAT_P010 => ColorFormat::P010,
        _ => ColorFormat::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_formats_map_back() {
        for format in [
            ColorFormat::ARGB8UNorm,
            ColorFormat::ABGR8UNorm,
            ColorFormat::ARGB10UNorm,
            ColorFormat::ARGB16Float,
            ColorFormat::AYUV,
            ColorFormat::Y410,
            ColorFormat::NV12,
            ColorFormat::P010,
        ] {
            assert_eq!(color_format(dxgi_format(format)), format);
        }
    }

    #[test]
    fn test_planar_formats_are_r8() {
        assert_eq!(dxgi_format(ColorFormat::YUV444), DXGI_FORMAT_R8_UNORM);
        assert_eq!(color_format(DXGI_FORMAT_R8_UNORM), ColorFormat::Unknown);
        assert_eq!(view_format(ColorFormat::AYUV), DXGI_FORMAT_R8G8B8A8_UNORM);
    }
}
