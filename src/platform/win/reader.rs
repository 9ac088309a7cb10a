//! 将 GPU 纹理读回 CPU 内存

use crate::common;
use crate::error::{DxFilterError, Result};
use crate::platform::win::texture::{raw_desc, Texture};
use log::trace;
use windows::Win32::Graphics::Direct3D11::*;

/// 纹理读取器
///
/// 内部缓存一个 staging 纹理，源纹理尺寸或格式变化时重新创建。
pub struct TextureReader {
    device: ID3D11Device,
    context: ID3D11DeviceContext,
    staging: Option<(ID3D11Texture2D, D3D11_TEXTURE2D_DESC)>,
}

impl TextureReader {
    /// 使用指定设备和上下文创建读取器
    pub fn new(device: ID3D11Device, context: ID3D11DeviceContext) -> Self {
        Self {
            device,
            context,
            staging: None,
        }
    }

    /// 读取纹理的全部平面，按行紧密排列写入 `out`
    pub fn get_data(&mut self, out: &mut Vec<u8>, tex: &Texture) -> Result<()> {
        let desc = tex.desc();
        let row_bytes = desc.row_pitch()? as usize;
        let rows = desc.byte_size()? / row_bytes;

        let staging = self.ensure_staging(tex.as_raw_ref())?;

        unsafe {
            self.context.CopyResource(&staging, tex.as_raw_ref());
        }

        let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            self.context
                .Map(&staging, 0, D3D11_MAP_READ, 0, Some(&mut mapped))?;
        }

        // 最后一行只保证有 row_bytes 字节
        let pitch = mapped.RowPitch as usize;
        let len = pitch * (rows - 1) + row_bytes;
        let data = unsafe { std::slice::from_raw_parts(mapped.pData as *const u8, len) };
        common::pack_rows(data, pitch, row_bytes, rows, out);

        unsafe {
            self.context.Unmap(&staging, 0);
        }

        Ok(())
    }

    fn ensure_staging(&mut self, src: &ID3D11Texture2D) -> Result<ID3D11Texture2D> {
        let src_desc = raw_desc(src);

        if let Some((existing, desc)) = &self.staging {
            if desc.Width == src_desc.Width
                && desc.Height == src_desc.Height
                && desc.Format == src_desc.Format
            {
                return Ok(existing.clone());
            }
        }

        let staging_desc = D3D11_TEXTURE2D_DESC {
            Width: src_desc.Width,
            Height: src_desc.Height,
            MipLevels: 1,
            ArraySize: 1,
            Format: src_desc.Format,
            SampleDesc: src_desc.SampleDesc,
            Usage: D3D11_USAGE_STAGING,
            BindFlags: Default::default(),
            CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
            MiscFlags: Default::default(),
        };

        let staging = unsafe {
            let mut texture = None;
            self.device
                .CreateTexture2D(&staging_desc, None, Some(&mut texture))?;
            texture.ok_or_else(|| {
                DxFilterError::Unknown("CreateTexture2D returned no staging texture".to_owned())
            })?
        };

        trace!(
            "Created staging texture {}x{} {:?}",
            staging_desc.Width,
            staging_desc.Height,
            staging_desc.Format
        );
        self.staging = Some((staging.clone(), staging_desc));
        Ok(staging)
    }
}
