//! 滤镜接口与渲染管线辅助函数

use crate::error::{DxFilterError, Result};
use crate::platform::win::shader::{PixelShader, VertexShader};
use crate::platform::win::texture::Texture;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT;

/// 滤镜接口，多个滤镜可以串联成 DirectX 处理管线
///
/// ```ignore
/// let adapter = AdapterFactory::new()?.next().unwrap();
/// let (device, context) = create_device_context(&adapter)?;
///
/// let input = create_input_texture(&device, in_desc, Some(&pixels))?;
/// let output = create_output_texture(&device, out_desc, None)?;
///
/// let filter = ScaleARGBOrAYUV::new(&input, &output, &device)?;
/// filter.apply_filter(&context)?;
/// ```
pub trait DxFilter {
    /// 在给定的设备上下文中执行滤镜，结果写入输出纹理
    fn apply_filter(&self, ctx: &ID3D11DeviceContext) -> Result<()>;

    /// 切换输入纹理
    fn set_input_tex(&mut self, tex: &Texture) -> Result<()>;

    /// 切换输出纹理
    fn set_output_tex(&mut self, tex: &Texture) -> Result<()>;
}

/// 单次全屏绘制所需的状态
pub(crate) struct Pass<'a> {
    pub vs: &'a VertexShader,
    pub ps: &'a PixelShader,
    pub sampler: &'a ID3D11SamplerState,
    pub srv: &'a ID3D11ShaderResourceView,
    pub rtv: &'a ID3D11RenderTargetView,
    pub width: u32,
    pub height: u32,
}

impl Pass<'_> {
    /// 绑定状态、绘制并解绑输入输出
    pub fn draw(&self, ctx: &ID3D11DeviceContext) {
        let viewport = D3D11_VIEWPORT {
            TopLeftX: 0.0,
            TopLeftY: 0.0,
            Width: self.width as f32,
            Height: self.height as f32,
            MinDepth: 0.0,
            MaxDepth: 1.0,
        };

        unsafe {
            ctx.IASetInputLayout(None);
            ctx.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP);
            ctx.VSSetShader(self.vs.as_raw_ref(), None);
            ctx.PSSetShader(self.ps.as_raw_ref(), None);
            ctx.PSSetSamplers(0, Some(&[Some(self.sampler.clone())]));
            ctx.PSSetShaderResources(0, Some(&[Some(self.srv.clone())]));
            ctx.RSSetViewports(Some(&[viewport]));
            ctx.OMSetRenderTargets(Some(&[Some(self.rtv.clone())]), None);
            ctx.Draw(4, 0);
            // 解绑，避免输出纹理在下一个滤镜中作为输入时产生读写冲突
            ctx.OMSetRenderTargets(None, None);
            ctx.PSSetShaderResources(0, Some(&[None]));
        }
    }
}

/// 创建着色器资源视图
pub(crate) fn create_srv(
    device: &ID3D11Device,
    tex: &Texture,
    format: DXGI_FORMAT,
) -> Result<ID3D11ShaderResourceView> {
    let desc = D3D11_SHADER_RESOURCE_VIEW_DESC {
        Format: format,
        ViewDimension: D3D11_SRV_DIMENSION_TEXTURE2D,
        Anonymous: D3D11_SHADER_RESOURCE_VIEW_DESC_0 {
            Texture2D: D3D11_TEX2D_SRV {
                MostDetailedMip: 0,
                MipLevels: 1,
            },
        },
    };

    unsafe {
        let mut srv = None;
        device.CreateShaderResourceView(tex.as_raw_ref(), Some(&desc), Some(&mut srv))?;
        srv.ok_or_else(|| DxFilterError::Unknown("failed to create shader resource view".to_owned()))
    }
}

/// 创建渲染目标视图
pub(crate) fn create_rtv(
    device: &ID3D11Device,
    tex: &Texture,
    format: DXGI_FORMAT,
) -> Result<ID3D11RenderTargetView> {
    let desc = D3D11_RENDER_TARGET_VIEW_DESC {
        Format: format,
        ViewDimension: D3D11_RTV_DIMENSION_TEXTURE2D,
        Anonymous: D3D11_RENDER_TARGET_VIEW_DESC_0 {
            Texture2D: D3D11_TEX2D_RTV { MipSlice: 0 },
        },
    };

    unsafe {
        let mut rtv = None;
        device.CreateRenderTargetView(tex.as_raw_ref(), Some(&desc), Some(&mut rtv))?;
        rtv.ok_or_else(|| DxFilterError::Unknown("failed to create render target view".to_owned()))
    }
}

/// 创建线性采样器，缩放依赖线性插值
pub(crate) fn create_tex_sampler(device: &ID3D11Device) -> Result<ID3D11SamplerState> {
    let desc = D3D11_SAMPLER_DESC {
        Filter: D3D11_FILTER_MIN_MAG_MIP_LINEAR,
        AddressU: D3D11_TEXTURE_ADDRESS_CLAMP,
        AddressV: D3D11_TEXTURE_ADDRESS_CLAMP,
        AddressW: D3D11_TEXTURE_ADDRESS_CLAMP,
        MipLODBias: 0.0,
        MaxAnisotropy: 1,
        ComparisonFunc: D3D11_COMPARISON_NEVER,
        BorderColor: [0.0f32; 4],
        MinLOD: 0.0,
        MaxLOD: D3D11_FLOAT32_MAX,
    };

    unsafe {
        let mut sampler = None;
        device.CreateSamplerState(&desc, Some(&mut sampler))?;
        sampler.ok_or_else(|| DxFilterError::Unknown("failed to create sampler state".to_owned()))
    }
}
