//! 内置滤镜：RGB 到 YUV 的颜色转换与缩放
//!
//! 所有滤镜都会按输出纹理尺寸自动缩放输入。

use crate::color::YuvMatrix;
use crate::error::Result;
use crate::filter_kind::FilterKind;
use crate::platform::win::filter::{create_rtv, create_srv, create_tex_sampler, DxFilter, Pass};
use crate::platform::win::shader::{self, PixelShader, VertexShader};
use crate::platform::win::texture::{view_format, Texture};
use log::debug;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::{DXGI_FORMAT_R8G8_UNORM, DXGI_FORMAT_R8_UNORM};

/// 单个渲染目标、单次绘制的滤镜
struct SinglePass {
    kind: FilterKind,
    device: ID3D11Device,
    vs: VertexShader,
    ps: PixelShader,
    in_tex: Texture,
    out_tex: Texture,
    srv: ID3D11ShaderResourceView,
    rtv: ID3D11RenderTargetView,
    sampler: ID3D11SamplerState,
}

impl SinglePass {
    fn new(
        kind: FilterKind,
        ps_src: &str,
        defines: &[(String, String)],
        input_tex: &Texture,
        out_tex: &Texture,
        device: &ID3D11Device,
    ) -> Result<Self> {
        kind.check(input_tex.desc().format, out_tex.desc().format)?;

        let vs = VertexShader::compile(shader::SIMPLE_VS, &[], device)?;
        let ps = PixelShader::compile(ps_src, defines, device)?;
        let srv = create_srv(device, input_tex, view_format(input_tex.desc().format))?;
        let rtv = create_rtv(device, out_tex, view_format(out_tex.desc().format))?;
        let sampler = create_tex_sampler(device)?;

        debug!(
            "Created {:?} filter {:?} -> {:?}",
            kind,
            input_tex.desc(),
            out_tex.desc()
        );

        Ok(Self {
            kind,
            device: device.clone(),
            vs,
            ps,
            in_tex: input_tex.clone(),
            out_tex: out_tex.clone(),
            srv,
            rtv,
            sampler,
        })
    }

    fn apply(&self, ctx: &ID3D11DeviceContext) -> Result<()> {
        let out = self.out_tex.desc();
        Pass {
            vs: &self.vs,
            ps: &self.ps,
            sampler: &self.sampler,
            srv: &self.srv,
            rtv: &self.rtv,
            width: out.width,
            height: out.allocation_height()?,
        }
        .draw(ctx);
        Ok(())
    }

    fn set_input(&mut self, tex: &Texture) -> Result<()> {
        self.kind.check(tex.desc().format, self.out_tex.desc().format)?;
        self.srv = create_srv(&self.device, tex, view_format(tex.desc().format))?;
        self.in_tex = tex.clone();
        Ok(())
    }

    fn set_output(&mut self, tex: &Texture) -> Result<()> {
        self.kind.check(self.in_tex.desc().format, tex.desc().format)?;
        self.rtv = create_rtv(&self.device, tex, view_format(tex.desc().format))?;
        self.out_tex = tex.clone();
        Ok(())
    }
}

/// 将 [ARGB8UNorm][crate::ColorFormat::ARGB8UNorm] 或 [ABGR8UNorm][crate::ColorFormat::ABGR8UNorm]
/// 转换为 [AYUV][crate::ColorFormat::AYUV]
pub struct ConvertARGBToAYUV(SinglePass);

impl ConvertARGBToAYUV {
    /// 使用 BT.601 limited 矩阵创建滤镜
    pub fn new(input_tex: &Texture, out_tex: &Texture, device: &ID3D11Device) -> Result<Self> {
        Self::with_matrix(input_tex, out_tex, device, YuvMatrix::default())
    }

    /// 使用指定颜色矩阵创建滤镜
    pub fn with_matrix(
        input_tex: &Texture,
        out_tex: &Texture,
        device: &ID3D11Device,
        matrix: YuvMatrix,
    ) -> Result<Self> {
        SinglePass::new(
            FilterKind::ArgbToAyuv,
            shader::ARGB_TO_AYUV_PS,
            &matrix.shader_defines(),
            input_tex,
            out_tex,
            device,
        )
        .map(Self)
    }
}

impl DxFilter for ConvertARGBToAYUV {
    fn apply_filter(&self, ctx: &ID3D11DeviceContext) -> Result<()> {
        self.0.apply(ctx)
    }

    fn set_input_tex(&mut self, tex: &Texture) -> Result<()> {
        self.0.set_input(tex)
    }

    fn set_output_tex(&mut self, tex: &Texture) -> Result<()> {
        self.0.set_output(tex)
    }
}

/// 将 ARGB / ABGR 转换为平面 [YUV444][crate::ColorFormat::YUV444]
pub struct ConvertARGBToYUV444(SinglePass);

impl ConvertARGBToYUV444 {
    /// 使用 BT.601 limited 矩阵创建滤镜
    pub fn new(input_tex: &Texture, out_tex: &Texture, device: &ID3D11Device) -> Result<Self> {
        Self::with_matrix(input_tex, out_tex, device, YuvMatrix::default())
    }

    /// 使用指定颜色矩阵创建滤镜
    pub fn with_matrix(
        input_tex: &Texture,
        out_tex: &Texture,
        device: &ID3D11Device,
        matrix: YuvMatrix,
    ) -> Result<Self> {
        SinglePass::new(
            FilterKind::ArgbToYuv444,
            shader::ARGB_TO_YUV444_PS,
            &matrix.shader_defines(),
            input_tex,
            out_tex,
            device,
        )
        .map(Self)
    }
}

impl DxFilter for ConvertARGBToYUV444 {
    fn apply_filter(&self, ctx: &ID3D11DeviceContext) -> Result<()> {
        self.0.apply(ctx)
    }

    fn set_input_tex(&mut self, tex: &Texture) -> Result<()> {
        self.0.set_input(tex)
    }

    fn set_output_tex(&mut self, tex: &Texture) -> Result<()> {
        self.0.set_output(tex)
    }
}

/// 缩放 ARGB / ABGR / AYUV，不做颜色转换
///
/// ARGB 与 ABGR 之间可以互转，通道顺序由视图格式处理。
pub struct ScaleARGBOrAYUV(SinglePass);

impl ScaleARGBOrAYUV {
    /// 创建缩放滤镜
    pub fn new(input_tex: &Texture, out_tex: &Texture, device: &ID3D11Device) -> Result<Self> {
        SinglePass::new(
            FilterKind::Scale,
            shader::SIMPLE_PS,
            &[],
            input_tex,
            out_tex,
            device,
        )
        .map(Self)
    }
}

impl DxFilter for ScaleARGBOrAYUV {
    fn apply_filter(&self, ctx: &ID3D11DeviceContext) -> Result<()> {
        self.0.apply(ctx)
    }

    fn set_input_tex(&mut self, tex: &Texture) -> Result<()> {
        self.0.set_input(tex)
    }

    fn set_output_tex(&mut self, tex: &Texture) -> Result<()> {
        self.0.set_output(tex)
    }
}

/// 将 ARGB / ABGR 转换为 [NV12][crate::ColorFormat::NV12]
///
/// 分两次绘制：R8 视图写全尺寸 Y 平面，R8G8 视图写半尺寸 UV 平面。
pub struct ConvertARGBToNV12 {
    device: ID3D11Device,
    vs: VertexShader,
    y_ps: PixelShader,
    uv_ps: PixelShader,

    in_tex: Texture,
    out_tex: Texture,

    srv: ID3D11ShaderResourceView,
    rtv_y: ID3D11RenderTargetView,
    rtv_uv: ID3D11RenderTargetView,
    sampler: ID3D11SamplerState,
}

impl ConvertARGBToNV12 {
    const KIND: FilterKind = FilterKind::ArgbToNv12;

    /// 使用 BT.601 limited 矩阵创建滤镜
    pub fn new(input_tex: &Texture, out_tex: &Texture, device: &ID3D11Device) -> Result<Self> {
        Self::with_matrix(input_tex, out_tex, device, YuvMatrix::default())
    }

    /// 使用指定颜色矩阵创建滤镜
    pub fn with_matrix(
        input_tex: &Texture,
        out_tex: &Texture,
        device: &ID3D11Device,
        matrix: YuvMatrix,
    ) -> Result<Self> {
        Self::KIND.check(input_tex.desc().format, out_tex.desc().format)?;

        let defines = matrix.shader_defines();
        let vs = VertexShader::compile(shader::SIMPLE_VS, &[], device)?;
        let y_ps = PixelShader::compile(shader::ARGB_TO_Y_PS, &defines, device)?;
        let uv_ps = PixelShader::compile(shader::ARGB_TO_UV_PS, &defines, device)?;

        let srv = create_srv(device, input_tex, view_format(input_tex.desc().format))?;
        let (rtv_y, rtv_uv) = Self::plane_views(device, out_tex)?;
        let sampler = create_tex_sampler(device)?;

        debug!(
            "Created {:?} filter {:?} -> {:?}",
            Self::KIND,
            input_tex.desc(),
            out_tex.desc()
        );

        Ok(Self {
            device: device.clone(),
            vs,
            y_ps,
            uv_ps,
            in_tex: input_tex.clone(),
            out_tex: out_tex.clone(),
            srv,
            rtv_y,
            rtv_uv,
            sampler,
        })
    }

    fn plane_views(
        device: &ID3D11Device,
        tex: &Texture,
    ) -> Result<(ID3D11RenderTargetView, ID3D11RenderTargetView)> {
        let rtv_y = create_rtv(device, tex, DXGI_FORMAT_R8_UNORM)?;
        let rtv_uv = create_rtv(device, tex, DXGI_FORMAT_R8G8_UNORM)?;
        Ok((rtv_y, rtv_uv))
    }
}

impl DxFilter for ConvertARGBToNV12 {
    fn apply_filter(&self, ctx: &ID3D11DeviceContext) -> Result<()> {
        let out = self.out_tex.desc();
        Pass {
            vs: &self.vs,
            ps: &self.y_ps,
            sampler: &self.sampler,
            srv: &self.srv,
            rtv: &self.rtv_y,
            width: out.width,
            height: out.height,
        }
        .draw(ctx);
        Pass {
            vs: &self.vs,
            ps: &self.uv_ps,
            sampler: &self.sampler,
            srv: &self.srv,
            rtv: &self.rtv_uv,
            width: out.width / 2,
            height: out.height / 2,
        }
        .draw(ctx);
        Ok(())
    }

    fn set_input_tex(&mut self, tex: &Texture) -> Result<()> {
        Self::KIND.check(tex.desc().format, self.out_tex.desc().format)?;
        self.srv = create_srv(&self.device, tex, view_format(tex.desc().format))?;
        self.in_tex = tex.clone();
        Ok(())
    }

    fn set_output_tex(&mut self, tex: &Texture) -> Result<()> {
        Self::KIND.check(self.in_tex.desc().format, tex.desc().format)?;
        let (rtv_y, rtv_uv) = Self::plane_views(&self.device, tex)?;
        self.rtv_y = rtv_y;
        self.rtv_uv = rtv_uv;
        self.out_tex = tex.clone();
        Ok(())
    }
}
