//! 着色器编译与创建
//!
//! 内置着色器以 HLSL 源码形式嵌入，创建滤镜时通过 `D3DCompile` 编译，
//! 颜色矩阵等参数以宏的形式注入。

use crate::error::{DxFilterError, Result};
use log::debug;
use std::ffi::CString;
use windows::core::PCSTR;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::{ID3DBlob, D3D_SHADER_MACRO};
use windows::Win32::Graphics::Direct3D11::*;

pub(crate) const SIMPLE_VS: &str = include_str!("../../../shaders/simple_vs.hlsl");
pub(crate) const SIMPLE_PS: &str = include_str!("../../../shaders/simple_ps.hlsl");

// 颜色转换着色器共用系数宏与 to_y/to_u/to_v
macro_rules! yuv_shader {
    ($file:literal) => {
        concat!(
            include_str!("../../../shaders/yuv_common.hlsli"),
            include_str!(concat!("../../../shaders/", $file))
        )
    };
}

pub(crate) const ARGB_TO_AYUV_PS: &str = yuv_shader!("argb_to_ayuv_ps.hlsl");
pub(crate) const ARGB_TO_Y_PS: &str = yuv_shader!("argb_to_y_ps.hlsl");
pub(crate) const ARGB_TO_UV_PS: &str = yuv_shader!("argb_to_uv_ps.hlsl");
pub(crate) const ARGB_TO_YUV444_PS: &str = yuv_shader!("argb_to_yuv444_ps.hlsl");

const VS_TARGET: &str = "vs_5_0";
const PS_TARGET: &str = "ps_5_0";

/// 编译 HLSL 源码，返回字节码
pub fn compile_shader(
    src: &str,
    entry_point: &str,
    target: &str,
    defines: &[(String, String)],
) -> Result<Vec<u8>> {
    let entry = cstring(entry_point)?;
    let target = cstring(target)?;

    let define_strings = defines
        .iter()
        .map(|(name, value)| -> Result<(CString, CString)> {
            Ok((cstring(name)?, cstring(value)?))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut macros: Vec<D3D_SHADER_MACRO> = define_strings
        .iter()
        .map(|(name, value)| D3D_SHADER_MACRO {
            Name: PCSTR(name.as_ptr() as *const u8),
            Definition: PCSTR(value.as_ptr() as *const u8),
        })
        .collect();
    // 以空项结尾
    macros.push(D3D_SHADER_MACRO {
        Name: PCSTR::null(),
        Definition: PCSTR::null(),
    });

    let mut code: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;

    let result = unsafe {
        D3DCompile(
            src.as_ptr() as *const _,
            src.len(),
            PCSTR::null(),
            Some(macros.as_ptr()),
            None,
            PCSTR(entry.as_ptr() as *const u8),
            PCSTR(target.as_ptr() as *const u8),
            D3DCOMPILE_OPTIMIZATION_LEVEL3 | D3DCOMPILE_ENABLE_STRICTNESS,
            0,
            &mut code,
            Some(&mut errors),
        )
    };

    if let Err(e) = result {
        return Err(match errors {
            Some(errors) => DxFilterError::ShaderCompilation(format!(
                "{}: {}",
                entry_point,
                blob_to_string(&errors)
            )),
            None => e.into(),
        });
    }

    let code = code.ok_or_else(|| {
        DxFilterError::Unknown("compilation succeeded but no bytes were returned".to_owned())
    })?;
    let bytes = blob_to_bytes(&code).to_vec();
    debug!("Compiled shader {} ({} bytes)", entry_point, bytes.len());
    Ok(bytes)
}

fn cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| DxFilterError::BadParam(format!("{:?} contains a NUL byte", s)))
}

fn blob_to_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

fn blob_to_string(blob: &ID3DBlob) -> String {
    String::from_utf8_lossy(blob_to_bytes(blob))
        .trim_end_matches('\0')
        .trim_end()
        .to_owned()
}

/// 顶点着色器
pub struct VertexShader(ID3D11VertexShader);

impl VertexShader {
    /// 从字节码创建顶点着色器
    pub fn new(blob: &[u8], device: &ID3D11Device) -> Result<Self> {
        unsafe {
            let mut shader = None;
            device.CreateVertexShader(blob, None, Some(&mut shader))?;
            shader
                .map(Self)
                .ok_or_else(|| DxFilterError::Unknown("CreateVertexShader returned no shader".to_owned()))
        }
    }

    /// 编译并创建顶点着色器
    pub fn compile(src: &str, defines: &[(String, String)], device: &ID3D11Device) -> Result<Self> {
        Self::new(&compile_shader(src, "main", VS_TARGET, defines)?, device)
    }

    /// 底层 D3D11 顶点着色器
    pub fn as_raw_ref(&self) -> &ID3D11VertexShader {
        &self.0
    }
}

/// 像素着色器
pub struct PixelShader(ID3D11PixelShader);

impl PixelShader {
    /// 从字节码创建像素着色器
    pub fn new(blob: &[u8], device: &ID3D11Device) -> Result<Self> {
        unsafe {
            let mut shader = None;
            device.CreatePixelShader(blob, None, Some(&mut shader))?;
            shader
                .map(Self)
                .ok_or_else(|| DxFilterError::Unknown("CreatePixelShader returned no shader".to_owned()))
        }
    }

    /// 编译并创建像素着色器
    pub fn compile(src: &str, defines: &[(String, String)], device: &ID3D11Device) -> Result<Self> {
        Self::new(&compile_shader(src, "main", PS_TARGET, defines)?, device)
    }

    /// 底层 D3D11 像素着色器
    pub fn as_raw_ref(&self) -> &ID3D11PixelShader {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shaders_compile() {
        let defines = crate::color::YuvMatrix::default().shader_defines();
        assert!(!compile_shader(SIMPLE_VS, "main", VS_TARGET, &[]).unwrap().is_empty());
        for src in [
            SIMPLE_PS,
            ARGB_TO_AYUV_PS,
            ARGB_TO_Y_PS,
            ARGB_TO_UV_PS,
            ARGB_TO_YUV444_PS,
        ] {
            assert!(!compile_shader(src, "main", PS_TARGET, &defines).unwrap().is_empty());
        }
    }

    /// 公共部分只出现一次，各转换着色器都以它开头
    #[test]
    fn test_yuv_shaders_share_common_block() {
        let common = include_str!("../../../shaders/yuv_common.hlsli");
        for src in [ARGB_TO_AYUV_PS, ARGB_TO_Y_PS, ARGB_TO_UV_PS, ARGB_TO_YUV444_PS] {
            assert!(src.starts_with(common));
            assert_eq!(src.matches("#define Y_COEFF").count(), 1);
        }
        assert!(!SIMPLE_PS.contains("Y_COEFF"));
    }

    #[test]
    fn test_compile_error_carries_message() {
        let err = compile_shader("float4 main() : SV_TARGET { return nope; }", "main", PS_TARGET, &[])
            .unwrap_err();
        match err {
            DxFilterError::ShaderCompilation(msg) => assert!(msg.contains("nope"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_nul_in_entry_point() {
        assert!(matches!(
            compile_shader(SIMPLE_PS, "ma\0in", PS_TARGET, &[]),
            Err(DxFilterError::BadParam(_))
        ));
    }
}
