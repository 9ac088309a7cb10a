//! D3D11 设备与立即上下文创建

use crate::config::DeviceConfig;
use crate::error::{DxFilterError, Result};
use crate::platform::win::adapter::Adapter;
use log::debug;
use windows::core::Interface;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D10::ID3D10Multithread;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::IDXGIAdapter;

/// 使用默认配置在指定适配器上创建设备和立即上下文
pub fn create_device_context(adapter: &Adapter) -> Result<(ID3D11Device, ID3D11DeviceContext)> {
    create_device_context_with(adapter, &DeviceConfig::default())
}

/// 按 `config` 在指定适配器上创建设备和立即上下文
pub fn create_device_context_with(
    adapter: &Adapter,
    config: &DeviceConfig,
) -> Result<(ID3D11Device, ID3D11DeviceContext)> {
    config.validate()?;

    let feature_levels: Vec<D3D_FEATURE_LEVEL> = config
        .feature_levels
        .iter()
        .map(|level| D3D_FEATURE_LEVEL(level.raw()))
        .collect();

    let mut device = None;
    let mut context = None;
    let mut feature_level = D3D_FEATURE_LEVEL(0);

    unsafe {
        // D3D11CreateDevice 需要 IDXGIAdapter
        let adapter_base: IDXGIAdapter = Interface::cast(adapter.as_raw_ref())?;
        D3D11CreateDevice(
            &adapter_base,
            D3D_DRIVER_TYPE_UNKNOWN,
            HMODULE::default(),
            creation_flags(config),
            Some(feature_levels.as_slice()),
            D3D11_SDK_VERSION,
            Some(&mut device),
            Some(&mut feature_level),
            Some(&mut context),
        )?;
    }

    let device: ID3D11Device =
        device.ok_or_else(|| DxFilterError::Unknown("D3D11CreateDevice returned no device".to_owned()))?;
    let context: ID3D11DeviceContext = context
        .ok_or_else(|| DxFilterError::Unknown("D3D11CreateDevice returned no context".to_owned()))?;

    if !config.accepts(feature_level.0) {
        return Err(DxFilterError::UnsupportedFeatureLevel(feature_level.0));
    }

    if config.multithread_protected {
        set_multithread_protected(&context)?;
    }

    debug!(
        "Created D3D11 device on {:?} (luid {:#x}, feature level {:#x})",
        adapter.name(),
        adapter.luid(),
        feature_level.0
    );

    Ok((device, context))
}

fn creation_flags(config: &DeviceConfig) -> D3D11_CREATE_DEVICE_FLAG {
    let mut flags = 0;
    if config.bgra_support {
        flags |= D3D11_CREATE_DEVICE_BGRA_SUPPORT.0;
    }
    if config.video_support {
        flags |= D3D11_CREATE_DEVICE_VIDEO_SUPPORT.0;
    }
    if config.debug_layer {
        flags |= D3D11_CREATE_DEVICE_DEBUG.0;
    }
    if config.single_threaded {
        flags |= D3D11_CREATE_DEVICE_SINGLETHREADED.0;
    }
    D3D11_CREATE_DEVICE_FLAG(flags)
}

/// 设置多线程保护
fn set_multithread_protected(context: &ID3D11DeviceContext) -> Result<()> {
    unsafe {
        let multithread: ID3D10Multithread = Interface::cast(context)?;
        let _ = multithread.SetMultithreadProtected(true);
    }
    Ok(())
}
