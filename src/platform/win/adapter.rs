//! GPU 适配器与显示输出枚举

use crate::common::{self, AdapterVendor, EnumCursor};
use crate::error::Result;
use log::warn;
use std::fmt;
use windows::Win32::Graphics::Dxgi::*;

/// GPU 适配器
#[derive(Clone)]
pub struct Adapter {
    adapter: IDXGIAdapter1,
    desc: DXGI_ADAPTER_DESC1,
}

impl Adapter {
    /// 从 IDXGIAdapter1 初始化适配器
    pub fn new(adapter: IDXGIAdapter1) -> Result<Self> {
        let desc = unsafe { adapter.GetDesc1()? };
        Ok(Self { adapter, desc })
    }

    /// 适配器名称
    pub fn name(&self) -> String {
        common::wide_to_string(&self.desc.Description)
    }

    /// 获取 LUID
    pub fn luid(&self) -> i64 {
        common::luid_to_i64(self.desc.AdapterLuid.LowPart, self.desc.AdapterLuid.HighPart)
    }

    /// 获取厂商 ID
    pub fn vendor_id(&self) -> u32 {
        self.desc.VendorId
    }

    /// 由厂商 ID 识别的厂商
    pub fn vendor(&self) -> AdapterVendor {
        AdapterVendor::from_vendor_id(self.desc.VendorId)
    }

    /// 获取设备 ID
    pub fn device_id(&self) -> u32 {
        self.desc.DeviceId
    }

    /// 专用显存字节数
    pub fn dedicated_video_memory(&self) -> usize {
        self.desc.DedicatedVideoMemory
    }

    /// 是否为软件适配器（例如 Microsoft Basic Render Driver）
    pub fn is_software(&self) -> bool {
        self.desc.Flags & DXGI_ADAPTER_FLAG_SOFTWARE.0 as u32 != 0
    }

    /// 获取适配器描述
    pub fn desc(&self) -> &DXGI_ADAPTER_DESC1 {
        &self.desc
    }

    /// 底层 IDXGIAdapter1
    pub fn as_raw_ref(&self) -> &IDXGIAdapter1 {
        &self.adapter
    }

    /// 枚举连接到该适配器的显示输出
    pub fn iter_outputs(&self) -> OutputIter {
        OutputIter {
            adapter: self.adapter.clone(),
            cursor: EnumCursor::new(),
        }
    }

    /// 按下标获取显示输出，不存在时返回 `None`
    pub fn get_output_by_idx(&self, idx: u32) -> Option<Output> {
        let output = unsafe { self.adapter.EnumOutputs(idx) }.ok()?;
        Output::new(output).ok()
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("name", &self.name())
            .field("luid", &format_args!("{:#x}", self.luid()))
            .field("vendor_id", &format_args!("{:#06x}", self.vendor_id()))
            .field("device_id", &format_args!("{:#06x}", self.device_id()))
            .finish()
    }
}

/// 显示输出（显示器）
#[derive(Clone)]
pub struct Output {
    output: IDXGIOutput,
    desc: DXGI_OUTPUT_DESC,
}

impl Output {
    /// 从 IDXGIOutput 初始化显示输出
    pub fn new(output: IDXGIOutput) -> Result<Self> {
        let desc = unsafe { output.GetDesc()? };
        Ok(Self { output, desc })
    }

    /// 设备名，例如 `\\.\DISPLAY1`
    pub fn name(&self) -> String {
        common::wide_to_string(&self.desc.DeviceName)
    }

    /// 桌面坐标 `(left, top, right, bottom)`
    pub fn desktop_rect(&self) -> (i32, i32, i32, i32) {
        let r = self.desc.DesktopCoordinates;
        (r.left, r.top, r.right, r.bottom)
    }

    /// 是否连接到桌面
    pub fn is_attached(&self) -> bool {
        self.desc.AttachedToDesktop.as_bool()
    }

    /// 底层 IDXGIOutput
    pub fn as_raw_ref(&self) -> &IDXGIOutput {
        &self.output
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("name", &self.name())
            .field("desktop_rect", &self.desktop_rect())
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// 显示输出迭代器，枚举结束后自动复位
pub struct OutputIter {
    adapter: IDXGIAdapter1,
    cursor: EnumCursor,
}

impl OutputIter {
    /// 手动复位迭代位置
    pub fn reset(&mut self) {
        self.cursor.reset();
    }
}

impl Iterator for OutputIter {
    type Item = Output;

    fn next(&mut self) -> Option<Self::Item> {
        let adapter = &self.adapter;
        loop {
            let raw = self
                .cursor
                .advance(|idx| unsafe { adapter.EnumOutputs(idx) }.ok())?;
            match Output::new(raw) {
                Ok(output) => return Some(output),
                Err(e) => warn!("Failed to query output {}: {}", self.cursor.position() - 1, e),
            }
        }
    }
}

/// 适配器工厂
///
/// 作为迭代器按 DXGI 顺序返回全部适配器；返回 `None` 之后自动复位，
/// 再次迭代会从第一个适配器重新开始。按下标或 LUID 查找不影响迭代位置。
pub struct AdapterFactory {
    factory: IDXGIFactory1,
    cursor: EnumCursor,
}

impl AdapterFactory {
    /// 创建 DXGI 工厂
    pub fn new() -> Result<Self> {
        let factory: IDXGIFactory1 = unsafe { CreateDXGIFactory1()? };
        Ok(Self {
            factory,
            cursor: EnumCursor::new(),
        })
    }

    /// 手动复位迭代位置
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// 按 DXGI 下标获取适配器
    pub fn get_adapter_by_idx(&self, idx: u32) -> Option<Adapter> {
        let adapter = unsafe { self.factory.EnumAdapters1(idx) }.ok()?;
        match Adapter::new(adapter) {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                warn!("Failed to initialize adapter {}: {}", idx, e);
                None
            }
        }
    }

    /// 按 LUID 查找适配器
    pub fn get_adapter_by_luid(&self, luid: i64) -> Option<Adapter> {
        self.adapters().into_iter().find(|a| a.luid() == luid)
    }

    /// 获取指定厂商的全部适配器
    pub fn get_adapters_by_vendor(&self, vendor: AdapterVendor) -> Vec<Adapter> {
        self.adapters()
            .into_iter()
            .filter(|a| a.vendor() == vendor)
            .collect()
    }

    /// 一次性枚举全部适配器
    pub fn adapters(&self) -> Vec<Adapter> {
        let mut adapters = Vec::new();
        let mut idx = 0;
        loop {
            let adapter = match unsafe { self.factory.EnumAdapters1(idx) } {
                Ok(a) => a,
                Err(_) => break, // 枚举结束
            };
            match Adapter::new(adapter) {
                Ok(adapter) => adapters.push(adapter),
                Err(e) => warn!("Failed to initialize adapter {}: {}", idx, e),
            }
            idx += 1;
        }
        adapters
    }
}

impl Iterator for AdapterFactory {
    type Item = Adapter;

    fn next(&mut self) -> Option<Self::Item> {
        let factory = &self.factory;
        loop {
            let raw = self
                .cursor
                .advance(|idx| unsafe { factory.EnumAdapters1(idx) }.ok())?;
            match Adapter::new(raw) {
                Ok(adapter) => return Some(adapter),
                Err(e) => warn!("Failed to initialize adapter {}: {}", self.cursor.position() - 1, e),
            }
        }
    }
}
