use env_logger::{init_from_env, Env, DEFAULT_FILTER_ENV};

#[cfg(windows)]
fn main() -> dxfilter::Result<()> {
    use dxfilter::utils::{
        create_device_context, create_input_texture, create_output_texture, AdapterFactory,
    };
    use dxfilter::{ColorFormat, ConvertARGBToNV12, DxFilter, TextureDesc, TextureReader};

    init_from_env(Env::default().filter_or(DEFAULT_FILTER_ENV, "info"));

    // 创建设备和上下文
    let adapter = AdapterFactory::new()?
        .get_adapter_by_idx(0)
        .ok_or(dxfilter::DxFilterError::AdapterNotFound)?;
    let (device, context) = create_device_context(&adapter)?;

    // 创建输入输出纹理
    let sample_input_data = vec![10u8; 1920 * 1080 * 4];
    let input_tex = create_input_texture(
        &device,
        TextureDesc::new(1920, 1080, ColorFormat::ARGB8UNorm),
        Some(&sample_input_data),
    )?;
    let output_tex = create_output_texture(
        &device,
        TextureDesc::new(1280, 720, ColorFormat::NV12),
        None,
    )?;

    let mut reader = TextureReader::new(device.clone(), context.clone());

    let filter = ConvertARGBToNV12::new(&input_tex, &output_tex, &device)?;
    filter.apply_filter(&context)?;

    let mut out_data = Vec::new();
    reader.get_data(&mut out_data, &output_tex)?;

    log::info!(
        "adapter: {}, output data size: {}, first luma: {}",
        adapter.name(),
        out_data.len(),
        out_data[0]
    );
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    init_from_env(Env::default().filter_or(DEFAULT_FILTER_ENV, "info"));
    log::warn!("rgb_to_nv12 requires Windows");
}
