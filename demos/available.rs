use env_logger::{init_from_env, Env, DEFAULT_FILTER_ENV};

fn main() {
    let start = std::time::Instant::now();
    init_from_env(Env::default().filter_or(DEFAULT_FILTER_ENV, "info"));
    #[cfg(windows)]
    list();
    log::info!("elapsed: {:?}", start.elapsed());
}

#[cfg(windows)]
fn list() {
    use dxfilter::utils::{create_device_context, AdapterFactory};

    let factory = match AdapterFactory::new() {
        Ok(factory) => factory,
        Err(e) => {
            log::error!("Failed to create adapter factory: {}", e);
            return;
        }
    };

    println!("adapters:");
    for adapter in factory {
        println!(
            "{} luid: {:#x}, vendor: {:?}, vram: {} MiB, software: {}",
            adapter.name(),
            adapter.luid(),
            adapter.vendor(),
            adapter.dedicated_video_memory() / (1024 * 1024),
            adapter.is_software()
        );
        for output in adapter.iter_outputs() {
            println!("    output: {:?}", output);
        }
        match create_device_context(&adapter) {
            Ok(_) => println!("    d3d11 device: ok"),
            Err(e) => println!("    d3d11 device: {}", e),
        }
    }
}
