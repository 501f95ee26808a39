//! GPU 纹理创建

use crate::geometry::ImageData;

/// 深度缓冲格式
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// 创建深度纹理（采样数需与颜色目标一致）
pub fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    sample_count: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// 创建多重采样颜色目标，`sample_count` 为 1 时不需要
pub fn create_msaa_target(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
) -> Option<(wgpu::Texture, wgpu::TextureView)> {
    if sample_count <= 1 {
        return None;
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Color Target"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Some((texture, view))
}

/// 上传 RGBA8 图像为 sRGB 纹理
///
/// 超过设备限制的图像先缩小。
pub fn create_rgba_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &ImageData,
    label: &str,
) -> wgpu::Texture {
    let max_side = device.limits().max_texture_dimension_2d;
    let (width, height, pixels) = fit_to_limit(image, max_side);

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}

/// 1x1 白色纹理，没有贴图的材质使用它
pub fn create_white_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
    let white = ImageData {
        width: 1,
        height: 1,
        pixels: vec![255, 255, 255, 255],
    };
    create_rgba_texture(device, queue, &white, "White Texture")
}

/// 贴图采样器（重复寻址，线性过滤）
pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Diffuse Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn fit_to_limit(image: &ImageData, max_side: u32) -> (u32, u32, Vec<u8>) {
    let (width, height) = scaled_size(image.width, image.height, max_side);
    if (width, height) == (image.width, image.height) {
        return (width, height, image.pixels.clone());
    }

    tracing::warn!(
        from = ?(image.width, image.height),
        to = ?(width, height),
        "Texture exceeds device limit, downscaling"
    );

    match image::RgbaImage::from_raw(image.width, image.height, image.pixels.clone()) {
        Some(rgba) => {
            let resized = image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle);
            (width, height, resized.into_raw())
        }
        None => (1, 1, vec![255, 255, 255, 255]),
    }
}

/// 保持宽高比缩放到 `max_side` 以内
fn scaled_size(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= max_side || max_side == 0 {
        return (width, height);
    }
    let scale = max_side as f64 / largest as f64;
    (
        ((width as f64 * scale).round() as u32).clamp(1, max_side),
        ((height as f64 * scale).round() as u32).clamp(1, max_side),
    )
}
