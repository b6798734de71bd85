//! Textures
//!
//! Image decoding, GPU upload and the depth buffer.

use std::path::{Path, PathBuf};

use crate::{RendererError, RendererResult};

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decode an image file
    pub fn decode(path: &Path) -> RendererResult<Self> {
        let image = image::open(path).map_err(|source| RendererError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// 1x1 opaque white, so untextured objects show their lit material
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.rgba.len()
    }

    /// Check both sides against the device's 2D texture limit
    pub fn check_dimensions(&self, path: &Path, max_dimension: u32) -> RendererResult<()> {
        if self.width > max_dimension || self.height > max_dimension {
            return Err(RendererError::TextureTooLarge {
                path: path.to_path_buf(),
                width: self.width,
                height: self.height,
                max: max_dimension,
            });
        }
        Ok(())
    }
}

/// A sampled 2D texture
#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Source file, if any
    pub source: Option<PathBuf>,
}

impl Texture {
    /// Upload decoded pixels
    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, image: &TextureImage, label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
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
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampler_descriptor());

        Self {
            texture,
            view,
            sampler,
            source: None,
        }
    }

    /// Load and upload an image file. Images larger than the device allows
    /// are rejected before anything is created on the GPU.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> RendererResult<Self> {
        let image = TextureImage::decode(path)?;
        image.check_dimensions(path, device.limits().max_texture_dimension_2d)?;
        log::info!(
            "Loaded texture {}: {}x{}, {} KiB",
            path.display(),
            image.width,
            image.height,
            image.size_bytes() / 1024
        );

        let mut texture = Self::from_image(device, queue, &image, &path.display().to_string());
        texture.source = Some(path.to_path_buf());
        Ok(texture)
    }

    /// Load `path` if given; on failure log it and fall back to the white placeholder
    pub fn load_or_placeholder(device: &wgpu::Device, queue: &wgpu::Queue, path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::load(device, queue, path) {
                Ok(texture) => return texture,
                Err(err) => log::error!("{}; drawing untextured", err),
            }
        }
        Self::from_image(device, queue, &TextureImage::placeholder(), "placeholder texture")
    }

    /// Whether this is the placeholder
    pub fn is_placeholder(&self) -> bool {
        self.source.is_none()
    }
}

/// Linear filtering, clamped at the edges
pub fn sampler_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("Texture Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    }
}

/// Depth buffer sized to the surface
#[derive(Debug)]
pub struct DepthTexture {
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: crate::pipeline::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_white() {
        let image = TextureImage::placeholder();
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.rgba, vec![255, 255, 255, 255]);
        assert_eq!(image.size_bytes(), 4);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        let path = Path::new("table.png");
        let image = TextureImage {
            width: max + 808,
            height: 16,
            rgba: Vec::new(),
        };

        let err = image.check_dimensions(path, max).unwrap_err();
        assert!(matches!(
            err,
            RendererError::TextureTooLarge { width, max: limit, .. } if width == max + 808 && limit == max
        ));
        assert!(err.to_string().contains("table.png"));

        let tall = TextureImage { width: 1, height: max + 1, rgba: Vec::new() };
        assert!(tall.check_dimensions(path, max).is_err());
    }

    #[test]
    fn test_image_at_limit_is_accepted() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        let image = TextureImage { width: max, height: max, rgba: Vec::new() };
        assert!(image.check_dimensions(Path::new("table.png"), max).is_ok());
        assert!(TextureImage::placeholder().check_dimensions(Path::new("white"), 1).is_ok());
    }

    #[test]
    fn test_decode_missing_file() {
        let err = TextureImage::decode(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, RendererError::TextureLoad { .. }));
    }

    #[test]
    fn test_decode_png() {
        let path = std::env::temp_dir().join(format!("cardtable-texture-{}.png", std::process::id()));
        let pixels = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 10, y as u8 * 20, 0, 255]));
        pixels.save(&path).unwrap();

        let decoded = TextureImage::decode(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.size_bytes(), 3 * 2 * 4);
        assert_eq!(&decoded.rgba[4..8], &[10, 0, 0, 255]);
    }

    #[test]
    fn test_sampler_clamps_and_filters_linearly() {
        let desc = sampler_descriptor();
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::ClampToEdge);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
    }
}
