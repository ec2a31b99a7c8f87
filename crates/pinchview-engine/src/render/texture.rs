use std::path::PathBuf;

use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::error::{SetupError, SetupResult};

/// Where the displayed image comes from.
#[derive(Debug, Clone)]
pub enum TextureSource {
    /// Image file on disk; the format is guessed from its contents.
    Path(PathBuf),
    /// Already-read encoded image (PNG, JPEG, BMP or GIF).
    Bytes { name: String, bytes: Vec<u8> },
}

impl TextureSource {
    pub fn name(&self) -> String {
        match self {
            TextureSource::Path(p) => p.display().to_string(),
            TextureSource::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Decoded RGBA8 pixels, row-major from the top-left corner.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Name of the source it came from, for error messages.
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decodes `source` into RGBA8.
pub fn decode(source: &TextureSource) -> SetupResult<DecodedImage> {
    let load_error = |reason: String| SetupError::TextureLoad {
        source_name: source.name(),
        reason,
    };

    let image = match source {
        TextureSource::Path(path) => image::ImageReader::open(path)
            .map_err(|e| load_error(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| load_error(e.to_string()))?
            .decode(),
        TextureSource::Bytes { bytes, .. } => image::load_from_memory(bytes),
    }
    .map_err(|e| load_error(e.to_string()))?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        name: source.name(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Texture, its view and the sampler the fragment stage reads it with.
pub struct QuadTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl QuadTexture {
    /// Uploads `image` as an immutable sRGB texture.
    ///
    /// Fails with `TextureLoad` if either side is zero or exceeds the
    /// device's 2D texture limit.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &DecodedImage) -> SetupResult<Self> {
        let rejected = |reason: String| SetupError::TextureLoad {
            source_name: image.name.clone(),
            reason,
        };

        if image.width == 0 || image.height == 0 {
            return Err(rejected(format!("image has zero size ({}x{})", image.width, image.height)));
        }

        let limit = device.limits().max_texture_dimension_2d;
        if image.width > limit || image.height > limit {
            return Err(rejected(format!(
                "{}x{} exceeds the device limit of {limit}",
                image.width, image.height
            )));
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("pinchview quad texture"),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            &image.rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pinchview quad sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            _texture: texture,
            view,
            sampler,
            width: image.width,
            height: image.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8, y as u8, 0x80, 0xff])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_from_memory() {
        let src = TextureSource::Bytes { name: "test.png".into(), bytes: png_bytes(3, 2) };
        let img = decode(&src).expect("decode");

        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.rgba.len(), 3 * 2 * 4);
        // Pixel (2, 1) is the last one in row-major order.
        assert_eq!(&img.rgba[20..24], &[2, 1, 0x80, 0xff]);
    }

    #[test]
    fn missing_file_is_a_texture_load_error() {
        let src = TextureSource::Path(PathBuf::from("/definitely/not/here/apple.jpg"));
        match decode(&src) {
            Err(SetupError::TextureLoad { source_name, .. }) => {
                assert!(source_name.ends_with("apple.jpg"));
            }
            other => panic!("expected TextureLoad, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_bytes_are_a_texture_load_error() {
        let src = TextureSource::Bytes { name: "junk".into(), bytes: b"not an image".to_vec() };
        assert!(matches!(decode(&src), Err(SetupError::TextureLoad { .. })));
    }

    #[test]
    fn decoded_image_keeps_source_name() {
        let src = TextureSource::Bytes { name: "tiny.png".into(), bytes: png_bytes(1, 1) };
        assert_eq!(decode(&src).expect("decode").name, "tiny.png");
    }

    fn noop_device() -> (wgpu::Device, wgpu::Queue) {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
    }

    fn blank(name: &str, width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            name: name.to_string(),
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    #[test]
    fn upload_within_limits_succeeds() {
        let (device, queue) = noop_device();
        let tex = QuadTexture::upload(&device, &queue, &blank("ok.png", 4, 2)).expect("upload");
        assert_eq!((tex.width, tex.height), (4, 2));
    }

    #[test]
    fn oversized_image_is_rejected_with_its_name() {
        let (device, queue) = noop_device();
        let too_wide = device.limits().max_texture_dimension_2d + 1;

        match QuadTexture::upload(&device, &queue, &blank("panorama.jpg", too_wide, 1)) {
            Err(SetupError::TextureLoad { source_name, reason }) => {
                assert_eq!(source_name, "panorama.jpg");
                assert!(reason.contains("device limit"), "{reason}");
            }
            Err(other) => panic!("expected TextureLoad, got {other:?}"),
            Ok(_) => panic!("oversized image was uploaded"),
        }
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let (device, queue) = noop_device();
        assert!(matches!(
            QuadTexture::upload(&device, &queue, &blank("empty.png", 0, 3)),
            Err(SetupError::TextureLoad { .. })
        ));
    }
}
