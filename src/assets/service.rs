use super::{AssetError, AssetResult};
use image::{
    DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage,
    imageops::{self, FilterType},
};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    process,
    time::{SystemTime, UNIX_EPOCH},
};

pub const ASSETS_DIR: &str = "assets";
pub const PRODUCTS_DIR: &str = "products";

const LOGO_FILE: &str = "logo.png";
const FAVICON_FILE: &str = "favicon.png";

const LOGO_SIZE: u32 = 512;
// The logo itself may use at most 80% of the canvas.
const LOGO_CONTENT: u32 = LOGO_SIZE * 4 / 5;
const LOGO_BACKGROUND: Rgba<u8> = Rgba([255, 232, 241, 255]);
const FAVICON_SIZE: u32 = 64;
const PRODUCT_IMAGE_MAX: u32 = 500;

/// Image files under `<root>/assets`.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }

    pub fn products_dir(&self) -> PathBuf {
        self.assets_dir().join(PRODUCTS_DIR)
    }

    pub fn logo_path(&self) -> PathBuf {
        self.assets_dir().join(LOGO_FILE)
    }

    pub fn favicon_path(&self) -> PathBuf {
        self.assets_dir().join(FAVICON_FILE)
    }

    /// Centers `source` on the square branding canvas and writes the logo
    /// and a favicon derived from it. Nothing is replaced unless both encode.
    pub fn set_logo(&self, source: &Path) -> AssetResult<(PathBuf, PathBuf)> {
        let image = decode(source)?.to_rgba8();

        let (width, height) = fit_within(image.width(), image.height(), LOGO_CONTENT);
        let scaled = if (width, height) == image.dimensions() {
            image
        } else {
            imageops::resize(&image, width, height, FilterType::Lanczos3)
        };

        let mut canvas = RgbaImage::from_pixel(LOGO_SIZE, LOGO_SIZE, LOGO_BACKGROUND);
        let x = (LOGO_SIZE - width) / 2;
        let y = (LOGO_SIZE - height) / 2;
        imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));

        let (fav_width, fav_height) = fit_within(LOGO_SIZE, LOGO_SIZE, FAVICON_SIZE);
        let favicon = imageops::resize(&canvas, fav_width, fav_height, FilterType::Lanczos3);

        fs::create_dir_all(self.assets_dir())?;
        let logo_path = self.logo_path();
        let favicon_path = self.favicon_path();

        let logo_tmp = encode_to_temp(&DynamicImage::ImageRgba8(canvas), &logo_path, ImageFormat::Png)?;
        let favicon_tmp =
            match encode_to_temp(&DynamicImage::ImageRgba8(favicon), &favicon_path, ImageFormat::Png) {
                Ok(tmp) => tmp,
                Err(err) => {
                    let _ = fs::remove_file(&logo_tmp);
                    return Err(err);
                }
            };

        if let Err(err) = fs::rename(&logo_tmp, &logo_path) {
            let _ = fs::remove_file(&logo_tmp);
            let _ = fs::remove_file(&favicon_tmp);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&favicon_tmp, &favicon_path) {
            let _ = fs::remove_file(&favicon_tmp);
            tracing::warn!(path = %favicon_path.display(), error = %err, "logo replaced but favicon was not");
            return Err(err.into());
        }

        tracing::debug!(source = %source.display(), "logo and favicon updated");
        Ok((logo_path, favicon_path))
    }

    /// Copies `source` into the products directory, shrunk to fit 500×500,
    /// and returns the path to store in `Product::image`.
    pub fn add_product_image(&self, source: &Path) -> AssetResult<String> {
        let basename = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AssetError::MissingFileName(source.to_path_buf()))?;

        let format = ImageFormat::from_path(basename)
            .map_err(|_| AssetError::UnsupportedFormat(source.to_path_buf()))?;

        let image = decode(source)?;
        let (width, height) = fit_within(image.width(), image.height(), PRODUCT_IMAGE_MAX);
        let image = if (width, height) == (image.width(), image.height()) {
            image
        } else {
            image.resize_exact(width, height, FilterType::Lanczos3)
        };

        fs::create_dir_all(self.products_dir())?;
        let (filename, target) = self.unused_product_image_name(basename);
        let tmp = encode_to_temp(&image, &target, format)?;
        fs::rename(&tmp, &target)?;

        tracing::debug!(source = %source.display(), target = %target.display(), "product image added");
        Ok(format!("{ASSETS_DIR}/{PRODUCTS_DIR}/{filename}"))
    }

    /// `prod_<pid>_<millis>_<basename>`, with a counter after the timestamp
    /// when that name is already taken.
    fn unused_product_image_name(&self, basename: &str) -> (String, PathBuf) {
        let stem = format!("prod_{}_{}", process::id(), unix_millis());
        let mut filename = format!("{stem}_{basename}");
        let mut counter = 1u32;

        loop {
            let target = self.products_dir().join(&filename);
            if !target.exists() {
                return (filename, target);
            }
            filename = format!("{stem}_{counter}_{basename}");
            counter += 1;
        }
    }

    /// Files in the products directory that none of `referenced` points at.
    pub fn orphaned_product_images<'a, I>(&self, referenced: I) -> AssetResult<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let dir = self.products_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let referenced: HashSet<&str> = referenced.into_iter().collect();
        let mut orphans = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let relative = format!("{ASSETS_DIR}/{PRODUCTS_DIR}/{name}");
            if !referenced.contains(relative.as_str()) {
                orphans.push(relative);
            }
        }

        orphans.sort();
        Ok(orphans)
    }
}

fn decode(path: &Path) -> AssetResult<DynamicImage> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn encode_to_temp(image: &DynamicImage, target: &Path, format: ImageFormat) -> AssetResult<PathBuf> {
    let name = target
        .file_name()
        .ok_or_else(|| AssetError::MissingFileName(target.to_path_buf()))?
        .to_string_lossy();
    let tmp = target.with_file_name(format!(".{name}.part"));

    // JPEG has no alpha channel.
    let result = if format == ImageFormat::Jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(&tmp, format)
    } else {
        image.save_with_format(&tmp, format)
    };

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp);
        return Err(AssetError::Encode {
            path: target.to_path_buf(),
            source,
        });
    }
    Ok(tmp)
}

/// Largest size with the same aspect ratio that fits in a `max`×`max` box.
/// Never upscales.
fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(max) / f64::from(width),
        f64::from(max) / f64::from(height),
    );
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max);
    (scaled(width), scaled(height))
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
