//! Dominant color extraction using k-means clustering

use ahash::AHashSet;
use image::imageops::FilterType;
use linfa::prelude::*;
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Number of colors extracted when the caller does not choose
pub const DEFAULT_COLOR_COUNT: usize = 5;

/// Images are downscaled so their largest side is at most this many pixels
const MAX_DIMENSION: u32 = 300;

const RNG_SEED: u64 = 42;

/// Errors raised while analyzing an image
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels")]
    Empty,

    #[error("Clustering failed: {0}")]
    Clustering(String),
}

/// One dominant color and its share of the image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantColor {
    pub rgb: [u8; 3],
    pub hex: String,
    /// Share of pixels in this cluster, 0-100 rounded to two decimals
    pub percentage: f64,
}

impl DominantColor {
    fn new(rgb: [u8; 3], share: f64) -> Self {
        Self {
            rgb,
            hex: rgb_to_hex(rgb),
            percentage: (share * 10_000.0).round() / 100.0,
        }
    }
}

pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Extract up to `num_colors` dominant colors, most common first
pub fn analyze_image(bytes: &[u8], num_colors: usize) -> Result<Vec<DominantColor>, PaletteError> {
    let mut image = image::load_from_memory(bytes)?;
    if image.width().max(image.height()) > MAX_DIMENSION {
        image = image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3);
    }
    let rgb = image.to_rgb8();

    let pixels: Vec<[u8; 3]> = rgb.pixels().map(|p| p.0).collect();
    if pixels.is_empty() {
        return Err(PaletteError::Empty);
    }

    // k-means++ seeding needs at least k distinct points
    let distinct = pixels.iter().collect::<AHashSet<_>>().len();
    let k = num_colors.clamp(1, distinct);

    let flat: Vec<f64> = pixels.iter().flat_map(|p| p.iter().map(|&c| f64::from(c))).collect();
    let records = Array2::from_shape_vec((pixels.len(), 3), flat)
        .map_err(|e| PaletteError::Clustering(e.to_string()))?;
    let dataset = DatasetBase::from(records);

    let model = KMeans::params_with_rng(k, StdRng::seed_from_u64(RNG_SEED))
        .max_n_iterations(300)
        .tolerance(1e-4)
        .fit(&dataset)
        .map_err(|e| PaletteError::Clustering(e.to_string()))?;

    let DatasetBase { targets, .. } = model.predict(dataset);
    let mut counts = vec![0usize; k];
    for &label in targets.iter() {
        if let Some(count) = counts.get_mut(label) {
            *count += 1;
        }
    }

    let total = pixels.len() as f64;
    let mut colors: Vec<DominantColor> = model
        .centroids()
        .rows()
        .into_iter()
        .zip(counts)
        .map(|(centroid, count)| {
            let channel = |i: usize| centroid[i].round().clamp(0.0, 255.0) as u8;
            DominantColor::new([channel(0), channel(1), channel(2)], count as f64 / total)
        })
        .collect();

    colors.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    debug!(clusters = k, pixels = pixels.len(), "extracted dominant colors");
    Ok(colors)
}
