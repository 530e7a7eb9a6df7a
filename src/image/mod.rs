//! Image URL builder for content store asset references
//!
//! Asset references look like `image-<id>-<width>x<height>-<format>` and map
//! onto the CDN as `https://cdn.sanity.io/images/<project>/<dataset>/<id>-<width>x<height>.<format>`.

use crate::content::ImageRef;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// Builds fetchable URLs from image references
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: &str, dataset: &str) -> Self {
        Self {
            base: format!("{}/{}/{}", CDN_BASE, project_id, dataset),
        }
    }

    /// URL for an image reference, `None` if it has no usable asset
    pub fn url(&self, image: &ImageRef) -> Option<String> {
        let asset = image.asset.as_ref()?;
        if let Some(url) = asset.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        self.url_for_ref(asset.reference.as_deref()?)
    }

    /// URL for an image reference scaled to a width
    pub fn url_with_width(&self, image: &ImageRef, width: u32) -> Option<String> {
        let url = self.url(image)?;
        let sep = if url.contains('?') { '&' } else { '?' };
        Some(format!("{}{}w={}", url, sep, width))
    }

    /// URL for a raw asset id such as `image-abc-800x600-png`
    pub fn url_for_ref(&self, asset_ref: &str) -> Option<String> {
        let rest = asset_ref.strip_prefix("image-")?;
        let (name, format) = rest.rsplit_once('-')?;
        let (id, dimensions) = name.rsplit_once('-')?;

        let (width, height) = dimensions.split_once('x')?;
        if id.is_empty()
            || format.is_empty()
            || width.parse::<u32>().is_err()
            || height.parse::<u32>().is_err()
        {
            return None;
        }

        Some(format!("{}/{}-{}.{}", self.base, id, dimensions, format))
    }
}
