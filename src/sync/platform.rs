//! Platform selection within a multi-arch tag

use crate::config::Platform;
use crate::registry::TagImage;

/// Pick the first image built for `platform`.
pub fn select_image<'a>(images: &'a [TagImage], platform: &Platform) -> Option<&'a TagImage> {
    images
        .iter()
        .find(|image| image.architecture == platform.architecture && image.os == platform.os)
}
