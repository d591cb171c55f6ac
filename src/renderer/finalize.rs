use std::collections::BTreeMap;

use image::{RgbImage, RgbaImage, imageops};

use super::color::decode_mask_color;

/// Axis-aligned pixel rectangle. `width` and `height` are never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    fn from_point(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            width: 1,
            height: 1,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        let right = (self.x + self.width).max(x + 1);
        let bottom = (self.y + self.height).max(y + 1);
        self.x = self.x.min(x);
        self.y = self.y.min(y);
        self.width = right - self.x;
        self.height = bottom - self.y;
    }
}

/// Bounding box of all pixels with non-zero alpha, or `None` for a fully
/// transparent image.
pub fn alpha_bounding_box(image: &RgbaImage) -> Option<PixelRect> {
    let mut bounds: Option<PixelRect> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        match &mut bounds {
            Some(rect) => rect.include(x, y),
            None => bounds = Some(PixelRect::from_point(x, y)),
        }
    }
    bounds
}

/// Crops both canvases to the visible image's opaque bounding box.
///
/// The mask is cut with the image's rectangle rather than its own so the two
/// stay aligned; mask pixels outside that rectangle are dropped. A fully
/// transparent image leaves both canvases untouched.
pub fn crop_to_visible(image: RgbaImage, mask: RgbImage) -> (RgbaImage, RgbImage) {
    let Some(rect) = alpha_bounding_box(&image) else {
        log::debug!("nothing visible to crop to; keeping full canvas");
        return (image, mask);
    };

    let image = imageops::crop_imm(&image, rect.x, rect.y, rect.width, rect.height).to_image();
    let mask = imageops::crop_imm(&mask, rect.x, rect.y, rect.width, rect.height).to_image();
    (image, mask)
}

/// Bounding box of every piece index present in a mask.
///
/// Keys are the 1-based indices painted by the renderer; the background is
/// skipped.
pub fn piece_bounding_boxes(mask: &RgbImage) -> BTreeMap<u32, PixelRect> {
    let mut boxes: BTreeMap<u32, PixelRect> = BTreeMap::new();
    for (x, y, pixel) in mask.enumerate_pixels() {
        let index = decode_mask_color(*pixel);
        if index == 0 {
            continue;
        }
        boxes
            .entry(index)
            .and_modify(|rect| rect.include(x, y))
            .or_insert_with(|| PixelRect::from_point(x, y));
    }
    boxes
}
