//! # glyphmask
//!
//! Renders a string of text onto a transparent raster image and, in the same
//! pass, produces a pixel-exact segmentation mask in which every glyph is
//! filled with a color encoding its sequential index.
//!
//! ## Overview
//!
//! The visible image is meant as OCR training input; the mask lets a
//! downstream pipeline recover per-character bounding boxes. Fonts, colors,
//! spacing and stroke are sampled per call from a caller-supplied random
//! source, so a seeded [`rand::rngs::StdRng`] reproduces a sample exactly.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use glyphmask::{FontStorage, GeneratorConfig, TextGenerator};
//! use rand::SeedableRng;
//!
//! let mut storage = FontStorage::new();
//! storage.load_system_fonts();
//! let ids: Vec<_> = storage.faces().take(4).map(|face| face.id).collect();
//!
//! let generator = TextGenerator::new(GeneratorConfig::default());
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let sample = generator
//!     .generate_from_storage("Hello world", &mut storage, &ids, &mut rng)
//!     .unwrap();
//! sample.image.save("image.png").unwrap();
//! sample.mask.save("mask.png").unwrap();
//! ```
//!
//! ## Pipeline
//!
//! *   **Font assignment**: every piece picks a font from the pool, with replacement.
//! *   **Metrics**: advance widths and line heights per piece.
//! *   **Layout**: optional random multi-line partitioning and draw origins.
//! *   **Dual rendering**: one position list painted twice, image and mask.
//! *   **Finalize**: optional tight crop of both canvases to the same rectangle.

pub mod error;
pub mod font;
pub mod font_storage;
pub mod generator;
pub mod renderer;
pub mod text;

// common re-exports
pub use error::GenerateError;
pub use font::{Coverage, Face, FontMetrics, GlyphRasterizer, SizedFont};
pub use font_storage::FontStorage;
pub use generator::{GeneratedText, GeneratorConfig, Orientation, TextGenerator, generate};
pub use text::{AdvanceOverride, ZeroAdvanceMarks};

// re-export dependencies
pub use fontdb;
pub use fontdue;
pub use image;
pub use rand;
