use std::{collections::HashMap, path::Path, sync::Arc};

use crate::{error::GenerateError, font::SizedFont};

/// Discovers font faces with `fontdb` and loads them with `fontdue` on demand.
///
/// Faces are only parsed the first time a pool asks for them; later pools at
/// other sizes share the same parsed font through an `Arc`.
pub struct FontStorage {
    /// Every face registered with fontdb, loaded or not.
    font_db: fontdb::Database,
    /// Faces that have been parsed by fontdue so far.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates an empty storage with no registered faces.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Registering faces.
impl FontStorage {
    /// Registers every face contained in `data` (a font file or collection).
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Registers the faces of a single font file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<(), GenerateError> {
        let path = path.as_ref();
        self.font_db
            .load_font_file(path)
            .map_err(|e| GenerateError::FontLoad(format!("{}: {}", path.display(), e)))
    }

    /// Registers every font found below `dir`.
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Registers every face installed on the host system.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Whether no face has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Every registered face, in registration order.
    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }

    /// Metadata of one registered face, if `id` is known.
    pub fn face(&self, id: fontdb::ID) -> Option<&fontdb::FaceInfo> {
        self.font_db.face(id)
    }

    /// Finds the face best matching `query`, resolving generic families.
    pub fn query(&self, query: &fontdb::Query<'_>) -> Option<fontdb::ID> {
        self.font_db.query(query)
    }
}

/// Loading fonts.
impl FontStorage {
    /// Returns the parsed font for `id`, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Result<Arc<fontdue::Font>, GenerateError> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self
                    .font_db
                    .with_face_data(id, |data, index| {
                        fontdue::Font::from_bytes(
                            data,
                            fontdue::FontSettings {
                                collection_index: index,
                                ..Default::default()
                            },
                        )
                    })
                    .ok_or(GenerateError::UnknownFace)?;

                match font_result {
                    Ok(font) => Ok(Arc::clone(entry.insert(Arc::new(font)))),
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        Err(GenerateError::FontLoad(e.to_string()))
                    }
                }
            }
        }
    }

    /// Builds a font pool: every face in `ids` bound to `size` pixels.
    ///
    /// The pool keeps the order of `ids`, so index `i` in the result is the
    /// face `ids[i]`.
    pub fn sized_pool(
        &mut self,
        ids: &[fontdb::ID],
        size: f32,
    ) -> Result<Vec<SizedFont>, GenerateError> {
        if size.is_nan() || size <= 0.0 {
            return Err(GenerateError::InvalidFontSize(size));
        }
        if ids.is_empty() {
            return Err(GenerateError::EmptyFontPool);
        }

        ids.iter()
            .map(|&id| self.font(id).map(|font| SizedFont::new(font, size)))
            .collect()
    }
}
