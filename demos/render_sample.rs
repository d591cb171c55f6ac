use glyphmask::{
    FontStorage, GeneratorConfig, TextGenerator,
    fontdb::{self, Family, Query},
    renderer::piece_bounding_boxes,
};
use rand::SeedableRng;

fn pick_fonts(font_storage: &mut FontStorage) -> Vec<fontdb::ID> {
    font_storage.load_system_fonts();
    assert!(
        !font_storage.is_empty(),
        "system fonts are required for the sample"
    );

    let mut ids = Vec::new();
    for family in [Family::SansSerif, Family::Serif, Family::Monospace] {
        let families = [family];
        let query = Query {
            families: &families,
            ..Default::default()
        };
        if let Some(id) = font_storage.query(&query)
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        ids.extend(font_storage.faces().take(3).map(|face| face.id));
    }
    ids
}

#[allow(clippy::unwrap_used)]
fn main() {
    env_logger::init();

    let mut font_storage = FontStorage::new();
    let ids = pick_fonts(&mut font_storage);

    let config = GeneratorConfig {
        font_size: 40.0,
        character_spacing: 2,
        stroke_width: 1,
        multi_line: true,
        line_max: 12,
        ..Default::default()
    };
    let generator = TextGenerator::new(config);
    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);

    let sample = generator
        .generate_from_storage(
            "Synthetic text for OCR training",
            &mut font_storage,
            &ids,
            &mut rng,
        )
        .expect("failed to generate sample");

    println!(
        "Generated {}x{} sample on {} line(s)",
        sample.image.width(),
        sample.image.height(),
        sample.line_count
    );
    if let Some(transcript) = &sample.transcript {
        println!("Transcript: {transcript}");
    }

    for (index, rect) in piece_bounding_boxes(&sample.mask) {
        let piece = &sample.pieces[index as usize - 1];
        println!("  {:?} at {:?}", piece.text, rect);
    }

    std::fs::create_dir_all("debug").expect("failed to create debug directory");
    sample.image.save("debug/sample_image.png").unwrap();
    sample.mask.save("debug/sample_mask.png").unwrap();
    println!("Saved debug/sample_image.png and debug/sample_mask.png");
}
