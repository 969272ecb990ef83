use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wordfield_core::config::load_from_path;
use wordfield_core::placement::{height_for_index, place_instances, VERTICAL_OFFSET};
use wordfield_core::sketch::{Stage, TermField};
use wordfield_core::{tokenize, FrameTime, Sketch, SketchAction};

const TEXT: &str = "Arthur pushed the button. The button did nothing. \
The steward frowned at Arthur, then at the button.";

#[test]
fn text_to_instances() {
    let tokens = tokenize(TEXT);
    let term = wordfield_core::SearchTerm::new("button", wordfield_core::Color::WHITE).with_count(5);
    let mut rng = StdRng::seed_from_u64(42);

    let instances = place_instances(&tokens, &term, &mut rng);
    assert_eq!(instances.len(), 3 * 5);

    for instance in &instances {
        assert_eq!(tokens[instance.token_index], "button");
        let height = height_for_index(instance.token_index, tokens.len());
        assert!((instance.position.y - (height - VERTICAL_OFFSET)).abs() < 1e-5);
    }
}

#[test]
fn config_file_drives_the_term_field() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r##"
seed = 9

[text]
source = "{TEXT}"

[[terms]]
term = "button"
color = "orange"
count = 4

[[terms]]
term = "arthur"
color = "#0f0"
count = 2
scale_mode = "inverse"
"##
    )
    .unwrap();

    let config = load_from_path(file.path()).unwrap();
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.terms.len(), 2);

    let mut field = TermField::new(&config, StdRng::seed_from_u64(9)).unwrap();
    let mut scene = field.build();
    field.apply(&mut scene, SketchAction::Advance);
    field.apply(&mut scene, SketchAction::Advance);
    assert_eq!(field.stage(), Stage::Visualized);

    // button: 3 matches x 4, arthur: 2 matches x 2
    assert_eq!(scene.visible_meshes().len(), 16);

    field.tick(&mut scene, FrameTime::at(4.0));
    field.apply(&mut scene, SketchAction::ToggleTerm(1));
    assert_eq!(scene.visible_meshes().len(), 12);
}

#[test]
fn seeded_sketches_are_reproducible() {
    let config = wordfield_core::WordfieldConfig {
        seed: Some(77),
        ..Default::default()
    };
    let positions = || {
        let mut sketch = wordfield_core::create("story-cubes", &config).unwrap();
        let scene = sketch.build();
        scene
            .visible_meshes()
            .iter()
            .map(|mesh| mesh.world)
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(), positions());
}
