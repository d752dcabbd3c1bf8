use inkvault_map::{
    MapConfig, MapError, Terrain, Thresholds, classify, compute_seed, extract_pois, generate,
    generate_elevation, map_text, place_pois, render,
};

const SAMPLE_BODY: &str = "The old mill stood by the river, the river calm.";

// ── Seed ─────────────────────────────────────────────────────────

#[test]
fn seed_is_deterministic() {
    assert_eq!(compute_seed(SAMPLE_BODY), compute_seed(SAMPLE_BODY));
}

#[test]
fn different_text_different_seed() {
    assert_ne!(compute_seed("one journal entry"), compute_seed("another entry"));
}

#[test]
fn seed_is_sensitive_to_single_characters() {
    assert_ne!(compute_seed("river"), compute_seed("River"));
}

// ── Elevation ────────────────────────────────────────────────────

#[test]
fn elevation_is_deterministic() {
    let seed = compute_seed(SAMPLE_BODY);
    let a = generate_elevation(seed, 16, 16);
    let b = generate_elevation(seed, 16, 16);
    assert_eq!(a, b);
}

#[test]
fn elevation_values_in_unit_range() {
    let grid = generate_elevation(12345, 32, 12);
    assert_eq!(grid.len(), 32 * 12);
    assert!(grid.iter().all(|&e| (0.0..1.0).contains(&e)));
}

#[test]
fn elevation_varies_across_the_grid() {
    let grid = generate_elevation(12345, 32, 32);
    let min = grid.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = grid.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(max - min > 0.1);
}

#[test]
fn elevation_has_spatial_locality() {
    // Coherent noise: horizontally adjacent cells stay close on average.
    let width = 32;
    let grid = generate_elevation(98765, width, 32);
    let mut total = 0.0;
    let mut count = 0;
    for row in grid.chunks(width) {
        for pair in row.windows(2) {
            total += (pair[0] - pair[1]).abs();
            count += 1;
        }
    }
    assert!(total / f64::from(count) < 0.25);
}

// ── Classification ───────────────────────────────────────────────

#[test]
fn classify_maps_bands_in_order() {
    let t = Thresholds::default();
    assert_eq!(classify(0.0, &t), Terrain::Water);
    assert_eq!(classify(t.water, &t), Terrain::Grass);
    assert_eq!(classify(t.grass, &t), Terrain::Forest);
    assert_eq!(classify(t.forest, &t), Terrain::Mountain);
    assert_eq!(classify(0.99, &t), Terrain::Mountain);
}

#[test]
fn terrain_symbols() {
    assert_eq!(Terrain::Water.symbol(), '~');
    assert_eq!(Terrain::Grass.symbol(), '.');
    assert_eq!(Terrain::Forest.symbol(), '#');
    assert_eq!(Terrain::Mountain.symbol(), '^');
}

#[test]
fn unordered_thresholds_rejected() {
    let t = Thresholds {
        water: 0.6,
        grass: 0.5,
        forest: 0.8,
    };
    assert!(matches!(t.validate(), Err(MapError::InvalidThresholds(_))));
}

// ── POI extraction ───────────────────────────────────────────────

#[test]
fn poi_frequency_ranking_matches_worked_example() {
    // "river" appears twice; "mill" wins the 1-count tie by first
    // occurrence among words long enough to qualify.
    let pois = extract_pois(SAMPLE_BODY, 2);
    assert_eq!(pois, vec!["river".to_string(), "mill".to_string()]);
}

#[test]
fn poi_ties_break_by_first_occurrence() {
    let pois = extract_pois("wolf crow wolf crow raven", 3);
    assert_eq!(
        pois,
        vec!["wolf".to_string(), "crow".to_string(), "raven".to_string()]
    );
}

#[test]
fn poi_extraction_filters_short_and_stop_words() {
    let pois = extract_pois("the fog was with them all day", 5);
    assert!(!pois.contains(&"the".to_string()));
    assert!(!pois.contains(&"with".to_string()));
    assert!(!pois.contains(&"fog".to_string()));
}

#[test]
fn poi_extraction_is_case_insensitive() {
    let pois = extract_pois("River RIVER river", 1);
    assert_eq!(pois, vec!["river".to_string()]);
}

#[test]
fn poi_truncates_to_top_k() {
    let pois = extract_pois("wolf crow raven heron eagle", 2);
    assert_eq!(pois.len(), 2);
}

// ── POI placement ────────────────────────────────────────────────

#[test]
fn placement_is_deterministic() {
    let words = vec!["river".to_string(), "mill".to_string()];
    let a = place_pois(42, 16, 8, &words);
    let b = place_pois(42, 16, 8, &words);
    assert_eq!(a, b);
}

#[test]
fn placement_stays_in_the_interior() {
    let words: Vec<String> = ["wolf", "crow", "raven", "heron", "eagle"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let pois = place_pois(7, 10, 6, &words);
    assert_eq!(pois.len(), words.len());
    for poi in &pois {
        assert!((1..=8).contains(&poi.x), "x out of interior: {}", poi.x);
        assert!((1..=4).contains(&poi.y), "y out of interior: {}", poi.y);
    }
}

#[test]
fn placement_cells_are_unique() {
    let words: Vec<String> = ["wolf", "crow", "raven", "heron", "eagle", "stone"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let pois = place_pois(99, 5, 5, &words);
    let mut cells: Vec<(usize, usize)> = pois.iter().map(|p| (p.x, p.y)).collect();
    cells.sort_unstable();
    cells.dedup();
    assert_eq!(cells.len(), pois.len());
}

#[test]
fn placement_stops_when_the_interior_is_full() {
    // A 3x3 grid has a single interior cell.
    let words = vec!["wolf".to_string(), "crow".to_string()];
    let pois = place_pois(1, 3, 3, &words);
    assert_eq!(pois.len(), 1);
    assert_eq!((pois[0].x, pois[0].y), (1, 1));
}

// ── Full pipeline ────────────────────────────────────────────────

#[test]
fn generate_matches_worked_example() {
    let config = MapConfig {
        width: 7,
        height: 4,
        thresholds: Thresholds::default(),
        top_k: 2,
    };
    let grid = generate(SAMPLE_BODY, &config).unwrap();
    let words: Vec<&str> = grid.pois.iter().map(|p| p.word.as_str()).collect();
    assert_eq!(words, vec!["river", "mill"]);
}

#[test]
fn rendering_is_byte_identical_for_identical_body() {
    let config = MapConfig::default();
    let a = map_text(SAMPLE_BODY, &config).unwrap();
    let b = map_text(SAMPLE_BODY, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn rendering_overlays_poi_markers() {
    let config = MapConfig::default();
    let grid = generate(SAMPLE_BODY, &config).unwrap();
    let rendered = render(&grid);

    let marker_count = rendered
        .lines()
        .take(config.height)
        .flat_map(str::chars)
        .filter(|&c| c == '*')
        .count();
    assert_eq!(marker_count, grid.pois.len());
    assert!(rendered.contains("POIs: river"));
}

#[test]
fn rendered_rows_match_grid_dimensions() {
    let config = MapConfig::default();
    let rendered = map_text(SAMPLE_BODY, &config).unwrap();
    let rows: Vec<&str> = rendered.lines().take(config.height).collect();
    assert_eq!(rows.len(), config.height);
    for row in rows {
        assert_eq!(row.chars().count(), config.width);
    }
}

#[test]
fn rendering_uses_only_known_symbols() {
    let config = MapConfig::default();
    let rendered = map_text("Snow on the high passes, wind in the pines.", &config).unwrap();
    for row in rendered.lines().take(config.height) {
        assert!(row.chars().all(|c| matches!(c, '~' | '.' | '#' | '^' | '*')));
    }
}

#[test]
fn grid_too_small_rejected() {
    let config = MapConfig {
        width: 2,
        height: 2,
        thresholds: Thresholds::default(),
        top_k: 1,
    };
    assert!(matches!(
        generate("text", &config),
        Err(MapError::GridTooSmall { .. })
    ));
}

#[test]
fn different_bodies_render_differently() {
    let config = MapConfig::default();
    let a = map_text("The storm broke at dawn over the ridge.", &config).unwrap();
    let b = map_text("Quiet tide pools at the grey harbour.", &config).unwrap();
    assert_ne!(a, b);
}
