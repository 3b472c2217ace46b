use super::*;
use crate::data::supplier::fallback_profiles;
use crate::foundation::clock::ManualClock;
use crate::foundation::rng::{SequenceRandom, StdRandom};
use crate::render::text::BitmapText;
use crate::work::TaskQueue;

fn source() -> ProfileSource {
    ProfileSource::synthetic(Arc::new(ManualClock::new(0)), TaskQueue::inline())
}

fn config() -> Config {
    Config {
        cell_size: 10,
        ..Config::default()
    }
}

#[test]
fn count_is_clamped() {
    assert_eq!(column_count(0, 18, 1.0, 180), 8);
    assert_eq!(column_count(180, 18, 1.0, 180), 10);
    assert_eq!(column_count(180, 18, 0.5, 180), 8);
    assert_eq!(column_count(100_000, 18, 2.0, 180), 180);
    assert_eq!(column_count(100_000, 18, 2.0, 3), 8);
    assert_eq!(column_count(400, 0, 1.0, 180), 180);
}

#[test]
fn resize_rebuilds_only_on_count_change() {
    let mut rng = StdRandom::seeded(5);
    let mut src = source();
    let cfg = config();
    let mut m = StreamColumnManager::new();
    m.resize(200, 100, &cfg, &mut src, &mut rng);
    assert_eq!(m.len(), 20);
    assert_eq!(m.rows(), 10.0);
    let before: Vec<_> = m.columns().iter().map(|c| c.speed).collect();

    m.resize(205, 100, &cfg, &mut src, &mut rng);
    let after: Vec<_> = m.columns().iter().map(|c| c.speed).collect();
    assert_eq!(before, after);
    assert!((m.columns()[1].x - 10.25).abs() < 1e-4);

    m.resize(400, 100, &cfg, &mut src, &mut rng);
    assert_eq!(m.len(), 40);
}

#[test]
fn head_advances_by_speed_and_scale() {
    let mut rng = SequenceRandom::constant(0.5);
    let mut src = source();
    let mut cfg = config();
    cfg.set_speed(2.0);
    let mut m = StreamColumnManager::new();
    m.resize(80, 1000, &cfg, &mut src, &mut rng);
    let h0 = m.columns()[0].head;
    let speed = m.columns()[0].speed;
    m.advance(0.05, &cfg, &mut src, &mut rng);
    assert!((m.columns()[0].head - (h0 + speed * 2.0 * 0.05)).abs() < 1e-4);
}

#[test]
fn key_hit_arms_highlight_which_decays() {
    let mut rng = SequenceRandom::constant(0.5);
    let mut src = ProfileSource::fixed(fallback_profiles(), Arc::new(ManualClock::new(0)));
    let cfg = config();
    let mut m = StreamColumnManager::new();
    m.resize(80, 1000, &cfg, &mut src, &mut rng);

    let col = &mut m.columns[0];
    let key = *col.stream().keys().iter().next().unwrap();
    col.offset = key;
    col.head = 0.0;
    col.speed = 0.0;
    m.advance(0.01, &cfg, &mut src, &mut rng);
    assert_eq!(m.columns()[0].highlight, HIGHLIGHT_SECS);

    let col = &mut m.columns[0];
    col.offset = 0;
    m.advance(0.2, &cfg, &mut src, &mut rng);
    assert!((m.columns()[0].highlight - (HIGHLIGHT_SECS - 0.2)).abs() < 1e-4);
}

#[test]
fn column_recycles_past_the_bottom() {
    let mut rng = StdRandom::seeded(11);
    let mut src = source();
    src.seed(16, &mut rng);
    let cfg = config();
    let mut m = StreamColumnManager::new();
    m.resize(80, 100, &cfg, &mut src, &mut rng);

    let col = &mut m.columns[0];
    col.head = 10.0 + col.trail as f32 + RECYCLE_MARGIN + 0.5;
    let old = col.profile().id.clone();
    m.advance(0.0, &cfg, &mut src, &mut rng);
    let col = &m.columns()[0];
    assert!(col.head <= 0.0);
    assert_ne!(col.profile().id, old);
    assert_eq!(m.len(), 8);
}

#[test]
fn style_change_reencodes_without_moving() {
    let mut rng = StdRandom::seeded(2);
    let mut src = source();
    let mut cfg = config();
    let mut m = StreamColumnManager::new();
    m.resize(80, 100, &cfg, &mut src, &mut rng);
    let heads: Vec<_> = m.columns().iter().map(|c| c.head).collect();

    cfg.set_encoding(EncodingStyle::Kv);
    m.advance(0.0, &cfg, &mut src, &mut rng);
    let col = &m.columns()[0];
    let text: String = col.stream().chars()[crate::encode::PAD..].iter().collect();
    assert!(text.starts_with("profile="));
    let after: Vec<_> = m.columns().iter().map(|c| c.head).collect();
    assert_eq!(heads, after);
}

#[test]
fn render_draws_visible_trails_only() {
    let mut rng = StdRandom::seeded(4);
    let mut src = source();
    let cfg = config();
    let charset = crate::render::atlas::main_charset();
    let atlas = GlyphAtlas::build(&charset, 10, &mut BitmapText).unwrap();
    let mut m = StreamColumnManager::new();
    m.resize(80, 100, &cfg, &mut src, &mut rng);

    let mut surface = Surface::new(80, 100);
    for col in &mut m.columns {
        col.head = -5.0;
    }
    m.render(&mut surface, &atlas, &cfg, 0.0);
    assert_eq!(surface.alpha_sum(), 0);

    for col in &mut m.columns {
        col.head = 5.0;
        col.drift = 0.0;
    }
    m.render(&mut surface, &atlas, &cfg, 0.0);
    assert!(surface.alpha_sum() > 0);
    let below: u64 = (65..100)
        .flat_map(|y| (0..80).map(move |x| (x, y)))
        .map(|(x, y)| u64::from(surface.pixel(x, y).unwrap()[3]))
        .sum();
    assert_eq!(below, 0);
}

#[test]
fn shimmer_swaps_one_filler_slot() {
    let mut rng = StdRandom::seeded(6);
    let mut src = source();
    let cfg = config();
    let mut m = StreamColumnManager::new();
    m.resize(80, 100, &cfg, &mut src, &mut rng);
    let col = &mut m.columns[0];
    col.filler = [40; FILLER_SLOTS];
    col.head = 2.0;

    // shimmer hit, slot 32, glyph at a quarter of the alphabet, no rebind
    let mut step = SequenceRandom::new([0.0, 0.5, 0.25, 0.9]);
    m.advance(0.0, &cfg, &mut src, &mut step);
    let filler = m.columns()[0].filler;
    let glyph = (0.25 * FILLER.len() as f64) as u8;
    assert_eq!(filler[32], glyph);
    assert!(filler.iter().enumerate().all(|(i, &g)| i == 32 || g == 40));
}

#[test]
fn rebind_swaps_profile_but_keeps_geometry() {
    let mut rng = StdRandom::seeded(7);
    let mut src = ProfileSource::fixed(fallback_profiles(), Arc::new(ManualClock::new(0)));
    let cfg = config();
    let mut m = StreamColumnManager::new();
    m.resize(80, 100, &cfg, &mut src, &mut rng);
    let col = &mut m.columns[0];
    col.head = 3.0;
    let (head, speed, trail) = (col.head, col.speed, col.trail);
    let old = col.profile().id.clone();

    // no shimmer, rebind hit
    let mut step = SequenceRandom::new([0.5, 0.0]);
    m.advance(0.0, &cfg, &mut src, &mut step);
    let col = &m.columns()[0];
    assert_ne!(col.profile().id, old);
    assert_eq!((col.head, col.speed, col.trail), (head, speed, trail));
    let text: String = col.stream().chars()[crate::encode::PAD..].iter().collect();
    assert!(text.starts_with(&crate::encode::encode(col.profile(), cfg.encoding)));
}

#[test]
fn glyphs_missing_from_atlas_fall_back_to_filler() {
    let mut rng = StdRandom::seeded(9);
    let mut src = source();
    let cfg = config();
    let mut m = StreamColumnManager::new();
    m.resize(80, 100, &cfg, &mut src, &mut rng);
    for col in &mut m.columns {
        col.head = -5.0;
    }
    let col = &mut m.columns[0];
    col.head = 0.0;
    col.trail = 1;
    col.drift = 0.0;
    col.offset = crate::encode::PAD;
    assert_eq!(col.stream().char_at(crate::encode::PAD), Some('{'));

    let fillers_only = GlyphAtlas::build(FILLER, 10, &mut BitmapText).unwrap();
    let draw = |m: &mut StreamColumnManager, slot: u8, atlas: &GlyphAtlas| {
        m.columns[0].filler = [slot; FILLER_SLOTS];
        let mut surface = Surface::new(80, 100);
        m.render(&mut surface, atlas, &cfg, 0.0);
        surface
    };
    let first = draw(&mut m, 0, &fillers_only);
    let second = draw(&mut m, 1, &fillers_only);
    assert!(first.alpha_sum() > 0);
    assert_ne!(first.data(), second.data());

    let unrelated = GlyphAtlas::build(&['€'], 10, &mut BitmapText).unwrap();
    assert_eq!(draw(&mut m, 0, &unrelated).alpha_sum(), 0);
}
