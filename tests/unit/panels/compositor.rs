use std::sync::Arc;

use super::*;
use crate::config::EncodingStyle;
use crate::foundation::clock::ManualClock;
use crate::foundation::rng::{SequenceRandom, StdRandom};

fn source() -> ProfileSource {
    ProfileSource::synthetic(Arc::new(ManualClock::new(0)), TaskQueue::inline())
}

fn compositor() -> PanelCompositor {
    let mut c = PanelCompositor::new(FontSpec::Bitmap, TaskQueue::inline());
    c.set_bounds(800, 600);
    c
}

#[test]
fn pool_converges_from_below_and_above() {
    let mut rng = StdRandom::seeded(8);
    let mut src = source();
    let mut cfg = Config::default();
    let mut c = compositor();

    cfg.set_density(1.0);
    c.reconcile(cfg.panel_target(), &cfg, &mut src, &mut rng);
    assert_eq!(c.pending(), 40);
    assert_eq!(c.len(), 0, "results wait for drain");
    c.reconcile(cfg.panel_target(), &cfg, &mut src, &mut rng);
    assert_eq!(c.pending(), 40, "pending work counts toward the target");
    assert_eq!(c.drain(&cfg, &mut rng), 40);
    assert_eq!(c.len(), 40);

    cfg.set_density(0.2);
    c.reconcile(cfg.panel_target(), &cfg, &mut src, &mut rng);
    assert_eq!(c.len(), 10);
}

#[test]
fn strips_start_above_the_top() {
    let mut rng = StdRandom::seeded(3);
    let mut src = source();
    let cfg = Config::default();
    let mut c = compositor();
    c.reconcile(12, &cfg, &mut src, &mut rng);
    c.drain(&cfg, &mut rng);
    for s in c.strips() {
        assert!(s.y + s.height() as f32 <= 0.0);
        assert!(s.x >= 0.0 && s.x + s.width() as f32 <= 800.0);
        assert!((cfg.panel_speed.min..=cfg.panel_speed.max).contains(&s.speed));
    }
}

#[test]
fn advance_falls_jitters_and_wraps() {
    let mut rng = SequenceRandom::constant(1.0);
    let mut src = source();
    let cfg = Config::default();
    let mut c = compositor();
    c.reconcile(10, &cfg, &mut src, &mut rng);
    c.drain(&cfg, &mut rng);

    let s = &mut c.strips[0];
    s.y = 0.0;
    s.speed = 50.0;
    s.jitter_in = 0.1;
    s.home_x = 100.0;
    c.advance(0.2, &cfg, &mut rng);
    let s = &c.strips()[0];
    assert!((s.y - 10.0).abs() < 1e-4);
    assert_eq!(s.x, 103.0);
    assert!(s.jitter_in >= JITTER_SECS.0 && s.jitter_in <= JITTER_SECS.1);

    let s = &mut c.strips[0];
    s.y = 599.0;
    c.advance(0.1, &cfg, &mut rng);
    let s = &c.strips()[0];
    assert_eq!(s.y, -(s.height() as f32));
}

#[test]
fn render_tints_with_theme() {
    let mut rng = SequenceRandom::constant(0.5);
    let mut src = source();
    let cfg = Config::default();
    let mut c = compositor();
    c.reconcile(10, &cfg, &mut src, &mut rng);
    c.drain(&cfg, &mut rng);
    for s in &mut c.strips {
        s.x = 0.0;
        s.y = 0.0;
    }
    let mut surface = Surface::new(800, 600);
    c.render(&mut surface, &cfg, &mut rng);
    let px = surface.pixel(0, 0).unwrap();
    assert!(px[3] > 0);
    assert_eq!(px[0], 0, "green theme has no red");
}

#[test]
fn encoding_change_recomposes_every_strip() {
    let mut rng = StdRandom::seeded(12);
    let mut src = source();
    let mut cfg = Config::default();
    let mut c = compositor();
    c.reconcile(10, &cfg, &mut src, &mut rng);
    c.drain(&cfg, &mut rng);
    let before: Vec<Vec<u8>> = c.strips().iter().map(|s| s.bitmap.data().to_vec()).collect();

    cfg.set_encoding(EncodingStyle::Code);
    c.reconcile(10, &cfg, &mut src, &mut rng);
    assert!(c.is_empty());
    assert_eq!(c.pending(), 10);
    assert_eq!(c.drain(&cfg, &mut rng), 10);
    for s in c.strips() {
        assert!(!before.contains(&s.bitmap.data().to_vec()));
    }
}

#[test]
fn compositions_in_a_stale_style_are_dropped() {
    let mut rng = StdRandom::seeded(13);
    let mut src = source();
    let mut cfg = Config::default();
    let mut c = compositor();
    c.reconcile(10, &cfg, &mut src, &mut rng);

    cfg.set_encoding(EncodingStyle::Kv);
    assert_eq!(c.drain(&cfg, &mut rng), 0);
    assert!(c.is_empty());
    assert_eq!(c.pending(), 0);
    c.reconcile(10, &cfg, &mut src, &mut rng);
    assert_eq!(c.drain(&cfg, &mut rng), 10);
}
