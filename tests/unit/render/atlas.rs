use super::*;
use crate::encode::FILLER;
use crate::render::text::BitmapText;

fn cell_alpha(atlas: &GlyphAtlas, index: usize) -> u64 {
    atlas.bitmap().crop(atlas.cell_rect(index)).alpha_sum()
}

#[test]
fn charset_covers_encoder_output_and_filler() {
    let set = main_charset();
    assert_eq!(set.len(), 56 + 10 + 52 + PUNCTUATION.chars().count());
    for c in FILLER {
        assert!(set.contains(c), "{c}");
    }
    for c in "{\"profile\":\"x, 1\"} := _ | $1,000;".chars().filter(|c| *c != ' ') {
        assert!(set.contains(&c), "{c}");
    }
}

#[test]
fn grid_geometry() {
    let charset = main_charset();
    let atlas = GlyphAtlas::build(&charset, 12, &mut BitmapText).unwrap();
    let rows = (charset.len() as u32).div_ceil(ATLAS_COLUMNS);
    assert_eq!(atlas.columns(), 16);
    assert_eq!(atlas.bitmap().width(), 16 * 12);
    assert_eq!(atlas.bitmap().height(), rows * 12);
    assert_eq!(atlas.cell_origin(0), (0, 0));
    assert_eq!(atlas.cell_origin(17), (12, 12));
    assert_eq!(atlas.glyph_index('ｦ'), Some(0));
    assert_eq!(atlas.glyph_index('a'), charset.iter().position(|c| *c == 'a'));
    assert_eq!(atlas.glyph_index(' '), None);
    assert_eq!(atlas.len(), charset.len());
}

#[test]
fn every_cell_is_drawn_and_build_is_deterministic() {
    let charset = ['A', 'ｱ', '{', '7'];
    let a = GlyphAtlas::build(&charset, 16, &mut BitmapText).unwrap();
    let b = GlyphAtlas::build(&charset, 16, &mut BitmapText).unwrap();
    assert_eq!(a.bitmap(), b.bitmap());
    for i in 0..charset.len() {
        assert!(cell_alpha(&a, i) > 0, "cell {i}");
    }
}

#[test]
fn undrawable_glyphs_leave_blank_cells() {
    struct Refuses;
    impl TextRaster for Refuses {
        fn measure(&mut self, _: &str, _: f32) -> f32 {
            0.0
        }
        fn rasterize(&mut self, text: &str, size: f32, color: Rgb8) -> CodefallResult<Surface> {
            if text == "x" {
                return Err(CodefallError::render("no glyph"));
            }
            BitmapText.rasterize(text, size, color)
        }
    }
    let atlas = GlyphAtlas::build(&['a', 'x', 'b'], 10, &mut Refuses).unwrap();
    assert!(cell_alpha(&atlas, 0) > 0);
    assert_eq!(cell_alpha(&atlas, 1), 0);
    assert!(cell_alpha(&atlas, 2) > 0);
    assert!(GlyphAtlas::build(&['a'], 0, &mut BitmapText).is_err());
}
