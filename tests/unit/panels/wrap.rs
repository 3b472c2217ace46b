use super::*;
use crate::render::text::BitmapText;

fn texts(s: &str) -> Vec<(&str, bool)> {
    words(s).into_iter().map(|w| (w.text, w.spaced)).collect()
}

#[test]
fn separators_stay_with_preceding_word() {
    assert_eq!(
        texts("a=1|b=2, c"),
        vec![("a=1|", false), ("b=2,", false), ("c", true)]
    );
    assert_eq!(texts("  lead  trail  "), vec![("lead", false), ("trail", true)]);
    assert!(texts("").is_empty());
}

#[test]
fn greedy_lines_respect_width() {
    // BitmapText advances 6 px per char at size 10.
    let mut r = BitmapText;
    let lines = wrap_text("profile=Nurse_F45|nta=QN31|mood=calm", 60.0, 10.0, &mut r);
    assert_eq!(lines, vec!["profile=Nurse_F45|", "nta=QN31|", "mood=calm"]);

    let lines = wrap_text("aa bb cc dd", 30.0, 10.0, &mut r);
    assert_eq!(lines, vec!["aa bb", "cc dd"]);
    for l in &lines {
        assert!(r.measure(l, 10.0) <= 30.0);
    }
}

#[test]
fn rejoined_separator_words_have_no_space() {
    let mut r = BitmapText;
    assert_eq!(wrap_text("a|b|c", 600.0, 10.0, &mut r), vec!["a|b|c"]);
    assert_eq!(wrap_text("x, y", 600.0, 10.0, &mut r), vec!["x, y"]);
    assert!(wrap_text("   ", 600.0, 10.0, &mut r).is_empty());
}
