use stem_extractor::sanitize_title;

#[test]
fn keeps_alphanumerics_spaces_hyphens_underscores() {
    assert_eq!(
        sanitize_title("Artist - Track_01 (Official Video)!"),
        "Artist - Track_01 Official Video"
    );
}

#[test]
fn trims_trailing_whitespace_left_by_dropped_characters() {
    assert_eq!(sanitize_title("Song Title???"), "Song Title");
    assert_eq!(sanitize_title("Song Title   "), "Song Title");
}

#[test]
fn sanitizing_twice_is_a_no_op() {
    let once = sanitize_title("Mixtape Vol. 3 [HQ] & final  ");
    assert_eq!(sanitize_title(&once), once);
}

#[test]
fn unicode_letters_survive() {
    assert_eq!(sanitize_title("Café del Mar ♚"), "Café del Mar");
}
