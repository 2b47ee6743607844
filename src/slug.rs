/// Turns heading text into an anchor id.
///
/// Lower-cases the text, drops everything that is not an ASCII letter or digit,
/// a kana, a CJK ideograph or whitespace, then joins whitespace runs with a
/// single hyphen. Repeated headings produce the same id; callers rely on that.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_gap = false;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            pending_gap = true;
        } else if is_slug_char(c) {
            if pending_gap {
                slug.push('-');
                pending_gap = false;
            }
            slug.push(c);
        }
    }
    // trailing whitespace still counts as a gap
    if pending_gap {
        slug.push('-');
    }
    slug
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || ('\u{3040}'..='\u{30FF}').contains(&c)
        || ('\u{4E00}'..='\u{9FAF}').contains(&c)
}
