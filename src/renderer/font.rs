//! Bitmap block font used to measure and rasterize the display string.
//!
//! Each glyph is 5 rows tall with variable width. All rows within a single
//! glyph are guaranteed to have the same length. A non-space character in a
//! row means "filled"; a space means "empty".

/// The height of every glyph (constant).
pub const GLYPH_HEIGHT: u16 = 5;

/// Return the 5-row bitmap for `ch`, or `None` if the character is not in
/// the font. Lower-case letters are folded to upper case.
pub fn glyph(ch: char) -> Option<[&'static str; 5]> {
    let g = match ch.to_ascii_uppercase() {
        'A' => [" ### ", "#   #", "#####", "#   #", "#   #"],
        'B' => ["#### ", "#   #", "#### ", "#   #", "#### "],
        'C' => [" ### ", "#   #", "#    ", "#   #", " ### "],
        'D' => ["#### ", "#   #", "#   #", "#   #", "#### "],
        'E' => ["#####", "#    ", "###  ", "#    ", "#####"],
        'F' => ["#####", "#    ", "###  ", "#    ", "#    "],
        'G' => [" ### ", "#    ", "#  ##", "#   #", " ### "],
        'H' => ["#   #", "#   #", "#####", "#   #", "#   #"],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'J' => ["  ###", "   # ", "   # ", "#  # ", " ##  "],
        'K' => ["#   #", "#  # ", "###  ", "#  # ", "#   #"],
        'L' => ["#    ", "#    ", "#    ", "#    ", "#####"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#### ", "#    ", "#    "],
        'Q' => [" ### ", "#   #", "# # #", "#  # ", " ## #"],
        'R' => ["#### ", "#   #", "#### ", "#  # ", "#   #"],
        'S' => [" ####", "#    ", " ### ", "    #", "#### "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  "],
        'U' => ["#   #", "#   #", "#   #", "#   #", " ### "],
        'V' => ["#   #", "#   #", "#   #", " # # ", "  #  "],
        'W' => ["#   #", "#   #", "# # #", "## ##", "#   #"],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        'Y' => ["#   #", " # # ", "  #  ", "  #  ", "  #  "],
        'Z' => ["#####", "   # ", "  #  ", " #   ", "#####"],

        '0' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => [" ### ", "#   #", "  ## ", " #   ", "#####"],
        '3' => [" ### ", "#   #", "  ## ", "#   #", " ### "],
        '4' => ["#  # ", "#  # ", "#####", "   # ", "   # "],
        '5' => ["#####", "#    ", "#### ", "    #", "#### "],
        '6' => [" ### ", "#    ", "#### ", "#   #", " ### "],
        '7' => ["#####", "   # ", "  #  ", " #   ", " #   "],
        '8' => [" ### ", "#   #", " ### ", "#   #", " ### "],
        '9' => [" ### ", "#   #", " ####", "   # ", " ### "],

        ' ' => ["   ", "   ", "   ", "   ", "   "],
        '!' => ["#", "#", "#", " ", "#"],
        '.' => [" ", " ", " ", " ", "#"],
        ',' => ["  ", "  ", "  ", " #", "# "],
        '\'' => ["#", "#", " ", " ", " "],
        '-' => ["     ", "     ", "#####", "     ", "     "],
        '_' => ["     ", "     ", "     ", "     ", "#####"],
        '+' => ["     ", "  #  ", "#####", "  #  ", "     "],
        '/' => ["    #", "   # ", "  #  ", " #   ", "#    "],
        '&' => [" ##  ", "#  # ", " ## #", "#  # ", " ## #"],
        '?' => [" ### ", "#   #", "  ## ", "     ", "  #  "],
        ':' => [" ", "#", " ", "#", " "],

        _ => return None,
    };
    debug_assert!(
        g.iter().all(|row| row.len() == g[0].len()),
        "glyph '{ch}' has inconsistent row widths",
    );
    Some(g)
}

/// Like `glyph`, but characters missing from the font draw as `?`.
fn glyph_or_placeholder(ch: char) -> [&'static str; 5] {
    glyph(ch)
        .or_else(|| glyph('?'))
        .unwrap_or(["", "", "", "", ""])
}

/// Lay `text` out as a filled/empty dot matrix, `GLYPH_HEIGHT` rows tall,
/// with a 1-column gap between characters.
pub fn bitmap(text: &str) -> Vec<Vec<bool>> {
    let mut rows = vec![Vec::new(); GLYPH_HEIGHT as usize];
    for (i, ch) in text.chars().enumerate() {
        let g = glyph_or_placeholder(ch);
        for (row, line) in rows.iter_mut().zip(g.iter()) {
            if i > 0 {
                row.push(false); // inter-character spacing
            }
            row.extend(line.chars().map(|c| c != ' '));
        }
    }
    rows
}

/// Compute the rendered width of `text` in glyph columns, including 1-column
/// spacing between characters.
pub fn text_width(text: &str) -> usize {
    let mut width = 0;
    for (i, ch) in text.chars().enumerate() {
        if i > 0 {
            width += 1;
        }
        width += glyph_or_placeholder(ch)[0].len();
    }
    width
}
