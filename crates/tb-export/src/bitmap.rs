//! Glyphes 5×5 intégrés, utilisés quand aucune police n'est fournie.
//!
//! Rows top to bottom; in each row bit 4 is the leftmost column.

/// Side of a built-in glyph, in cells.
pub const BITMAP_SIZE: u32 = 5;

const FULL: u8 = 0b11111;

/// `(row, col)` cells, nearest to the centre first.
const FILL_ORDER: [(usize, u8); 25] = [
    (2, 2), (1, 2), (3, 2), (2, 1), (2, 3), (1, 1), (1, 3), (3, 1), (3, 3),
    (0, 2), (4, 2), (2, 0), (2, 4), (0, 1), (0, 3), (4, 1), (4, 3), (1, 0),
    (1, 4), (3, 0), (3, 4), (0, 0), (0, 4), (4, 0), (4, 4),
];

/// Bitmap for `ch`, or `None` if it is not in the built-in table.
#[must_use]
pub fn lookup(ch: char) -> Option<[u8; 5]> {
    let rows = match ch {
        ' ' => [0, 0, 0, 0, 0],
        '.' => [0, 0, 0, 0, 0b00100],
        ',' => [0, 0, 0, 0b00100, 0b01000],
        ':' => [0, 0b00100, 0, 0b00100, 0],
        ';' => [0, 0b00100, 0, 0b00100, 0b01000],
        '\'' => [0b00100, 0b00100, 0, 0, 0],
        '"' => [0b01010, 0b01010, 0, 0, 0],
        '`' => [0b01000, 0b00100, 0, 0, 0],
        '^' => [0b00100, 0b01010, 0, 0, 0],
        '-' => [0, 0, FULL, 0, 0],
        '_' => [0, 0, 0, 0, FULL],
        '~' => [0, 0b01000, 0b10101, 0b00010, 0],
        '+' => [0b00100, 0b00100, FULL, 0b00100, 0b00100],
        '<' => [0b00010, 0b00100, 0b01000, 0b00100, 0b00010],
        '>' => [0b01000, 0b00100, 0b00010, 0b00100, 0b01000],
        '!' => [0b00100, 0b00100, 0b00100, 0, 0b00100],
        'i' => [0b00100, 0, 0b00100, 0b00100, 0b00100],
        'l' => [0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b01110],
        '|' => [0b00100; 5],
        '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000],
        '\\' => [0b10000, 0b01000, 0b00100, 0b00010, 0b00001],
        '(' => [0b00010, 0b00100, 0b00100, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00100, 0b00100, 0b01000],
        '[' => [0b00110, 0b00100, 0b00100, 0b00100, 0b00110],
        ']' => [0b01100, 0b00100, 0b00100, 0b00100, 0b01100],
        '{' => [0b00110, 0b00100, 0b01000, 0b00100, 0b00110],
        '}' => [0b01100, 0b00100, 0b00010, 0b00100, 0b01100],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b01110],
        '?' => [0b01110, 0b10001, 0b00110, 0, 0b00100],
        '*' => [0b10101, 0b01110, FULL, 0b01110, 0b10101],
        '#' => [0b01010, FULL, 0b01010, FULL, 0b01010],
        '%' => [0b11001, 0b11010, 0b00100, 0b01011, 0b10011],
        '@' => [0b01110, 0b10001, 0b10111, 0b10000, 0b01110],
        '$' => [0b01111, 0b10100, 0b01110, 0b00101, 0b11110],
        '&' => [0b01100, 0b10010, 0b01101, 0b10010, 0b01101],
        '8' => [0b01110, 0b10001, 0b01110, 0b10001, 0b01110],
        '0' => [0b01110, 0b10011, 0b10101, 0b11001, 0b01110],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'Q' => [0b01110, 0b10001, 0b10101, 0b10010, 0b01101],
        'S' => [0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b11110],
        'A' => [0b01110, 0b10001, FULL, 0b10001, 0b10001],
        'M' => [0b10001, 0b11011, 0b10101, 0b10001, 0b10001],
        'W' => [0b10001, 0b10001, 0b10101, 0b11011, 0b10001],
        'o' => [0, 0b01110, 0b10001, 0b10001, 0b01110],
        'c' => [0, 0b01111, 0b10000, 0b10000, 0b01111],
        'x' => [0, 0b10010, 0b01100, 0b01100, 0b10010],
        '█' => [FULL; 5],
        '░' => [0b10100, 0b01010, 0b10100, 0b01010, 0b10100],
        '▒' => [0b10101, 0b01010, 0b10101, 0b01010, 0b10101],
        '▓' => [0b11011, 0b10101, 0b11011, 0b10101, 0b11011],
        _ => return None,
    };
    Some(rows)
}

/// Bitmap for any glyph: the table entry, or a centre-out fill whose
/// density follows the glyph's class.
///
/// # Example
/// ```
/// use tb_export::bitmap::glyph_rows;
/// assert_eq!(glyph_rows('█'), [0b11111; 5]);
/// let k = glyph_rows('k');
/// assert_eq!(k.iter().map(|r| r.count_ones()).sum::<u32>(), 12);
/// ```
#[must_use]
pub fn glyph_rows(ch: char) -> [u8; 5] {
    lookup(ch).unwrap_or_else(|| estimate_density(ch))
}

fn estimate_density(ch: char) -> [u8; 5] {
    let density = match ch {
        'a'..='z' => 12,
        'A'..='Z' => 14,
        '0'..='9' => 13,
        c if c.is_whitespace() => 0,
        _ => 8,
    };
    let mut rows = [0u8; 5];
    for &(row, col) in FILL_ORDER.iter().take(density) {
        rows[row] |= 1 << (4 - col);
    }
    rows
}

/// Coverage mask (0 or 255 per cell), row-major, 5×5.
#[must_use]
pub fn coverage(ch: char) -> Vec<u8> {
    let rows = glyph_rows(ch);
    rows.iter()
        .flat_map(|&bits| (0..5).map(move |col| if bits & (1 << (4 - col)) != 0 { 255 } else { 0 }))
        .collect()
}

#[cfg(test)]
mod tests {
    use tb_core::charset::{RAMP_CLASSIC, RAMP_DETAILED};

    use super::*;

    #[test]
    fn every_ramp_glyph_has_a_bitmap() {
        for ch in RAMP_CLASSIC.chars().chain(RAMP_DETAILED.chars()) {
            let rows = glyph_rows(ch);
            if ch != ' ' {
                assert!(rows.iter().any(|&r| r != 0), "glyphe vide : {ch:?}");
            }
            assert!(rows.iter().all(|&r| r <= FULL));
        }
    }

    #[test]
    fn coverage_is_row_major_left_first() {
        let mask = coverage('/');
        assert_eq!(mask.len(), 25);
        // top row: rightmost column only
        assert_eq!(&mask[0..5], &[0, 0, 0, 0, 255]);
        // bottom row: leftmost column only
        assert_eq!(&mask[20..25], &[255, 0, 0, 0, 0]);
    }

    #[test]
    fn unknown_glyphs_fill_from_centre() {
        let rows = glyph_rows('Z');
        assert_eq!(rows.iter().map(|r| r.count_ones()).sum::<u32>(), 14);
        assert_ne!(rows[2] & 0b00100, 0);
        assert_eq!(glyph_rows('\u{3000}'), [0; 5]);
    }
}
