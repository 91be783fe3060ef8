use std::fmt::Write;

use tb_core::frame::AsciiGrid;

/// Texte brut : glyphes seuls, lignes séparées par `\n`.
///
/// # Example
/// ```
/// use tb_export::text::to_plain_text;
/// use tb_core::frame::{AsciiCell, AsciiGrid};
/// let mut grid = AsciiGrid::new(2, 2);
/// grid.set(0, 0, AsciiCell { ch: '@', ..AsciiCell::default() });
/// assert_eq!(to_plain_text(&grid), "@ \n  ");
/// ```
#[must_use]
pub fn to_plain_text(grid: &AsciiGrid) -> String {
    let mut out = String::with_capacity(grid.cells.len() + grid.rows as usize);
    for (i, row) in grid.rows_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.extend(row.iter().map(|c| c.ch));
    }
    out
}

/// HTML coloré : un `<span>` par cellule, lignes jointes par `<br>`.
///
/// # Example
/// ```
/// use tb_export::text::to_html;
/// use tb_core::frame::{AsciiCell, AsciiGrid};
/// use tb_core::color::Rgb;
/// let mut grid = AsciiGrid::new(1, 1);
/// grid.set(0, 0, AsciiCell { ch: '<', color: Rgb::new(1, 2, 3) });
/// assert_eq!(to_html(&grid), r#"<span style="color:rgb(1,2,3)">&lt;</span>"#);
/// ```
#[must_use]
pub fn to_html(grid: &AsciiGrid) -> String {
    let mut out = String::with_capacity(grid.cells.len() * 40);
    for (i, row) in grid.rows_iter().enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        for cell in row {
            let c = cell.color;
            // writing into a String cannot fail
            let _ = write!(out, r#"<span style="color:rgb({},{},{})">"#, c.r, c.g, c.b);
            push_escaped(&mut out, cell.ch);
            out.push_str("</span>");
        }
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        ' ' => out.push_str("&nbsp;"),
        _ => out.push(ch),
    }
}
