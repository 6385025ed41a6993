use crate::terrain::Cell;

/// Heading in degrees for a move from `from` to `to`.
///
/// Measured clockwise from the +y axis (`atan2(dx, dy)`), normalized to
/// `[0, 360)`. Returns `None` for a zero displacement so the caller keeps its
/// previous heading.
pub fn heading_between(from: Cell, to: Cell) -> Option<f32> {
    let (dx, dy) = from.delta_to(&to);
    if dx == 0 && dy == 0 {
        return None;
    }

    let degrees = (dx as f32).atan2(dy as f32).to_degrees();
    Some(degrees.rem_euclid(360.0))
}

/// Arrow glyph for a heading, used by the terminal view
pub fn heading_arrow(heading: f32) -> char {
    // +y points down the screen
    match ((heading.rem_euclid(360.0) + 45.0) / 90.0) as u32 % 4 {
        0 => '↓',
        1 => '→',
        2 => '↑',
        _ => '←',
    }
}
