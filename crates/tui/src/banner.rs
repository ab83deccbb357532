use std::collections::HashMap;

use once_cell::sync::Lazy;

const GLYPH_HEIGHT: usize = 5;
const FILL_CHAR: char = '█';
const SHADOW_CHAR: char = '▒';
const SPACING: usize = 2;

type Glyph = [&'static str; GLYPH_HEIGHT];

// Only the letters used by the menu banner.
static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('M', ["#   #", "## ##", "# # #", "#   #", "#   #"]),
        ('E', ["#####", "#    ", "#### ", "#    ", "#####"]),
        ('O', [" ### ", "#   #", "#   #", "#   #", " ### "]),
        ('R', ["#### ", "#   #", "#### ", "#  # ", "#   #"]),
        ('Y', ["#   #", " # # ", "  #  ", "  #  ", "  #  "]),
        (' ', ["     ", "     ", "     ", "     ", "     "]),
    ])
});

/// Render `text` as chunky block letters with a one-cell drop shadow.
///
/// Characters without a glyph are skipped.
pub fn render(text: &str) -> Vec<String> {
    let glyphs: Vec<&Glyph> = text
        .chars()
        .filter_map(|ch| GLYPHS.get(&ch.to_ascii_uppercase()))
        .collect();
    if glyphs.is_empty() {
        return Vec::new();
    }

    let cell_width = glyphs[0][0].chars().count() * 2;
    let width = glyphs.len() * (cell_width + SPACING) + 1;
    let mut canvas = vec![vec![' '; width]; GLYPH_HEIGHT + 1];

    for (index, glyph) in glyphs.iter().enumerate() {
        let left = index * (cell_width + SPACING);
        for (row, pattern) in glyph.iter().enumerate() {
            for (col, mark) in pattern.chars().enumerate() {
                if mark != '#' {
                    continue;
                }
                let x = left + col * 2;
                for dx in 0..2 {
                    canvas[row][x + dx] = FILL_CHAR;
                    let shadow = &mut canvas[row + 1][x + dx + 1];
                    if *shadow == ' ' {
                        *shadow = SHADOW_CHAR;
                    }
                }
            }
        }
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_row_per_line_plus_shadow() {
        let lines = render("memory");
        assert_eq!(lines.len(), GLYPH_HEIGHT + 1);
        assert!(lines[0].starts_with(FILL_CHAR));
        assert!(lines.iter().any(|line| line.contains(SHADOW_CHAR)));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert!(render("???").is_empty());
        assert_eq!(render("m?"), render("m"));
    }
}
