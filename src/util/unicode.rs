use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn grapheme_display_width(g: &str) -> usize {
    UnicodeWidthStr::width(g)
}

/// Shorten a path to fit within `max_cells` terminal cells by dropping
/// characters from the middle, keeping the file name visible.
///
/// `/home/ann/projects/site/src/index.html` at 24 cells becomes
/// `/home/ann/p…c/index.html`.
pub fn truncate_middle(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }

    let budget = max_cells - 1; // reserve 1 cell for '…'
    let tail_budget = budget - budget / 2;
    let head_budget = budget - tail_budget;

    let graphemes: Vec<&str> = s.graphemes(true).collect();

    let mut tail = Vec::new();
    let mut width = 0;
    for g in graphemes.iter().rev() {
        let gw = grapheme_display_width(g);
        if width + gw > tail_budget {
            break;
        }
        width += gw;
        tail.push(*g);
    }
    tail.reverse();

    let mut head = String::new();
    let mut width = 0;
    for g in &graphemes[..graphemes.len() - tail.len()] {
        let gw = grapheme_display_width(g);
        if width + gw > head_budget {
            break;
        }
        width += gw;
        head.push_str(g);
    }

    format!("{}\u{2026}{}", head, tail.concat())
}

/// Pad `s` with spaces on the right to `cells` terminal cells.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    if w >= cells {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(cells - w))
}
