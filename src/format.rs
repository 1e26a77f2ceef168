use crate::config::Glyphs;
use crate::diff::PlayerDelta;

/// Rank icons for local ranks 1..=10; index 0 is unused.
const MEDALS: [&str; 11] = [
    "", "🥇", "🥈", "🥉", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟",
];

const UNCHANGED: &str = "`--`";

// Finnish number convention: no-break space grouping, U+2212 minus.
const GROUP_SEPARATOR: char = '\u{a0}';
const MINUS_SIGN: char = '\u{2212}';

pub fn rank_glyph(local_rank: u32) -> String {
    match MEDALS.get(local_rank as usize) {
        Some(medal) if local_rank > 0 => (*medal).to_string(),
        _ => format!("`{local_rank}`"),
    }
}

pub fn change_label<'a>(delta: &PlayerDelta, glyphs: &'a Glyphs) -> &'a str {
    match delta.local_rank_change() {
        None => &glyphs.new,
        Some(change) if change > 0 => &glyphs.up,
        Some(change) if change < 0 => &glyphs.down,
        Some(_) => UNCHANGED,
    }
}

/// Score gain annotation; only for returning players who gained points.
pub fn score_annotation(delta: &PlayerDelta, glyphs: &Glyphs) -> Option<String> {
    let change = delta.score_change();
    if delta.is_new() || change <= 0 {
        return None;
    }
    Some(format!("({} +*{}*)", glyphs.up, format_grouped(change)))
}

/// Column width for world ranks: digits of the largest one shown.
/// `None` when nothing survived the filters.
pub fn world_rank_width(deltas: &[PlayerDelta]) -> Option<usize> {
    deltas
        .iter()
        .map(|delta| delta.player.world_rank)
        .max()
        .map(|rank| rank.to_string().len())
}

pub fn format_line(delta: &PlayerDelta, width: usize, glyphs: &Glyphs) -> String {
    let player = &delta.player;
    let mut line = format!(
        "{} `#{:<width$}` {} **{}** - {}",
        rank_glyph(player.local_rank),
        player.world_rank,
        change_label(delta, glyphs),
        player.name,
        format_grouped(player.score),
    );
    if let Some(annotation) = score_annotation(delta, glyphs) {
        line.push(' ');
        line.push_str(&annotation);
    }
    line
}

pub fn format_lines(deltas: &[PlayerDelta], glyphs: &Glyphs) -> Vec<String> {
    let Some(width) = world_rank_width(deltas) else {
        return Vec::new();
    };
    deltas
        .iter()
        .map(|delta| format_line(delta, width, glyphs))
        .collect()
}

pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 2 + 3);
    if value < 0 {
        out.push(MINUS_SIGN);
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}
