//! Color milestone table.
//!
//! Maps combo counts to color tiers. The table is parsed from a small text
//! format, one tier per line:
//!
//! ```text
//! 0: #3EA7ED, #6ABBF1
//! 10: #62DDDF, #88E5E7
//! ```
//!
//! Lines that do not parse are skipped, never rejected. Tier `0` is always
//! present after parsing; if the text omits it, the built-in pair is used.
//!
//! A count selects the greatest milestone that is `<=` the count, so counts
//! past the last milestone keep its colors.

use serde::{Deserialize, Serialize};

use super::color::{Rgba, BAR_ALPHA};

/// Built-in color table, also the default value of the `combo_colors` setting.
pub const DEFAULT_COLOR_TEXT: &str = "\
0: #3EA7ED, #6ABBF1
10: #62DDDF, #88E5E7
25: #3EDDA0, #63E3B2
50: #E5BD45, #EBCC70
100: #D9726E, #E1918E
250: #E378A6, #EA9ABC
500: #D93DC2, #E166CE
1000: #934FDB, #AC78E3
2500: #5551D3, #807CDE";

/// Colors used for tier 0 when the configured text leaves it out.
pub const DEFAULT_BASE_PRIMARY: Rgba = Rgba::rgb(62, 167, 237);
pub const DEFAULT_BASE_SECONDARY: Rgba = Rgba::rgb(106, 187, 241).with_alpha(BAR_ALPHA);

/// One color tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub milestone: u32,
    /// Counter and shadow color.
    pub primary: Rgba,
    /// Cooldown bar and high score color.
    pub secondary: Rgba,
}

impl ColorEntry {
    fn default_base() -> Self {
        Self {
            milestone: 0,
            primary: DEFAULT_BASE_PRIMARY,
            secondary: DEFAULT_BASE_SECONDARY,
        }
    }

    fn to_line(self) -> String {
        format!(
            "{}: {}, {}",
            self.milestone,
            self.primary.to_hex(),
            self.secondary.to_hex()
        )
    }
}

/// Why a line of color text was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingColon,
    MissingComma,
    InvalidMilestone,
    InvalidPrimary,
    InvalidSecondary,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::MissingColon => "no ':' separating milestone and colors",
            SkipReason::MissingComma => "no ',' separating the two colors",
            SkipReason::InvalidMilestone => "milestone is not a non-negative integer",
            SkipReason::InvalidPrimary => "primary color is not #RRGGBB",
            SkipReason::InvalidSecondary => "secondary color is not #RRGGBB",
        }
    }
}

/// A non-blank line that the parser ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_no: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// Immutable, sorted set of color tiers with tier 0 always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorMilestoneTable {
    /// Ascending by milestone, distinct, `entries[0].milestone == 0`.
    entries: Vec<ColorEntry>,
}

impl ColorMilestoneTable {
    /// Parse color text, silently dropping malformed lines.
    pub fn parse(text: &str) -> Self {
        Self::parse_with_diagnostics(text).0
    }

    /// Parse color text and report every non-blank line that was skipped.
    pub fn parse_with_diagnostics(text: &str) -> (Self, Vec<SkippedLine>) {
        let mut entries: Vec<ColorEntry> = Vec::new();
        let mut skipped = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match parse_line(line) {
                Ok(entry) => {
                    // Later lines win for a repeated milestone.
                    match entries.binary_search_by_key(&entry.milestone, |e| e.milestone) {
                        Ok(pos) => entries[pos] = entry,
                        Err(pos) => entries.insert(pos, entry),
                    }
                }
                Err(reason) => {
                    tracing::debug!(
                        line_no = idx + 1,
                        reason = reason.description(),
                        "skipping color line: {line}"
                    );
                    skipped.push(SkippedLine {
                        line_no: idx + 1,
                        text: line.to_string(),
                        reason,
                    });
                }
            }
        }

        if entries.first().map(|e| e.milestone) != Some(0) {
            entries.insert(0, ColorEntry::default_base());
        }

        (Self { entries }, skipped)
    }

    /// Tier for `count`: the greatest milestone `<= count`, tier 0 for
    /// non-positive counts.
    pub fn lookup(&self, count: i64) -> &ColorEntry {
        let base = &self.entries[0];
        assert_eq!(base.milestone, 0, "color table lost its tier 0 entry");

        let Ok(count) = u32::try_from(count) else {
            // Negative counts use tier 0; counts beyond u32 use the last tier.
            return if count < 0 { base } else { self.highest() };
        };

        // entries[0] is 0 <= count, so the partition point is at least 1.
        let idx = self.entries.partition_point(|e| e.milestone <= count);
        &self.entries[idx - 1]
    }

    /// Whether `count` is exactly one of the configured milestones.
    pub fn is_milestone(&self, count: u32) -> bool {
        self.entries
            .binary_search_by_key(&count, |e| e.milestone)
            .is_ok()
    }

    pub fn get(&self, milestone: u32) -> Option<&ColorEntry> {
        self.entries
            .binary_search_by_key(&milestone, |e| e.milestone)
            .ok()
            .map(|pos| &self.entries[pos])
    }

    /// Milestones in ascending order, starting with 0.
    pub fn milestones(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|e| e.milestone)
    }

    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: tier 0 is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn highest(&self) -> &ColorEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Serialize back to the text format, one line per tier, ascending.
    pub fn to_config_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_line())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ColorMilestoneTable {
    fn default() -> Self {
        Self::parse(DEFAULT_COLOR_TEXT)
    }
}

fn parse_line(line: &str) -> Result<ColorEntry, SkipReason> {
    let (milestone, colors) = line.split_once(':').ok_or(SkipReason::MissingColon)?;
    let (primary, secondary) = colors.split_once(',').ok_or(SkipReason::MissingComma)?;

    let milestone = milestone
        .trim()
        .parse::<u32>()
        .map_err(|_| SkipReason::InvalidMilestone)?;
    let primary = Rgba::from_hex(primary, 255).map_err(|_| SkipReason::InvalidPrimary)?;
    let secondary =
        Rgba::from_hex(secondary, BAR_ALPHA).map_err(|_| SkipReason::InvalidSecondary)?;

    Ok(ColorEntry {
        milestone,
        primary,
        secondary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TWO_TIERS: &str = "0: #3EA7ED, #6ABBF1\n10: #62DDDF, #88E5E7";

    #[test]
    fn lookup_rounds_down_to_checkpoint() {
        let table = ColorMilestoneTable::parse(TWO_TIERS);
        assert_eq!(table.lookup(5).milestone, 0);
        assert_eq!(table.lookup(10).milestone, 10);
        assert_eq!(table.lookup(15).milestone, 10);
        assert_eq!(table.lookup(1_000_000).milestone, 10);
    }

    #[test]
    fn lookup_non_positive_is_tier_zero() {
        let table = ColorMilestoneTable::default();
        assert_eq!(table.lookup(0).milestone, 0);
        assert_eq!(table.lookup(-1).milestone, 0);
        assert_eq!(table.lookup(i64::MIN).milestone, 0);
    }

    #[test]
    fn lookup_beyond_u32_uses_last_tier() {
        let table = ColorMilestoneTable::default();
        assert_eq!(table.lookup(i64::MAX).milestone, 2500);
    }

    #[test]
    fn default_table_has_nine_tiers() {
        let table = ColorMilestoneTable::default();
        assert_eq!(
            table.milestones().collect::<Vec<_>>(),
            vec![0, 10, 25, 50, 100, 250, 500, 1000, 2500]
        );
        let tier = table.get(50).unwrap();
        assert_eq!(tier.primary, Rgba::rgb(229, 189, 69));
        assert_eq!(tier.secondary, Rgba::rgb(235, 204, 112).with_alpha(BAR_ALPHA));
    }

    #[test]
    fn synthesizes_tier_zero() {
        let table = ColorMilestoneTable::parse("10: #62DDDF, #88E5E7");
        assert_eq!(table.milestones().collect::<Vec<_>>(), vec![0, 10]);
        let base = table.lookup(3);
        assert_eq!(base.primary, DEFAULT_BASE_PRIMARY);
        assert_eq!(base.secondary, DEFAULT_BASE_SECONDARY);
    }

    #[test]
    fn empty_text_yields_only_tier_zero() {
        let table = ColorMilestoneTable::parse("");
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(99).milestone, 0);
    }

    #[test]
    fn malformed_lines_are_skipped_individually() {
        let text = "\
0: #3EA7ED, #6ABBF1
garbage
5 #111111, #222222
7: #111111 #222222
-3: #111111, #222222
x: #111111, #222222
8: #11111, #222222
9: #111111, 222222
10: #62DDDF, #88E5E7
";
        let (table, skipped) = ColorMilestoneTable::parse_with_diagnostics(text);
        assert_eq!(table.milestones().collect::<Vec<_>>(), vec![0, 10]);

        let reasons: Vec<_> = skipped.iter().map(|s| (s.line_no, s.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                (2, SkipReason::MissingColon),
                (3, SkipReason::MissingColon),
                (4, SkipReason::MissingComma),
                (5, SkipReason::InvalidMilestone),
                (6, SkipReason::InvalidMilestone),
                (7, SkipReason::InvalidPrimary),
                (8, SkipReason::InvalidSecondary),
            ]
        );
    }

    #[test]
    fn last_duplicate_wins() {
        let table = ColorMilestoneTable::parse("10: #111111, #222222\n10: #333333, #444444");
        assert_eq!(table.get(10).unwrap().primary, Rgba::rgb(0x33, 0x33, 0x33));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let table = ColorMilestoneTable::parse("50: #111111, #111111\n0: #222222, #222222\n5: #333333, #333333");
        assert_eq!(table.milestones().collect::<Vec<_>>(), vec![0, 5, 50]);
        assert_eq!(table.lookup(49).milestone, 5);
    }

    #[test]
    fn extra_color_makes_line_invalid() {
        let (table, skipped) =
            ColorMilestoneTable::parse_with_diagnostics("5: #111111, #222222, #333333");
        assert_eq!(table.len(), 1);
        assert_eq!(skipped[0].reason, SkipReason::InvalidSecondary);
    }

    #[test]
    fn is_milestone_exact_only() {
        let table = ColorMilestoneTable::parse(TWO_TIERS);
        assert!(table.is_milestone(0));
        assert!(table.is_milestone(10));
        assert!(!table.is_milestone(11));
    }

    #[test]
    fn config_text_matches_default_source() {
        assert_eq!(ColorMilestoneTable::default().to_config_text(), DEFAULT_COLOR_TEXT);
    }

    fn hex() -> impl Strategy<Value = Rgba> {
        any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Rgba::rgb(r, g, b))
    }

    proptest! {
        #[test]
        fn lookup_is_monotonic(
            milestones in proptest::collection::vec(0u32..5_000, 0..12),
            a in -100i64..6_000,
            b in -100i64..6_000,
        ) {
            let text = milestones
                .iter()
                .map(|m| format!("{m}: #102030, #405060"))
                .collect::<Vec<_>>()
                .join("\n");
            let table = ColorMilestoneTable::parse(&text);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.lookup(lo).milestone <= table.lookup(hi).milestone);
            prop_assert!(i64::from(table.lookup(hi).milestone) <= hi.max(0));
        }

        #[test]
        fn serialize_then_parse_is_identity(
            tiers in proptest::collection::vec((0u32..100_000, hex(), hex()), 0..12),
        ) {
            let text = tiers
                .iter()
                .map(|(m, p, s)| format!("{m}: {}, {}", p.to_hex(), s.to_hex()))
                .collect::<Vec<_>>()
                .join("\n");
            let table = ColorMilestoneTable::parse(&text);
            prop_assert_eq!(table.lookup(0).milestone, 0);
            prop_assert_eq!(ColorMilestoneTable::parse(&table.to_config_text()), table);
        }
    }
}
