//! Unicode script ranges and the "predominantly in script" ratio test.

/// Share of non-whitespace characters above which text counts as written in a script.
pub const SCRIPT_RATIO_THRESHOLD: f64 = 0.2;

/// Writing systems the pipeline can recognise by code point range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// CJK radicals, kana and unified ideographs
    Cjk,
    Hangul,
    Cyrillic,
}

impl Script {
    pub fn contains(self, c: char) -> bool {
        let cp = c as u32;
        match self {
            // Open interval, matching the range lyrics sites use for kana and kanji
            Script::Cjk => cp > 0x2E80 && cp < 0x9FFF,
            Script::Hangul => {
                (0xAC00..=0xD7AF).contains(&cp)
                    || (0x1100..=0x11FF).contains(&cp)
                    || (0x3130..=0x318F).contains(&cp)
            }
            Script::Cyrillic => (0x0400..=0x04FF).contains(&cp),
        }
    }
}

/// Fraction of non-whitespace characters of `text` that fall in `script`.
pub fn script_ratio(text: &str, script: Script) -> f64 {
    let mut total = 0usize;
    let mut matching = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if script.contains(c) {
            matching += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    matching as f64 / total as f64
}

/// True when strictly more than 20% of the non-whitespace characters are in `script`.
pub fn is_predominantly(text: &str, script: Script) -> bool {
    script_ratio(text, script) > SCRIPT_RATIO_THRESHOLD
}
