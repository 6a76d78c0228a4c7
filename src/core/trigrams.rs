use crate::domain::model::Trigram;

/// 先天八卦數，爻由下而上
#[rustfmt::skip]
pub static TRIGRAMS: [Trigram; 8] = [
    Trigram { number: 1, name: "乾", symbol: "☰", lines: [1, 1, 1] },
    Trigram { number: 2, name: "兑", symbol: "☱", lines: [1, 1, 0] },
    Trigram { number: 3, name: "离", symbol: "☲", lines: [1, 0, 1] },
    Trigram { number: 4, name: "震", symbol: "☳", lines: [1, 0, 0] },
    Trigram { number: 5, name: "巽", symbol: "☴", lines: [0, 1, 1] },
    Trigram { number: 6, name: "坎", symbol: "☵", lines: [0, 1, 0] },
    Trigram { number: 7, name: "艮", symbol: "☶", lines: [0, 0, 1] },
    Trigram { number: 8, name: "坤", symbol: "☷", lines: [0, 0, 0] },
];

pub fn trigram(number: u8) -> Option<&'static Trigram> {
    TRIGRAMS.iter().find(|t| t.number == number)
}

/// 下卦在前、上卦在後，得到初爻到上爻
pub fn combine_lines(upper: &Trigram, lower: &Trigram) -> [u8; 6] {
    let [l1, l2, l3] = lower.lines;
    let [u1, u2, u3] = upper.lines;
    [l1, l2, l3, u1, u2, u3]
}
