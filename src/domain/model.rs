use crate::core::lunar::LunarDate;
use crate::utils::error::{OracleError, Result};
use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

/// 八卦之一，爻由下而上排列 (1 = 陽, 0 = 陰)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trigram {
    pub number: u8,
    pub name: &'static str,
    pub symbol: &'static str,
    pub lines: [u8; 3],
}

/// 六十四卦資料
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hexagram {
    pub key: &'static str,
    pub number: Option<u8>,
    pub name: &'static str,
    pub judgment: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'static str>,
    /// 初爻在前
    pub lines: &'static [&'static str],
}

impl Hexagram {
    /// 取得第 `position` 爻 (1..=6) 的爻辭
    pub fn line(&self, position: u8) -> Option<&'static str> {
        if position == 0 {
            return None;
        }
        self.lines.get(usize::from(position) - 1).copied()
    }

    pub fn is_placeholder(&self) -> bool {
        self.number.is_none()
    }
}

/// 十二時辰，區間為 [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZodiacHour {
    pub start: (u8, u8),
    pub end: (u8, u8),
    pub branch: &'static str,
    pub number: u8,
}

impl ZodiacHour {
    /// 是否跨越午夜 (子時 23:00–01:00)
    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }
}

/// 100..=999 的三位隨機數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Draw(u16);

impl Draw {
    pub const MIN: u16 = 100;
    pub const MAX: u16 = 999;

    pub fn new(value: u16) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(OracleError::ValidationError {
                message: format!(
                    "draw must be a 3-digit number between {} and {}, got {}",
                    Self::MIN,
                    Self::MAX,
                    value
                ),
            });
        }
        Ok(Self(value))
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(rng.random_range(Self::MIN..=Self::MAX))
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// (百位, 十位, 個位)
    pub fn digits(&self) -> (u8, u8, u8) {
        let v = self.0;
        ((v / 100) as u8, (v / 10 % 10) as u8, (v % 10) as u8)
    }
}

/// 一次起卦的完整結果，不做持久化
#[derive(Debug, Clone, Serialize)]
pub struct Reading {
    pub cast_at: NaiveDateTime,
    pub lunar_date: String,
    pub lunar: LunarDate,
    pub zodiac_hour: &'static str,
    pub draw: Draw,
    pub upper: u8,
    pub lower: u8,
    pub moving_line: u8,
    pub upper_trigram: &'static Trigram,
    pub lower_trigram: &'static Trigram,
    /// 六爻，初爻在前
    pub lines: [u8; 6],
    pub hexagram: &'static Hexagram,
    pub moving_line_text: Option<&'static str>,
    pub interpretation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_draw_digits() {
        let draw = Draw::new(407).unwrap();
        assert_eq!(draw.digits(), (4, 0, 7));
        assert_eq!(Draw::new(100).unwrap().digits(), (1, 0, 0));
        assert_eq!(Draw::new(999).unwrap().digits(), (9, 9, 9));
    }

    #[test]
    fn test_draw_rejects_out_of_range() {
        assert!(Draw::new(99).is_err());
        assert!(Draw::new(1000).is_err());
        assert!(Draw::new(0).is_err());
    }

    #[test]
    fn test_random_draw_stays_three_digits() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2_000 {
            let draw = Draw::random(&mut rng);
            assert!((Draw::MIN..=Draw::MAX).contains(&draw.value()));
        }
    }

    #[test]
    fn test_hexagram_line_lookup_is_one_based() {
        static LINES: [&str; 6] = ["一", "二", "三", "四", "五", "六"];
        let hexagram = Hexagram {
            key: "11",
            number: Some(1),
            name: "测试",
            judgment: "无",
            image: None,
            lines: &LINES,
        };

        assert_eq!(hexagram.line(1), Some("一"));
        assert_eq!(hexagram.line(6), Some("六"));
        assert_eq!(hexagram.line(0), None);
        assert_eq!(hexagram.line(7), None);
    }
}
