use crate::core::hexagrams;
use crate::core::lunar::LunarDate;
use crate::core::trigrams::{combine_lines, trigram};
use crate::core::zodiac::zodiac_hour_at;
use crate::domain::model::{Draw, Reading};
use crate::utils::error::{OracleError, Result};
use chrono::NaiveDateTime;

/// 1 起算的取餘：餘數為 0 時回傳 `modulus` 本身
pub fn one_based_mod(sum: u32, modulus: u32) -> u8 {
    debug_assert!(modulus > 0);
    match sum % modulus {
        0 => modulus as u8,
        remainder => remainder as u8,
    }
}

/// 起卦所需的數值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivinationInput {
    /// 年支序號 1..=12
    pub year_number: u8,
    pub lunar_month: u8,
    pub lunar_day: u8,
    /// 時辰序號 1..=12
    pub hour_number: u8,
    pub draw: Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derivation {
    pub upper: u8,
    pub lower: u8,
    pub moving_line: u8,
}

impl Derivation {
    pub fn key(&self) -> String {
        hexagram_key(self.upper, self.lower)
    }
}

/// 上卦 = (年 + 月 + 日 + 百位) mod 8
/// 下卦 = (年 + 月 + 日 + 時 + 十位) mod 8
/// 動爻 = (年 + 月 + 日 + 時 + 個位) mod 6
pub fn derive(input: &DivinationInput) -> Derivation {
    let (hundreds, tens, ones) = input.draw.digits();
    let base = u32::from(input.year_number)
        + u32::from(input.lunar_month)
        + u32::from(input.lunar_day);
    let with_hour = base + u32::from(input.hour_number);

    Derivation {
        upper: one_based_mod(base + u32::from(hundreds), 8),
        lower: one_based_mod(with_hour + u32::from(tens), 8),
        moving_line: one_based_mod(with_hour + u32::from(ones), 6),
    }
}

/// 字串串接，不是相加
pub fn hexagram_key(upper: u8, lower: u8) -> String {
    format!("{}{}", upper, lower)
}

/// 依時間與隨機數起卦，不含 AI 解讀
pub fn cast_reading(at: NaiveDateTime, draw: Draw) -> Result<Reading> {
    let lunar = LunarDate::from_solar(at.date())?;
    let zodiac_hour = zodiac_hour_at(&at);

    let input = DivinationInput {
        year_number: lunar.year_branch_number(),
        lunar_month: lunar.month,
        lunar_day: lunar.day,
        hour_number: zodiac_hour.number,
        draw,
    };
    let derivation = derive(&input);
    tracing::debug!(?input, ?derivation, "Derived hexagram");

    let upper_trigram = trigram(derivation.upper).ok_or_else(|| OracleError::ValidationError {
        message: format!("upper trigram {} out of range", derivation.upper),
    })?;
    let lower_trigram = trigram(derivation.lower).ok_or_else(|| OracleError::ValidationError {
        message: format!("lower trigram {} out of range", derivation.lower),
    })?;

    let hexagram = hexagrams::lookup(&derivation.key());
    if hexagram.is_placeholder() {
        tracing::warn!("No hexagram data for key {}", derivation.key());
    }

    Ok(Reading {
        cast_at: at,
        lunar_date: format!("{} {}时", lunar, zodiac_hour.branch),
        lunar,
        zodiac_hour: zodiac_hour.branch,
        draw,
        upper: derivation.upper,
        lower: derivation.lower,
        moving_line: derivation.moving_line,
        upper_trigram,
        lower_trigram,
        lines: combine_lines(upper_trigram, lower_trigram),
        hexagram,
        moving_line_text: hexagram.line(derivation.moving_line),
        interpretation: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input(year: u8, month: u8, day: u8, hour: u8, draw: u16) -> DivinationInput {
        DivinationInput {
            year_number: year,
            lunar_month: month,
            lunar_day: day,
            hour_number: hour,
            draw: Draw::new(draw).unwrap(),
        }
    }

    #[test]
    fn test_one_based_mod_maps_zero_to_modulus() {
        assert_eq!(one_based_mod(16, 8), 8);
        assert_eq!(one_based_mod(8, 8), 8);
        assert_eq!(one_based_mod(17, 8), 1);
        assert_eq!(one_based_mod(12, 6), 6);
        assert_eq!(one_based_mod(13, 6), 1);
        assert_eq!(one_based_mod(0, 6), 6);
    }

    #[test]
    fn test_reference_scenario() {
        let derivation = derive(&input(1, 3, 15, 7, 100));
        assert_eq!(derivation.upper, 4);
        assert_eq!(derivation.lower, 2);
        assert_eq!(derivation.moving_line, 2);
        assert_eq!(derivation.key(), "42");
        assert_eq!(hexagrams::lookup(&derivation.key()).name, "雷泽归妹");
    }

    #[test]
    fn test_zero_remainder_wraps_to_eight() {
        // 1 + 1 + 5 + 1 = 8
        let derivation = derive(&input(1, 1, 5, 1, 100));
        assert_eq!(derivation.upper, 8);
    }

    #[test]
    fn test_indices_always_in_range() {
        for year in 1..=12u8 {
            for month in 1..=12u8 {
                for day in 1..=30u8 {
                    for hour in 1..=12u8 {
                        for draw in [100u16, 123, 480, 555, 707, 999] {
                            let d = derive(&input(year, month, day, hour, draw));
                            assert!((1..=8).contains(&d.upper));
                            assert!((1..=8).contains(&d.lower));
                            assert!((1..=6).contains(&d.moving_line));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_key_is_concatenation() {
        assert_eq!(hexagram_key(1, 8), "18");
        assert_eq!(hexagram_key(8, 1), "81");
        assert_ne!(hexagram_key(2, 3), (2 + 3).to_string());
    }

    #[test]
    fn test_cast_reading_is_deterministic() {
        let at = NaiveDate::from_ymd_opt(2024, 9, 17)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let draw = Draw::new(382).unwrap();

        let first = cast_reading(at, draw).unwrap();
        let second = cast_reading(at, draw).unwrap();

        assert_eq!(first.upper, second.upper);
        assert_eq!(first.lower, second.lower);
        assert_eq!(first.moving_line, second.moving_line);
        assert_eq!(first.hexagram.key, second.hexagram.key);
        assert_eq!(first.lunar_date, second.lunar_date);
    }

    #[test]
    fn test_cast_reading_known_values() {
        // 2024-09-17 = 甲辰年八月十五；10:30 為巳時 (6)
        // 年 5 + 月 8 + 日 15 = 28
        // 上卦 (28 + 3) % 8 = 7，下卦 (28 + 6 + 8) % 8 = 2，動爻 (28 + 6 + 2) % 6 = 0 → 6
        let at = NaiveDate::from_ymd_opt(2024, 9, 17)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let reading = cast_reading(at, Draw::new(382).unwrap()).unwrap();

        assert_eq!(reading.lunar_date, "甲辰年 8月15日 巳时");
        assert_eq!(reading.zodiac_hour, "巳");
        assert_eq!((reading.upper, reading.lower, reading.moving_line), (7, 2, 6));
        assert_eq!(reading.hexagram.name, "山泽损");
        assert_eq!(reading.upper_trigram.name, "艮");
        assert_eq!(reading.lower_trigram.name, "兑");
        assert_eq!(reading.lines, [1, 1, 0, 0, 0, 1]);
        assert_eq!(
            reading.moving_line_text,
            Some("上九：弗损益之，无咎，贞吉，利有攸往，得臣无家。")
        );
        assert!(reading.interpretation.is_none());
    }

    #[test]
    fn test_late_zi_hour_stays_on_civil_date() {
        // 23:30 屬子時 (1)，農曆日不進位
        // 年 5 + 月 8 + 日 15 = 28
        // 上卦 (28 + 3) % 8 = 7，下卦 (28 + 1 + 8) % 8 = 5，動爻 (28 + 1 + 2) % 6 = 1
        let at = NaiveDate::from_ymd_opt(2024, 9, 17)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let reading = cast_reading(at, Draw::new(382).unwrap()).unwrap();

        assert_eq!(reading.lunar_date, "甲辰年 8月15日 子时");
        assert_eq!(zodiac_hour_at(&at).number, 1);
        assert_eq!(reading.lunar.day, 15);
        assert_eq!((reading.upper, reading.lower, reading.moving_line), (7, 5, 1));
        assert_eq!(reading.hexagram.name, "山风蛊");

        // 過了午夜才換到下一天
        let after_midnight = NaiveDate::from_ymd_opt(2024, 9, 18)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap();
        let next = cast_reading(after_midnight, Draw::new(382).unwrap()).unwrap();
        assert_eq!(next.lunar_date, "甲辰年 8月16日 子时");
    }

    #[test]
    fn test_leap_month_uses_its_month_number() {
        // 2023-04-01 = 癸卯年閏二月十一；12:00 為午時 (7)
        // 年 4 + 月 2 + 日 11 = 17
        // 上卦 (17 + 3) % 8 = 4，下卦 (17 + 7 + 8) % 8 = 0 → 8，動爻 (17 + 7 + 2) % 6 = 2
        let at = NaiveDate::from_ymd_opt(2023, 4, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let reading = cast_reading(at, Draw::new(382).unwrap()).unwrap();

        assert_eq!(reading.lunar_date, "癸卯年 闰2月11日 午时");
        assert!(reading.lunar.is_leap_month);
        assert_eq!(reading.lunar.month, 2);
        assert_eq!((reading.upper, reading.lower, reading.moving_line), (4, 8, 2));
        assert_eq!(reading.hexagram.name, "雷地豫");
    }

    #[test]
    fn test_cast_reading_rejects_unsupported_dates() {
        let at = NaiveDate::from_ymd_opt(1850, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert!(matches!(
            cast_reading(at, Draw::new(500).unwrap()),
            Err(OracleError::CalendarError { .. })
        ));
    }
}
