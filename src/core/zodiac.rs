use crate::core::lunar::EARTHLY_BRANCHES;
use crate::domain::model::ZodiacHour;
use chrono::Timelike;

#[rustfmt::skip]
pub static ZODIAC_HOURS: [ZodiacHour; 12] = [
    ZodiacHour { start: (23, 0), end: (1, 0), branch: "子", number: 1 },
    ZodiacHour { start: (1, 0), end: (3, 0), branch: "丑", number: 2 },
    ZodiacHour { start: (3, 0), end: (5, 0), branch: "寅", number: 3 },
    ZodiacHour { start: (5, 0), end: (7, 0), branch: "卯", number: 4 },
    ZodiacHour { start: (7, 0), end: (9, 0), branch: "辰", number: 5 },
    ZodiacHour { start: (9, 0), end: (11, 0), branch: "巳", number: 6 },
    ZodiacHour { start: (11, 0), end: (13, 0), branch: "午", number: 7 },
    ZodiacHour { start: (13, 0), end: (15, 0), branch: "未", number: 8 },
    ZodiacHour { start: (15, 0), end: (17, 0), branch: "申", number: 9 },
    ZodiacHour { start: (17, 0), end: (19, 0), branch: "酉", number: 10 },
    ZodiacHour { start: (19, 0), end: (21, 0), branch: "戌", number: 11 },
    ZodiacHour { start: (21, 0), end: (23, 0), branch: "亥", number: 12 },
];

fn minute_of_day((hour, minute): (u8, u8)) -> u32 {
    u32::from(hour) * 60 + u32::from(minute)
}

impl ZodiacHour {
    /// 半開區間比對；跨午夜的時辰拆成兩段
    pub fn contains(&self, hour: u32, minute: u32) -> bool {
        let now = hour * 60 + minute;
        let start = minute_of_day(self.start);
        let end = minute_of_day(self.end);

        if self.wraps_midnight() {
            now >= start || now < end
        } else {
            now >= start && now < end
        }
    }
}

/// 取得時刻所屬的時辰；找不到時 (不合法的時間) 回到子時
pub fn zodiac_hour_for(hour: u32, minute: u32) -> &'static ZodiacHour {
    if hour >= 24 || minute >= 60 {
        tracing::warn!("Invalid time of day {}:{:02}, falling back to 子时", hour, minute);
        return &ZODIAC_HOURS[0];
    }

    ZODIAC_HOURS
        .iter()
        .find(|period| period.contains(hour, minute))
        .unwrap_or(&ZODIAC_HOURS[0])
}

pub fn zodiac_hour_at<T: Timelike>(time: &T) -> &'static ZodiacHour {
    zodiac_hour_for(time.hour(), time.minute())
}

/// 地支名稱轉序號 (子 = 1 … 亥 = 12)
pub fn branch_number(branch: &str) -> Option<u8> {
    EARTHLY_BRANCHES
        .iter()
        .position(|b| *b == branch)
        .map(|index| index as u8 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_every_minute_matches_exactly_one_period() {
        for hour in 0..24 {
            for minute in 0..60 {
                let matches = ZODIAC_HOURS
                    .iter()
                    .filter(|period| period.contains(hour, minute))
                    .count();
                assert_eq!(matches, 1, "{}:{:02}", hour, minute);
            }
        }
    }

    #[test]
    fn test_midnight_wraps_into_zi() {
        assert_eq!(zodiac_hour_for(23, 30).branch, "子");
        assert_eq!(zodiac_hour_for(0, 30).branch, "子");
        assert_eq!(zodiac_hour_for(23, 0).branch, "子");
        assert_eq!(zodiac_hour_for(0, 59).branch, "子");
        assert_eq!(zodiac_hour_for(1, 0).branch, "丑");
    }

    #[test]
    fn test_boundaries_are_half_open() {
        assert_eq!(zodiac_hour_for(6, 59).branch, "卯");
        assert_eq!(zodiac_hour_for(7, 0).branch, "辰");
        assert_eq!(zodiac_hour_for(22, 59).branch, "亥");
        assert_eq!(zodiac_hour_for(12, 0).number, 7);
    }

    #[test]
    fn test_invalid_time_falls_back_to_first_period() {
        assert_eq!(zodiac_hour_for(25, 0).branch, "子");
        assert_eq!(zodiac_hour_for(10, 75).branch, "子");
    }

    #[test]
    fn test_zodiac_hour_at_reads_timelike() {
        let time = NaiveTime::from_hms_opt(14, 20, 0).unwrap();
        assert_eq!(zodiac_hour_at(&time).branch, "未");
    }

    #[test]
    fn test_branch_number() {
        assert_eq!(branch_number("子"), Some(1));
        assert_eq!(branch_number("午"), Some(7));
        assert_eq!(branch_number("亥"), Some(12));
        assert_eq!(branch_number("甲"), None);

        for period in &ZODIAC_HOURS {
            assert_eq!(branch_number(period.branch), Some(period.number));
        }
    }
}
