//! 農曆換算 (1900–2100)
//!
//! 每一年以一個整數編碼：
//! - bit 16：閏月是否為大月 (30 天)
//! - bit 15..4：正月到十二月，設定為大月
//! - bit 3..0：閏月月份，0 表示無閏月
//!
//! 起點為 1900-01-31 (農曆 1900 年正月初一)。

use crate::utils::error::{OracleError, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

const FIRST_YEAR: i32 = 1900;
const LAST_YEAR: i32 = 2100;

/// 1900-01-31 的 `num_days_from_ce`
const EPOCH_DAYS_FROM_CE: i32 = 693_626;

const HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

pub const EARTHLY_BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

#[rustfmt::skip]
static LUNAR_YEAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090
    0x0d520,                                                                                    // 2100
];

fn year_info(year: i32) -> u32 {
    LUNAR_YEAR_INFO[(year - FIRST_YEAR) as usize]
}

fn leap_month(year: i32) -> u8 {
    (year_info(year) & 0xf) as u8
}

fn leap_month_days(year: i32) -> u32 {
    if leap_month(year) == 0 {
        0
    } else if year_info(year) & 0x10000 != 0 {
        30
    } else {
        29
    }
}

fn month_days(year: i32, month: u8) -> u32 {
    if year_info(year) & (0x10000 >> month) != 0 {
        30
    } else {
        29
    }
}

fn year_days(year: i32) -> u32 {
    (1..=12).map(|m| month_days(year, m)).sum::<u32>() + leap_month_days(year)
}

/// 農曆日期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub is_leap_month: bool,
}

impl LunarDate {
    /// 由公曆日期換算
    pub fn from_solar(date: NaiveDate) -> Result<Self> {
        let offset = date.num_days_from_ce() - EPOCH_DAYS_FROM_CE;
        if offset < 0 {
            return Err(OracleError::CalendarError {
                message: format!("{} is before the supported range (1900-01-31)", date),
            });
        }

        let mut remaining = offset as u32;
        let mut year = FIRST_YEAR;
        loop {
            if year > LAST_YEAR {
                return Err(OracleError::CalendarError {
                    message: format!("{} is after the supported range (lunar year 2100)", date),
                });
            }
            let days = year_days(year);
            if remaining < days {
                break;
            }
            remaining -= days;
            year += 1;
        }

        let leap = leap_month(year);
        for month in 1..=12u8 {
            let days = month_days(year, month);
            if remaining < days {
                return Ok(Self::new(year, month, remaining, false));
            }
            remaining -= days;

            if month == leap {
                let days = leap_month_days(year);
                if remaining < days {
                    return Ok(Self::new(year, month, remaining, true));
                }
                remaining -= days;
            }
        }

        // year_days 已保證落在該年之內
        Err(OracleError::CalendarError {
            message: format!("failed to place {} inside lunar year {}", date, year),
        })
    }

    fn new(year: i32, month: u8, day_offset: u32, is_leap_month: bool) -> Self {
        Self {
            year,
            month,
            day: day_offset as u8 + 1,
            is_leap_month,
        }
    }

    fn cycle_index(&self, len: i32) -> usize {
        (self.year - 4).rem_euclid(len) as usize
    }

    pub fn year_stem(&self) -> &'static str {
        HEAVENLY_STEMS[self.cycle_index(10)]
    }

    pub fn year_branch(&self) -> &'static str {
        EARTHLY_BRANCHES[self.cycle_index(12)]
    }

    /// 年支序號 (子 = 1 … 亥 = 12)
    pub fn year_branch_number(&self) -> u8 {
        self.cycle_index(12) as u8 + 1
    }

    /// 干支紀年，例如「甲辰」
    pub fn year_in_ganzhi(&self) -> String {
        format!("{}{}", self.year_stem(), self.year_branch())
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}年 {}{}月{}日",
            self.year_in_ganzhi(),
            if self.is_leap_month { "闰" } else { "" },
            self.month,
            self.day
        )
    }
}
