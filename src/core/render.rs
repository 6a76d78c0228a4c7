use crate::core::trigrams::{combine_lines, trigram};
use crate::domain::model::Reading;
use crate::utils::error::{OracleError, Result};

const YANG: &str = "━━━━━";
const YIN: &str = "━　━";

/// 由上爻到初爻輸出六行文字，動爻加上標記
pub fn render_lines(lines: &[u8; 6], moving_line: u8) -> Vec<String> {
    (1..=6u8)
        .rev()
        .map(|position| {
            let stroke = if lines[usize::from(position) - 1] == 1 { YANG } else { YIN };
            let marker = if position == moving_line { " ◀ 动爻" } else { "" };
            format!("{} ({}爻){}", stroke, position, marker)
        })
        .collect()
}

/// 依上下卦序號畫出卦象
pub fn render_hexagram(upper: u8, lower: u8, moving_line: u8) -> Result<Vec<String>> {
    let find = |number: u8| {
        trigram(number).ok_or_else(|| OracleError::ValidationError {
            message: format!("trigram number must be within 1..=8, got {}", number),
        })
    };
    let lines = combine_lines(find(upper)?, find(lower)?);
    Ok(render_lines(&lines, moving_line))
}

pub fn render_reading(reading: &Reading) -> String {
    let mut out = Vec::new();
    out.push(format!("农历时间：{}", reading.lunar_date));
    out.push(format!("随机数：{}", reading.draw.value()));
    out.push(String::new());
    out.push(format!(
        "上卦 {}{}  下卦 {}{}",
        reading.upper_trigram.symbol,
        reading.upper_trigram.name,
        reading.lower_trigram.symbol,
        reading.lower_trigram.name
    ));
    out.extend(render_lines(&reading.lines, reading.moving_line));
    out.push(String::new());
    out.push(format!("本卦：{}", reading.hexagram.name));
    out.push(format!("卦辞：{}", reading.hexagram.judgment));
    if let Some(image) = reading.hexagram.image {
        out.push(format!("象辞：{}", image));
    }
    out.push(format!("动爻：第{}爻", reading.moving_line));
    out.push(reading.moving_line_text.unwrap_or("无爻辞数据").to_string());

    if let Some(interpretation) = &reading.interpretation {
        out.push(String::new());
        out.push(format!("AI解读：{}", interpretation));
    }

    out.join("\n")
}
