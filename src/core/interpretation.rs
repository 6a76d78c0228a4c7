use crate::domain::model::{Hexagram, Reading};

pub const SYSTEM_INSTRUCTION: &str = "你是一位资深的周易解卦大师，请遵循以下规范：
1. 使用现代中文口语化解卦（禁用文言文）
2. 保持回答在20字长度内
3. 规避任何政治敏感内容
4. 格式要求：主结论+分句建议+总结预测
5. 使用通俗易懂的现代中文表达
6. 在结果中不要显示格式，直接拼接成完整的句子";

/// 解讀失敗時給使用者看的訊息
pub const INTERPRETATION_UNAVAILABLE: &str = "AI服务暂时不可用";

const STRIPPED_CHARS: &[char] = &['"', '“', '”', '「', '」', '『', '』', '【', '】'];

pub fn build_prompt(hexagram: &Hexagram, moving_line: u8) -> String {
    let mut prompt = String::from("请解析此卦象：\n");
    prompt.push_str(&format!("- 本卦：{}\n", hexagram.name));
    prompt.push_str(&format!("- 卦辞：{}\n", hexagram.judgment));
    if let Some(image) = hexagram.image {
        prompt.push_str(&format!("- 象辞：{}\n", image));
    }
    prompt.push_str(&format!(
        "- 动爻：第{}爻（{}）\n",
        moving_line,
        hexagram.line(moving_line).unwrap_or("无数据")
    ));
    prompt.push_str("请用专业周易知识综合分析，生成20字运势总结");
    prompt
}

pub fn prompt_for(reading: &Reading) -> String {
    build_prompt(reading.hexagram, reading.moving_line)
}

/// 去除頭尾空白與引號、括號
pub fn sanitize_completion(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hexagrams::{lookup, UNKNOWN_HEXAGRAM};

    #[test]
    fn test_prompt_embeds_hexagram_texts() {
        let prompt = build_prompt(lookup("11"), 5);

        assert!(prompt.starts_with("请解析此卦象："));
        assert!(prompt.contains("- 本卦：乾为天"));
        assert!(prompt.contains("- 卦辞：元亨利贞。"));
        assert!(prompt.contains("- 象辞：天行健，君子以自强不息。"));
        assert!(prompt.contains("- 动爻：第5爻（九五：飞龙在天，利见大人。）"));
        assert!(prompt.ends_with("生成20字运势总结"));
    }

    #[test]
    fn test_prompt_for_placeholder() {
        let prompt = build_prompt(&UNKNOWN_HEXAGRAM, 3);

        assert!(prompt.contains("- 本卦：未知卦"));
        assert!(!prompt.contains("象辞"));
        assert!(prompt.contains("第3爻（无数据）"));
    }

    #[test]
    fn test_sanitize_strips_quotes_and_brackets() {
        assert_eq!(
            sanitize_completion("  【运势】\"稳中求进\"，「别急」 \n"),
            "运势稳中求进，别急"
        );
        assert_eq!(sanitize_completion("“顺势而为”"), "顺势而为");
        assert_eq!(sanitize_completion("   "), "");
    }
}
