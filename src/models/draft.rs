use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// 选项槽位数量（A..E）
pub const OPTION_SLOTS: usize = 5;

/// 草稿标识：创建时的毫秒时间戳，仅在当前列表内唯一
pub type DraftId = i64;

/// 草稿题目
///
/// 既用作编辑缓冲区，也用作列表中的已提交草稿。
/// 空字符串表示"未填写"，图片字段保存 data URL。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DraftId>,
    pub question: String,
    pub question_image: String,
    pub option1: String,
    pub option1_image: String,
    pub option2: String,
    pub option2_image: String,
    pub option3: String,
    pub option3_image: String,
    pub option4: String,
    pub option4_image: String,
    pub option5: String,
    pub option5_image: String,
    pub correct_answer: String,
    pub category: String,
    pub direction: String,
}

impl DraftQuestion {
    /// 读取字段，槽位越界时返回空字符串
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Question => &self.question,
            DraftField::QuestionImage => &self.question_image,
            DraftField::Option(slot) => match slot {
                1 => &self.option1,
                2 => &self.option2,
                3 => &self.option3,
                4 => &self.option4,
                5 => &self.option5,
                _ => "",
            },
            DraftField::OptionImage(slot) => match slot {
                1 => &self.option1_image,
                2 => &self.option2_image,
                3 => &self.option3_image,
                4 => &self.option4_image,
                5 => &self.option5_image,
                _ => "",
            },
            DraftField::CorrectAnswer => &self.correct_answer,
            DraftField::Category => &self.category,
            DraftField::Direction => &self.direction,
        }
    }

    /// 写入字段（不做内容校验）
    ///
    /// 槽位越界时忽略写入并返回 `false`
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) -> bool {
        match self.slot_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => {
                warn!("字段 {} 的槽位超出范围 1..={}，忽略写入", field, OPTION_SLOTS);
                false
            }
        }
    }

    fn slot_mut(&mut self, field: DraftField) -> Option<&mut String> {
        let slot = match field {
            DraftField::Question => &mut self.question,
            DraftField::QuestionImage => &mut self.question_image,
            DraftField::Option(slot) => match slot {
                1 => &mut self.option1,
                2 => &mut self.option2,
                3 => &mut self.option3,
                4 => &mut self.option4,
                5 => &mut self.option5,
                _ => return None,
            },
            DraftField::OptionImage(slot) => match slot {
                1 => &mut self.option1_image,
                2 => &mut self.option2_image,
                3 => &mut self.option3_image,
                4 => &mut self.option4_image,
                5 => &mut self.option5_image,
                _ => return None,
            },
            DraftField::CorrectAnswer => &mut self.correct_answer,
            DraftField::Category => &mut self.category,
            DraftField::Direction => &mut self.direction,
        };
        Some(slot)
    }

    /// 第 `slot` 个选项（1..=5）
    pub fn option(&self, slot: usize) -> &str {
        self.get(DraftField::Option(slot.clamp(1, OPTION_SLOTS) as u8))
    }

    /// 当前可选的正确答案字母
    ///
    /// 每次调用都根据选项内容重新计算
    pub fn available_letters(&self) -> Vec<char> {
        (1..=OPTION_SLOTS)
            .filter(|&slot| !self.option(slot).trim().is_empty())
            .filter_map(slot_letter)
            .collect()
    }

    /// 除 id 外的字段是否相同
    pub fn same_content(&self, other: &DraftQuestion) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.id = None;
        b.id = None;
        a == b
    }
}

/// 槽位 → 字母：1→A … 5→E
pub fn slot_letter(slot: usize) -> Option<char> {
    if (1..=OPTION_SLOTS).contains(&slot) {
        char::from_u32(64 + slot as u32)
    } else {
        None
    }
}

/// 字母 → 槽位：A→1 … E→5（忽略大小写与首尾空白）
pub fn letter_slot(letter: &str) -> Option<usize> {
    let mut chars = letter.trim().chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    let slot = (c as u32).checked_sub(64)? as usize;
    (1..=OPTION_SLOTS).contains(&slot).then_some(slot)
}

/// 缓冲区中可寻址的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Question,
    QuestionImage,
    /// 选项槽位 1..=5
    Option(u8),
    /// 选项图片槽位 1..=5
    OptionImage(u8),
    CorrectAnswer,
    Category,
    Direction,
}

impl DraftField {
    /// 选项槽位是否在 1..=5 内，非选项字段总是有效
    pub fn is_valid(self) -> bool {
        match self {
            DraftField::Option(slot) | DraftField::OptionImage(slot) => {
                (1..=OPTION_SLOTS as u8).contains(&slot)
            }
            _ => true,
        }
    }

    /// 是否为图片字段
    pub fn is_image(self) -> bool {
        matches!(self, DraftField::QuestionImage | DraftField::OptionImage(_))
    }

    /// 字段的线上名称
    pub fn name(self) -> String {
        match self {
            DraftField::Question => "question".to_string(),
            DraftField::QuestionImage => "question_image".to_string(),
            DraftField::Option(slot) => format!("option{}", slot),
            DraftField::OptionImage(slot) => format!("option{}_image", slot),
            DraftField::CorrectAnswer => "correct_answer".to_string(),
            DraftField::Category => "category".to_string(),
            DraftField::Direction => "direction".to_string(),
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 无法识别的字段名
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知字段: {0}")]
pub struct UnknownField(pub String);

impl FromStr for DraftField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => return Ok(DraftField::Question),
            "question_image" => return Ok(DraftField::QuestionImage),
            "correct_answer" => return Ok(DraftField::CorrectAnswer),
            "category" => return Ok(DraftField::Category),
            "direction" => return Ok(DraftField::Direction),
            _ => {}
        }

        let rest = s
            .strip_prefix("option")
            .ok_or_else(|| UnknownField(s.to_string()))?;
        let (digits, is_image) = match rest.strip_suffix("_image") {
            Some(d) => (d, true),
            None => (rest, false),
        };
        let slot: u8 = digits.parse().map_err(|_| UnknownField(s.to_string()))?;
        if !(1..=OPTION_SLOTS as u8).contains(&slot) {
            return Err(UnknownField(s.to_string()));
        }

        Ok(if is_image {
            DraftField::OptionImage(slot)
        } else {
            DraftField::Option(slot)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_letter_mapping() {
        assert_eq!(slot_letter(1), Some('A'));
        assert_eq!(slot_letter(5), Some('E'));
        assert_eq!(slot_letter(0), None);
        assert_eq!(slot_letter(6), None);
        assert_eq!(letter_slot("c"), Some(3));
        assert_eq!(letter_slot(" E "), Some(5));
        assert_eq!(letter_slot("F"), None);
        assert_eq!(letter_slot("AB"), None);
        assert_eq!(letter_slot(""), None);
    }

    #[test]
    fn test_available_letters_follow_filled_options() {
        let mut draft = DraftQuestion::default();
        draft.set(DraftField::Option(1), "Manila");
        draft.set(DraftField::Option(3), "Cebu");
        assert_eq!(draft.available_letters(), vec!['A', 'C']);

        draft.set(DraftField::Option(3), "   ");
        assert_eq!(draft.available_letters(), vec!['A']);
    }

    #[test]
    fn test_out_of_range_slot_is_ignored() {
        let mut draft = DraftQuestion::default();
        draft.set(DraftField::Option(5), "five");
        draft.set(DraftField::OptionImage(5), "data:image/png;base64,AA==");

        assert!(!draft.set(DraftField::Option(0), "zero"));
        assert!(!draft.set(DraftField::OptionImage(9), "img"));
        assert_eq!(draft.option5, "five");
        assert_eq!(draft.option5_image, "data:image/png;base64,AA==");
        assert_eq!(draft.get(DraftField::Option(0)), "");
        assert_eq!(draft.get(DraftField::OptionImage(9)), "");
        assert!(!DraftField::Option(6).is_valid());
        assert!(DraftField::Option(1).is_valid());
        assert!(DraftField::Category.is_valid());
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("option3".parse::<DraftField>(), Ok(DraftField::Option(3)));
        assert_eq!(
            "option5_image".parse::<DraftField>(),
            Ok(DraftField::OptionImage(5))
        );
        assert_eq!("question_image".parse::<DraftField>(), Ok(DraftField::QuestionImage));
        assert!("option6".parse::<DraftField>().is_err());
        assert!("answer".parse::<DraftField>().is_err());
        assert_eq!(DraftField::OptionImage(2).name(), "option2_image");
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let draft: DraftQuestion =
            serde_json::from_str(r#"{"id": 7, "question": "Q?", "option1": "x"}"#).unwrap();
        assert_eq!(draft.id, Some(7));
        assert_eq!(draft.option2, "");
        assert_eq!(draft.category, "");
    }
}
