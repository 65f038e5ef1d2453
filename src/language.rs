// 该文件是 Shiwen （识文） 项目的一部分。
// src/language.rs - 识别语言目录与解析
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use thiserror::Error;
use tracing::{debug, warn};

/// 语言名称到语言代码的映射，顺序即预设列表的展示顺序
pub const LANGUAGES: &[(&str, &str)] = &[
  ("English", "en"),
  ("简体中文", "ch_sim"),
  ("繁體中文", "ch_tra"),
  ("العربية", "ar"),
  ("Azərbaycan", "az"),
  ("Euskal", "eu"),
  ("Bosanski", "bs"),
  ("Български", "bg"),
  ("Català", "ca"),
  ("Hrvatski", "hr"),
  ("Čeština", "cs"),
  ("Dansk", "da"),
  ("Nederlands", "nl"),
  ("Eesti", "et"),
  ("Suomi", "fi"),
  ("Français", "fr"),
  ("Galego", "gl"),
  ("Deutsch", "de"),
  ("Ελληνικά", "el"),
  ("עברית", "he"),
  ("हिन्दी", "hi"),
  ("Magyar", "hu"),
  ("Íslenska", "is"),
  ("Indonesia", "id"),
  ("Italiano", "it"),
  ("日本語", "ja"),
  ("한국어", "ko"),
  ("Latviešu", "lv"),
  ("Lietuvių", "lt"),
  ("Македонски", "mk"),
  ("Norsk", "no"),
  ("Polski", "pl"),
  ("Português", "pt"),
  ("Română", "ro"),
  ("Русский", "ru"),
  ("Српски", "sr"),
  ("Slovenčina", "sk"),
  ("Slovenščina", "sl"),
  ("Español", "es"),
  ("Svenska", "sv"),
  ("ไทย", "th"),
  ("Türkçe", "tr"),
  ("Українська", "uk"),
  ("Tiếng Việt", "vi"),
];

pub const DEFAULT_LANGUAGE_NAME: &str = "English";
pub const DEFAULT_LANGUAGE_CODES: &str = "ch_sim,en";

/// 语言选择方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSelection {
  /// 从预设列表中按名称选择一种语言
  Choose(String),
  /// 逗号分隔的语言代码
  Input(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
  #[error("没有可用的识别语言: {0:?}")]
  Empty(String),
  #[error("未知的语言: {0}")]
  UnknownLanguage(String),
}

/// 预设语言名称列表
pub fn names() -> impl Iterator<Item = &'static str> {
  LANGUAGES.iter().map(|(name, _)| *name)
}

/// 按名称查找语言代码，先精确匹配，再忽略大小写匹配
pub fn code_of(name: &str) -> Option<&'static str> {
  LANGUAGES
    .iter()
    .find(|(n, _)| *n == name)
    .or_else(|| {
      let folded = name.to_lowercase();
      LANGUAGES.iter().find(|(n, _)| n.to_lowercase() == folded)
    })
    .map(|(_, code)| *code)
}

/// 查找目录中的语言代码，输入需已转为小写
fn known_code(code: &str) -> Option<&'static str> {
  LANGUAGES.iter().find(|(_, c)| *c == code).map(|(_, c)| *c)
}

/// 将语言选择解析为语言代码列表
///
/// 非严格模式下无法识别的代码会被丢弃；严格模式下返回
/// [`LanguageError::UnknownLanguage`]。解析结果为空时返回
/// [`LanguageError::Empty`]。
pub fn resolve(
  selection: &LanguageSelection,
  strict: bool,
) -> Result<Vec<&'static str>, LanguageError> {
  let mut codes: Vec<&'static str> = Vec::new();

  match selection {
    LanguageSelection::Choose(name) => match code_of(name.trim()) {
      Some(code) => codes.push(code),
      None if strict => return Err(LanguageError::UnknownLanguage(name.clone())),
      None => warn!("未知的预设语言 {:?}，已忽略", name),
    },
    LanguageSelection::Input(text) => {
      for item in text.to_lowercase().split(',') {
        let item = item.trim();
        if item.is_empty() {
          continue;
        }
        match known_code(item) {
          Some(code) if !codes.contains(&code) => codes.push(code),
          Some(_) => {}
          None if strict => return Err(LanguageError::UnknownLanguage(item.to_string())),
          None => warn!("未知的语言代码 {:?}，已忽略", item),
        }
      }
    }
  }

  if codes.is_empty() {
    let raw = match selection {
      LanguageSelection::Choose(s) | LanguageSelection::Input(s) => s.clone(),
    };
    return Err(LanguageError::Empty(raw));
  }

  debug!("识别语言: {:?}", codes);
  Ok(codes)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn catalog_has_every_preset() {
    assert_eq!(names().count(), 44);
    assert_eq!(names().next(), Some("English"));
    assert_eq!(code_of("简体中文"), Some("ch_sim"));
    assert_eq!(code_of("Tiếng Việt"), Some("vi"));
  }

  #[test]
  fn choose_is_case_insensitive() {
    let codes = resolve(&LanguageSelection::Choose("english".into()), false).unwrap();
    assert_eq!(codes, vec!["en"]);
    let codes = resolve(&LanguageSelection::Choose("Deutsch".into()), false).unwrap();
    assert_eq!(codes, vec!["de"]);
  }

  #[test]
  fn input_is_lowercased_and_trimmed() {
    let codes = resolve(&LanguageSelection::Input("EN, ch_sim".into()), false).unwrap();
    assert_eq!(codes, vec!["en", "ch_sim"]);
  }

  #[test]
  fn input_drops_unknown_codes() {
    let codes = resolve(&LanguageSelection::Input("xx,ja,,klingon".into()), false).unwrap();
    assert_eq!(codes, vec!["ja"]);
  }

  #[test]
  fn input_removes_duplicates_keeping_order() {
    let codes = resolve(&LanguageSelection::Input("fr,en,FR".into()), false).unwrap();
    assert_eq!(codes, vec!["fr", "en"]);
  }

  #[test]
  fn strict_mode_rejects_unknown_codes() {
    let err = resolve(&LanguageSelection::Input("en,xx".into()), true).unwrap_err();
    assert_eq!(err, LanguageError::UnknownLanguage("xx".into()));

    let err = resolve(&LanguageSelection::Choose("Klingon".into()), true).unwrap_err();
    assert_eq!(err, LanguageError::UnknownLanguage("Klingon".into()));
  }

  #[test]
  fn empty_resolution_fails_fast() {
    let err = resolve(&LanguageSelection::Input("xx, yy".into()), false).unwrap_err();
    assert_eq!(err, LanguageError::Empty("xx, yy".into()));

    let err = resolve(&LanguageSelection::Choose("Klingon".into()), false).unwrap_err();
    assert!(matches!(err, LanguageError::Empty(_)));

    let err = resolve(&LanguageSelection::Input("".into()), false).unwrap_err();
    assert!(matches!(err, LanguageError::Empty(_)));
  }
}
