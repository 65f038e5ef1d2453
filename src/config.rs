// 该文件是 Shiwen （识文） 项目的一部分。
// src/config.rs - 处理阶段配置
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

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;
use tracing::info;

use crate::{
  language::{DEFAULT_LANGUAGE_CODES, DEFAULT_LANGUAGE_NAME, LanguageSelection},
  output::draw::DEFAULT_FONT_PATH,
};

/// 模型存储根目录下的子目录名
pub const MODEL_DIR_NAME: &str = "EasyOCR";
pub const DEFAULT_MODELS_ROOT: &str = "models";

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("无法创建模型存储目录 {}: {source}", .path.display())]
  StorageDirectory {
    path: PathBuf,
    source: std::io::Error,
  },
}

/// 语言的指定方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DetectMode {
  /// 使用预设语言名称
  #[default]
  Choose,
  /// 使用逗号分隔的语言代码
  Input,
}

#[derive(Debug, Clone)]
pub struct StageConfig {
  pub gpu: bool,
  pub detect: DetectMode,
  /// 预设语言名称，`Choose` 模式下使用
  pub language_list: String,
  /// 语言代码列表，`Input` 模式下使用
  pub language_name: String,
  /// 遇到未知语言代码时报错而不是忽略
  pub strict_languages: bool,
  pub models_root: PathBuf,
  pub font_path: PathBuf,
}

impl Default for StageConfig {
  fn default() -> Self {
    Self {
      gpu: true,
      detect: DetectMode::Choose,
      language_list: DEFAULT_LANGUAGE_NAME.to_string(),
      language_name: DEFAULT_LANGUAGE_CODES.to_string(),
      strict_languages: false,
      models_root: PathBuf::from(DEFAULT_MODELS_ROOT),
      font_path: PathBuf::from(DEFAULT_FONT_PATH),
    }
  }
}

impl StageConfig {
  pub fn selection(&self) -> LanguageSelection {
    match self.detect {
      DetectMode::Choose => LanguageSelection::Choose(self.language_list.clone()),
      DetectMode::Input => LanguageSelection::Input(self.language_name.clone()),
    }
  }

  pub fn model_storage_directory(&self) -> PathBuf {
    self.models_root.join(MODEL_DIR_NAME)
  }
}

/// 确保模型存储目录存在，可重复调用
pub fn prepare_model_directory(path: &Path) -> Result<(), ConfigError> {
  if path.is_dir() {
    return Ok(());
  }

  info!("创建模型存储目录: {}", path.display());
  std::fs::create_dir_all(path).map_err(|source| ConfigError::StorageDirectory {
    path: path.to_path_buf(),
    source,
  })
}
