// 该文件是 Shiwen （识文） 项目的一部分。
// src/args.rs - 项目参数配置
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

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use shiwen::{
  config::{DEFAULT_MODELS_ROOT, DetectMode, StageConfig},
  language::{DEFAULT_LANGUAGE_CODES, DEFAULT_LANGUAGE_NAME},
  output::draw::DEFAULT_FONT_PATH,
};

/// Shiwen 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图像，可重复指定，按指定顺序处理
  /// 例如: image:///data/page-1.png
  #[arg(long, value_name = "SOURCE", required = true)]
  pub input: Vec<Url>,

  /// 预先保存的检测结果
  /// 例如: replay:///data/detections.json
  #[arg(long, value_name = "DETECTIONS")]
  pub detections: Url,

  /// 输出目录
  /// 例如: folder:///data/out
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,

  /// 使用 GPU 运行检测引擎
  #[arg(long, default_value_t = false)]
  pub gpu: bool,

  /// 语言指定方式
  #[arg(long, value_enum, default_value_t = DetectMode::Choose)]
  pub detect: DetectMode,

  /// 预设语言名称（choose 模式）
  #[arg(long, default_value = DEFAULT_LANGUAGE_NAME, value_name = "NAME")]
  pub language_list: String,

  /// 逗号分隔的语言代码（input 模式）
  #[arg(long, default_value = DEFAULT_LANGUAGE_CODES, value_name = "CODES")]
  pub language_name: String,

  /// 遇到未知语言代码时报错
  #[arg(long, default_value_t = false)]
  pub strict_languages: bool,

  /// 模型存储根目录
  #[arg(long, default_value = DEFAULT_MODELS_ROOT, value_name = "DIR")]
  pub model_dir: PathBuf,

  /// 标签字体文件
  #[arg(long, default_value = DEFAULT_FONT_PATH, value_name = "FILE")]
  pub font: PathBuf,
}

impl Args {
  pub fn stage_config(&self) -> StageConfig {
    StageConfig {
      gpu: self.gpu,
      detect: self.detect,
      language_list: self.language_list.clone(),
      language_name: self.language_name.clone(),
      strict_languages: self.strict_languages,
      models_root: self.model_dir.clone(),
      font_path: self.font.clone(),
    }
  }
}
