// 该文件是 Shiwen （识文） 项目的一部分。
// src/task.rs - 单图处理与批处理汇总
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

use thiserror::Error;
use tracing::{debug, info};

use crate::{
  config::{ConfigError, StageConfig, prepare_model_directory},
  frame::{FrameError, FromRgbImage, MaskFrame, RgbFrame, ToRgbImage},
  language::{self, LanguageError, LanguageSelection},
  model::{DetectOptions, ModelError, TextDetector, normalize},
  output::{
    draw::{Draw, DrawError, LabelFont, TtfFont},
    labelme::AnnotationRecord,
  },
};

#[derive(Error, Debug)]
pub enum TaskError {
  #[error("检测结果错误: {0}")]
  ModelError(#[from] ModelError),
  #[error("语言解析错误: {0}")]
  LanguageError(#[from] LanguageError),
  #[error("配置错误: {0}")]
  ConfigError(#[from] ConfigError),
  #[error("绘制错误: {0}")]
  DrawError(#[from] DrawError),
  #[error("帧错误: {0}")]
  FrameError(#[from] FrameError),
  #[error("文字检测引擎错误: {0}")]
  DetectorError(Box<dyn std::error::Error + Send + Sync>),
}

/// 单张图像的处理结果
#[derive(Debug, Clone)]
pub struct ImageResult {
  pub image: RgbFrame,
  pub mask: MaskFrame,
  pub annotation: AnnotationRecord,
}

/// 整批图像的处理结果，`images` 与 `annotations` 的下标与输入一一对应
#[derive(Debug, Clone)]
pub struct BatchOutput {
  pub images: Vec<RgbFrame>,
  pub mask: MaskFrame,
  pub annotations: Vec<AnnotationRecord>,
}

impl BatchOutput {
  fn empty() -> Self {
    Self {
      images: Vec::new(),
      mask: MaskFrame::with_shape(0, 0),
      annotations: Vec::new(),
    }
  }

  pub fn len(&self) -> usize {
    self.images.len()
  }

  pub fn is_empty(&self) -> bool {
    self.images.is_empty()
  }
}

/// 文字检测结果渲染任务
pub struct OcrTask<F = TtfFont> {
  draw: Draw<F>,
  model_storage_directory: PathBuf,
  gpu: bool,
  strict_languages: bool,
}

impl OcrTask<TtfFont> {
  /// 按配置加载字体并创建任务，字体缺失时立即失败
  pub fn from_config(config: &StageConfig) -> Result<Self, TaskError> {
    let draw = Draw::from_font_file(&config.font_path)?;
    Ok(
      Self::new(draw)
        .with_model_storage_directory(config.model_storage_directory())
        .with_gpu(config.gpu)
        .with_strict_languages(config.strict_languages),
    )
  }
}

impl<F: LabelFont> OcrTask<F> {
  pub fn new(draw: Draw<F>) -> Self {
    let defaults = StageConfig::default();
    Self {
      draw,
      model_storage_directory: defaults.model_storage_directory(),
      gpu: defaults.gpu,
      strict_languages: defaults.strict_languages,
    }
  }

  pub fn with_model_storage_directory(mut self, path: impl Into<PathBuf>) -> Self {
    self.model_storage_directory = path.into();
    self
  }

  pub fn with_gpu(mut self, gpu: bool) -> Self {
    self.gpu = gpu;
    self
  }

  pub fn with_strict_languages(mut self, strict: bool) -> Self {
    self.strict_languages = strict;
    self
  }

  pub fn model_storage_directory(&self) -> &Path {
    &self.model_storage_directory
  }

  /// 处理单张图像：检测、绘制、填充蒙版并记录标注
  pub fn process<D: TextDetector>(
    &self,
    detector: &mut D,
    frame: &RgbFrame,
    languages: &[&'static str],
  ) -> Result<ImageResult, TaskError> {
    let (height, width) = frame.shape();
    let mut surface = frame.to_rgb_image();

    let options = DetectOptions {
      languages,
      model_storage_directory: &self.model_storage_directory,
      gpu: self.gpu,
    };
    let now = std::time::Instant::now();
    let detections = detector
      .detect(&surface, &options)
      .map_err(|e| TaskError::DetectorError(Box::new(e)))?;
    info!(
      "检测完成，耗时: {:.2?}，检测到 {} 个文字区域",
      now.elapsed(),
      detections.len()
    );

    let mut annotation = AnnotationRecord::new(height as u32, width as u32);
    let mut mask = MaskFrame::with_shape(height, width);

    for detection in detections.iter() {
      let bbox = normalize(detection)?;
      debug!(
        "  - {}: {:.2} at ({}, {}) - ({}, {})",
        bbox.label, bbox.score, bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max
      );
      self.draw.render(&mut surface, &mut mask, &bbox);
      annotation.record(&bbox);
    }

    Ok(ImageResult {
      image: RgbFrame::from_rgb_image(&surface),
      mask,
      annotation,
    })
  }

  /// 按顺序处理整批图像并合并蒙版
  ///
  /// 任一图像失败则整批失败；空批次直接返回空结果。
  pub fn aggregate<D: TextDetector>(
    &self,
    detector: &mut D,
    frames: &[RgbFrame],
    selection: &LanguageSelection,
  ) -> Result<BatchOutput, TaskError> {
    if frames.is_empty() {
      info!("输入批次为空，跳过处理");
      return Ok(BatchOutput::empty());
    }

    let languages = language::resolve(selection, self.strict_languages)?;
    prepare_model_directory(&self.model_storage_directory)?;

    info!("开始处理 {} 张图像，语言: {:?}", frames.len(), languages);
    let mut images = Vec::with_capacity(frames.len());
    let mut annotations = Vec::with_capacity(frames.len());
    let mut combined: Option<MaskFrame> = None;

    for (index, frame) in frames.iter().enumerate() {
      info!("处理第 {} 张图像 ({}x{})", index, frame.width(), frame.height());
      let ImageResult {
        image,
        mask,
        annotation,
      } = self.process(detector, frame, &languages)?;

      combined = Some(match combined.take() {
        Some(mut acc) => {
          acc.max_assign(&mask)?;
          acc
        }
        None => mask,
      });
      images.push(image);
      annotations.push(annotation);
    }

    info!("处理完成，共 {} 张图像", images.len());
    Ok(BatchOutput {
      images,
      mask: combined.unwrap_or_else(|| MaskFrame::with_shape(0, 0)),
      annotations,
    })
  }
}
