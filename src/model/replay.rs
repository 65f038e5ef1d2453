// 该文件是 Shiwen （识文） 项目的一部分。
// src/model/replay.rs - 回放预先保存的检测结果
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

use std::collections::VecDeque;
use std::convert::Infallible;
use std::path::Path;

use image::RgbImage;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DetectOptions, Detection, ModelError, TextDetector},
};

/// 回放文件格式: `{"images": [[Detection, ...], ...]}`
#[derive(Debug, Deserialize)]
struct ReplayDocument {
  images: Vec<Vec<Detection>>,
}

/// 按调用顺序回放检测结果的检测器
///
/// 第 n 次调用返回第 n 张图像的结果，回放耗尽后返回空结果。
#[derive(Debug, Default)]
pub struct ReplayDetector {
  pending: VecDeque<Vec<Detection>>,
}

impl ReplayDetector {
  pub fn new(images: Vec<Vec<Detection>>) -> Self {
    Self {
      pending: images.into(),
    }
  }

  pub fn from_json(content: &str) -> Result<Self, ModelError> {
    let document: ReplayDocument = serde_json::from_str(content)?;
    Ok(Self::new(document.images))
  }

  pub fn open(path: impl AsRef<Path>) -> Result<Self, ModelError> {
    let path = path.as_ref();
    info!("加载回放文件: {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let detector = Self::from_json(&content)?;
    debug!("回放图像数量: {}", detector.remaining());
    Ok(detector)
  }

  pub fn remaining(&self) -> usize {
    self.pending.len()
  }
}

impl FromUrlWithScheme for ReplayDetector {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayDetector {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ModelError::SchemeMismatch(format!(
        "期望方案 '{}', 实际方案 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Self::open(url.path())
  }
}

impl TextDetector for ReplayDetector {
  type Error = Infallible;

  fn detect(
    &mut self,
    image: &RgbImage,
    options: &DetectOptions<'_>,
  ) -> Result<Vec<Detection>, Self::Error> {
    debug!(
      "回放检测: {}x{}, 语言 {:?}, GPU {}",
      image.width(),
      image.height(),
      options.languages,
      options.gpu
    );
    match self.pending.pop_front() {
      Some(detections) => Ok(detections),
      None => {
        warn!("回放结果已耗尽，返回空结果");
        Ok(Vec::new())
      }
    }
  }
}
