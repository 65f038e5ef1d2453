// 该文件是 Shiwen （识文） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{FromRgbImage, RgbFrame},
};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像加载错误: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 按顺序读取的一组图像文件
#[derive(Debug, Clone, Default)]
pub struct ImageFileInput {
  paths: Vec<PathBuf>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI 方案不匹配: 期望 '{}', 实际 '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemeMismatch(url.scheme().to_string()));
    }

    Ok(Self::new([url.path()]))
  }
}

impl ImageFileInput {
  pub fn new<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
    Self {
      paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
    }
  }

  /// 合并另一组输入，保持顺序
  pub fn chain(mut self, other: ImageFileInput) -> Self {
    self.paths.extend(other.paths);
    self
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  /// 依次解码所有图像，任一失败则整体失败
  pub fn read_frames(&self) -> Result<Vec<RgbFrame>, ImageFileInputError> {
    self.paths.iter().map(|path| read_frame(path)).collect()
  }
}

fn read_frame(path: &Path) -> Result<RgbFrame, ImageFileInputError> {
  let image = ImageReader::open(path)?.decode()?.into_rgb8();
  debug!(
    "读取图像 {}: {}x{}",
    path.display(),
    image.width(),
    image.height()
  );
  Ok(RgbFrame::from_rgb_image(&image))
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  #[test]
  fn reads_frames_in_order() {
    let directory =
      std::env::temp_dir().join(format!("shiwen-input-{}", std::process::id()));
    std::fs::create_dir_all(&directory).unwrap();

    let first = directory.join("first.png");
    let second = directory.join("second.png");
    RgbImage::from_pixel(3, 2, Rgb([255, 0, 0])).save(&first).unwrap();
    RgbImage::from_pixel(3, 2, Rgb([0, 0, 255])).save(&second).unwrap();

    let input = ImageFileInput::new([&first]).chain(ImageFileInput::new([&second]));
    assert_eq!(input.len(), 2);

    let frames = input.read_frames().unwrap();
    assert_eq!(frames[0].shape(), (2, 3));
    assert_eq!(frames[0].pixel(0, 0), [1.0, 0.0, 0.0]);
    assert_eq!(frames[1].pixel(2, 1), [0.0, 0.0, 1.0]);

    std::fs::remove_dir_all(&directory).unwrap();
  }

  #[test]
  fn missing_file_is_an_error() {
    let input = ImageFileInput::new(["/nonexistent/shiwen/missing.png"]);
    assert!(matches!(
      input.read_frames(),
      Err(ImageFileInputError::IoError(_))
    ));
  }

  #[test]
  fn rejects_foreign_scheme() {
    let url = Url::parse("folder:///tmp/out").unwrap();
    assert!(matches!(
      ImageFileInput::from_url(&url),
      Err(ImageFileInputError::SchemeMismatch(_))
    ));
  }
}
