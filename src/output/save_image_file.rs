// 该文件是 Shiwen （识文） 项目的一部分。
// src/output/save_image_file.rs - 保存批处理结果
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

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ToRgbImage,
  task::BatchOutput,
};

pub const MASK_FILE_NAME: &str = "mask.png";
pub const ANNOTATIONS_FILE_NAME: &str = "annotations.json";

#[derive(Error, Debug)]
pub enum SaveOutputError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

/// 将批处理结果写入目录：
/// `image-0000.png ...`、`mask.png` 与 `annotations.json`
pub struct SaveOutput {
  directory: PathBuf,
}

impl FromUrlWithScheme for SaveOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for SaveOutput {
  type Error = SaveOutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveOutputError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(Self::new(uri.path()))
  }
}

impl SaveOutput {
  pub fn new(directory: impl AsRef<Path>) -> Self {
    Self {
      directory: directory.as_ref().to_path_buf(),
    }
  }

  pub fn image_path(&self, index: usize) -> PathBuf {
    self.directory.join(format!("image-{:04}.png", index))
  }

  pub fn save(&self, output: &BatchOutput) -> Result<(), SaveOutputError> {
    std::fs::create_dir_all(&self.directory)?;

    for (index, frame) in output.images.iter().enumerate() {
      let path = self.image_path(index);
      frame.to_rgb_image().save(&path)?;
      info!("保存图像到文件: {}", path.display());
    }

    if output.mask.height() > 0 && output.mask.width() > 0 {
      let path = self.directory.join(MASK_FILE_NAME);
      output.mask.to_gray_image().save(&path)?;
      info!("保存蒙版到文件: {}", path.display());
    } else {
      warn!("蒙版为空，跳过保存");
    }

    let path = self.directory.join(ANNOTATIONS_FILE_NAME);
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, &output.annotations)?;
    info!("保存标注到文件: {}", path.display());

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    frame::{MaskFrame, RgbFrame},
    output::labelme::AnnotationRecord,
  };

  fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("shiwen-save-{}-{}", name, std::process::id()))
  }

  #[test]
  fn writes_every_artifact() {
    let directory = scratch("all");
    let output = BatchOutput {
      images: vec![RgbFrame::filled(4, 6, [0.0, 1.0, 0.0]); 2],
      mask: MaskFrame::with_shape(4, 6),
      annotations: vec![AnnotationRecord::new(4, 6), AnnotationRecord::new(4, 6)],
    };

    let saver = SaveOutput::new(&directory);
    saver.save(&output).unwrap();

    let image = image::open(saver.image_path(1)).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (6, 4));
    assert_eq!(image.get_pixel(0, 0), &image::Rgb([0, 255, 0]));
    assert!(directory.join(MASK_FILE_NAME).is_file());

    let text = std::fs::read_to_string(directory.join(ANNOTATIONS_FILE_NAME)).unwrap();
    let records: Vec<AnnotationRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(records, output.annotations);

    std::fs::remove_dir_all(&directory).unwrap();
  }

  #[test]
  fn empty_batch_writes_only_annotations() {
    let directory = scratch("empty");
    let output = BatchOutput {
      images: Vec::new(),
      mask: MaskFrame::with_shape(0, 0),
      annotations: Vec::new(),
    };

    SaveOutput::new(&directory).save(&output).unwrap();
    assert!(!directory.join(MASK_FILE_NAME).exists());
    let text = std::fs::read_to_string(directory.join(ANNOTATIONS_FILE_NAME)).unwrap();
    assert_eq!(text.trim(), "[]");

    std::fs::remove_dir_all(&directory).unwrap();
  }
}
