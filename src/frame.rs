// 该文件是 Shiwen （识文） 项目的一部分。
// src/frame.rs - HWC 浮点帧与蒙版定义
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

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use thiserror::Error;

const RGB_CHANNELS: usize = 3;

/// 单通道浮点图像，作为蒙版的底层存储
pub type MaskImage = ImageBuffer<Luma<f32>, Vec<f32>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
  #[error("数据长度不匹配: 期望长度 {expected}, 实际长度 {actual}")]
  LengthMismatch { expected: usize, actual: usize },
  #[error("尺寸不匹配: 期望 {expected:?}, 实际 {actual:?}")]
  ShapeMismatch {
    expected: (usize, usize),
    actual: (usize, usize),
  },
}

/// RGB 帧，HWC 布局，像素值范围 [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct RgbFrame {
  height: usize,
  width: usize,
  data: Box<[f32]>,
}

impl RgbFrame {
  pub fn from_vec(height: usize, width: usize, data: Vec<f32>) -> Result<Self, FrameError> {
    let expected = RGB_CHANNELS * height * width;
    if data.len() != expected {
      return Err(FrameError::LengthMismatch {
        expected,
        actual: data.len(),
      });
    }

    Ok(Self {
      height,
      width,
      data: data.into_boxed_slice(),
    })
  }

  /// 纯色帧
  pub fn filled(height: usize, width: usize, color: [f32; 3]) -> Self {
    let data = color
      .iter()
      .copied()
      .cycle()
      .take(RGB_CHANNELS * height * width)
      .collect::<Vec<_>>();
    Self {
      height,
      width,
      data: data.into_boxed_slice(),
    }
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  /// (高, 宽)
  pub fn shape(&self) -> (usize, usize) {
    (self.height, self.width)
  }

  pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
    let idx = (y * self.width + x) * RGB_CHANNELS;
    [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
  }
}

impl AsMut<[f32]> for RgbFrame {
  fn as_mut(&mut self) -> &mut [f32] {
    &mut self.data
  }
}

/// 单通道蒙版，H x W x 1，值为 0.0 或 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct MaskFrame {
  image: MaskImage,
}

impl MaskFrame {
  pub fn with_shape(height: usize, width: usize) -> Self {
    Self {
      image: MaskImage::new(width as u32, height as u32),
    }
  }

  pub fn height(&self) -> usize {
    self.image.height() as usize
  }

  pub fn width(&self) -> usize {
    self.image.width() as usize
  }

  pub fn shape(&self) -> (usize, usize) {
    (self.height(), self.width())
  }

  pub fn get(&self, x: usize, y: usize) -> f32 {
    self.image.get_pixel(x as u32, y as u32)[0]
  }

  pub fn as_slice(&self) -> &[f32] {
    self.image.as_raw()
  }

  pub fn as_image_mut(&mut self) -> &mut MaskImage {
    &mut self.image
  }

  /// 是否全为 0
  pub fn is_blank(&self) -> bool {
    self.image.as_raw().iter().all(|v| *v == 0.0)
  }

  /// 逐元素取最大值，相当于覆盖区域的逻辑或
  pub fn max_assign(&mut self, other: &MaskFrame) -> Result<(), FrameError> {
    if self.shape() != other.shape() {
      return Err(FrameError::ShapeMismatch {
        expected: self.shape(),
        actual: other.shape(),
      });
    }

    for (dst, src) in self.image.iter_mut().zip(other.image.iter()) {
      *dst = dst.max(*src);
    }
    Ok(())
  }

  /// 转为 0/255 灰度图
  pub fn to_gray_image(&self) -> GrayImage {
    ImageBuffer::from_fn(self.image.width(), self.image.height(), |x, y| {
      let value = self.image.get_pixel(x, y)[0];
      Luma([(value.clamp(0.0, 1.0) * 255.0) as u8])
    })
  }
}

pub trait ToRgbImage {
  fn to_rgb_image(&self) -> RgbImage;
}

pub trait FromRgbImage {
  fn from_rgb_image(image: &RgbImage) -> Self;
}

impl ToRgbImage for RgbFrame {
  fn to_rgb_image(&self) -> RgbImage {
    let width = self.width as u32;
    let height = self.height as u32;

    // [0, 1] 浮点转 8 位，越界值截断
    ImageBuffer::from_fn(width, height, |x, y| {
      let [r, g, b] = self.pixel(x as usize, y as usize);
      Rgb([to_u8(r), to_u8(g), to_u8(b)])
    })
  }
}

impl FromRgbImage for RgbFrame {
  fn from_rgb_image(image: &RgbImage) -> Self {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let data = image
      .as_raw()
      .iter()
      .map(|v| *v as f32 / 255.0)
      .collect::<Vec<_>>();

    Self {
      height,
      width,
      data: data.into_boxed_slice(),
    }
  }
}

fn to_u8(value: f32) -> u8 {
  (value * 255.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_vec_rejects_wrong_length() {
    let err = RgbFrame::from_vec(2, 2, vec![0.0; 11]).unwrap_err();
    assert_eq!(
      err,
      FrameError::LengthMismatch {
        expected: 12,
        actual: 11
      }
    );
  }

  #[test]
  fn rgb_image_conversion_keeps_layout() {
    let mut frame = RgbFrame::filled(2, 3, [0.0, 0.0, 1.0]);
    let idx = (3 + 2) * 3; // (x = 2, y = 1)
    frame.as_mut()[idx] = 1.0;

    let image = frame.to_rgb_image();
    assert_eq!(image.dimensions(), (3, 2));
    assert_eq!(image.get_pixel(2, 1), &Rgb([255, 0, 255]));
    assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 255]));

    let back = RgbFrame::from_rgb_image(&image);
    assert_eq!(back, frame);
  }

  #[test]
  fn out_of_range_values_are_clipped() {
    let frame = RgbFrame::from_vec(1, 1, vec![-0.5, 2.0, 0.5]).unwrap();
    let image = frame.to_rgb_image();
    assert_eq!(image.get_pixel(0, 0), &Rgb([0, 255, 127]));
  }

  #[test]
  fn max_assign_is_union() {
    let mut a = MaskFrame::with_shape(2, 2);
    let mut b = MaskFrame::with_shape(2, 2);
    a.as_image_mut().put_pixel(0, 0, Luma([1.0]));
    b.as_image_mut().put_pixel(1, 1, Luma([1.0]));

    a.max_assign(&b).unwrap();
    assert_eq!(a.as_slice(), &[1.0, 0.0, 0.0, 1.0]);
  }

  #[test]
  fn max_assign_rejects_different_shapes() {
    let mut a = MaskFrame::with_shape(2, 2);
    let b = MaskFrame::with_shape(2, 3);
    let err = a.max_assign(&b).unwrap_err();
    assert_eq!(
      err,
      FrameError::ShapeMismatch {
        expected: (2, 2),
        actual: (2, 3)
      }
    );
  }

  #[test]
  fn gray_image_uses_full_intensity() {
    let mut mask = MaskFrame::with_shape(1, 2);
    assert!(mask.is_blank());
    mask.as_image_mut().put_pixel(1, 0, Luma([1.0]));
    let gray = mask.to_gray_image();
    assert_eq!(gray.as_raw(), &vec![0, 255]);
    assert!(!mask.is_blank());
  }
}
