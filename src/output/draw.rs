// 该文件是 Shiwen （识文） 项目的一部分。
// src/output/draw.rs - 检测框、标签与蒙版绘制
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

use ab_glyph::{FontVec, PxScale};
use image::{Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use thiserror::Error;
use tracing::{debug, info};

use crate::{frame::MaskFrame, model::CanonicalBox};

// 绘制常量
pub const DEFAULT_FONT_PATH: &str = "assets/DejaVuSans.ttf";
const LABEL_FONT_SIZE: f32 = 20.0;
const BOX_STROKE_WIDTH: i32 = 3;
const LABEL_TAG_PADDING: i32 = 10;
const BOX_COLOR: [u8; 3] = [255, 0, 0]; // 红色
const TEXT_COLOR: [u8; 3] = [255, 255, 255]; // 白色
const MASK_VALUE: f32 = 1.0;

#[derive(Error, Debug)]
pub enum DrawError {
  #[error("无法加载字体文件 {}: {reason}", .path.display())]
  FontAssetMissing { path: PathBuf, reason: String },
}

/// 标签文字的测量与绘制
pub trait LabelFont {
  /// 文字渲染后的 (宽, 高)
  fn text_size(&self, text: &str) -> (u32, u32);

  /// 以 (x, y) 为左上角绘制文字，超出图像的部分被裁剪
  fn draw_text(&self, image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str);
}

/// TrueType 字体
pub struct TtfFont {
  font: FontVec,
  scale: PxScale,
}

impl TtfFont {
  pub fn load(path: impl AsRef<Path>) -> Result<Self, DrawError> {
    let path = path.as_ref();
    info!("加载字体文件: {}", path.display());
    let data = std::fs::read(path).map_err(|e| DrawError::FontAssetMissing {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;
    Self::parse(data, path)
  }

  pub fn from_vec(data: Vec<u8>) -> Result<Self, DrawError> {
    Self::parse(data, Path::new(""))
  }

  fn parse(data: Vec<u8>, path: &Path) -> Result<Self, DrawError> {
    let font = FontVec::try_from_vec(data).map_err(|e| DrawError::FontAssetMissing {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;

    Ok(Self {
      font,
      scale: PxScale::from(LABEL_FONT_SIZE),
    })
  }
}

impl LabelFont for TtfFont {
  fn text_size(&self, text: &str) -> (u32, u32) {
    text_size(self.scale, &self.font, text)
  }

  fn draw_text(&self, image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
    draw_text_mut(image, color, x, y, self.scale, &self.font, text);
  }
}

/// 单个检测结果的渲染器
pub struct Draw<F = TtfFont> {
  font: F,
  box_color: Rgb<u8>,
  text_color: Rgb<u8>,
  stroke_width: i32,
}

impl Draw<TtfFont> {
  pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self, DrawError> {
    Ok(Self::with_font(TtfFont::load(path)?))
  }
}

impl<F: LabelFont> Draw<F> {
  pub fn with_font(font: F) -> Self {
    Self {
      font,
      box_color: Rgb(BOX_COLOR),
      text_color: Rgb(TEXT_COLOR),
      stroke_width: BOX_STROKE_WIDTH,
    }
  }

  pub fn font(&self) -> &F {
    &self.font
  }

  /// 在图像上绘制检测框与标签，并在蒙版上填充检测区域
  pub fn render(&self, surface: &mut RgbImage, mask: &mut MaskFrame, bbox: &CanonicalBox) {
    self.draw_outline(surface, bbox);
    self.draw_label_tag(surface, bbox);
    stamp_mask(mask, bbox);
  }

  // 描边向内收缩，与框的外沿对齐；四条边各为一条宽度为描边宽度的色带
  fn draw_outline(&self, image: &mut RgbImage, bbox: &CanonicalBox) {
    let (x0, y0, x1, y1) = bbox.bounds();
    let s = self.stroke_width as i64 - 1;
    let bands = [
      (x0, y0, x1, (y0 + s).min(y1)),
      (x0, (y1 - s).max(y0), x1, y1),
      (x0, y0, (x0 + s).min(x1), y1),
      ((x1 - s).max(x0), y0, x1, y1),
    ];

    let (width, height) = image.dimensions();
    for (bx0, by0, bx1, by1) in bands {
      if let Some(rect) = clip_rect(bx0, by0, bx1, by1, width, height) {
        draw_filled_rect_mut(image, rect, self.box_color);
      }
    }
  }

  // 标签位于框的正上方，顶边不做截断，只绘制图像内的部分
  fn draw_label_tag(&self, image: &mut RgbImage, bbox: &CanonicalBox) {
    let label = bbox.tag();
    let (text_width, text_height) = self.font.text_size(&label);

    let (x0, y0, _, _) = bbox.bounds();
    let tag_top = y0 - text_height as i64 - LABEL_TAG_PADDING as i64;
    let (width, height) = image.dimensions();
    let Some(rect) = clip_rect(x0, tag_top, x0 + text_width as i64, y0, width, height) else {
      return;
    };
    debug!("绘制标签 {:?} 于 {:?}", label, rect);

    draw_filled_rect_mut(image, rect, self.box_color);
    // 标签可见时 tag_top 不小于 -(文字高 + 边距)
    self
      .font
      .draw_text(image, self.text_color, bbox.x_min, tag_top as i32, &label);
  }
}

/// 在蒙版上填充检测框覆盖的区域（含边界）
pub fn stamp_mask(mask: &mut MaskFrame, bbox: &CanonicalBox) {
  let (x0, y0, x1, y1) = bbox.bounds();
  let image = mask.as_image_mut();
  let (width, height) = image.dimensions();
  if let Some(rect) = clip_rect(x0, y0, x1, y1, width, height) {
    draw_filled_rect_mut(image, rect, Luma([MASK_VALUE]));
  }
}

/// 将含边界的矩形 [x0, x1] x [y0, y1] 裁剪到 width x height 的图像内
fn clip_rect(x0: i64, y0: i64, x1: i64, y1: i64, width: u32, height: u32) -> Option<Rect> {
  let (x0, y0) = (x0.max(0), y0.max(0));
  let (x1, y1) = (x1.min(width as i64 - 1), y1.min(height as i64 - 1));
  if x0 > x1 || y0 > y1 {
    return None;
  }
  Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32))
}
