// 该文件是 Shiwen （识文） 项目的一部分。
// src/model.rs - 文字检测结果与检测引擎接口
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

use std::path::Path;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 文字检测引擎输出的一条原始结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
  /// 四边形顶点，点 0 与点 2 为对角
  pub points: Vec<[f32; 2]>,
  pub label: String,
  pub score: f64,
}

impl Detection {
  pub fn new(points: impl Into<Vec<[f32; 2]>>, label: impl Into<String>, score: f64) -> Self {
    Self {
      points: points.into(),
      label: label.into(),
      score,
    }
  }
}

/// 由检测结果对角点得到的轴对齐矩形
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalBox {
  pub x_min: i32,
  pub y_min: i32,
  pub x_max: i32,
  pub y_max: i32,
  pub label: String,
  /// 保留两位小数的置信度
  pub score: f64,
}

impl CanonicalBox {
  /// 标签文字，如 `hello:0.91`
  pub fn tag(&self) -> String {
    format!("{}:{:.2}", self.label, self.score)
  }

  /// 标注记录中的阈值文本，取最短表示，如 `0.9`、`1.0`
  pub fn threshold(&self) -> String {
    let text = self.score.to_string();
    if text.contains('.') { text } else { text + ".0" }
  }

  /// 含边界的 (x_min, y_min, x_max, y_max)，以 i64 表示，相减不会溢出
  pub fn bounds(&self) -> (i64, i64, i64, i64) {
    (
      self.x_min as i64,
      self.y_min as i64,
      self.x_max as i64,
      self.y_max as i64,
    )
  }
}

#[derive(Error, Debug)]
pub enum ModelError {
  #[error("检测结果缺少角点: 至少需要 3 个点, 实际 {} 个", .points.len())]
  InvalidDetection { points: Vec<[f32; 2]> },
  #[error("回放文件读取错误: {0}")]
  ReplayIoError(#[from] std::io::Error),
  #[error("回放文件解析错误: {0}")]
  ReplayParseError(#[from] serde_json::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

/// 置信度保留两位小数，对 `score * 100` 做远离零的四舍五入，
/// 因此 0.005 得到 0.01
pub fn round_score(score: f64) -> f64 {
  (score * 100.0).round() / 100.0
}

/// 将一条检测结果规整为 [`CanonicalBox`]
pub fn normalize(detection: &Detection) -> Result<CanonicalBox, ModelError> {
  if detection.points.len() < 3 {
    return Err(ModelError::InvalidDetection {
      points: detection.points.clone(),
    });
  }

  let [x1, y1] = detection.points[0];
  let [x2, y2] = detection.points[2];

  let (x_min, x_max) = sorted(x1.round() as i32, x2.round() as i32);
  let (y_min, y_max) = sorted(y1.round() as i32, y2.round() as i32);

  Ok(CanonicalBox {
    x_min,
    y_min,
    x_max,
    y_max,
    label: detection.label.clone(),
    score: round_score(detection.score),
  })
}

fn sorted(a: i32, b: i32) -> (i32, i32) {
  if a <= b { (a, b) } else { (b, a) }
}

/// 每次调用检测引擎时传入的参数
#[derive(Debug, Clone, Copy)]
pub struct DetectOptions<'a> {
  pub languages: &'a [&'static str],
  pub model_storage_directory: &'a Path,
  pub gpu: bool,
}

/// 外部文字检测/识别引擎
///
/// 引擎不要求可重入，因此 `detect` 取 `&mut self`。
pub trait TextDetector {
  type Error: std::error::Error + Send + Sync + 'static;

  fn detect(
    &mut self,
    image: &RgbImage,
    options: &DetectOptions<'_>,
  ) -> Result<Vec<Detection>, Self::Error>;
}

mod replay;
pub use self::replay::ReplayDetector;

#[cfg(test)]
mod tests {
  use super::*;

  fn detection(p0: [f32; 2], p2: [f32; 2]) -> Detection {
    Detection::new(vec![p0, [p2[0], p0[1]], p2, [p0[0], p2[1]]], "text", 0.5)
  }

  #[test]
  fn normalize_sorts_corners() {
    let forward = normalize(&detection([10.2, 30.0], [40.0, 9.6])).unwrap();
    let swapped = normalize(&detection([40.0, 9.6], [10.2, 30.0])).unwrap();

    for b in [&forward, &swapped] {
      assert_eq!((b.x_min, b.y_min, b.x_max, b.y_max), (10, 10, 40, 30));
    }
    assert_eq!(forward, swapped);
  }

  #[test]
  fn normalize_rounds_coordinates() {
    let b = normalize(&detection([0.5, 1.49], [2.5, 3.51])).unwrap();
    assert_eq!((b.x_min, b.y_min, b.x_max, b.y_max), (1, 1, 3, 4));
  }

  #[test]
  fn normalize_rounds_score() {
    let mut d = detection([0.0, 0.0], [1.0, 1.0]);
    d.score = 0.8333;
    assert_eq!(normalize(&d).unwrap().score, 0.83);

    d.score = 0.005;
    assert_eq!(normalize(&d).unwrap().score, 0.01);

    d.score = 0.91;
    let b = normalize(&d).unwrap();
    assert_eq!(b.tag(), "text:0.91");
    assert_eq!(b.threshold(), "0.91");
  }

  #[test]
  fn threshold_uses_shortest_form_and_tag_two_decimals() {
    let mut d = detection([0.0, 0.0], [1.0, 1.0]);
    d.score = 0.9;
    let b = normalize(&d).unwrap();
    assert_eq!(b.threshold(), "0.9");
    assert_eq!(b.tag(), "text:0.90");

    d.score = 1.0;
    let b = normalize(&d).unwrap();
    assert_eq!(b.threshold(), "1.0");
    assert_eq!(b.tag(), "text:1.00");

    d.score = 0.0;
    assert_eq!(normalize(&d).unwrap().threshold(), "0.0");
  }

  #[test]
  fn far_apart_corners_do_not_overflow() {
    let b = normalize(&detection([-2e9, 0.0], [2e9, 10.0])).unwrap();
    let (x0, _, x1, _) = b.bounds();
    assert_eq!(x1 - x0 + 1, 4_000_000_001);
  }

  #[test]
  fn normalize_uses_only_points_zero_and_two() {
    let d = Detection::new(vec![[5.0, 5.0], [100.0, 100.0], [7.0, 8.0]], "x", 0.1);
    let b = normalize(&d).unwrap();
    assert_eq!((b.x_min, b.y_min, b.x_max, b.y_max), (5, 5, 7, 8));
    assert_eq!(b.bounds(), (5, 5, 7, 8));
  }

  #[test]
  fn normalize_rejects_short_quadrilateral() {
    let d = Detection::new(vec![[1.0, 1.0], [2.0, 2.0]], "x", 0.1);
    match normalize(&d) {
      Err(ModelError::InvalidDetection { points }) => assert_eq!(points.len(), 2),
      other => panic!("unexpected result: {:?}", other),
    }
  }
}
