// 该文件是 Shiwen （识文） 项目的一部分。
// src/output/labelme.rs - LabelMe 标注记录
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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::CanonicalBox;

pub const LABELME_VERSION: &str = "4.5.6";
pub const SHAPE_TYPE_RECTANGLE: &str = "rectangle";

/// 单张图像的 LabelMe 标注，字段名与字段顺序和 LabelMe 保持一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
  pub version: String,
  pub flags: BTreeMap<String, bool>,
  pub shapes: Vec<Shape>,
  #[serde(rename = "imagePath")]
  pub image_path: Option<String>,
  #[serde(rename = "imageData")]
  pub image_data: Option<String>,
  #[serde(rename = "imageHeight")]
  pub image_height: u32,
  #[serde(rename = "imageWidth")]
  pub image_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
  pub label: String,
  /// [[x_min, y_min], [x_max, y_max]]
  pub points: [[i32; 2]; 2],
  pub group_id: Option<u32>,
  pub shape_type: String,
  pub flags: BTreeMap<String, bool>,
  pub threshold: String,
}

impl AnnotationRecord {
  pub fn new(image_height: u32, image_width: u32) -> Self {
    Self {
      version: LABELME_VERSION.to_string(),
      flags: BTreeMap::new(),
      shapes: Vec::new(),
      image_path: None,
      image_data: None,
      image_height,
      image_width,
    }
  }

  /// 追加一个矩形标注，顺序与调用顺序一致
  pub fn record(&mut self, bbox: &CanonicalBox) {
    self.shapes.push(Shape {
      label: bbox.label.clone(),
      points: [[bbox.x_min, bbox.y_min], [bbox.x_max, bbox.y_max]],
      group_id: None,
      shape_type: SHAPE_TYPE_RECTANGLE.to_string(),
      flags: BTreeMap::new(),
      threshold: bbox.threshold(),
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn bbox(label: &str, x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> CanonicalBox {
    CanonicalBox {
      x_min,
      y_min,
      x_max,
      y_max,
      label: label.into(),
      score: 0.91,
    }
  }

  #[test]
  fn empty_record_matches_schema() {
    let record = AnnotationRecord::new(50, 100);
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
      value,
      json!({
        "version": "4.5.6",
        "flags": {},
        "shapes": [],
        "imagePath": null,
        "imageData": null,
        "imageHeight": 50,
        "imageWidth": 100,
      })
    );
  }

  #[test]
  fn shape_matches_schema() {
    let mut record = AnnotationRecord::new(50, 100);
    record.record(&bbox("hello", 10, 10, 40, 30));

    let value = serde_json::to_value(&record.shapes[0]).unwrap();
    assert_eq!(
      value,
      json!({
        "label": "hello",
        "points": [[10, 10], [40, 30]],
        "group_id": null,
        "shape_type": "rectangle",
        "flags": {},
        "threshold": "0.91",
      })
    );
  }

  #[test]
  fn shapes_keep_record_order() {
    let mut record = AnnotationRecord::new(10, 10);
    record.record(&bbox("second", 5, 5, 6, 6));
    record.record(&bbox("first", 0, 0, 1, 1));

    let labels: Vec<_> = record.shapes.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["second", "first"]);
  }

  #[test]
  fn serialized_field_order_is_stable() {
    let record = AnnotationRecord::new(1, 2);
    let text = serde_json::to_string(&record).unwrap();
    assert_eq!(
      text,
      r#"{"version":"4.5.6","flags":{},"shapes":[],"imagePath":null,"imageData":null,"imageHeight":1,"imageWidth":2}"#
    );
  }
}
