// 该文件是 Shiwen （识文） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use shiwen::{
  FromUrl, input::ImageFileInput, model::ReplayDetector, output::SaveOutput, task::OcrTask,
};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();
  let config = args.stage_config();

  info!("输入图像: {} 张", args.input.len());
  info!("检测结果: {}", args.detections);
  info!("输出目录: {}", args.output);
  info!("语言选择: {:?}", config.selection());
  info!("模型目录: {}", config.model_storage_directory().display());

  // 字体缺失时在读取任何图像前失败
  let task = OcrTask::from_config(&config)?;

  let input = args
    .input
    .iter()
    .map(ImageFileInput::from_url)
    .try_fold(ImageFileInput::default(), |acc, next| {
      next.map(|next| acc.chain(next))
    })?;
  let frames = input.read_frames()?;

  let mut detector = ReplayDetector::from_url(&args.detections)?;
  let output = SaveOutput::from_url(&args.output)?;

  let now = std::time::Instant::now();
  let result = task.aggregate(&mut detector, &frames, &config.selection())?;
  info!("处理完成，耗时: {:.2?}", now.elapsed());

  let total: usize = result.annotations.iter().map(|a| a.shapes.len()).sum();
  info!("总图像数: {}", result.len());
  info!("总检测数: {}", total);

  output.save(&result)?;
  info!("结果已保存到: {}", args.output);

  Ok(())
}
