// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供随机延迟与日志初始化
pub mod delay;
pub mod telemetry;
