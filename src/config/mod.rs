// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理服务器、浏览器、抓取流程、任务表与存储等配置
pub mod settings;
