// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含抓取任务用例和请求/响应数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含商家条目、任务模型、仓库接口和去重汇总服务
pub mod domain;

/// 引擎模块
///
/// 浏览器能力抽象及其Chromium实现
pub mod engines;

/// 基础设施模块
///
/// 提供内存任务仓库、CSV导出和指标导出
pub mod infrastructure;

/// 地图抓取模块
///
/// 搜索、滚动、列表与详情提取的完整流程
pub mod maps;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
