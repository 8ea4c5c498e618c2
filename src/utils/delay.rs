// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::Rng;
use std::time::Duration;

/// `[min_ms, max_ms]` 内的随机时长，区间颠倒时按较小值取
pub fn random_between(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms.min(max_ms));
    }
    Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
}

/// 休眠指定时长，零时长直接返回
pub async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
