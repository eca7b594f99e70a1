//! 过期维护
//!
//! - `ExpiryClassifier`：按天划分"已过期 / 即将过期"，只读
//! - `ExpirySweeper`：分批删除过期映射
//! - `MaintenanceTask`：周期性地在后台运行以上两者
//!
//! 报告窗口按日界划分，清理阈值按时刻比较，两者刻意分开。

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::MaintenanceConfig;
use crate::errors::{LivelinkError, Result};
use crate::services::expiry::ExpiryClock;
use crate::storage::{Mapping, SeaOrmStorage};

/// "即将过期"窗口：今天起往后 3 天（含第 3 天）
pub const EXPIRING_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpiryReport {
    pub expiring: Vec<Mapping>,
    pub expired: Vec<Mapping>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub deleted: u64,
    pub batches: u32,
}

pub struct ExpiryClassifier {
    storage: Arc<SeaOrmStorage>,
    clock: ExpiryClock,
}

impl ExpiryClassifier {
    pub fn new(storage: Arc<SeaOrmStorage>, clock: ExpiryClock) -> Self {
        Self { storage, clock }
    }

    pub async fn classify(&self) -> Result<ExpiryReport> {
        self.classify_at(Utc::now()).await
    }

    /// 只看已启用且设置了过期日期的映射，两个列表都按过期日期升序
    pub async fn classify_at(&self, now: DateTime<Utc>) -> Result<ExpiryReport> {
        let today = self.clock.today_at(now);
        let last_day = today + Duration::days(EXPIRING_WINDOW_DAYS);

        let candidates = self.storage.find_expiry_candidates(last_day).await?;

        let mut report = ExpiryReport::default();
        for mapping in candidates {
            match mapping.expiry {
                Some(expiry) if expiry < today => report.expired.push(mapping),
                Some(_) => report.expiring.push(mapping),
                None => {}
            }
        }
        Ok(report)
    }
}

pub struct ExpirySweeper {
    storage: Arc<SeaOrmStorage>,
    clock: ExpiryClock,
}

impl ExpirySweeper {
    pub fn new(storage: Arc<SeaOrmStorage>, clock: ExpiryClock) -> Self {
        Self { storage, clock }
    }

    pub async fn purge_expired(&self, batch_size: u64) -> Result<PurgeReport> {
        self.purge_expired_at(Utc::now(), batch_size).await
    }

    /// 分批删除过期日零点早于 now 的映射
    ///
    /// 取到的一批为空或不足 batch_size 时结束；清理过程中新写入的过期映射留给下一轮。
    pub async fn purge_expired_at(&self, now: DateTime<Utc>, batch_size: u64) -> Result<PurgeReport> {
        if batch_size == 0 {
            return Err(LivelinkError::invalid_input("batch_size must be positive"));
        }

        let cutoff = self.clock.purge_cutoff(now);
        let mut report = PurgeReport::default();

        loop {
            let paths = self
                .storage
                .find_hard_expired_paths(cutoff, batch_size)
                .await?;
            if paths.is_empty() {
                break;
            }

            let fetched = paths.len() as u64;
            let deleted = self.storage.remove_many(&paths).await?;
            report.deleted += deleted;
            report.batches += 1;

            debug!(
                "Purge batch {}: deleted {} of {} (total {})",
                report.batches, deleted, fetched, report.deleted
            );

            if fetched < batch_size {
                break;
            }
        }

        Ok(report)
    }
}

/// 后台维护任务
pub struct MaintenanceTask {
    classifier: ExpiryClassifier,
    sweeper: ExpirySweeper,
    config: MaintenanceConfig,
}

impl MaintenanceTask {
    pub fn new(storage: Arc<SeaOrmStorage>, config: MaintenanceConfig) -> Self {
        let clock = ExpiryClock::from_offset_minutes(config.utc_offset_minutes);
        Self {
            classifier: ExpiryClassifier::new(storage.clone(), clock),
            sweeper: ExpirySweeper::new(storage, clock),
            config,
        }
    }

    /// 运行一次过期报告并写日志
    pub async fn run_report(&self) -> Result<ExpiryReport> {
        let report = self.classifier.classify().await?;
        info!(
            "Expiry report: {} expired, {} expiring within {} days",
            report.expired.len(),
            report.expiring.len(),
            EXPIRING_WINDOW_DAYS
        );
        for m in &report.expired {
            info!("  expired: '{}' (expiry {:?})", m.path, m.expiry);
        }
        for m in &report.expiring {
            info!("  expiring: '{}' (expiry {:?})", m.path, m.expiry);
        }
        Ok(report)
    }

    /// 运行一次清理并写日志
    pub async fn run_purge(&self) -> Result<PurgeReport> {
        let report = self.sweeper.purge_expired(self.config.purge_batch_size).await?;
        if report.deleted > 0 {
            info!(
                "Purged {} expired mappings in {} batches",
                report.deleted, report.batches
            );
        } else {
            debug!("Purge found no expired mappings");
        }
        Ok(report)
    }

    /// 启动后台循环，返回任务句柄（退出时由调用方 abort）
    pub fn spawn_background_tasks(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        if self.config.report_enabled {
            let task = self.clone();
            let interval = StdDuration::from_secs(self.config.report_interval_secs.max(1));
            handles.push(tokio::spawn(async move {
                loop {
                    if let Err(e) = task.run_report().await {
                        error!("Expiry report failed: {}", e);
                    }
                    tokio::time::sleep(interval).await;
                }
            }));
            info!(
                "Expiry report task started (interval: {}s)",
                interval.as_secs()
            );
        }

        if self.config.purge_enabled {
            if self.config.purge_batch_size == 0 {
                warn!("purge_batch_size is 0, expiry purge task not started");
            } else {
                let task = self.clone();
                let interval = StdDuration::from_secs(self.config.purge_interval_secs.max(1));
                handles.push(tokio::spawn(async move {
                    loop {
                        if let Err(e) = task.run_purge().await {
                            error!("Expiry purge failed: {}", e);
                        }
                        tokio::time::sleep(interval).await;
                    }
                }));
                info!(
                    "Expiry purge task started (interval: {}s, batch size: {})",
                    interval.as_secs(),
                    self.config.purge_batch_size
                );
            }
        }

        handles
    }
}
