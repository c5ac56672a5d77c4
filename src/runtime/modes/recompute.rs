//! Recompute mode
//!
//! 从原始日志重建 [from, to] 内的天级汇总行，可重复执行。

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use tracing::info;

use crate::config::get_config;
use crate::runtime::lifetime::startup::prepare_aggregator;

pub async fn run_recompute(from: NaiveDate, to: NaiveDate) -> Result<()> {
    let config = get_config();
    let aggregator = prepare_aggregator(&config).await?;

    info!("Recomputing daily analytics from {} to {}", from, to);
    let report = aggregator.recompute_range(from, to).await?;

    println!(
        "{} {} day(s), {} property row(s), {} view(s)",
        "Recomputed".green().bold(),
        report.days,
        report.property_rows,
        report.total_views
    );
    Ok(())
}
