// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::Context;
use clap::Parser;
use loyalty_points::api::{self, AppState};
use loyalty_points::config::{Config, LOG_ENV_VAR, LogFormat};
use loyalty_points::{Ledger, seed};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_format);

    let ledger = Arc::new(build_ledger(&config)?);
    info!(customers = ledger.customer_count(), "ledger ready");

    let app = api::app(AppState::new(ledger), config.request_timeout());

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Loyalty Points Service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

/// Initializes tracing, reading filter directives from `LOYALTY_LOG`.
///
/// Defaults to "info" if unset.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Builds the ledger and preloads demo and seed-file customers.
fn build_ledger(config: &Config) -> anyhow::Result<Ledger> {
    let ledger = Ledger::new();

    if !config.no_demo_data {
        let registered = seed::seed_ledger(&ledger, seed::demo_customers());
        info!(registered, "loaded demo customers");
    }

    if let Some(path) = &config.seed {
        let file = File::open(path)
            .with_context(|| format!("failed to open seed file '{}'", path.display()))?;
        let customers = seed::load_customers(BufReader::new(file))
            .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
        let total = customers.len();
        let registered = seed::seed_ledger(&ledger, customers);
        if registered < total {
            warn!(registered, total, "some seed customers were skipped");
        }
        info!(registered, path = %path.display(), "loaded seed customers");
    }

    Ok(ledger)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
