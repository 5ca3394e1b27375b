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

//! Service configuration.
//!
//! Every option can be given on the command line or through a `LOYALTY_*`
//! environment variable.

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV_VAR: &str = "LOYALTY_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable output.
    Pretty,
}

/// Loyalty Points Service - track, earn and redeem customer points
///
/// Serves the points ledger over HTTP. State lives in memory only.
#[derive(Parser, Debug, Clone)]
#[command(name = "loyalty-points")]
#[command(version, about = "An in-memory loyalty points ledger over HTTP", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "LOYALTY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "LOYALTY_PORT", default_value_t = 8081)]
    pub port: u16,

    /// CSV file of customers to preload
    ///
    /// Expected format: id,points,name,email
    #[arg(long, env = "LOYALTY_SEED", value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Do not preload the built-in demo customers
    #[arg(long)]
    pub no_demo_data: bool,

    /// Seconds before an in-flight request is aborted
    #[arg(long, env = "LOYALTY_REQUEST_TIMEOUT_SECS", default_value_t = 15)]
    pub request_timeout_secs: u64,

    /// Log output format
    #[arg(long, env = "LOYALTY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
