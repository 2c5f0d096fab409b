//! GitHub stargazer prospecting job
//!
//! - job steps in `steps/` (fetch, enrich, score, save, deliver)
//! - `run` wires them together for one batch
//! - reads GITHUB_TOKEN and CLAY_WEBHOOK_URL from the environment, see `config`

pub mod config;
pub mod run;
pub mod steps;
