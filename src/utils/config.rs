use anyhow::{anyhow, Result};
use std::env::var;
use std::path::PathBuf;

use crate::promptpay::InitiationPolicy;

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub app_name: String,
    pub log_level: String,
    pub initiation_policy: InitiationPolicy,
    pub default_promptpay_id: Option<String>,
    pub identifier_cache_path: PathBuf,
}

impl EnvConfig {
    pub fn init() -> Result<EnvConfig> {
        let initiation_policy = match var("PROMPTPAY_INITIATION") {
            Ok(value) => value
                .parse()
                .map_err(|err| anyhow!("PROMPTPAY_INITIATION: {err}"))?,
            Err(_) => InitiationPolicy::default(),
        };

        Ok(EnvConfig {
            app_name: var("APP_NAME").unwrap_or(String::from("smartbudget")),
            log_level: var("LOG_LEVEL").unwrap_or(String::from("INFO")),
            initiation_policy,
            default_promptpay_id: var("PROMPTPAY_ID").ok().filter(|id| !id.trim().is_empty()),
            identifier_cache_path: var("PROMPTPAY_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(PathBuf::from(".promptpay_id")),
        })
    }
}
