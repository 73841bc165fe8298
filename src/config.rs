//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，部分字段可由环境变量覆盖

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 看板接口的 Bearer Token（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 行情数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// 行情代码
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// 行情接口地址
    #[serde(default = "default_quote_url")]
    pub quote_url: String,
    /// 行情接口的 apikey 参数
    #[serde(default = "default_quote_api_key")]
    pub quote_api_key: String,
    /// 显示 lastUpdated 时使用的时区
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// 生成预测前的人为延迟（毫秒）
    #[serde(default = "default_prediction_delay_ms")]
    pub prediction_delay_ms: u64,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 行情配置
    #[serde(default)]
    pub market: MarketConfig,
    /// 实际加载的配置文件路径
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_symbol() -> String { "BSESN.BSE".to_string() }
fn default_quote_url() -> String { "https://www.alphavantage.co/query".to_string() }
fn default_quote_api_key() -> String { "demo".to_string() }
fn default_timezone() -> String { "Asia/Kolkata".to_string() }
fn default_prediction_delay_ms() -> u64 { 1500 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            quote_url: default_quote_url(),
            quote_api_key: default_quote_api_key(),
            timezone: default_timezone(),
            prediction_delay_ms: default_prediction_delay_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            log: LogConfig::default(),
            market: MarketConfig::default(),
            loaded_from: None,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.market.validate()?;
        config.loaded_from = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值，最后应用环境变量覆盖
    ///
    /// 此时日志系统尚未初始化，加载错误直接输出到 stderr
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        let mut config = config_paths
            .iter()
            .filter(|path| Path::new(path).exists())
            .find_map(|path| match Self::from_file(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    eprintln!("加载配置文件 {} 失败: {}", path, e);
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env_overrides(|key| env::var(key).ok());
        config
    }

    /// 环境变量覆盖：API_KEY 覆盖看板认证 Token，QUOTE_API_KEY 覆盖行情接口 apikey
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("API_KEY").filter(|v| !v.is_empty()) {
            self.api.api_key = key;
        }
        if let Some(key) = lookup("QUOTE_API_KEY").filter(|v| !v.is_empty()) {
            self.market.quote_api_key = key;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否启用 Bearer Token 认证
    pub fn auth_enabled(&self) -> bool {
        !self.api.api_key.is_empty()
    }
}

impl MarketConfig {
    /// 校验行情接口地址与时区
    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.quote_url)
            .map_err(|e| anyhow::anyhow!("行情接口地址 {} 无效: {}", self.quote_url, e))?;
        self.tz()?;
        Ok(())
    }

    /// 解析时区名称
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("时区 {} 无效: {}", self.timezone, e))
    }

    pub fn prediction_delay(&self) -> Duration {
        Duration::from_millis(self.prediction_delay_ms)
    }
}
