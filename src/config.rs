use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    /// ボディフレームを受信するUDPアドレス
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// この秒数データグラムが途切れるとセンサー利用不可とみなす
    #[serde(default = "default_availability_timeout_secs")]
    pub availability_timeout_secs: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// メインループの目標FPS
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// ウィンドウ幅（ピクセル）
    #[serde(default = "default_view_width")]
    pub width: usize,
    /// ウィンドウ高さ（ピクセル）
    #[serde(default = "default_view_height")]
    pub height: usize,
    /// ワールド座標1.0あたりのピクセル数
    #[serde(default = "default_view_scale")]
    pub scale: f32,
}

fn default_listen_addr() -> String { "0.0.0.0:39540".to_string() }
fn default_availability_timeout_secs() -> f32 { 3.0 }
fn default_target_fps() -> u32 { 60 }
fn default_view_width() -> usize { 640 }
fn default_view_height() -> usize { 480 }
fn default_view_scale() -> f32 { 120.0 }

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            availability_timeout_secs: default_availability_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: default_view_width(),
            height: default_view_height(),
            scale: default_view_scale(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 設定ファイルがなければデフォルト設定を返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(_) => Config::default(),
        }
    }
}
