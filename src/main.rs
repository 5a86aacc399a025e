// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod drivers;
mod engine;
mod gesture;
mod gui;
mod plot;
mod renderer;
mod session;
mod types;
use anyhow::{anyhow, Result};
use config::AppConfig;
use eframe::egui;
use log::info;
use session::Session;
use std::path::PathBuf;
// 配置文件路径可作为第一个命令行参数传入, 否则使用默认配置
fn load_config() -> Result<AppConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = AppConfig::load(&path)?;
            info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(AppConfig::default()),
    }
}
// 入口函数
fn main() -> Result<()> {
    env_logger::init();
    let config = load_config()?;
    let session = Session::new(&config)?;
    info!(
        "starting with {} frames, labeler window {}, source {}",
        config.n_frames,
        config.labeler.window,
        config.source.label()
    );
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_min_inner_size([900.0, 600.0])
        .with_title("GestureScope");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "GestureScope",
        options,
        Box::new(move |_cc| Box::new(gui::ScopeApp::new(&config, session))),
    )
    .map_err(|e| anyhow!("failed to run GUI: {e}"))
}
