// src/gui.rs
use crate::config::AppConfig;
use crate::drivers::available_ports;
use crate::engine;
use crate::plot::event::LABEL;
use crate::plot::{Plot as _, PlotLine};
use crate::renderer::{EguiRenderer, Renderer};
use crate::session::{PlotId, Session};
use crate::types::*;
use eframe::egui;
use egui::{Color32, RichText};
use egui_plot::{HLine, Line, Plot, PlotPoints, VLine};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

// 界面日志最多保留的行数
const LOG_LINES: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceChoice {
    Simulation,
    Serial,
    Replay,
}

pub struct ScopeApp {
    // 系统状态
    is_connected: bool,
    is_streaming: bool,

    // 核心数据
    session: Session,

    // 数据源选择
    source_choice: SourceChoice,
    available_ports: Vec<String>,
    selected_port: String,
    baud_rate: u32,
    replay_path: String,

    // 界面日志
    log_messages: Vec<String>,

    // 通讯管道
    rx: Receiver<StreamMessage>,
    tx_cmd: Sender<GuiCommand>,
}

impl ScopeApp {
    pub fn new(config: &AppConfig, session: Session) -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();

        // 启动后台数据流线程
        engine::spawn_thread(tx, rx_cmd, Duration::from_millis(config.frame_interval_ms));

        let available_ports = available_ports();
        let (source_choice, selected_port, baud_rate, replay_path) = match &config.source {
            SourceKind::Simulation => (SourceChoice::Simulation, String::new(), 115_200, String::new()),
            SourceKind::Serial { port, baud_rate } => {
                (SourceChoice::Serial, port.clone(), *baud_rate, String::new())
            }
            SourceKind::Replay { path } => (SourceChoice::Replay, String::new(), 115_200, path.clone()),
        };
        let selected_port = if selected_port.is_empty() {
            available_ports.first().cloned().unwrap_or_default()
        } else {
            selected_port
        };

        Self {
            is_connected: false,
            is_streaming: false,
            session,
            source_choice,
            available_ports,
            selected_port,
            baud_rate,
            replay_path,
            log_messages: vec!["GestureScope ready.".to_owned()],
            rx,
            tx_cmd,
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > LOG_LINES {
            self.log_messages.remove(0);
        }
    }

    fn selected_source(&self) -> SourceKind {
        match self.source_choice {
            SourceChoice::Simulation => SourceKind::Simulation,
            SourceChoice::Serial => SourceKind::Serial {
                port: self.selected_port.clone(),
                baud_rate: self.baud_rate,
            },
            SourceChoice::Replay => SourceKind::Replay {
                path: self.replay_path.clone(),
            },
        }
    }

    // 刷新端口列表
    fn refresh_ports(&mut self) {
        self.available_ports = available_ports();
        if !self.available_ports.is_empty() && !self.available_ports.contains(&self.selected_port) {
            self.selected_port = self.available_ports[0].clone();
        }
        let msg = format!("Ports: {:?}", self.available_ports);
        self.log(&msg);
    }

    // 每帧先把所有待处理的数据帧按顺序送入 session, 再绘制
    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                StreamMessage::Log(s) => self.log(&s),
                StreamMessage::Status(b) => self.is_connected = b,
                StreamMessage::Streaming(b) => self.is_streaming = b,
                StreamMessage::Frame(frame) => {
                    self.session.apply_frame(&frame);
                }
            }
        }
    }

    fn send(&self, cmd: GuiCommand) {
        self.tx_cmd.send(cmd).ok();
    }

    fn show_source_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Source");
        ui.add_enabled_ui(!self.is_connected, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.source_choice, SourceChoice::Simulation, "Sim");
                ui.selectable_value(&mut self.source_choice, SourceChoice::Serial, "Serial");
                ui.selectable_value(&mut self.source_choice, SourceChoice::Replay, "Replay");
            });
            match self.source_choice {
                SourceChoice::Simulation => {}
                SourceChoice::Serial => {
                    ui.horizontal(|ui| {
                        egui::ComboBox::from_id_source("port")
                            .selected_text(self.selected_port.clone())
                            .show_ui(ui, |ui| {
                                for port in &self.available_ports {
                                    ui.selectable_value(&mut self.selected_port, port.clone(), port.as_str());
                                }
                            });
                        if ui.button("⟳").clicked() {
                            self.refresh_ports();
                        }
                    });
                    ui.horizontal(|ui| {
                        ui.label("Baud");
                        ui.add(egui::DragValue::new(&mut self.baud_rate).speed(100));
                    });
                }
                SourceChoice::Replay => {
                    ui.text_edit_singleline(&mut self.replay_path);
                }
            }
        });

        ui.horizontal(|ui| {
            if !self.is_connected {
                if ui.button("Connect").clicked() {
                    self.send(GuiCommand::Connect(self.selected_source()));
                }
            } else if ui.button("Disconnect").clicked() {
                self.send(GuiCommand::Disconnect);
            }
            ui.add_enabled_ui(self.is_connected, |ui| {
                if !self.is_streaming {
                    if ui.button("▶ Stream").clicked() {
                        self.send(GuiCommand::StartStream);
                    }
                } else if ui.button("⏸ Stream").clicked() {
                    self.send(GuiCommand::StopStream);
                }
            });
        });
    }

    fn show_labeling_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Labeling");
        let labeling = self.session.is_labeling();
        let text = if labeling { "Stop Labeling" } else { "Start Labeling" };
        if ui.button(text).clicked() {
            if labeling {
                self.session.stop_labeling();
            } else {
                self.session.start_labeling();
            }
        }
        let config = self.session.labeler().config();
        ui.label(format!(
            "window {} / threshold {:.2}",
            config.window, config.peak_threshold
        ));
        ui.label(format!(
            "frames {} / gestures {}",
            self.session.frames_seen(),
            self.session.gestures_labeled()
        ));
    }

    fn show_plot_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Plots");
        for (id, name) in [
            (PlotId::Events, "Events"),
            (PlotId::Imu, "IMU"),
            (PlotId::Network, "Network"),
        ] {
            let mut running = self.session.plot(id).is_running();
            if ui.checkbox(&mut running, name).changed() {
                if running {
                    self.session.start_plot(id);
                } else {
                    self.session.stop_plot(id);
                }
            }
        }
    }

    fn show_window_plot(&self, ui: &mut egui::Ui) {
        let labeler = self.session.labeler();
        let window: Vec<[f64; 2]> = labeler
            .window()
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v as f64])
            .collect();
        let min = labeler
            .window()
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f32::INFINITY, f32::min);
        Plot::new("labeler_window")
            .height(120.0)
            .allow_drag(false)
            .allow_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(PlotPoints::new(window)).name("window"));
                plot_ui.vline(VLine::new(labeler.peak_idx() as f64).name("peak"));
                if min.is_finite() {
                    let threshold = min + labeler.config().peak_threshold;
                    plot_ui.hline(HLine::new(threshold as f64).name("min + threshold"));
                }
            });
    }

    fn show_canvas(&self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, Color32::from_rgb(15, 15, 18));
        let mut renderer = EguiRenderer::new(&painter, rect);
        // 事件线在最底层, 其后是 IMU 和网络输出
        for id in [PlotId::Events, PlotId::Imu, PlotId::Network] {
            renderer.render_plot(self.session.plot(id));
        }
        if self.session.is_labeling() {
            let count = self
                .session
                .event_plot()
                .line(LABEL)
                .map(|l| l.vertices().len())
                .unwrap_or(0);
            painter.text(
                rect.left_top() + egui::vec2(8.0, 8.0),
                egui::Align2::LEFT_TOP,
                format!("labels on screen: {count}"),
                egui::FontId::proportional(12.0),
                Color32::GRAY,
            );
        }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();

        egui::SidePanel::left("controls").min_width(220.0).show(ctx, |ui| {
            let status = if self.is_streaming {
                RichText::new("● Streaming").color(Color32::GREEN)
            } else if self.is_connected {
                RichText::new("● Connected").color(Color32::YELLOW)
            } else {
                RichText::new("● Offline").color(Color32::GRAY)
            };
            ui.label(status);
            ui.separator();
            self.show_source_controls(ui);
            ui.separator();
            self.show_labeling_controls(ui);
            ui.separator();
            self.show_plot_controls(ui);
            ui.separator();
            for line in &self.log_messages {
                ui.monospace(line);
            }
        });

        egui::TopBottomPanel::bottom("labeler").show(ctx, |ui| {
            self.show_window_plot(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_canvas(ui);
        });

        if self.is_streaming {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
