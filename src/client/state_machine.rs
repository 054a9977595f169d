// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 摘要浮层的状态机
//!
//! `transition` 是唯一的状态变更入口，`view` 只做投影

use super::errors::ClientError;
use crate::utils::html_sanitizer::{sanitize_summary_html, summary_to_plain_text};

/// 导出的文件名
pub const SUMMARY_FILE_NAME: &str = "summary.txt";

/// 导出文件的 MIME 类型
pub const SUMMARY_MIME_TYPE: &str = "text/plain";

/// 会话数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSessionState {
    pub is_minimized: bool,
    pub has_summarized_once: bool,
    /// 已清理的摘要 HTML
    pub summary_text: String,
    pub is_loading: bool,
    pub download_target_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Summarized,
}

/// 当前可见的界面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Button,
    Popup,
    MiniBar,
}

/// 状态机完整状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    pub phase: Phase,
    pub surface: Surface,
    pub session: ClientSessionState,
    /// 最近一次请求的代次，0 表示尚未发起
    pub generation: u64,
}

impl MachineState {
    pub fn new(download_target_url: Option<String>) -> Self {
        Self {
            phase: Phase::Idle,
            surface: Surface::Button,
            session: ClientSessionState {
                download_target_url,
                ..ClientSessionState::default()
            },
            generation: 0,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    /// 点击悬浮按钮
    Open,
    Minimize,
    Expand,
    Reload,
    Download,
    /// 迷你栏上的“摘要”按钮：展开并重新请求
    MiniSummarize,
    /// 请求完成
    Settled {
        generation: u64,
        outcome: Result<String, ClientError>,
    },
}

/// 导出的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRequest { generation: u64 },
    Export(DownloadArtifact),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// 已有请求在途
    RequestInFlight,
    /// 结果属于已被取代的请求
    StaleGeneration { current: u64, received: u64 },
    /// 当前界面上没有该控件
    Unavailable { phase: Phase, surface: Surface },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied {
        state: MachineState,
        effects: Vec<Effect>,
    },
    Ignored(IgnoreReason),
}

fn applied(state: MachineState, effects: Vec<Effect>) -> Transition {
    Transition::Applied { state, effects }
}

fn start_request(mut next: MachineState) -> Transition {
    next.generation += 1;
    next.phase = Phase::Loading;
    next.surface = Surface::Popup;
    next.session.is_minimized = false;
    next.session.is_loading = true;
    next.session.has_summarized_once = true;
    let generation = next.generation;
    applied(next, vec![Effect::StartRequest { generation }])
}

/// 计算事件作用后的状态
pub fn transition(state: &MachineState, event: Event) -> Transition {
    let unavailable = Transition::Ignored(IgnoreReason::Unavailable {
        phase: state.phase,
        surface: state.surface,
    });
    let loading = state.phase == Phase::Loading;

    match event {
        Event::Open | Event::Reload | Event::MiniSummarize if loading => {
            Transition::Ignored(IgnoreReason::RequestInFlight)
        }
        Event::Open => match state.phase {
            Phase::Idle => start_request(state.clone()),
            _ => unavailable,
        },
        Event::Reload => match (state.phase, state.surface) {
            (Phase::Summarized, Surface::Popup) => start_request(state.clone()),
            _ => unavailable,
        },
        Event::MiniSummarize => match (state.phase, state.surface) {
            (Phase::Summarized, Surface::MiniBar) => start_request(state.clone()),
            _ => unavailable,
        },
        Event::Minimize => match state.surface {
            Surface::Popup => {
                let mut next = state.clone();
                next.surface = Surface::MiniBar;
                next.session.is_minimized = true;
                applied(next, Vec::new())
            }
            _ => unavailable,
        },
        Event::Expand => match state.surface {
            Surface::MiniBar => {
                let mut next = state.clone();
                next.surface = Surface::Popup;
                next.session.is_minimized = false;
                applied(next, Vec::new())
            }
            _ => unavailable,
        },
        Event::Download => match state.surface {
            Surface::Popup => applied(
                state.clone(),
                vec![Effect::Export(DownloadArtifact {
                    file_name: SUMMARY_FILE_NAME,
                    mime_type: SUMMARY_MIME_TYPE,
                    contents: summary_to_plain_text(&state.session.summary_text),
                })],
            ),
            _ => unavailable,
        },
        Event::Settled {
            generation,
            outcome,
        } => {
            if !loading || generation != state.generation {
                return Transition::Ignored(IgnoreReason::StaleGeneration {
                    current: state.generation,
                    received: generation,
                });
            }
            let mut next = state.clone();
            next.phase = Phase::Summarized;
            next.session.is_loading = false;
            next.session.summary_text = match outcome {
                Ok(summary) => sanitize_summary_html(&summary),
                Err(_) => String::new(),
            };
            applied(next, Vec::new())
        }
    }
}

/// 悬浮按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub enabled: bool,
}

/// 展开的摘要浮层
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub summary_html: String,
    pub spinner: bool,
    pub reload_enabled: bool,
    pub minimize_enabled: bool,
    pub download_enabled: bool,
}

/// 最小化后的迷你栏
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniBarView {
    pub spinner: bool,
    pub summarize_enabled: bool,
    pub expand_enabled: bool,
}

/// 界面投影，同一时刻只有一个界面可见
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub button: Option<ButtonView>,
    pub popup: Option<PopupView>,
    pub mini_bar: Option<MiniBarView>,
}

pub fn view(state: &MachineState) -> View {
    let loading = state.phase == Phase::Loading;
    let mut view = View {
        button: None,
        popup: None,
        mini_bar: None,
    };

    match state.surface {
        Surface::Button => view.button = Some(ButtonView { enabled: !loading }),
        Surface::Popup => {
            view.popup = Some(PopupView {
                summary_html: state.session.summary_text.clone(),
                spinner: loading,
                reload_enabled: !loading,
                minimize_enabled: true,
                download_enabled: true,
            })
        }
        Surface::MiniBar => {
            view.mini_bar = Some(MiniBarView {
                spinner: loading,
                summarize_enabled: !loading,
                expand_enabled: true,
            })
        }
    }

    view
}

#[cfg(test)]
#[path = "state_machine_test.rs"]
mod tests;
