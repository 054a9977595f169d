// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error};

use super::state_machine::{
    transition, view, ClientSessionState, Effect, Event, IgnoreReason, MachineState, Phase,
    Surface, Transition, View,
};

/// 页面级重入保护
///
/// 每个页面只允许创建一个 `Session`，重复注入返回 `None`
#[derive(Debug, Default)]
pub struct SessionGuard {
    injected: AtomicBool,
}

impl SessionGuard {
    pub const fn new() -> Self {
        Self {
            injected: AtomicBool::new(false),
        }
    }

    pub fn try_create(&self, download_target_url: Option<String>) -> Option<Session> {
        if self.injected.swap(true, Ordering::SeqCst) {
            debug!("Session already created for this page");
            return None;
        }
        Some(Session {
            state: MachineState::new(download_target_url),
        })
    }
}

/// 页面会话
///
/// 所有变更都经过 `transition`
#[derive(Debug)]
pub struct Session {
    state: MachineState,
}

impl Session {
    /// 处理事件，返回需要宿主执行的副作用
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        if let Event::Settled {
            generation,
            outcome: Err(e),
        } = &event
        {
            error!("Summary request {} failed: {}", generation, e);
        }

        match transition(&self.state, event) {
            Transition::Applied { state, effects } => {
                self.state = state;
                effects
            }
            Transition::Ignored(reason) => {
                match reason {
                    IgnoreReason::StaleGeneration { current, received } => {
                        debug!("Dropping result {} (current request {})", received, current)
                    }
                    other => debug!("Event ignored: {:?}", other),
                }
                Vec::new()
            }
        }
    }

    pub fn view(&self) -> View {
        view(&self.state)
    }

    pub fn state(&self) -> &ClientSessionState {
        &self.state.session
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn surface(&self) -> Surface {
        self.state.surface
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }
}
