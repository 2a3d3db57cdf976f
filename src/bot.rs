// src/bot.rs
//! Control surface: a Telegram long-poll loop translating chat commands
//! into session actions. `/on` arms the periodic scan and binds the chat,
//! `/off` disarms it, `/test<N>` runs a bounded simulation over the last
//! three days, `/help` prints usage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::listing::DateWindow;
use crate::notify::telegram::{TelegramApi, TelegramNotifier};
use crate::scan::{MonitorSession, ScanMode};
use crate::scheduler::ScanDeps;

/// Days of history a `/test` simulation covers.
const SIMULATION_DAYS: i64 = 3;
const LONG_POLL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    On,
    Off,
    Simulate { max_items: u32 },
    Help,
}

/// Parse a chat message into a command. Anything else is ignored.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    if text == "/on" {
        return Some(Command::On);
    }
    if text == "/off" {
        return Some(Command::Off);
    }
    if text == "/help" {
        return Some(Command::Help);
    }
    if let Some(rest) = text.strip_prefix("/test") {
        if let Ok(n) = rest.parse::<u32>() {
            if n > 0 {
                return Some(Command::Simulate { max_items: n });
            }
        }
    }
    None
}

const HELP_TEXT: &str = "🔍 <b>DART 모니터링 봇 사용법</b>\n\n\
🚀 <code>/on</code> : 실시간 모니터링 시작\n\
🛑 <code>/off</code> : 모니터링 중지\n\
📊 <code>/test1000</code> : 최근 3일 1,000건 시뮬레이션\n\n\
💡 <b>알림 조건:</b>\n\
• 매출액 대비 30%↑ 공급계약 (70%↑ 대형수주)\n\
• 영업이익 70%↑ 및 100억↑, 또는 흑자전환\n\
• 임상 성공/유의성 확보, 기술이전\n\
• 대기업(삼성, LG 등)의 투자 유치";

/// Everything a command needs to act on the running process.
pub struct ControlHandle {
    pub session: Arc<Mutex<MonitorSession>>,
    pub deps: ScanDeps,
    pub notifier: Arc<TelegramNotifier>,
    pub armed: Arc<AtomicBool>,
}

impl ControlHandle {
    async fn handle(&self, api: &TelegramApi, chat_id: i64, cmd: Command) {
        match cmd {
            Command::On => {
                self.notifier.bind_chat(chat_id);
                let was_armed = self.armed.swap(true, Ordering::SeqCst);
                let reply = if was_armed {
                    "이미 모니터링 중입니다"
                } else {
                    "🚀 <b>지능형 모니터링 가동 시작</b>"
                };
                self.reply(api, chat_id, reply).await;
            }
            Command::Off => {
                self.armed.store(false, Ordering::SeqCst);
                self.reply(api, chat_id, "🛑 <b>모니터링 중지</b>").await;
            }
            Command::Help => {
                self.reply(api, chat_id, HELP_TEXT).await;
            }
            Command::Simulate { max_items } => {
                self.notifier.bind_chat(chat_id);
                self.reply(
                    api,
                    chat_id,
                    &format!("📊 <b>{max_items}건 시뮬레이션 시작...</b>"),
                )
                .await;
                let window = DateWindow::last_days(SIMULATION_DAYS);
                let alerts = {
                    let mut session = self.session.lock().await;
                    session
                        .scan(
                            &*self.deps.listing,
                            &*self.deps.docs,
                            &*self.deps.notifier,
                            max_items,
                            ScanMode::Simulation,
                            Some(&window),
                        )
                        .await
                };
                self.reply(
                    api,
                    chat_id,
                    &format!("✅ <b>시뮬레이션 완료</b> (호재 {}건)", alerts.len()),
                )
                .await;
            }
        }
    }

    async fn reply(&self, api: &TelegramApi, chat_id: i64, text: &str) {
        if let Err(e) = api.send_html(chat_id, text).await {
            tracing::warn!(error = ?e, "command reply failed");
        }
    }
}

/// Run the long-poll command loop forever. Transport errors back off and
/// retry; they never terminate the loop.
pub async fn run_command_loop(api: TelegramApi, ctrl: ControlHandle) {
    let mut offset: i64 = 0;
    loop {
        let updates = match api.get_updates(offset, LONG_POLL_SECS).await {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(error = ?e, "getUpdates failed, backing off");
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                continue;
            }
        };
        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let Some(cmd) = message.text.as_deref().and_then(parse_command) else {
                continue;
            };
            tracing::info!(chat = message.chat.id, ?cmd, "command");
            ctrl.handle(&api, message.chat.id, cmd).await;
        }
    }
}
