use tui_textarea::Input;

use super::ChatReply;
use super::LoginOutcome;
use super::Notice;

pub enum Event {
    /// Outcome of a login request. Always ends loading.
    LoginResponse(LoginOutcome),
    /// Outcome of a chat or direct agent request. Always ends loading.
    ChatResponse(ChatReply),
    /// Outcome of an auxiliary request such as `/agents`. Always ends loading.
    RequestNotice(Notice),
    /// The in-flight request was cancelled.
    RequestAborted(),
    /// A request arrived while another was still running and was dropped.
    RequestRejected(),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    KeyboardTab(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
