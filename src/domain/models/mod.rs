mod action;
mod api;
mod auth;
mod chat;
mod event;
mod loading;
mod login_form;
mod notice;
mod session;
mod slash_commands;
mod textarea;

pub use action::*;
pub use api::*;
pub use auth::*;
pub use chat::*;
pub use event::*;
pub use loading::*;
pub use login_form::*;
pub use notice::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
