//! SweetMix core library: Messenger webhook gateway, event dispatch, intent matching,
//! reply composition, and the completion and Send API clients used by the CLI.

pub mod config;
pub mod gateway;
pub mod intent;
pub mod llm;
pub mod messenger;
pub mod profile;
pub mod reply;
pub mod responder;
