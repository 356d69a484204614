// Interface adapters: wire protocol and network handling.

pub mod http;
pub mod net;
pub mod protocol;
pub mod state;
