//! Talking to the X-Server

pub(crate) mod utils;
pub(crate) mod xconnection;
