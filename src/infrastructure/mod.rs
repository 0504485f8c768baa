pub mod hooks;
pub mod logging;
pub mod storage;
