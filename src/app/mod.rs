pub mod dispatch;
mod session_loop;
