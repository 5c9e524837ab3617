//! UI module - chat-style text rendering of missions and rankings

pub mod render;

pub use render::{
    render_detection_alert, render_error, render_history, render_leaderboard, render_result,
    section_header,
};
