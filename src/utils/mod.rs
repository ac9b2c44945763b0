pub mod countdown;
pub mod data;
pub mod edit_gate;
pub mod filters;
pub mod flags;
pub mod grader;
pub mod match_view;
pub mod ranking;
pub mod reports;
pub mod status;
