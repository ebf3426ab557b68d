pub mod state_view;

pub use state_view::IStateView;
