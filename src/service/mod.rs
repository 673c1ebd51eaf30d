pub mod player;
pub mod playlist;
pub mod presenter;
pub mod state;
pub mod view;
pub mod widget;

#[cfg(test)]
pub mod testing;
