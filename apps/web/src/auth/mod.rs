// Session lifecycle routes and the guard in front of every view.
pub mod guard;
pub mod handlers;
