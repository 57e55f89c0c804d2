// Job list: snapshot cache, commands and their routes.
// Every mutation goes through the dispatcher and ends in a full reload.

pub mod commands;
pub mod handlers;
pub mod store;
