mod auth;
mod preview;
mod send;
