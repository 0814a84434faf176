mod auth;
mod logging;
mod transactions;
