//! `pessoas` keeps a register of people, each with a name and an age, and
//! serves it over HTTP.
//!
//! A request travels through the `request_logger` middleware, which prints one
//! colored line for it once the response is ready, and reaches one of the
//! routes of the `api_server` module.  Routes that write first check the
//! candidate with the `validation` module, so bad input never touches the
//! database.  New records get their id from `utils::ids`.
//!
//! All persistence happens in the `store_actor_sqlite` actor, which owns the
//! single `SQLite` connection of the process.  Handlers reach it through the
//! typed `PessoaStore` facade, which is built once at startup and handed to
//! the router as request data.  Update and delete report how many rows the
//! statement touched, which is how a missing id becomes a 404.
//!
//! The routes are annotated with `poem-openapi`, so the same table that
//! dispatches requests also renders the API reference served under
//! `/api-docs`.
//!
//! Logging is `tracing` throughout; set `RUST_LOG` to pick the verbosity, for
//! example `RUST_LOG=debug,sqlx=warn`.
pub mod actors;
pub mod cli;
pub mod io;
pub mod pessoa;
pub mod utils;
