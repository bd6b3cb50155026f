//! Seega: a two-phase capture board game engine.
//!
//! Two sides place twelve pieces each on a 5x5 board (never on the center),
//! two at a time. Then they take turns sliding a piece one step
//! orthogonally. A piece that ends its step next to an opponent piece with a
//! friendly piece directly behind it captures that piece, in all four
//! directions at once. A piece that captured and can capture again must keep
//! going. A side with no pieces, or unable to move, loses.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and game pacing
//! - [`board`] - Sides, squares and the grid
//! - [`rules`] - Placement, movement, capture and win rules
//! - [`turn`] - Turn state machine
//! - [`ai`] - Greedy move selector
//! - [`session`] - One match: commands, AI turns and snapshots
//! - [`protocol`] - Line-oriented text protocol
//!
//! ## Example
//!
//! ```
//! use seega::board::Side;
//! use seega::session::{Config, Session};
//!
//! let mut session = Session::with_config(Config { seed: Some(7), ai_side: Some(Side::B) });
//! session.place(Side::A, 0, 0).unwrap();
//! session.place(Side::A, 0, 1).unwrap();
//!
//! let reply = session.run_ai_turn().unwrap();
//! assert_eq!(reply.trace.len(), 2);
//! assert_eq!(session.snapshot().remaining.a, 10);
//! ```

pub mod ai;
pub mod board;
pub mod constants;
pub mod protocol;
pub mod rules;
pub mod session;
pub mod turn;
