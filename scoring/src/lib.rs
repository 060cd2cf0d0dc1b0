//! # Scoring Library
//!
//! Pure arithmetic behind assessment grading. Nothing here touches the database;
//! callers load history, call into this crate, and persist what comes back.
//!
//! ## Key Concepts
//! - **Award policy** ([`policy`]): how many points a newly graded submission records.
//! - **Question aggregate** ([`aggregate::recompute_question`]): best recorded points win,
//!   capped at the question's current maximum.
//! - **Assessment aggregate** ([`aggregate::recompute_assessment`]): exact sum of question
//!   points against the assessment maximum.
//! - **Scorebar** ([`scorebar`]): the clamped, floored view used by presentation code.

pub mod aggregate;
pub mod error;
pub mod policy;
pub mod scorebar;
pub mod types;
