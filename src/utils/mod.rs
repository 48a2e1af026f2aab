//! Shared helpers.
//!
//! - [`academic`]: year ranges, grading scale, due dates and list filters
//! - [`auth_helpers`]: shared user columns and estudiante eligibility checks

pub mod academic;
pub mod auth_helpers;

#[cfg(test)]
pub(crate) mod test_fixtures;
