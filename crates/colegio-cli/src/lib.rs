//! # Colegio CLI
//!
//! Administrative and seeding utilities for the Colegio José Martí database.
//!
//! ## Usage
//!
//! ```ignore
//! use colegio_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(10, 200, 8);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
