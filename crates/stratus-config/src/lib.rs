//! Stratus Configuration
//!
//! Cascading configuration for OpenStack-compatible clouds: the standard
//! `clouds.yaml` / `clouds-public.yaml` / `secure.yaml` trio layered with
//! environment variables into a single resolved cloud entry, then assembled
//! into final authentication parameters.
//!
//! # Layering
//!
//! ```text
//! secure.yaml          (highest precedence)
//!   └─ clouds.yaml
//!        └─ clouds-public.yaml (vendor profiles, lowest)
//! ```
//!
//! Environment variables fill any auth field the files leave unset; they
//! never override a value resolved from a file.

pub mod auth;
pub mod cloud;
pub mod env;
pub mod error;
pub mod locate;
pub mod merge;
pub mod resolver;

pub use auth::{assemble, AkSkAuth, AuthParameters, PasswordAuth};
pub use cloud::{normalize_endpoint_type, AuthInfo, Cloud, Clouds, PublicClouds};
pub use env::{EnvSource, ProcessEnv, StaticEnv};
pub use error::{ConfigError, Result};
pub use resolver::{CloudConfig, DEFAULT_ENV_PREFIX};
