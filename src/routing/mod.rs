//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Resource (class routing info + method descriptors)
//!     → template.rs (compile & validate path templates)
//!     → matcher.rs (placeholders become single-segment wildcards)
//!     → router.rs (freeze as immutable RouteTable)
//!
//! Incoming Request (path)
//!     → router.rs (first matching entry)
//!     → Return: candidate Resource or NoMatch
//!     → dispatch (verb + exact method resolution)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Malformed templates abort startup with ConfigurationError
//! - No regex in hot path (segment comparison only)
//! - First match wins (registration order)

pub mod error;
pub mod matcher;
pub mod router;
pub mod template;

pub use error::ConfigurationError;
pub use matcher::{ListenerPattern, Matcher, PatternSegment};
pub use router::{RouteEntry, RouteTable};
pub use template::{compile, CompiledPath, Segment};
