//! Coffer - an age-encrypted password store.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create identity and store
//! │   ├── insert        # Insert or update a secret
//! │   ├── show          # Print a secret
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── domain        # Secret type and text format
//!     ├── insert        # Insert decision engine
//!     ├── input         # Piped input and session detection
//!     ├── mutate        # Metadata, append and lenient parsing
//!     ├── options       # Flags layered over config defaults
//!     ├── config        # config.toml management
//!     ├── cipher/       # age encryption
//!     ├── store/        # Store trait, filesystem and memory stores
//!     ├── recipient     # Recipient checks
//!     ├── keys          # Identity key files
//!     ├── prompt        # Terminal prompts
//!     ├── editor        # External editor
//!     ├── template      # .pass-template rendering
//!     └── audit         # Password strength warnings
//! ```
//!
//! # Features
//!
//! - One age-armored file per secret, written atomically
//! - Structured YAML fields below the password line
//! - Piped, prompted, editor and single-field inserts
//! - Append-only commit log of every write

pub mod cli;
pub mod core;
pub mod error;
