//! # Tagster FAQ Core
//!
//! Semantic FAQ matching with a language-model fallback.
//!
//! ## How it works
//! ```text
//! User: "What are your opening hours?"
//!   ↓
//! FaqMatcher.answer(question)
//!   ├── FaqStore: load question → answer pairs (order preserved)
//!   ├── embed every FAQ question (cached per source digest)
//!   ├── embed the live question
//!   └── cosine similarity against every entry
//!        ├── best score > threshold → stored answer, verbatim
//!        └── otherwise → completion service primed with the full FAQ
//! ```

pub mod matcher;
pub mod similarity;
pub mod store;

pub use matcher::FaqMatcher;
pub use similarity::cosine_similarity;
pub use store::FaqStore;
