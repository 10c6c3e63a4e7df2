//! Core data model for the lit notation
//!
//!     lit is a compact plain-text markup: block structure is spelled with a handful of sigils
//!     (¶ paragraph, ‖ run, † footnote, ⁝ list, § section ...) and inline prose is split into
//!     typed tokens. This crate holds the pieces every front and back end shares:
//!
//!     ├── token.rs     # Token and TokenKind, the sentinel runes
//!     ├── lexer.rs     # inline text → tokens, with implicit space synthesis
//!     ├── tree.rs      # arena document tree (NodeKind, attributes, links)
//!     └── layout.rs    # greedy width-constrained line packing and WriteOpts
//!
//!     Parsing sigils and emitting concrete formats lives in lit-babel, which builds on top of
//!     this crate. Nothing here does I/O.
//!
//! The Tree
//!
//!     Nodes live in a single arena owned by [`Document`] and are addressed by [`NodeId`].
//!     Parent, child and sibling links are stored as indices, so insertion and appends are O(1)
//!     and the whole tree is dropped at once. A node is attached exactly once: attaching a node
//!     that already has a parent or siblings is an error, never a silent relink.
//!
//! Layout
//!
//!     All emitters wrap inline content with [`layout::line_blocks`], the same greedy packer,
//!     against the process-wide [`layout::MAX_WIDTH`]. Only the token → text function and the
//!     hanging offset differ between formats.

pub mod layout;
pub mod lexer;
pub mod token;
pub mod tree;

pub use layout::{line_blocks, plain_text, write_lines, WriteOpts, MAX_WIDTH};
pub use lexer::{lex, LexError};
pub use token::{Token, TokenKind, OPAQUE_CLOSE, OPAQUE_OPEN, SPACE_SENTINEL};
pub use tree::{Attribute, Document, Kids, Node, NodeId, NodeKind, TreeError};
