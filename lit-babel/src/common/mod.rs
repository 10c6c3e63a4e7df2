//! Contains logic for mapping between native lit text, generic markup and the document tree.

pub mod dom_to_tree;
pub mod sigils;
