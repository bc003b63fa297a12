//! The flattened structural index built by the decoder.
//!
//! Decoding does not materialize a tree. It produces one [`Descriptor`] per
//! node in preorder plus a trailing stop sentinel; each descriptor locates
//! the node's encoded bytes in the source buffer and carries enough span
//! information to jump to the next sibling without descending into children.

use crate::kind::Kind;

/// Per-kind payload of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DescriptorData {
    /// The decoded integer value.
    Integer(i64),
    /// Payload length; the payload is the last `length` bytes of the
    /// encoded span (after `<length>:`).
    String { length: usize },
    /// `count` direct children; `skip` descriptors in the subtree including
    /// this one, so `index + skip` is the next sibling.
    List { count: usize, skip: usize },
    /// `count` key-value pairs; `skip` as for lists.
    Dict { count: usize, skip: usize },
    /// End-of-stream sentinel.
    Stop,
}

/// One node of the preorder parse index.
///
/// Invariant: `position..position + size` is in bounds for the buffer the
/// descriptor was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Descriptor {
    /// Byte offset of the node's encoded start.
    pub position: usize,
    /// Encoded byte length of the whole node.
    pub size: usize,
    pub data: DescriptorData,
}

impl Descriptor {
    pub(crate) fn kind(&self) -> Kind {
        match self.data {
            DescriptorData::Integer(_) => Kind::Integer,
            DescriptorData::String { .. } => Kind::String,
            DescriptorData::List { .. } => Kind::List,
            DescriptorData::Dict { .. } => Kind::Dict,
            DescriptorData::Stop => unreachable!("stop sentinel is not addressable"),
        }
    }

    /// Descriptor count of the subtree rooted here; the sibling step.
    pub(crate) fn skip(&self) -> usize {
        match self.data {
            DescriptorData::List { skip, .. } | DescriptorData::Dict { skip, .. } => skip,
            _ => 1,
        }
    }
}
