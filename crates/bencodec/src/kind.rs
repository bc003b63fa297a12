use core::fmt;

/// The four value shapes of the bencode data model.
///
/// The derived order (integer < string < list < dict) is what cross-kind
/// view and value comparisons fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// `i<digits>e`
    Integer,
    /// `<length>:<payload>`
    String,
    /// `l<items>e`
    List,
    /// `d<pairs>e`
    Dict,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Integer => "integer",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Dict => "dict",
        })
    }
}
