use std::{error, fmt};

#[derive(Debug, Eq, PartialEq)]
pub enum InsertError {
    /// The node arena has reached its configured limit; the tree is left
    /// unchanged.
    ArenaFull,
    /// The interval's low endpoint exceeds its high endpoint.
    InvertedInterval,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ArenaFull => write!(f, "the node arena is out of capacity"),
            Self::InvertedInterval => {
                write!(f, "the interval's low endpoint exceeds its high endpoint")
            }
        }
    }
}

impl error::Error for InsertError {}
