pub use self::{board::*, geometry::*, tetromino::*, theme::*};

pub(crate) mod board;
pub(crate) mod geometry;
pub(crate) mod tetromino;
pub(crate) mod theme;
