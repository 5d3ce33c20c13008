mod stopwatch;

pub use self::stopwatch::*;
