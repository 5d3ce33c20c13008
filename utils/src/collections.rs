mod snapshot_list;

pub use self::snapshot_list::*;
